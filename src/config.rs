use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::{FaceError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.projectoxford.ai/face/v1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 用配置文件中出现的字段覆盖当前值
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        if let Some(key) = file.api_key {
            self.api_key = key;
        }
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = file.timeout_secs.filter(|t| *t > 0) {
            self.timeout_secs = timeout;
        }
        self
    }

    /// 环境变量覆盖: FACE_API_KEY, FACE_API_ENDPOINT, FACE_API_TIMEOUT
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FACE_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = key;
        }
        if let Some(endpoint) = lookup("FACE_API_ENDPOINT").filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = lookup("FACE_API_TIMEOUT")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|t| *t > 0)
        {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn apply_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(key) = &overrides.api_key {
            self.api_key = key.clone();
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        self
    }

    /// 合并所有来源，优先级: 命令行 > 环境变量 > 配置文件 > 默认值
    pub fn resolve(file: Option<FileConfig>, overrides: &ConfigOverrides) -> Self {
        Self::resolve_with(file, overrides, |name| std::env::var(name).ok())
    }

    fn resolve_with<F>(file: Option<FileConfig>, overrides: &ConfigOverrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(file) = file {
            config = config.merge_file(file);
        }
        config.apply_vars(lookup).apply_overrides(overrides)
    }
}

/// 命令行上显式给出的值
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "faceapi.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            FaceError::ConfigError(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| FaceError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及父目录
    /// 2. 用户配置目录 ~/.config/faceapi/
    pub fn find_and_load() -> Option<FileConfig> {
        Self::try_load_from_current_dir().or_else(Self::try_load_from_user_dir)
    }

    /// 找到但无法解析的配置文件会被跳过，并输出警告
    fn load_found(path: &Path) -> Option<FileConfig> {
        match Self::load_from_path(path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                None
            }
        }
    }

    fn try_load_from_current_dir() -> Option<FileConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_found(&config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<FileConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("faceapi").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_found(&config_path)
        } else {
            None
        }
    }
}
