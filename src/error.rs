use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceError {
    #[error("缺少 API key")]
    MissingApiKey,

    #[error("无效的参数: {0}")]
    InvalidParameter(String),

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("服务返回错误 {status}: {code} {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for FaceError {
    fn from(err: anyhow::Error) -> Self {
        FaceError::Other(err.to_string())
    }
}

impl FaceError {
    /// 服务端返回的 HTTP 状态码（仅 Api 错误）
    pub fn status(&self) -> Option<u16> {
        match self {
            FaceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for faceapi crate
pub type Result<T> = std::result::Result<T, FaceError>;
