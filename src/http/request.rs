use reqwest::header::{CONTENT_TYPE, HeaderMap as Headers, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::http::types::Method;
use crate::{FaceError, Result};

/// API key 所在的请求头
pub const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const JSON_CONTENT_TYPE: &str = "application/json";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    pub query_params: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: &str, url: &str) -> Result<Self> {
        Ok(Self {
            method: method.parse()?,
            url: Url::parse(url)?,
            headers: Headers::new(),
            body: None,
            query_params: Vec::new(),
        })
    }

    pub fn post(url: Url) -> Self {
        Self {
            method: Method::Post,
            url,
            headers: Headers::new(),
            body: None,
            query_params: Vec::new(),
        }
    }

    fn insert_header(&mut self, key: &str, value: &str) -> Result<()> {
        let name: HeaderName = key
            .parse()
            .map_err(|_| FaceError::InvalidParameter(format!("invalid header name: {}", key)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| FaceError::InvalidParameter(format!("invalid value for header {}", key)))?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        self.insert_header(key, value)?;
        Ok(self)
    }

    /// 查询参数按插入顺序保留，同名参数会被覆盖
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        if let Some(slot) = self.query_params.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_string();
        } else {
            self.query_params.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self.body = Some(json);
        Ok(self)
    }

    /// 已序列化好的 JSON body
    pub fn with_json_bytes(mut self, json: Vec<u8>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self.body = Some(json);
        self
    }

    /// 以二进制流上传（图片文件）
    pub fn with_bytes(mut self, data: Vec<u8>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(BINARY_CONTENT_TYPE));
        self.body = Some(data);
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Result<Self> {
        self.insert_header(API_KEY_HEADER, key)?;
        Ok(self)
    }

    /// 合并查询参数后的最终 URL
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query_params.iter());
        }
        url
    }

    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(Vec::len).unwrap_or(0)
    }
}
