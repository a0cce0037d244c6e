use std::time::Duration;

use reqwest::header::HeaderMap as Headers;
use serde::de::DeserializeOwned;

use crate::face::models::ApiErrorEnvelope;
use crate::http::types::Status;
use crate::{FaceError, Result};

pub struct Response {
    pub status: Status,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub duration: Duration,
}

impl Response {
    pub fn new(status: u16, headers: Headers, body: Vec<u8>, duration: Duration) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            headers,
            body,
            duration,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body)
            .map_err(|e| FaceError::Other(format!("response body is not UTF-8: {}", e)))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// 非 2xx 响应转换为 `FaceError::Api`
    ///
    /// 服务端的错误格式为 `{"error": {"code": "...", "message": "..."}}`，
    /// 无法解析时整个 body 作为 message。
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status.code();
        let (code, message) = match serde_json::from_slice::<ApiErrorEnvelope>(&self.body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (
                String::new(),
                String::from_utf8_lossy(&self.body).into_owned(),
            ),
        };

        Err(FaceError::Api {
            status,
            code,
            message,
        })
    }
}
