use std::time::{Duration, Instant};

use reqwest::header::{HeaderName, HeaderValue};
use tracing::{debug, warn};
use url::Url;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::{FaceError, Result};

// HeaderName::from_static 只接受小写
const KEY_HEADER_LOWER: &str = "ocp-apim-subscription-key";

/// 带 API key 的 HTTP 传输层，每次调用只发送一次请求
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    api_key: HeaderValue,
}

impl Client {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_timeout(api_key, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FaceError::MissingApiKey);
        }

        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| {
            FaceError::InvalidParameter("API key contains invalid header characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let inner = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { inner, api_key })
    }

    /// 发送请求并返回原始响应（不检查状态码）
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        request.headers.insert(
            HeaderName::from_static(KEY_HEADER_LOWER),
            self.api_key.clone(),
        );
        let url = request.full_url();
        let body_len = request.body_len();

        debug!(method = %request.method, url = %url, body_len, "sending request");

        let mut req = self
            .inner
            .request(request.method.into(), url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let start = Instant::now();
        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        let duration = start.elapsed();

        debug!(status, elapsed_ms = duration.as_millis() as u64, "received response");

        Response::new(status, headers, body, duration)
    }

    /// POST `body` 到 `url`，JSON 或二进制上传，返回成功响应的 body
    pub async fn connect(&self, url: Url, body: Vec<u8>, use_json: bool) -> Result<Vec<u8>> {
        let request = if use_json {
            Request::post(url).with_json_bytes(body)
        } else {
            Request::post(url).with_bytes(body)
        };

        let response = self.execute(request).await?;
        if !response.is_success() {
            warn!(
                status = response.status.code(),
                reason = response.status.reason_phrase(),
                "face service returned an error"
            );
        }
        Ok(response.error_for_status()?.into_bytes())
    }
}
