use std::fmt;
use std::str::FromStr;

use crate::{FaceError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl FromStr for Method {
    type Err = FaceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(FaceError::InvalidParameter(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        // 与 reqwest::StatusCode 的范围一致
        if (100..1000).contains(&code) {
            Ok(Self(code))
        } else {
            Err(FaceError::Other(format!("Invalid HTTP status code: {}", code)))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..=599).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            202 => "Accepted",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            408 => "Request Timeout",
            409 => "Conflict",
            415 => "Unsupported Media Type",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_case_insensitive() {
        assert_eq!(Method::parse("post").unwrap(), Method::Post);
        assert_eq!(Method::parse("Get").unwrap(), Method::Get);
        assert!(Method::parse("TRACE").is_err());
    }

    #[test]
    fn test_method_into_reqwest() {
        let m: reqwest::Method = Method::Post.into();
        assert_eq!(m, reqwest::Method::POST);
    }

    #[test]
    fn test_status_classes() {
        let ok = Status::new(200).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.reason_phrase(), "OK");

        let limited = Status::new(429).unwrap();
        assert!(limited.is_client_error());
        assert!(!limited.is_success());
        assert_eq!(limited.reason_phrase(), "Too Many Requests");

        assert!(Status::new(503).unwrap().is_server_error());
    }

    #[test]
    fn test_status_range() {
        assert!(Status::new(99).is_err());
        assert!(Status::new(1000).is_err());
        assert!(Status::new(600).is_ok());
    }
}
