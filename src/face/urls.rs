use url::Url;

use crate::config::DEFAULT_ENDPOINT;
use crate::face::params::DetectParameters;
use crate::{FaceError, Result};

/// Face API 的基础地址，例如 `https://api.projectoxford.ai/face/v1.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Default for Endpoint {
    fn default() -> Self {
        // DEFAULT_ENDPOINT 是合法的常量 URL
        Self::parse(DEFAULT_ENDPOINT).unwrap()
    }
}

impl Endpoint {
    pub fn parse(base: &str) -> Result<Self> {
        let base = Url::parse(base.trim())?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(FaceError::InvalidParameter(format!(
                "endpoint must be an http(s) URL: {}",
                base
            )));
        }
        Ok(Self { base })
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    fn operation(&self, name: &str) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url
    }

    /// `{base}/detect?returnFaceId=..&returnFaceLandmarks=..[&returnFaceAttributes=..]`
    pub fn detect_url(&self, option: &DetectParameters) -> Url {
        let mut url = self.operation("detect");
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("returnFaceId", bool_str(option.return_face_id))
                .append_pair("returnFaceLandmarks", bool_str(option.return_face_landmarks));
            if let Some(attributes) = option.attributes_param() {
                query.append_pair("returnFaceAttributes", &attributes);
            }
        }
        url
    }

    pub fn similar_url(&self) -> Url {
        self.operation("findsimilars")
    }

    pub fn group_url(&self) -> Url {
        self.operation("group")
    }

    pub fn identify_url(&self) -> Url {
        self.operation("identify")
    }

    pub fn verify_url(&self) -> Url {
        self.operation("verify")
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::params::FaceAttribute;

    #[test]
    fn test_default_detect_url() {
        let endpoint = Endpoint::default();
        let url = endpoint.detect_url(&DetectParameters::default());
        assert_eq!(
            url.as_str(),
            "https://api.projectoxford.ai/face/v1.0/detect?returnFaceId=true&returnFaceLandmarks=false"
        );
    }

    #[test]
    fn test_detect_url_with_attributes() {
        let params = DetectParameters::default()
            .with_landmarks(true)
            .with_attributes(&[FaceAttribute::Age, FaceAttribute::HeadPose]);
        let url = Endpoint::default().detect_url(&params);
        assert_eq!(
            url.query(),
            Some("returnFaceId=true&returnFaceLandmarks=true&returnFaceAttributes=age%2CheadPose")
        );
    }

    #[test]
    fn test_operation_urls() {
        let endpoint = Endpoint::parse("http://127.0.0.1:8080/face/v1.0/").unwrap();
        assert_eq!(
            endpoint.similar_url().as_str(),
            "http://127.0.0.1:8080/face/v1.0/findsimilars"
        );
        assert_eq!(endpoint.group_url().path(), "/face/v1.0/group");
        assert_eq!(endpoint.identify_url().path(), "/face/v1.0/identify");
        assert_eq!(endpoint.verify_url().path(), "/face/v1.0/verify");
    }

    #[test]
    fn test_root_endpoint() {
        let endpoint = Endpoint::parse("http://localhost:3000").unwrap();
        assert_eq!(endpoint.verify_url().as_str(), "http://localhost:3000/verify");
    }

    #[test]
    fn test_reject_non_http_endpoint() {
        assert!(Endpoint::parse("ftp://example.com/face").is_err());
        assert!(Endpoint::parse("mailto:someone@example.com").is_err());
        assert!(Endpoint::parse("not a url").is_err());
    }
}
