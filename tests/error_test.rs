use faceapi::{FaceError, Result};

#[test]
fn test_invalid_parameter() {
    let err = FaceError::InvalidParameter("faceIds is empty".to_string());
    assert_eq!(err.to_string(), "无效的参数: faceIds is empty");
}

#[test]
fn test_missing_api_key() {
    assert_eq!(FaceError::MissingApiKey.to_string(), "缺少 API key");
}

#[test]
fn test_api_error_display() {
    let err = FaceError::Api {
        status: 400,
        code: "BadArgument".to_string(),
        message: "Invalid image URL.".to_string(),
    };
    assert_eq!(err.to_string(), "服务返回错误 400: BadArgument Invalid image URL.");
    assert_eq!(err.status(), Some(400));
    assert_eq!(FaceError::MissingApiKey.status(), None);
}

#[test]
fn test_error_conversion_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("test anyhow error");
    let face_err: FaceError = anyhow_err.into();
    assert!(face_err.to_string().contains("test anyhow error"));
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(FaceError::InvalidParameter("test".to_string()))
    }

    match returns_error() {
        Err(FaceError::InvalidParameter(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected InvalidParameter"),
    }
}
