//! Face API 操作
//!
//! 每个操作先校验参数，再构造 URL 和 body，通过 [`Client`] 发送一次请求。
//! `detect_*_raw` / `*_faces` / `find_similar_from_*` / `verify_with_face` 返回原始响应 body，
//! `detect_*` / `find_similar` / `group` / `identify` / `verify` 在此基础上解析为类型化结果。

pub mod models;
pub mod params;
pub mod urls;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{FaceError, Result};
use crate::config::ClientConfig;
use crate::http::Client;

pub use models::{
    Candidate, DetectedFace, FaceAttributes, FaceRectangle, FaceResponse, GroupResult,
    IdentifyResult, SimilarFace, VerifyResult,
};
pub use params::{
    DetectParameters, FaceAttribute, GroupParameter, IdentifyParameter, SimilarParameter,
    VerifyParameter,
};
pub use urls::Endpoint;

#[derive(Clone)]
pub struct Face {
    client: Client,
    endpoint: Endpoint,
}

impl Face {
    /// 使用默认地址创建，key 为空时返回 `MissingApiKey`
    pub fn new(key: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(key)?,
            endpoint: Endpoint::default(),
        })
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: Client::with_timeout(&config.api_key, config.timeout())?,
            endpoint: Endpoint::parse(&config.endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn detect_raw(
        &self,
        option: &DetectParameters,
        data: Vec<u8>,
        use_json: bool,
    ) -> Result<Vec<u8>> {
        let url = self.endpoint.detect_url(option);
        self.client.connect(url, data, use_json).await
    }

    fn decode_faces(body: Vec<u8>) -> Result<FaceResponse> {
        let faces: FaceResponse = decode(body)?;
        debug!(faces = faces.len(), "detect finished");
        Ok(faces)
    }

    /// 检测远程图片中的人脸，返回原始响应 body
    pub async fn detect_url_raw(
        &self,
        option: &DetectParameters,
        image_url: &str,
    ) -> Result<Vec<u8>> {
        option.validate()?;
        if image_url.trim().is_empty() {
            return Err(FaceError::InvalidParameter("image url is empty".to_string()));
        }
        let data = serde_json::to_vec(&serde_json::json!({ "url": image_url }))?;
        self.detect_raw(option, data, true).await
    }

    /// 检测远程图片中的人脸
    pub async fn detect_url(
        &self,
        option: &DetectParameters,
        image_url: &str,
    ) -> Result<FaceResponse> {
        Self::decode_faces(self.detect_url_raw(option, image_url).await?)
    }

    pub async fn detect_file_raw(
        &self,
        option: &DetectParameters,
        file_path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        option.validate()?;
        let data = tokio::fs::read(file_path.as_ref()).await?;
        self.detect_raw(option, data, false).await
    }

    /// 检测本地图片文件中的人脸
    pub async fn detect_file(
        &self,
        option: &DetectParameters,
        file_path: impl AsRef<Path>,
    ) -> Result<FaceResponse> {
        Self::decode_faces(self.detect_file_raw(option, file_path).await?)
    }

    pub async fn detect_bytes_raw(
        &self,
        option: &DetectParameters,
        image: Vec<u8>,
    ) -> Result<Vec<u8>> {
        option.validate()?;
        if image.is_empty() {
            return Err(FaceError::InvalidParameter("image is empty".to_string()));
        }
        self.detect_raw(option, image, false).await
    }

    pub async fn detect_bytes(
        &self,
        option: &DetectParameters,
        image: Vec<u8>,
    ) -> Result<FaceResponse> {
        Self::decode_faces(self.detect_bytes_raw(option, image).await?)
    }

    async fn post_json<T: Serialize>(&self, url: Url, option: &T) -> Result<Vec<u8>> {
        let data = serde_json::to_vec(option)?;
        self.client.connect(url, data, true).await
    }

    /// 在一组 faceId 中查找相似人脸
    pub async fn find_similar_from_list(
        &self,
        target_id: &str,
        face_ids: &[String],
        max_result: u32,
    ) -> Result<Vec<u8>> {
        let option = SimilarParameter::from_list(target_id, face_ids, max_result);
        self.find_similar_raw(&option).await
    }

    /// 在 faceListId 指定的人脸列表中查找相似人脸
    pub async fn find_similar_from_list_id(
        &self,
        target_id: &str,
        list_id: &str,
        max_result: u32,
    ) -> Result<Vec<u8>> {
        let option = SimilarParameter::from_list_id(target_id, list_id, max_result);
        self.find_similar_raw(&option).await
    }

    pub async fn find_similar_raw(&self, option: &SimilarParameter) -> Result<Vec<u8>> {
        option.validate()?;
        self.post_json(self.endpoint.similar_url(), option).await
    }

    pub async fn find_similar(&self, option: &SimilarParameter) -> Result<Vec<SimilarFace>> {
        decode(self.find_similar_raw(option).await?)
    }

    /// 按相似度对一组 faceId 分组
    pub async fn group_faces(&self, face_ids: &[String]) -> Result<Vec<u8>> {
        let option = GroupParameter::new(face_ids);
        option.validate()?;
        self.post_json(self.endpoint.group_url(), &option).await
    }

    pub async fn group(&self, face_ids: &[String]) -> Result<GroupResult> {
        decode(self.group_faces(face_ids).await?)
    }

    /// 在 person group 中识别每个人脸所属的人
    pub async fn identify_faces(
        &self,
        face_ids: &[String],
        person_group_id: &str,
        max_result: u32,
    ) -> Result<Vec<u8>> {
        let option = IdentifyParameter::new(face_ids, person_group_id, max_result);
        option.validate()?;
        self.post_json(self.endpoint.identify_url(), &option).await
    }

    pub async fn identify(
        &self,
        face_ids: &[String],
        person_group_id: &str,
        max_result: u32,
    ) -> Result<Vec<IdentifyResult>> {
        decode(
            self.identify_faces(face_ids, person_group_id, max_result)
                .await?,
        )
    }

    /// 判断两个 faceId 是否属于同一个人
    pub async fn verify_with_face(&self, face1: &str, face2: &str) -> Result<Vec<u8>> {
        let option = VerifyParameter::new(face1, face2);
        option.validate()?;
        self.post_json(self.endpoint.verify_url(), &option).await
    }

    pub async fn verify(&self, face1: &str, face2: &str) -> Result<VerifyResult> {
        decode(self.verify_with_face(face1, face2).await?)
    }
}

fn decode<T: DeserializeOwned>(body: Vec<u8>) -> Result<T> {
    Ok(serde_json::from_slice(&body)?)
}
