use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::{FaceError, Result};

/// findsimilars 的候选数量上限
pub const MAX_SIMILAR_CANDIDATES: u32 = 1000;
/// findsimilars / group 的 faceIds 数量上限
pub const MAX_FACE_IDS: usize = 1000;
/// identify 的候选数量上限
pub const MAX_IDENTIFY_CANDIDATES: u32 = 5;
/// identify 单次请求最多的 faceIds
pub const MAX_IDENTIFY_FACES: usize = 10;

/// detect 可返回的人脸属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceAttribute {
    Age,
    Gender,
    HeadPose,
    Smile,
    FacialHair,
    Glasses,
}

impl FaceAttribute {
    pub const ALL: [FaceAttribute; 6] = [
        FaceAttribute::Age,
        FaceAttribute::Gender,
        FaceAttribute::HeadPose,
        FaceAttribute::Smile,
        FaceAttribute::FacialHair,
        FaceAttribute::Glasses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceAttribute::Age => "age",
            FaceAttribute::Gender => "gender",
            FaceAttribute::HeadPose => "headPose",
            FaceAttribute::Smile => "smile",
            FaceAttribute::FacialHair => "facialHair",
            FaceAttribute::Glasses => "glasses",
        }
    }
}

impl fmt::Display for FaceAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaceAttribute {
    type Err = FaceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FaceError::InvalidParameter(format!("unknown face attribute: {}", s)))
    }
}

/// detect 的查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectParameters {
    pub return_face_id: bool,
    pub return_face_landmarks: bool,
    pub return_face_attributes: Vec<FaceAttribute>,
}

impl Default for DetectParameters {
    fn default() -> Self {
        Self {
            return_face_id: true,
            return_face_landmarks: false,
            return_face_attributes: Vec::new(),
        }
    }
}

impl DetectParameters {
    pub fn with_landmarks(mut self, enabled: bool) -> Self {
        self.return_face_landmarks = enabled;
        self
    }

    pub fn with_attributes(mut self, attributes: &[FaceAttribute]) -> Self {
        for attr in attributes {
            if !self.return_face_attributes.contains(attr) {
                self.return_face_attributes.push(*attr);
            }
        }
        self
    }

    /// 逗号分隔的属性列表，空则返回 None
    pub fn attributes_param(&self) -> Option<String> {
        if self.return_face_attributes.is_empty() {
            return None;
        }
        Some(
            self.return_face_attributes
                .iter()
                .map(FaceAttribute::as_str)
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    /// 直接构造结构体时可能出现重复属性，服务端会拒绝
    pub fn validate(&self) -> Result<()> {
        for (idx, attr) in self.return_face_attributes.iter().enumerate() {
            if self.return_face_attributes[..idx].contains(attr) {
                return Err(FaceError::InvalidParameter(format!(
                    "duplicate face attribute: {}",
                    attr
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarParameter {
    pub face_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_list_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub face_ids: Vec<String>,
    pub max_num_of_candidates_returned: u32,
}

impl SimilarParameter {
    pub fn from_list(face_id: &str, face_ids: &[String], max_result: u32) -> Self {
        Self {
            face_id: face_id.to_string(),
            face_list_id: None,
            face_ids: face_ids.to_vec(),
            max_num_of_candidates_returned: max_result,
        }
    }

    pub fn from_list_id(face_id: &str, list_id: &str, max_result: u32) -> Self {
        Self {
            face_id: face_id.to_string(),
            face_list_id: Some(list_id.to_string()),
            face_ids: Vec::new(),
            max_num_of_candidates_returned: max_result,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_id("faceId", &self.face_id)?;
        match (&self.face_list_id, self.face_ids.is_empty()) {
            (Some(_), false) => {
                return Err(invalid("faceListId and faceIds are mutually exclusive"));
            }
            (None, true) => return Err(invalid("either faceListId or faceIds is required")),
            (Some(list_id), true) => require_id("faceListId", list_id)?,
            (None, false) => require_ids(&self.face_ids, 1, MAX_FACE_IDS)?,
        }
        require_range(
            "maxNumOfCandidatesReturned",
            self.max_num_of_candidates_returned,
            MAX_SIMILAR_CANDIDATES,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupParameter {
    pub face_ids: Vec<String>,
}

impl GroupParameter {
    pub fn new(face_ids: &[String]) -> Self {
        Self {
            face_ids: face_ids.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_ids(&self.face_ids, 2, MAX_FACE_IDS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyParameter {
    pub face_ids: Vec<String>,
    pub person_group_id: String,
    pub max_num_of_candidates_returned: u32,
}

impl IdentifyParameter {
    pub fn new(face_ids: &[String], person_group_id: &str, max_result: u32) -> Self {
        Self {
            face_ids: face_ids.to_vec(),
            person_group_id: person_group_id.to_string(),
            max_num_of_candidates_returned: max_result,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_ids(&self.face_ids, 1, MAX_IDENTIFY_FACES)?;
        validate_person_group_id(&self.person_group_id)?;
        require_range(
            "maxNumOfCandidatesReturned",
            self.max_num_of_candidates_returned,
            MAX_IDENTIFY_CANDIDATES,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyParameter {
    pub face_id1: String,
    pub face_id2: String,
}

impl VerifyParameter {
    pub fn new(face1: &str, face2: &str) -> Self {
        Self {
            face_id1: face1.to_string(),
            face_id2: face2.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_id("faceId1", &self.face_id1)?;
        require_id("faceId2", &self.face_id2)
    }
}

/// personGroupId 只允许小写字母、数字、'-' 和 '_'，最长 64
pub fn validate_person_group_id(id: &str) -> Result<()> {
    static GROUP_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = GROUP_ID_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9_-]{1,64}$").unwrap());

    if re.is_match(id) {
        Ok(())
    } else {
        Err(FaceError::InvalidParameter(format!(
            "invalid personGroupId: {:?}",
            id
        )))
    }
}

fn invalid(message: &str) -> FaceError {
    FaceError::InvalidParameter(message.to_string())
}

fn require_id(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(FaceError::InvalidParameter(format!("{} is empty", field)))
    } else {
        Ok(())
    }
}

fn require_ids(ids: &[String], min: usize, max: usize) -> Result<()> {
    if ids.len() < min || ids.len() > max {
        return Err(FaceError::InvalidParameter(format!(
            "faceIds must contain {} to {} ids, got {}",
            min,
            max,
            ids.len()
        )));
    }
    if let Some(pos) = ids.iter().position(|id| id.trim().is_empty()) {
        return Err(FaceError::InvalidParameter(format!(
            "faceIds[{}] is empty",
            pos
        )));
    }
    Ok(())
}

fn require_range(field: &str, value: u32, max: u32) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(FaceError::InvalidParameter(format!(
            "{} must be between 1 and {}, got {}",
            field, max, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("face-{}", i)).collect()
    }

    #[test]
    fn test_similar_from_list_json() {
        let param = SimilarParameter::from_list("target", &ids(2), 10);
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "faceId": "target",
                "faceIds": ["face-0", "face-1"],
                "maxNumOfCandidatesReturned": 10
            })
        );
        assert!(param.validate().is_ok());
    }

    #[test]
    fn test_similar_from_list_id_json() {
        let param = SimilarParameter::from_list_id("target", "my_list", 3);
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "faceId": "target",
                "faceListId": "my_list",
                "maxNumOfCandidatesReturned": 3
            })
        );
        assert!(param.validate().is_ok());
    }

    #[test]
    fn test_similar_requires_exactly_one_source() {
        let mut both = SimilarParameter::from_list("target", &ids(1), 1);
        both.face_list_id = Some("list".to_string());
        assert!(both.validate().is_err());

        let neither = SimilarParameter::from_list("target", &[], 1);
        assert!(neither.validate().is_err());
    }

    #[test]
    fn test_similar_candidate_bounds() {
        assert!(SimilarParameter::from_list("t", &ids(1), 0).validate().is_err());
        assert!(SimilarParameter::from_list("t", &ids(1), 1000).validate().is_ok());
        assert!(SimilarParameter::from_list("t", &ids(1), 1001).validate().is_err());
    }

    #[test]
    fn test_group_needs_two_faces() {
        assert!(GroupParameter::new(&ids(1)).validate().is_err());
        assert!(GroupParameter::new(&ids(2)).validate().is_ok());
        assert!(GroupParameter::new(&ids(1001)).validate().is_err());
    }

    #[test]
    fn test_empty_face_id_in_list() {
        let mut list = ids(3);
        list[1] = " ".to_string();
        let err = GroupParameter::new(&list).validate().unwrap_err();
        assert!(err.to_string().contains("faceIds[1]"));
    }

    #[test]
    fn test_identify_validation() {
        assert!(IdentifyParameter::new(&ids(10), "group_1", 5).validate().is_ok());
        assert!(IdentifyParameter::new(&ids(11), "group_1", 1).validate().is_err());
        assert!(IdentifyParameter::new(&ids(1), "group_1", 6).validate().is_err());
        assert!(IdentifyParameter::new(&ids(1), "Group", 1).validate().is_err());
    }

    #[test]
    fn test_identify_json() {
        let param = IdentifyParameter::new(&ids(1), "family", 2);
        let json = serde_json::to_string(&param).unwrap();
        assert_eq!(
            json,
            r#"{"faceIds":["face-0"],"personGroupId":"family","maxNumOfCandidatesReturned":2}"#
        );
    }

    #[test]
    fn test_person_group_id_rules() {
        assert!(validate_person_group_id("abc-123_x").is_ok());
        assert!(validate_person_group_id(&"a".repeat(64)).is_ok());
        assert!(validate_person_group_id(&"a".repeat(65)).is_err());
        assert!(validate_person_group_id("").is_err());
        assert!(validate_person_group_id("has space").is_err());
    }

    #[test]
    fn test_verify_json_and_validation() {
        let param = VerifyParameter::new("a", "b");
        assert_eq!(
            serde_json::to_string(&param).unwrap(),
            r#"{"faceId1":"a","faceId2":"b"}"#
        );
        assert!(param.validate().is_ok());
        assert!(VerifyParameter::new("a", "").validate().is_err());
    }

    #[test]
    fn test_detect_attributes_dedup() {
        let params = DetectParameters::default().with_attributes(&[
            FaceAttribute::Age,
            FaceAttribute::Gender,
            FaceAttribute::Age,
        ]);
        assert_eq!(params.attributes_param().as_deref(), Some("age,gender"));
        assert_eq!(DetectParameters::default().attributes_param(), None);
    }

    #[test]
    fn test_detect_validate_rejects_duplicates() {
        assert!(DetectParameters::default().validate().is_ok());

        let params = DetectParameters {
            return_face_attributes: vec![FaceAttribute::Smile, FaceAttribute::Smile],
            ..DetectParameters::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("smile"));
    }

    #[test]
    fn test_parse_face_attribute() {
        assert_eq!("headpose".parse::<FaceAttribute>().unwrap(), FaceAttribute::HeadPose);
        assert_eq!(" smile ".parse::<FaceAttribute>().unwrap(), FaceAttribute::Smile);
        assert!("emotion".parse::<FaceAttribute>().is_err());
    }
}
