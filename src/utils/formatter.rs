use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::FaceError;
use crate::face::models::{DetectedFace, GroupResult, IdentifyResult, SimilarFace, VerifyResult};
use crate::http::Status;

pub struct ResultFormatter {
    color: bool,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResultFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: String, f: impl Fn(&str) -> ColoredString) -> String {
        if self.color { f(&text).to_string() } else { text }
    }

    /// 原始 body：能解析为 JSON 时美化输出，否则原样显示
    pub fn format_raw(&self, body: &[u8]) -> String {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn format_faces(&self, faces: &[DetectedFace]) -> String {
        if faces.is_empty() {
            return self.paint("No faces detected".to_string(), |s| s.yellow());
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "#", "Face ID", "Rectangle", "Age", "Gender", "Smile", "Glasses",
        ]);
        if !self.color {
            table.force_no_tty();
        }

        for (idx, face) in faces.iter().enumerate() {
            let rect = face.face_rectangle;
            let attrs = face.face_attributes.clone().unwrap_or_default();
            table.add_row(vec![
                Cell::new(idx + 1),
                Cell::new(face.face_id.as_deref().unwrap_or("-")).add_attribute(Attribute::Dim),
                Cell::new(format!(
                    "{}x{} @ ({}, {})",
                    rect.width, rect.height, rect.left, rect.top
                )),
                Cell::new(opt_number(attrs.age, 0)),
                Cell::new(attrs.gender.as_deref().unwrap_or("-")),
                Cell::new(opt_number(attrs.smile, 2)),
                Cell::new(attrs.glasses.as_deref().unwrap_or("-")),
            ]);
        }

        let summary = self.paint(format!("{} face(s) detected", faces.len()), |s| s.green());
        format!("{}\n{}", summary, table)
    }

    pub fn format_similar(&self, faces: &[SimilarFace]) -> String {
        if faces.is_empty() {
            return self.paint("No similar faces found".to_string(), |s| s.yellow());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Face ID", "Persisted Face ID", "Confidence"]);
        if !self.color {
            table.force_no_tty();
        }

        for face in faces {
            let color = if face.confidence >= 0.5 {
                Color::Green
            } else {
                Color::Yellow
            };
            table.add_row(vec![
                Cell::new(face.face_id.as_deref().unwrap_or("-")),
                Cell::new(face.persisted_face_id.as_deref().unwrap_or("-")),
                Cell::new(format!("{:.3}", face.confidence)).fg(color),
            ]);
        }

        table.to_string()
    }

    pub fn format_verify(&self, result: &VerifyResult) -> String {
        let line = format!(
            "identical: {}  confidence: {:.3}",
            result.is_identical, result.confidence
        );
        if result.is_identical {
            self.paint(line, |s| s.green().bold())
        } else {
            self.paint(line, |s| s.red().bold())
        }
    }

    pub fn format_group(&self, result: &GroupResult) -> String {
        let mut output = Vec::new();
        for (idx, group) in result.groups.iter().enumerate() {
            let title = self.paint(format!("Group {}:", idx + 1), |s| s.blue().bold());
            output.push(format!("{} {}", title, group.join(", ")));
        }
        if !result.messy_group.is_empty() {
            let title = self.paint("Messy:".to_string(), |s| s.yellow().bold());
            output.push(format!("{} {}", title, result.messy_group.join(", ")));
        }
        output.join("\n")
    }

    pub fn format_identify(&self, results: &[IdentifyResult]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Face ID", "Person ID", "Confidence"]);
        if !self.color {
            table.force_no_tty();
        }

        for result in results {
            if result.candidates.is_empty() {
                table.add_row(vec![
                    Cell::new(&result.face_id),
                    Cell::new("-").fg(Color::Yellow),
                    Cell::new("-"),
                ]);
            }
            for candidate in &result.candidates {
                table.add_row(vec![
                    Cell::new(&result.face_id),
                    Cell::new(&candidate.person_id).fg(Color::Green),
                    Cell::new(format!("{:.3}", candidate.confidence)),
                ]);
            }
        }

        table.to_string()
    }

    pub fn format_error(&self, err: &FaceError) -> String {
        match err {
            FaceError::Api {
                status,
                code,
                message,
            } => {
                let reason = Status::new(*status)
                    .map(|s| s.reason_phrase())
                    .unwrap_or("Unknown");
                let status_line = format!("HTTP {} {}", status, reason);
                let status_line = if (400..500).contains(status) {
                    self.paint(status_line, |s| s.yellow().bold())
                } else {
                    self.paint(status_line, |s| s.red().bold())
                };
                if code.is_empty() {
                    format!("{}\n{}", status_line, message)
                } else {
                    format!("{}\n{}: {}", status_line, code, message)
                }
            }
            other => self.paint(other.to_string(), |s| s.red()),
        }
    }
}

fn opt_number(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::models::{Candidate, FaceAttributes, FaceRectangle};

    fn face(id: &str) -> DetectedFace {
        DetectedFace {
            face_id: Some(id.to_string()),
            face_rectangle: FaceRectangle {
                top: 54,
                left: 394,
                width: 78,
                height: 78,
            },
            face_landmarks: None,
            face_attributes: Some(FaceAttributes {
                age: Some(31.4),
                gender: Some("female".to_string()),
                smile: Some(0.5),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_format_raw_pretty_json() {
        let formatter = ResultFormatter::new(false);
        let output = formatter.format_raw(br#"{"isIdentical":false}"#);
        assert_eq!(output, "{\n  \"isIdentical\": false\n}");
        assert_eq!(formatter.format_raw(b"plain"), "plain");
    }

    #[test]
    fn test_format_faces_table() {
        let output = ResultFormatter::new(false).format_faces(&[face("abc")]);
        assert!(output.starts_with("1 face(s) detected"));
        assert!(output.contains("abc"));
        assert!(output.contains("78x78 @ (394, 54)"));
        assert!(output.contains("31"));
        assert!(output.contains("female"));
    }

    #[test]
    fn test_format_no_faces() {
        assert_eq!(
            ResultFormatter::new(false).format_faces(&[]),
            "No faces detected"
        );
    }

    #[test]
    fn test_format_similar() {
        let faces = vec![
            SimilarFace {
                face_id: None,
                persisted_face_id: Some("p1".to_string()),
                confidence: 0.91,
            },
            SimilarFace {
                face_id: Some("f2".to_string()),
                persisted_face_id: None,
                confidence: 0.4,
            },
        ];
        let output = ResultFormatter::new(false).format_similar(&faces);
        assert!(output.contains("Persisted Face ID"));
        assert!(output.contains("p1"));
        assert!(output.contains("0.910"));
        assert!(output.contains("f2"));
        assert!(output.contains("0.400"));

        assert_eq!(
            ResultFormatter::new(false).format_similar(&[]),
            "No similar faces found"
        );
    }

    #[test]
    fn test_format_group() {
        let result = GroupResult {
            groups: vec![vec!["a".to_string(), "b".to_string()]],
            messy_group: vec!["c".to_string()],
        };
        assert_eq!(
            ResultFormatter::new(false).format_group(&result),
            "Group 1: a, b\nMessy: c"
        );
    }

    #[test]
    fn test_format_identify() {
        let results = vec![IdentifyResult {
            face_id: "f1".to_string(),
            candidates: vec![Candidate {
                person_id: "p1".to_string(),
                confidence: 0.92,
            }],
        }];
        let output = ResultFormatter::new(false).format_identify(&results);
        assert!(output.contains("p1"));
        assert!(output.contains("0.920"));
    }

    #[test]
    fn test_format_api_error() {
        let err = FaceError::Api {
            status: 429,
            code: "RateLimitExceeded".to_string(),
            message: "Rate limit is exceeded.".to_string(),
        };
        assert_eq!(
            ResultFormatter::new(false).format_error(&err),
            "HTTP 429 Too Many Requests\nRateLimitExceeded: Rate limit is exceeded."
        );
    }
}
