use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::{Deserialize, Serialize};

/// Standard alphabet, padding required, non-zero trailing bits ignored
const PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Upload of a base64 payload into `{category}/{file_name}`
///
/// Wire shape: `{ "file_name": "...", "category": "...", "rowData": "<base64>" }`.
/// An absent or empty `file_name` gets a random UUID v4 name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "rowData")]
    pub raw_data: String,
}

impl UploadRequest {
    pub fn new(category: impl Into<String>, raw_data: impl Into<String>) -> Self {
        Self {
            file_name: None,
            category: category.into(),
            raw_data: raw_data.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Object path for this request. Generates a fresh name on every call
    /// when no file name was given.
    pub fn object_path(&self) -> String {
        let name = match self.file_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        format!("{}/{}", self.category, name)
    }

    /// Decodes the payload as standard base64; line breaks are skipped.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.raw_data.contains(['\r', '\n']) {
            let compact: String = self
                .raw_data
                .chars()
                .filter(|c| *c != '\r' && *c != '\n')
                .collect();
            PAYLOAD.decode(compact)
        } else {
            PAYLOAD.decode(&self.raw_data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let req: UploadRequest = serde_json::from_str(
            r#"{"file_name":"a.txt","category":"docs","rowData":"aGVsbG8="}"#,
        )
        .unwrap();

        assert_eq!(req.file_name.as_deref(), Some("a.txt"));
        assert_eq!(req.category, "docs");
        assert_eq!(req.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_object_path_uses_file_name() {
        let req = UploadRequest::new("img", "").with_file_name("cat.png");
        assert_eq!(req.object_path(), "img/cat.png");
    }

    #[test]
    fn test_object_path_generates_uuid() {
        for req in [
            UploadRequest::new("img", ""),
            UploadRequest::new("img", "").with_file_name(""),
        ] {
            let path = req.object_path();
            let name = path.strip_prefix("img/").unwrap();
            let parsed = uuid::Uuid::parse_str(name).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
        }
    }

    #[test]
    fn test_decode_skips_line_breaks() {
        let req = UploadRequest::new("txt", "aGVs\r\nbG8=\n");
        assert_eq!(req.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_decode_ignores_trailing_bits() {
        assert_eq!(UploadRequest::new("txt", "YR==").decode().unwrap(), b"a");
        assert_eq!(UploadRequest::new("txt", "YWJ=").decode().unwrap(), b"ab");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(UploadRequest::new("txt", "not base64!").decode().is_err());
        assert!(UploadRequest::new("txt", "aGVsbG8").decode().is_err());
    }
}
