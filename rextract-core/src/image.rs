//! Upload validation for recipe photos.
//!
//! The declared content type is trusted; no magic-byte sniffing happens here.
//! Decoding problems surface later as engine failures.

use crate::error::ExtractionError;

/// Content types accepted for OCR.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/tiff"];

/// Maximum upload size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Image formats the OCR engine is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Tiff,
}

impl ImageKind {
    /// Map a declared content type onto a supported kind.
    ///
    /// Case-insensitive; parameters after `;` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/tiff" => Some(ImageKind::Tiff),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Tiff => "tiff",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Tiff => "image/tiff",
        }
    }
}

/// An image as received from the transport layer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    /// Content type declared by the client, if any.
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(data: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: Some(content_type.into()),
        }
    }
}

/// Check an upload against the preconditions for OCR.
///
/// A broken payload is reported before an unsupported type.
pub fn validate_upload(upload: &ImageUpload, max_size: usize) -> Result<ImageKind, ExtractionError> {
    if upload.data.is_empty() {
        return Err(ExtractionError::InvalidPayload("empty file".to_string()));
    }

    if upload.data.len() > max_size {
        return Err(ExtractionError::InvalidPayload(format!(
            "file is {} bytes, maximum is {}",
            upload.data.len(),
            max_size
        )));
    }

    let content_type = upload.content_type.as_deref().unwrap_or("");
    ImageKind::from_content_type(content_type)
        .ok_or_else(|| ExtractionError::UnsupportedType(content_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_content_types_all_map_to_a_kind() {
        for content_type in ALLOWED_CONTENT_TYPES {
            assert!(
                ImageKind::from_content_type(content_type).is_some(),
                "{} should be accepted",
                content_type
            );
        }
    }

    #[test]
    fn test_jpg_alias_is_jpeg() {
        assert_eq!(
            ImageKind::from_content_type("image/jpg"),
            Some(ImageKind::Jpeg)
        );
    }

    #[test]
    fn test_content_type_parameters_and_case() {
        assert_eq!(
            ImageKind::from_content_type("Image/PNG; charset=binary"),
            Some(ImageKind::Png)
        );
    }

    #[test]
    fn test_rejects_other_types() {
        assert_eq!(ImageKind::from_content_type("application/pdf"), None);
        assert_eq!(ImageKind::from_content_type("image/gif"), None);
        assert_eq!(ImageKind::from_content_type(""), None);
    }

    #[test]
    fn test_validate_empty_is_invalid_even_with_bad_type() {
        let upload = ImageUpload::new(Vec::new(), "application/pdf");
        assert!(matches!(
            validate_upload(&upload, MAX_FILE_SIZE),
            Err(ExtractionError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_validate_too_large() {
        let upload = ImageUpload::new(vec![0u8; 11], "image/png");
        assert!(matches!(
            validate_upload(&upload, 10),
            Err(ExtractionError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_validate_missing_content_type() {
        let upload = ImageUpload {
            data: vec![1, 2, 3],
            content_type: None,
        };
        assert!(matches!(
            validate_upload(&upload, MAX_FILE_SIZE),
            Err(ExtractionError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_validate_tiff() {
        let upload = ImageUpload::new(vec![0x49, 0x49, 0x2A, 0x00], "image/tiff");
        assert_eq!(
            validate_upload(&upload, MAX_FILE_SIZE),
            Ok(ImageKind::Tiff)
        );
    }
}
