//! Image-to-text extraction.

use crate::error::ExtractionError;
use crate::image::{validate_upload, ImageUpload};
use crate::ocr::{OcrConfig, OcrEngine, OcrError, StagedImage};

/// Run OCR on an uploaded image.
///
/// Fails before touching the engine when the upload is missing, broken or of an
/// unsupported type. The staged copy of the image is removed on return,
/// including when the engine fails or times out.
///
/// The returned text is the engine output with surrounding whitespace trimmed.
/// It is not interpreted any further.
pub async fn extract_text(
    engine: &dyn OcrEngine,
    config: &OcrConfig,
    upload: Option<ImageUpload>,
) -> Result<String, ExtractionError> {
    let upload = upload.ok_or_else(|| {
        tracing::info!("Rejected request without an image");
        ExtractionError::MissingImage
    })?;

    let kind = validate_upload(&upload, config.max_upload_bytes).map_err(|e| {
        tracing::info!(detail = ?e, "Rejected upload before OCR");
        e
    })?;

    let staged = StagedImage::stage(&upload.data, kind, config.staging_dir.as_deref())
        .map_err(|e| {
            tracing::error!("Failed to stage image for OCR: {}", e);
            ExtractionError::EngineFailure(format!("failed to stage image: {}", e))
        })?;
    drop(upload);

    tracing::info!(
        engine = engine.engine_name(),
        content_type = staged.kind().mime_type(),
        bytes = staged.len(),
        "Running OCR"
    );

    let result = match tokio::time::timeout(config.timeout, engine.recognize(&staged)).await {
        Ok(result) => result,
        Err(_) => Err(OcrError::TimedOut(config.timeout)),
    };

    let raw = result.map_err(|e| {
        tracing::warn!(engine = engine.engine_name(), "OCR engine failed: {}", e);
        ExtractionError::EngineFailure(e.to_string())
    })?;

    let text = raw.trim();
    if text.is_empty() {
        tracing::info!("OCR found no text");
        return Err(ExtractionError::NoTextFound);
    }

    tracing::info!(chars = text.len(), "OCR extracted text");
    Ok(text.to_string())
}
