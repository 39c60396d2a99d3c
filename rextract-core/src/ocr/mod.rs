//! OCR engine abstraction.
//!
//! Recognition itself happens outside this crate. An engine takes a staged
//! image and returns whatever text it found; [`crate::extract::extract_text`]
//! owns validation, staging, trimming and the timeout.

mod config;
mod fake;
mod staging;
mod tesseract;

pub use config::{ConfigError, EngineKind, OcrConfig};
pub use fake::FakeEngine;
pub use staging::StagedImage;
pub use tesseract::TesseractEngine;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for engine calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),

    #[error("OCR engine timed out after {0:?}")]
    TimedOut(Duration),
}

/// Trait for OCR engines.
///
/// Implementations must be stateless between calls so several extractions can
/// run at once, each with its own staged file.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the staged image. The raw output is returned untrimmed.
    async fn recognize(&self, image: &StagedImage) -> Result<String, OcrError>;

    /// Short engine name for logs, e.g. "tesseract".
    fn engine_name(&self) -> &'static str;
}

/// Build the engine selected by `config`.
pub fn create_engine(config: &OcrConfig) -> Box<dyn OcrEngine> {
    match config.engine {
        EngineKind::Tesseract => Box::new(TesseractEngine::new(
            config.tesseract_path.clone(),
            config.language.clone(),
        )),
        EngineKind::Fake => Box::new(match &config.fake_text {
            Some(text) => FakeEngine::with_text(text),
            None => FakeEngine::default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_engine_follows_config() {
        let config = OcrConfig::default();
        assert_eq!(create_engine(&config).engine_name(), "tesseract");

        let config = OcrConfig {
            engine: EngineKind::Fake,
            fake_text: Some("1 cup rice".to_string()),
            ..OcrConfig::default()
        };
        assert_eq!(create_engine(&config).engine_name(), "fake");
    }
}
