//! Fake OCR engine for testing.
//!
//! Returns a canned answer without touching any image library, so extraction
//! can be exercised deterministically.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{OcrEngine, OcrError, StagedImage};

#[derive(Debug, Clone)]
enum FakeResponse {
    Text(String),
    Error(OcrError),
}

/// A fake OCR engine for testing.
#[derive(Debug)]
pub struct FakeEngine {
    response: FakeResponse,
    delay: Option<Duration>,
    calls: AtomicUsize,
    /// Path of the last staged image, with whether it existed during the call.
    last_seen: Mutex<Option<(PathBuf, bool)>>,
}

impl Default for FakeEngine {
    /// Answers with empty text, like an engine looking at a blank page.
    fn default() -> Self {
        Self::with_text("")
    }
}

impl FakeEngine {
    /// Create an engine that always recognizes `text`.
    pub fn with_text(text: &str) -> Self {
        Self::from_response(FakeResponse::Text(text.to_string()))
    }

    /// Create an engine that always fails with `error`.
    pub fn with_error(error: OcrError) -> Self {
        Self::from_response(FakeResponse::Error(error))
    }

    /// Sleep before answering. Useful for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn from_response(response: FakeResponse) -> Self {
        Self {
            response,
            delay: None,
            calls: AtomicUsize::new(0),
            last_seen: Mutex::new(None),
        }
    }

    /// Number of times `recognize` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Path of the most recent staged image and whether it was on disk while
    /// the engine ran.
    pub fn last_seen(&self) -> Option<(PathBuf, bool)> {
        self.last_seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OcrEngine for FakeEngine {
    async fn recognize(&self, image: &StagedImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let path = image.path().to_path_buf();
        let existed = path.exists();
        if let Ok(mut seen) = self.last_seen.lock() {
            *seen = Some((path, existed));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            FakeResponse::Text(text) => Ok(text.clone()),
            FakeResponse::Error(error) => Err(error.clone()),
        }
    }

    fn engine_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageKind;

    #[tokio::test]
    async fn test_fake_engine_text() {
        let engine = FakeEngine::with_text("2 cups sugar");
        let staged = StagedImage::stage(b"img", ImageKind::Jpeg, None).unwrap();

        assert_eq!(engine.recognize(&staged).await.unwrap(), "2 cups sugar");
        assert_eq!(engine.calls(), 1);

        let (path, existed) = engine.last_seen().unwrap();
        assert_eq!(path, staged.path());
        assert!(existed);
    }

    #[tokio::test]
    async fn test_fake_engine_error() {
        let engine = FakeEngine::with_error(OcrError::Failed("corrupt image".to_string()));
        let staged = StagedImage::stage(b"img", ImageKind::Png, None).unwrap();

        let result = engine.recognize(&staged).await;
        assert_eq!(result, Err(OcrError::Failed("corrupt image".to_string())));
    }

    #[test]
    fn test_default_is_blank() {
        let engine = FakeEngine::default();
        assert_eq!(engine.calls(), 0);
        assert!(engine.last_seen().is_none());
    }
}
