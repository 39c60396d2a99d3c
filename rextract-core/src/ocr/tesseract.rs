//! Tesseract command-line engine.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::{OcrEngine, OcrError, StagedImage};

/// Runs the `tesseract` binary once per image.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    fn command(&self, image: &StagedImage) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(image.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future on timeout must not leave tesseract running.
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &StagedImage) -> Result<String, OcrError> {
        let output = self.command(image).output().await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                OcrError::Unavailable(format!("{} not found", self.binary.display()))
            } else {
                OcrError::Unavailable(format!("failed to run {}: {}", self.binary.display(), e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            return Err(OcrError::Failed(if message.is_empty() {
                format!("tesseract exited with {}", output.status)
            } else {
                message.to_string()
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn engine_name(&self) -> &'static str {
        "tesseract"
    }
}
