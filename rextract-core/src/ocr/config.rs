//! OCR configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::image::MAX_FILE_SIZE;

/// Default engine binary, resolved through `PATH`.
pub const DEFAULT_TESSERACT_PATH: &str = "tesseract";

/// Default recognition language passed as `-l`.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Default limit for a single engine call in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which engine implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Tesseract,
    Fake,
}

/// OCR and upload configuration.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub engine: EngineKind,
    /// Path to the tesseract binary.
    pub tesseract_path: PathBuf,
    /// Tesseract language pack(s), e.g. "eng" or "eng+fra".
    pub language: String,
    /// Upper bound on one engine call.
    pub timeout: Duration,
    /// Directory for staged images. `None` means the system temp dir.
    pub staging_dir: Option<PathBuf>,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
    /// Text the fake engine answers with.
    pub fake_text: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Tesseract,
            tesseract_path: PathBuf::from(DEFAULT_TESSERACT_PATH),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            staging_dir: None,
            max_upload_bytes: MAX_FILE_SIZE,
            fake_text: None,
        }
    }
}

impl OcrConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `REXTRACT_OCR_ENGINE`: "tesseract" (default) or "fake"
    /// - `REXTRACT_TESSERACT_PATH`: engine binary (default: "tesseract")
    /// - `REXTRACT_OCR_LANGUAGE`: language pack (default: "eng")
    /// - `REXTRACT_OCR_TIMEOUT_SECS`: per-call timeout (default: 30)
    /// - `REXTRACT_STAGING_DIR`: where uploads are staged (default: system temp dir)
    /// - `REXTRACT_MAX_UPLOAD_BYTES`: upload cap (default: 10MB)
    /// - `REXTRACT_FAKE_OCR_TEXT`: text returned by the fake engine
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let engine = match env::var("REXTRACT_OCR_ENGINE") {
            Ok(value) => parse_engine(&value)?,
            Err(_) => defaults.engine,
        };

        let tesseract_path = env::var("REXTRACT_TESSERACT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.tesseract_path);

        let language = env::var("REXTRACT_OCR_LANGUAGE").unwrap_or(defaults.language);

        let timeout = match env::var("REXTRACT_OCR_TIMEOUT_SECS") {
            Ok(value) => parse_timeout(&value)?,
            Err(_) => defaults.timeout,
        };

        let max_upload_bytes = match env::var("REXTRACT_MAX_UPLOAD_BYTES") {
            Ok(value) => parse_number("REXTRACT_MAX_UPLOAD_BYTES", &value)?,
            Err(_) => defaults.max_upload_bytes,
        };

        Ok(Self {
            engine,
            tesseract_path,
            language,
            timeout,
            staging_dir: env::var("REXTRACT_STAGING_DIR").ok().map(PathBuf::from),
            max_upload_bytes,
            fake_text: env::var("REXTRACT_FAKE_OCR_TEXT").ok(),
        })
    }
}

fn parse_engine(value: &str) -> Result<EngineKind, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tesseract" => Ok(EngineKind::Tesseract),
        "fake" => Ok(EngineKind::Fake),
        _ => Err(ConfigError::InvalidValue {
            name: "REXTRACT_OCR_ENGINE".to_string(),
            value: value.to_string(),
        }),
    }
}

/// Engine timeout in whole seconds. Zero would fail every call, so it is rejected.
fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match parse_number::<u64>("REXTRACT_OCR_TIMEOUT_SECS", value)? {
        0 => Err(ConfigError::InvalidValue {
            name: "REXTRACT_OCR_TIMEOUT_SECS".to_string(),
            value: value.to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}
