//! Scoped on-disk copies of uploaded images.

use std::io::{self, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::image::ImageKind;

/// An uploaded image written to a temporary file for the engine to read.
///
/// The file is removed when this value is dropped, whichever way the
/// extraction ends.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    kind: ImageKind,
    len: usize,
}

impl StagedImage {
    /// Write `data` to a fresh temp file in `dir` (or the system temp dir).
    pub fn stage(data: &[u8], kind: ImageKind, dir: Option<&Path>) -> io::Result<Self> {
        let suffix = format!(".{}", kind.extension());
        let mut builder = Builder::new();
        builder.prefix("rextract-").suffix(&suffix);

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(data)?;
        file.flush()?;

        Ok(Self {
            file,
            kind,
            len: data.len(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_writes_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedImage::stage(b"fake png", ImageKind::Png, Some(dir.path())).unwrap();
        let path = staged.path().to_path_buf();

        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&path).unwrap(), b"fake png");
        assert_eq!(staged.len(), 8);
        assert_eq!(staged.kind(), ImageKind::Png);
        assert_eq!(staged.kind().mime_type(), "image/png");

        drop(staged);
        assert!(!path.exists());
    }
}
