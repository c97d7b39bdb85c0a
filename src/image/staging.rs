use super::ImageKind;
use crate::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// An uploaded image written to a temporary file.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    kind: ImageKind,
}

impl StagedImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let kind = ImageKind::detect(bytes)?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::debug!(
            "Staged {} upload ({} bytes) at {}",
            kind.mime_type(),
            bytes.len(),
            file.path().display()
        );

        Ok(Self { file, kind })
    }

    /// Stage on the blocking pool so callers on the runtime don't stall on disk I/O.
    pub async fn stage(bytes: Vec<u8>) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::from_bytes(&bytes))
            .await
            .map_err(|e| std::io::Error::other(format!("Staging task join error: {}", e)))?
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::fixtures::{JPEG_BYTES, PNG_BYTES};
    use crate::Error;

    #[test]
    fn test_staged_image_writes_bytes_with_matching_suffix() {
        let staged = StagedImage::from_bytes(JPEG_BYTES).unwrap();

        assert_eq!(staged.kind(), ImageKind::Jpeg);
        assert!(staged.path().to_string_lossy().ends_with(".jpg"));
        assert_eq!(std::fs::read(staged.path()).unwrap(), JPEG_BYTES);
    }

    #[test]
    fn test_staged_image_removed_on_drop() {
        let staged = StagedImage::from_bytes(PNG_BYTES).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_staging_rejects_unsupported_upload() {
        let err = StagedImage::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_stage_on_blocking_pool() {
        let staged = StagedImage::stage(PNG_BYTES.to_vec()).await.unwrap();
        assert_eq!(staged.kind(), ImageKind::Png);
        assert!(staged.path().exists());
    }
}
