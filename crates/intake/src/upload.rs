//! Upload: the caller-side checks a file passes before the engine sees it.
//!
//! Order: extension, then size (from metadata, before reading), then UTF-8.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::UploadConfig;
use crate::error::{IntakeError, IntakeResult};

/// A validated text file ready for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub size: u64,
    pub text: String,
}

pub async fn load(path: &Path, limits: &UploadConfig) -> IntakeResult<Upload> {
    let name = display_name(path);
    let io_err = |source| IntakeError::Io {
        path: path.display().to_string(),
        source,
    };

    if !limits.allows(&name) {
        warn!(file = %name, "Rejected upload: unsupported file type");
        return Err(IntakeError::UnsupportedType {
            name,
            allowed: limits.describe_extensions(),
        });
    }

    let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
    check_size(&name, size, limits.max_file_bytes)?;

    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    // the file may have grown since the metadata call
    let size = bytes.len() as u64;
    check_size(&name, size, limits.max_file_bytes)?;

    let text = String::from_utf8(bytes).map_err(|e| {
        warn!(file = %name, "Rejected upload: not UTF-8 text");
        IntakeError::NotText {
            name: name.clone(),
            offset: e.utf8_error().valid_up_to(),
        }
    })?;

    debug!(file = %name, size, "Upload accepted");
    Ok(Upload { name, size, text })
}

fn check_size(name: &str, size: u64, limit: u64) -> IntakeResult<()> {
    if size > limit {
        warn!(file = %name, size, limit, "Rejected upload: too large");
        return Err(IntakeError::TooLarge {
            name: name.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn test_accepts_log_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "app.log", b"INFO ok\n");

        let upload = load(&path, &UploadConfig::default()).await.unwrap();
        assert_eq!(upload.name, "app.log");
        assert_eq!(upload.size, 8);
        assert_eq!(upload.text, "INFO ok\n");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dump.bin", b"INFO ok\n");

        let err = load(&path, &UploadConfig::default()).await.unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedType { .. }));
    }

    #[tokio::test]
    async fn test_rejects_too_large() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "big.txt", &[b'a'; 64]);
        let limits = UploadConfig {
            max_file_bytes: 32,
            ..Default::default()
        };

        let err = load(&path, &limits).await.unwrap_err();
        match err {
            IntakeError::TooLarge { size, limit, .. } => {
                assert_eq!(size, 64);
                assert_eq!(limit, 32);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exact_limit_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "edge.log", &[b'a'; 32]);
        let limits = UploadConfig {
            max_file_bytes: 32,
            ..Default::default()
        };
        assert!(load(&path, &limits).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_binary() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "app.log", b"INFO ok\n\x00\xff\xfe");

        let err = load(&path, &UploadConfig::default()).await.unwrap_err();
        match err {
            IntakeError::NotText { name, offset } => {
                assert_eq!(name, "app.log");
                assert_eq!(offset, 9);
            }
            other => panic!("expected NotText, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("gone.log"), &UploadConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Io { .. }));
    }
}
