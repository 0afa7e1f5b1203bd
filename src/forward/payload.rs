//! Loading of the file that gets forwarded.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::SourceConfig;
use crate::forward::error::ForwardError;

/// Bytes read from the configured source, alive for one forward only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePayload {
    /// Full path the bytes came from.
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl SourcePayload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read the configured source file fully into memory.
///
/// The file handle is closed before this returns, on every path.
pub async fn load_payload(source: &SourceConfig) -> Result<SourcePayload, ForwardError> {
    let path = Path::new(&source.directory).join(&source.file_name);

    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(SourcePayload { path, bytes }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ForwardError::ResourceNotFound {
            directory: source.directory.clone(),
            file_name: source.file_name.clone(),
        }),
        Err(e) => Err(ForwardError::ResourceUnreadable { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_in(dir: &Path, file_name: &str) -> SourceConfig {
        SourceConfig {
            directory: dir.to_string_lossy().into_owned(),
            file_name: file_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_reads_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        std::fs::write(dir.path().join("report.xlsx"), &bytes).unwrap();

        let payload = load_payload(&source_in(dir.path(), "report.xlsx")).await.unwrap();
        assert_eq!(payload.bytes, bytes);
        assert_eq!(payload.len(), 70_000);
        assert_eq!(payload.path, dir.path().join("report.xlsx"));
    }

    #[tokio::test]
    async fn test_empty_file_is_a_valid_payload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.xlsx"), b"").unwrap();

        let payload = load_payload(&source_in(dir.path(), "empty.xlsx")).await.unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_resource_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path(), "missing.xlsx");

        let err = load_payload(&source).await.unwrap_err();
        match err {
            ForwardError::ResourceNotFound { directory, file_name } => {
                assert_eq!(directory, source.directory);
                assert_eq!(file_name, "missing.xlsx");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let err = load_payload(&source_in(dir.path(), "nested")).await.unwrap_err();
        assert!(matches!(err, ForwardError::ResourceUnreadable { .. }), "{err:?}");
    }
}
