use std::path::Path;
use tavle_core::TavleResult;
use tokio::fs;

/// Write-to-temp-then-rename file writer; a crash mid-write leaves the
/// previous layout intact.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> TavleResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Temp file in the same directory so the rename stays on one
        // filesystem.
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp_file.path().to_path_buf();

        fs::write(&temp_path, data).await?;
        fs::rename(&temp_path, path).await?;

        tracing::debug!("atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    pub async fn read_all(path: &Path) -> TavleResult<Vec<u8>> {
        let data = fs::read(path).await?;
        tracing::debug!("read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }
}
