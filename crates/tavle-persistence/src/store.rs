use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tavle_core::{TavleError, TavleResult};
use tavle_domain::LaneLayout;

use crate::atomic_writer::AtomicWriter;

/// Wire shape of a persisted board layout: the three lane id lists plus a
/// capture timestamp in epoch millis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLayout {
    #[serde(flatten)]
    pub lanes: LaneLayout,
    pub ts: i64,
}

impl SavedLayout {
    pub fn capture(lanes: LaneLayout) -> Self {
        Self {
            lanes,
            ts: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Durable lane-layout storage. Persistence is best-effort by contract:
/// `save` and `clear` never fail the caller, and `load` answers absent for
/// anything it cannot read back.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    async fn save(&self, lanes: &LaneLayout);
    async fn load(&self) -> Option<SavedLayout>;
    async fn clear(&self);
}

/// JSON-file layout store under a fixed per-application path.
#[derive(Debug, Clone)]
pub struct JsonLayoutStore {
    path: PathBuf,
}

impl JsonLayoutStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|data| data.join("tavle/layout.json"))
            .unwrap_or_else(|| PathBuf::from(".tavle-layout.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn try_save(&self, lanes: &LaneLayout) -> TavleResult<()> {
        let saved = SavedLayout::capture(lanes.clone());
        let bytes = serde_json::to_vec_pretty(&saved)
            .map_err(|e| TavleError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;
        tracing::debug!("saved board layout to {}", self.path.display());
        Ok(())
    }

    async fn try_load(&self) -> TavleResult<SavedLayout> {
        let bytes = AtomicWriter::read_all(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|e| TavleError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl LayoutStore for JsonLayoutStore {
    async fn save(&self, lanes: &LaneLayout) {
        if let Err(e) = self.try_save(lanes).await {
            tracing::warn!("layout save failed, continuing without: {}", e);
        }
    }

    async fn load(&self) -> Option<SavedLayout> {
        if !self.path.exists() {
            return None;
        }
        match self.try_load().await {
            Ok(saved) => Some(saved),
            Err(e) => {
                // Malformed state is indistinguishable from absent state to
                // the caller.
                tracing::warn!("ignoring unreadable layout at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!("cleared board layout at {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("layout clear failed: {}", e),
        }
    }
}
