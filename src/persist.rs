//! Optional JSON write-through snapshots for the document stores.
//!
//! When DATA_DIR is set, each collection keeps a whole-collection JSON file
//! that is rewritten after every mutation. Loading tolerates a missing or
//! unreadable file (the store simply starts empty), but a failed write is
//! reported to the caller so the settlement flow can surface it.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to encode {collection}: {source}")]
  Encode {
    collection: &'static str,
    #[source] source: serde_json::Error,
  },
  #[error("failed to write {collection} snapshot: {source}")]
  Write {
    collection: &'static str,
    #[source] source: std::io::Error,
  },
}

/// Resolve the snapshot path for a collection, if DATA_DIR is configured.
pub fn snapshot_path(collection: &str) -> Option<PathBuf> {
  let dir = std::env::var("DATA_DIR").ok()?;
  Some(Path::new(&dir).join(format!("{collection}.json")))
}

/// Load a collection snapshot. Any read/parse problem logs and yields the
/// default value; startup never fails on a bad snapshot.
pub fn load_snapshot<T: DeserializeOwned + Default>(path: Option<&Path>, collection: &'static str) -> T {
  let Some(path) = path else { return T::default() };
  match std::fs::read_to_string(path) {
    Ok(s) => match serde_json::from_str::<T>(&s) {
      Ok(v) => {
        info!(target: "codearena_backend", collection, path = %path.display(), "Loaded store snapshot");
        v
      }
      Err(e) => {
        error!(target: "codearena_backend", collection, path = %path.display(), error = %e, "Snapshot parse failed; starting empty");
        T::default()
      }
    },
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
    Err(e) => {
      error!(target: "codearena_backend", collection, path = %path.display(), error = %e, "Snapshot read failed; starting empty");
      T::default()
    }
  }
}

/// Rewrite a collection snapshot. A `None` path means snapshots are off.
pub fn save_snapshot<T: Serialize>(
  path: Option<&Path>,
  collection: &'static str,
  value: &T,
) -> Result<(), StoreError> {
  let Some(path) = path else { return Ok(()) };
  let body = serde_json::to_string_pretty(value)
    .map_err(|source| StoreError::Encode { collection, source })?;
  std::fs::write(path, body).map_err(|source| StoreError::Write { collection, source })
}
