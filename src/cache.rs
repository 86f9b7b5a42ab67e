//! Per-node metadata cache.

use std::sync::{PoisonError, RwLock};

use tracing::trace;

use crate::{FileInfo, NodeResult};

/// Lazily filled, explicitly invalidated [`FileInfo`] slot.
///
/// A cache belongs to exactly one node. Interior mutability lets the node
/// fetch on `&self`, which is how listeners see it through
/// `&dyn FilesystemNode`. It is not a coordination point between threads.
#[derive(Debug, Default)]
pub struct MetadataCache {
    slot: RwLock<Option<FileInfo>>,
}

impl MetadataCache {
    /// An empty cache; the first access fetches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cache pre-filled with `info`.
    pub fn with_info(info: FileInfo) -> Self {
        Self {
            slot: RwLock::new(Some(info)),
        }
    }

    /// Return the cached snapshot, or run `fetch` and keep its result.
    ///
    /// A failed fetch leaves the cache empty.
    pub fn get_or_fetch<F>(&self, fetch: F) -> NodeResult<FileInfo>
    where
        F: FnOnce() -> NodeResult<FileInfo>,
    {
        if let Some(info) = self.snapshot() {
            trace!(path = %info.path.display(), "metadata cache hit");
            return Ok(info);
        }
        let info = fetch()?;
        trace!(path = %info.path.display(), "metadata cache filled");
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(info.clone());
        Ok(info)
    }

    /// Drop the cached snapshot so the next access fetches again.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns `true` if a snapshot is held.
    pub fn is_cached(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Clone of the cached snapshot, without fetching.
    pub fn snapshot(&self) -> Option<FileInfo> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
