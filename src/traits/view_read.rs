//! Read side of the storage view.

use std::path::Path;

use crate::{FileInfo, NodeResult};

/// Read operations a storage view performs on behalf of nodes.
///
/// Views are shared between every node built on them, so all methods take
/// `&self`. Backends manage their own synchronization.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn ViewRead`.
pub trait ViewRead: Send + Sync {
    /// Read the entire content stored at `path`.
    ///
    /// # Errors
    ///
    /// Any backend failure. Nodes pass it to their caller unchanged.
    fn read_all(&self, path: &Path) -> NodeResult<Vec<u8>>;

    /// Hash the content stored at `path` with `algorithm`.
    ///
    /// Returns the raw digest bytes when `raw` is set, otherwise the
    /// lowercase hex digest as ASCII bytes.
    fn hash(&self, algorithm: &str, path: &Path, raw: bool) -> NodeResult<Vec<u8>>;

    /// Metadata provider for `path`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    fn file_info(&self, path: &Path) -> NodeResult<Option<FileInfo>>;
}
