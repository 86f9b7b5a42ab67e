//! Write side of the storage view.

use std::io::{Read, Write};
use std::path::Path;

use crate::{NodeResult, OpenMode};

/// Stream handle returned by [`ViewWrite::open`].
///
/// Blanket-implemented for every `Read + Write + Send` type. A stream opened
/// read-only is expected to fail its writes.
pub trait FileStream: Read + Write + Send {}

impl<T: Read + Write + Send> FileStream for T {}

/// Mutating operations a storage view performs on behalf of nodes.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn ViewWrite`.
pub trait ViewWrite: Send + Sync {
    /// Replace the content stored at `path` with `data`.
    fn write_all(&self, path: &Path, data: &[u8]) -> NodeResult<()>;

    /// Open a stream on `path` in `mode`.
    ///
    /// Writable modes may create or truncate the file, as their letter says.
    fn open(&self, path: &Path, mode: OpenMode) -> NodeResult<Box<dyn FileStream>>;

    /// Remove the file at `path`.
    fn unlink(&self, path: &Path) -> NodeResult<()>;
}
