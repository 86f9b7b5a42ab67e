//! Capability interface shared by every node kind.

use std::path::Path;

use crate::{FileInfo, HookName, NodeResult, Permissions};

/// A node of the virtual tree, live or not.
///
/// Implemented by [`File`](crate::File) and
/// [`NonExistingFile`](crate::NonExistingFile). Hook listeners receive nodes
/// as `&dyn FilesystemNode`, so this is the whole surface a listener sees.
pub trait FilesystemNode {
    /// Absolute path within the virtual tree.
    fn path(&self) -> &Path;

    /// Returns `false` once the node has been deleted, and always for
    /// non-existing representations.
    fn exists(&self) -> bool;

    /// Metadata for the node, fetched lazily and cached.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotFound`](crate::NodeError::NotFound) if there is no
    /// metadata for the path, or whatever the provider reports.
    fn file_info(&self) -> NodeResult<FileInfo>;

    /// Returns `true` if the node's permissions cover all of `required`.
    fn check_permissions(&self, required: Permissions) -> NodeResult<bool> {
        Ok(self.file_info()?.permissions.contains(required))
    }

    /// Emit each hook, in order, with this node as payload.
    ///
    /// Stops at the first listener error.
    fn send_hooks(&self, hooks: &[HookName]) -> NodeResult<()>;
}
