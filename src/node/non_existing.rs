//! Terminal and placeholder representation of a path with no content.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::{FILES_NAMESPACE, FileInfo, FilesystemNode, HookName, NodeError, NodeResult, Root, View};

/// A path that has no backing file.
///
/// Produced by [`File::delete`](crate::File::delete), where it carries the
/// metadata the file had right before it was unlinked, and by
/// [`File::create_non_existing_node`](crate::File::create_non_existing_node)
/// as a bare placeholder. It has no content operations and always reports
/// `exists() == false`.
pub struct NonExistingFile {
    path: PathBuf,
    view: Arc<dyn View>,
    root: Arc<dyn Root>,
    info: Option<FileInfo>,
}

impl NonExistingFile {
    /// A placeholder for `path` without metadata.
    pub fn new(root: Arc<dyn Root>, view: Arc<dyn View>, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            view,
            root,
            info: None,
        }
    }

    /// A terminal node carrying the metadata the path last had.
    pub fn with_info(
        root: Arc<dyn Root>,
        view: Arc<dyn View>,
        path: impl Into<PathBuf>,
        info: FileInfo,
    ) -> Self {
        Self {
            path: path.into(),
            view,
            root,
            info: Some(info),
        }
    }

    /// The storage view shared with the node this came from.
    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    /// The root shared with the node this came from.
    pub fn root(&self) -> &Arc<dyn Root> {
        &self.root
    }

    /// The carried metadata, if any.
    pub fn snapshot(&self) -> Option<&FileInfo> {
        self.info.as_ref()
    }
}

impl FilesystemNode for NonExistingFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        false
    }

    fn file_info(&self) -> NodeResult<FileInfo> {
        self.info
            .clone()
            .ok_or_else(|| NodeError::not_found(&self.path))
    }

    fn send_hooks(&self, hooks: &[HookName]) -> NodeResult<()> {
        for &hook in hooks {
            trace!(path = %self.path.display(), %hook, "sending hook for non-existing node");
            self.root.emit(FILES_NAMESPACE, hook, self)?;
        }
        Ok(())
    }
}

impl fmt::Debug for NonExistingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonExistingFile")
            .field("path", &self.path)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
