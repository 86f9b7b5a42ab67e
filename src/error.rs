//! Error types for file nodes.

use std::path::PathBuf;

use crate::HookName;

/// Result alias used throughout the crate.
pub type NodeResult<T> = Result<T, NodeError>;

/// Node error type with contextual variants.
///
/// Permission failures ([`NodeError::NotPermitted`]) are raised by the node
/// itself, before any hook fires or any storage call is made. Everything else
/// usually comes from a collaborator (view, root, listener) and is handed
/// back to the caller unchanged. A storage-level `PermissionDenied` I/O error
/// converts to [`NodeError::Io`], never to `NotPermitted`.
///
/// # Examples
///
/// ```rust
/// use anyfs_node::NodeError;
/// use std::path::PathBuf;
///
/// let err = NodeError::NotPermitted {
///     path: PathBuf::from("/a/b.txt"),
///     operation: "write",
/// };
/// assert_eq!(err.to_string(), "write: not permitted: /a/b.txt");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The node's permissions do not cover the requested operation.
    #[error("{operation}: not permitted: {path}")]
    NotPermitted {
        /// The node path.
        path: PathBuf,
        /// The operation that was refused.
        operation: &'static str,
    },

    /// Nothing exists at the path (never existed, or already deleted).
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Open mode string is not one of the recognized modes.
    #[error("invalid open mode: {mode:?}")]
    InvalidMode {
        /// The rejected mode string.
        mode: String,
    },

    /// A hook listener refused or failed.
    #[error("{hook} listener failed: {reason}")]
    Hook {
        /// The hook being dispatched.
        hook: HookName,
        /// What the listener reported.
        reason: String,
    },

    /// Generic storage backend error.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl NodeError {
    /// Shorthand for [`NodeError::NotFound`].
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Returns `true` for [`NodeError::NotPermitted`].
    pub fn is_not_permitted(&self) -> bool {
        matches!(self, Self::NotPermitted { .. })
    }
}

impl From<std::io::Error> for NodeError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => NodeError::NotFound {
                path: PathBuf::new(),
            },
            _ => NodeError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}
