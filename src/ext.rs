//! # Extension Traits
//!
//! Convenience methods for nodes.
//!
//! ## Overview
//!
//! [`NodeExt`] has default methods and a blanket implementation, so every
//! [`FilesystemNode`] (including `dyn FilesystemNode` inside a hook listener)
//! gets them for free.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`name`](NodeExt::name) | Final path component |
//! | [`parent_path`](NodeExt::parent_path) | Path of the containing folder |
//! | [`is_readable`](NodeExt::is_readable) | READ granted |
//! | [`is_updateable`](NodeExt::is_updateable) | UPDATE granted |
//! | [`is_deletable`](NodeExt::is_deletable) | DELETE granted |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, [`File`](crate::File) also gets
//! `read_json` and `write_json`, which go through the permission-checked
//! content operations and fire the same hooks.
//!
//! ```toml
//! [dependencies]
//! anyfs-node = { version = "0.1", features = ["serde"] }
//! ```

use std::path::Path;

use crate::{FilesystemNode, NodeError, NodeResult, Permissions};

/// Extension methods for any node.
///
/// # Example
///
/// ```rust
/// use anyfs_node::{FilesystemNode, NodeExt, NodeResult};
///
/// fn describe(node: &dyn FilesystemNode) -> NodeResult<String> {
///     let access = if node.is_updateable()? { "rw" } else { "ro" };
///     Ok(format!("{} ({access})", node.name().unwrap_or("/")))
/// }
/// ```
pub trait NodeExt: FilesystemNode {
    /// Final component of the node's path, if it has one.
    fn name(&self) -> Option<&str> {
        self.path().file_name().and_then(|name| name.to_str())
    }

    /// Path of the folder containing the node.
    fn parent_path(&self) -> Option<&Path> {
        self.path().parent()
    }

    /// Returns `true` if READ is granted.
    ///
    /// A node with no metadata reports `Ok(false)` instead of an error.
    fn is_readable(&self) -> NodeResult<bool> {
        grants(self, Permissions::READ)
    }

    /// Returns `true` if UPDATE is granted.
    fn is_updateable(&self) -> NodeResult<bool> {
        grants(self, Permissions::UPDATE)
    }

    /// Returns `true` if DELETE is granted.
    fn is_deletable(&self) -> NodeResult<bool> {
        grants(self, Permissions::DELETE)
    }
}

impl<N: FilesystemNode + ?Sized> NodeExt for N {}

fn grants<N: FilesystemNode + ?Sized>(node: &N, required: Permissions) -> NodeResult<bool> {
    match node.check_permissions(required) {
        Ok(granted) => Ok(granted),
        Err(NodeError::NotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use crate::{File, NodeError, NodeResult};
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON helpers for file content.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait FileExtJson {
        /// Read the file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `NodeError::NotPermitted` if READ is not granted
        /// - `NodeError::Deserialization` if the content is not valid JSON for `T`
        fn read_json<T: DeserializeOwned>(&self) -> NodeResult<T>;

        /// Serialize `value` as pretty JSON and write it, firing the write hooks.
        ///
        /// # Errors
        ///
        /// - `NodeError::Serialization` if `value` cannot be serialized
        /// - `NodeError::NotPermitted` if UPDATE is not granted
        fn write_json<T: Serialize>(&self, value: &T) -> NodeResult<()>;
    }

    impl FileExtJson for File {
        fn read_json<T: DeserializeOwned>(&self) -> NodeResult<T> {
            let data = self.read_content()?;
            serde_json::from_slice(&data).map_err(|e| NodeError::Deserialization(e.to_string()))
        }

        fn write_json<T: Serialize>(&self, value: &T) -> NodeResult<()> {
            let json = serde_json::to_vec_pretty(value)
                .map_err(|e| NodeError::Serialization(e.to_string()))?;
            self.write_content(&json)
        }
    }
}

#[cfg(feature = "serde")]
pub use json::FileExtJson;
