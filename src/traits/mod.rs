//! # Collaborator Traits
//!
//! The interfaces a [`File`](crate::File) consumes, plus the capability
//! interface every node kind implements.
//!
//! ## Overview
//!
//! ```text
//! ViewRead + ViewWrite = View      storage access, shared by all nodes
//! Root                             hook / event dispatch, shared by all nodes
//! FilesystemNode                   File, NonExistingFile
//! ```
//!
//! [`View`] has a blanket implementation. Implement the two component
//! traits and you get the composite for free:
//!
//! ```rust
//! use anyfs_node::{FileInfo, FileStream, NodeResult, OpenMode, View, ViewRead, ViewWrite};
//! use std::path::Path;
//!
//! struct EmptyView;
//!
//! impl ViewRead for EmptyView {
//!     fn read_all(&self, _: &Path) -> NodeResult<Vec<u8>> { Ok(vec![]) }
//!     fn hash(&self, _: &str, _: &Path, _: bool) -> NodeResult<Vec<u8>> { Ok(vec![]) }
//!     fn file_info(&self, _: &Path) -> NodeResult<Option<FileInfo>> { Ok(None) }
//! }
//!
//! impl ViewWrite for EmptyView {
//!     fn write_all(&self, _: &Path, _: &[u8]) -> NodeResult<()> { Ok(()) }
//!     fn open(&self, _: &Path, _: OpenMode) -> NodeResult<Box<dyn FileStream>> {
//!         Ok(Box::new(std::io::Cursor::new(Vec::new())))
//!     }
//!     fn unlink(&self, _: &Path) -> NodeResult<()> { Ok(()) }
//! }
//!
//! fn takes_view(_: &dyn View) {}
//! takes_view(&EmptyView);
//! ```

mod node;
mod root;
mod view_read;
mod view_write;

pub use node::FilesystemNode;
pub use root::Root;
pub use view_read::ViewRead;
pub use view_write::{FileStream, ViewWrite};

/// Full storage view: everything a [`File`](crate::File) delegates to.
///
/// Automatically implemented for any type implementing [`ViewRead`] and
/// [`ViewWrite`].
pub trait View: ViewRead + ViewWrite {}

impl<T: ViewRead + ViewWrite> View for T {}
