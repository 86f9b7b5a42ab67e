//! # anyfs-node
//!
//! Permission-checked, hook-dispatching **file nodes** for a virtual
//! filesystem built on pluggable storage views.
//!
//! A [`File`] stands for one path of the virtual tree. Callers never talk to
//! storage directly: every read, write, stream open and delete goes through
//! the node, which checks permissions, fires lifecycle hooks and only then
//! delegates to the [`View`].
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use anyfs_node::{EventBus, File, FILES_NAMESPACE, FilesystemNode, HookName, View};
//! use std::sync::Arc;
//!
//! fn save_report(view: Arc<dyn View>) -> Result<(), anyfs_node::NodeError> {
//!     let bus = Arc::new(EventBus::new());
//!     bus.listen(FILES_NAMESPACE, HookName::PostWrite, |node| {
//!         println!("wrote {}", node.path().display());
//!         Ok(())
//!     });
//!
//!     let mut file = File::new(bus, view, "/reports/q3.txt");
//!     file.write_content(b"numbers")?;
//!     let gone = file.delete()?;
//!     assert!(!gone.exists());
//!     Ok(())
//! }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`File`] | Live file node; all content operations |
//! | [`NonExistingFile`] | Terminal/placeholder node for a path with no content |
//! | [`FilesystemNode`] | Capability interface both node kinds implement |
//! | [`View`] | Storage access collaborator ([`ViewRead`] + [`ViewWrite`]) |
//! | [`Root`] | Hook dispatch collaborator |
//! | [`EventBus`] | In-process [`Root`] implementation |
//! | [`FileInfo`] | Cached metadata snapshot |
//! | [`Permissions`] | READ / UPDATE / CREATE / DELETE / SHARE bitmask |
//! | [`OpenMode`] | Parsed `fopen`-style stream mode |
//! | [`NodeError`] | Error type |
//!
//! ---
//!
//! ## Operation Envelope
//!
//! ```text
//! check permissions ──▶ pre hooks ──▶ view delegate ──▶ invalidate metadata ──▶ post hooks
//!        │
//!        └─ NotPermitted: nothing else happens
//! ```
//!
//! | Operation | Requires | Hooks |
//! |-----------|----------|-------|
//! | [`File::read_content`] | READ | none |
//! | [`File::write_content`] | UPDATE | `preWrite`, `postWrite` |
//! | [`File::open_stream`] `r`/`rb` | READ | none |
//! | [`File::open_stream`] any other mode | READ + UPDATE | `preWrite`, `postWrite` |
//! | [`File::delete`] | DELETE | `preDelete`, `postDelete` (payload: [`NonExistingFile`]) |
//! | [`File::hash`], [`File::checksum`] | — | none |
//!
//! View and listener errors are returned unchanged; a failing delegate
//! skips the post hooks.
//!
//! ---
//!
//! ## Logging
//!
//! Operations are instrumented with [`tracing`] spans at `debug` level;
//! permission denials log at `debug`, cache and hook traffic at `trace`.
//! The crate never installs a subscriber.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`FileInfo`], [`Permissions`], [`OpenMode`], [`HookName`]; JSON helpers on [`File`] |

// Private modules
mod cache;
mod error;
mod events;
mod ext;
mod node;
mod traits;
mod types;

// Public re-exports - error types
pub use error::{NodeError, NodeResult};

// Public re-exports - core types
pub use types::{FILES_NAMESPACE, FileInfo, HookName, OpenAccess, OpenMode, Permissions};

// Public re-exports - collaborator traits
pub use traits::{FileStream, FilesystemNode, Root, View, ViewRead, ViewWrite};

// Public re-exports - nodes
pub use cache::MetadataCache;
pub use node::{File, NonExistingFile};

// Public re-exports - infrastructure
pub use events::{EventBus, ListenerId};
pub use ext::NodeExt;

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FileExtJson;
