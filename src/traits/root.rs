//! Tree root and event bus.

use crate::{FilesystemNode, HookName, NodeResult};

/// The root every node of a tree shares.
///
/// Nodes emit their lifecycle hooks through it. Dispatch is synchronous:
/// every listener has run by the time `emit` returns.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn Root`.
pub trait Root: Send + Sync {
    /// Dispatch `hook` under `namespace` with `node` as payload.
    ///
    /// # Errors
    ///
    /// The first listener error, unchanged. Later listeners do not run.
    fn emit(&self, namespace: &str, hook: HookName, node: &dyn FilesystemNode) -> NodeResult<()>;
}
