//! # Event Bus
//!
//! In-process [`Root`] implementation.
//!
//! Listeners subscribe to a `(namespace, hook)` pair and are called inline,
//! in registration order, every time a node emits that hook. The first
//! listener error aborts the dispatch and is returned to the emitting node,
//! which returns it to its caller.
//!
//! ```rust
//! use anyfs_node::{EventBus, FILES_NAMESPACE, FilesystemNode, HookName, NodeError};
//!
//! let bus = EventBus::new();
//! let id = bus.listen(FILES_NAMESPACE, HookName::PreWrite, |node| {
//!     if node.path().starts_with("/readonly") {
//!         return Err(NodeError::Hook {
//!             hook: HookName::PreWrite,
//!             reason: "frozen".into(),
//!         });
//!     }
//!     Ok(())
//! });
//! assert_eq!(bus.listener_count(FILES_NAMESPACE, HookName::PreWrite), 1);
//! assert!(bus.unlisten(id));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::{FilesystemNode, HookName, NodeResult, Root};

type Listener = Arc<dyn Fn(&dyn FilesystemNode) -> NodeResult<()> + Send + Sync>;

/// Handle returned by [`EventBus::listen`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    namespace: String,
    hook: HookName,
    listener: Listener,
}

/// Synchronous, in-process hook dispatcher.
#[derive(Default)]
pub struct EventBus {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to `hook` under `namespace`.
    pub fn listen<F>(&self, namespace: impl Into<String>, hook: HookName, listener: F) -> ListenerId
    where
        F: Fn(&dyn FilesystemNode) -> NodeResult<()> + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                id,
                namespace: namespace.into(),
                hook,
                listener: Arc::new(listener),
            });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut registrations = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() != before
    }

    /// Number of listeners subscribed to `hook` under `namespace`.
    pub fn listener_count(&self, namespace: &str, hook: HookName) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.namespace == namespace && r.hook == hook)
            .count()
    }

    fn matching(&self, namespace: &str, hook: HookName) -> Vec<Listener> {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.namespace == namespace && r.hook == hook)
            .map(|r| Arc::clone(&r.listener))
            .collect()
    }
}

impl Root for EventBus {
    fn emit(&self, namespace: &str, hook: HookName, node: &dyn FilesystemNode) -> NodeResult<()> {
        // Registry lock is released before any listener runs.
        let listeners = self.matching(namespace, hook);
        trace!(
            namespace,
            %hook,
            path = %node.path().display(),
            listeners = listeners.len(),
            "emitting"
        );
        for listener in listeners {
            listener(node)?;
        }
        Ok(())
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("EventBus")
            .field("listeners", &count)
            .finish_non_exhaustive()
    }
}
