//! The live file node.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, instrument, trace};

use crate::{
    FILES_NAMESPACE, FileInfo, FileStream, FilesystemNode, HookName, MetadataCache,
    NonExistingFile, NodeError, NodeResult, OpenMode, Permissions, Root, View,
};

/// A single file of the virtual tree.
///
/// Every content operation goes through the same envelope: permission check,
/// pre hooks, view delegate, cache invalidation, post hooks. A failed check
/// returns [`NodeError::NotPermitted`] before anything else happens. Errors
/// from the view or from hook listeners are returned unchanged and abort the
/// rest of the sequence.
///
/// # Example
///
/// ```rust
/// use anyfs_node::{EventBus, File, FileInfo, FileStream, NodeResult, OpenMode, Permissions};
/// use anyfs_node::{ViewRead, ViewWrite};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// struct HelloView;
///
/// impl ViewRead for HelloView {
///     fn read_all(&self, _: &Path) -> NodeResult<Vec<u8>> { Ok(b"hello".to_vec()) }
///     fn hash(&self, _: &str, _: &Path, _: bool) -> NodeResult<Vec<u8>> { Ok(vec![]) }
///     fn file_info(&self, path: &Path) -> NodeResult<Option<FileInfo>> {
///         Ok(Some(FileInfo::new(path, Permissions::READ)))
///     }
/// }
///
/// impl ViewWrite for HelloView {
///     fn write_all(&self, _: &Path, _: &[u8]) -> NodeResult<()> { Ok(()) }
///     fn open(&self, _: &Path, _: OpenMode) -> NodeResult<Box<dyn FileStream>> {
///         Ok(Box::new(std::io::Cursor::new(b"hello".to_vec())))
///     }
///     fn unlink(&self, _: &Path) -> NodeResult<()> { Ok(()) }
/// }
///
/// let file = File::new(Arc::new(EventBus::new()), Arc::new(HelloView), "/hello.txt");
/// assert_eq!(file.read_content().unwrap(), b"hello");
/// assert!(file.write_content(b"bye").unwrap_err().is_not_permitted());
/// ```
pub struct File {
    path: PathBuf,
    view: Arc<dyn View>,
    root: Arc<dyn Root>,
    cache: MetadataCache,
    exists: bool,
}

impl File {
    /// A node for `path`; metadata is fetched on first use.
    pub fn new(root: Arc<dyn Root>, view: Arc<dyn View>, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            view,
            root,
            cache: MetadataCache::empty(),
            exists: true,
        }
    }

    /// A node for `path` whose metadata is already known.
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
            cache: MetadataCache::with_info(info),
            exists: true,
        }
    }

    /// The storage view this node delegates to.
    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    /// The root this node emits hooks through.
    pub fn root(&self) -> &Arc<dyn Root> {
        &self.root
    }

    /// Returns `true` if a metadata snapshot is currently cached.
    pub fn has_cached_metadata(&self) -> bool {
        self.cache.is_cached()
    }

    /// Drop the cached metadata; the next access fetches it again.
    pub fn invalidate_metadata(&self) {
        trace!(path = %self.path.display(), "metadata invalidated");
        self.cache.invalidate();
    }

    /// Read the whole file. Requires [`Permissions::READ`].
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn read_content(&self) -> NodeResult<Vec<u8>> {
        self.require(Permissions::READ, "read")?;
        self.view.read_all(&self.path)
    }

    /// Replace the file's content. Requires [`Permissions::UPDATE`].
    ///
    /// Fires `preWrite` before and `postWrite` after the write. If the view
    /// fails, `postWrite` does not fire and the cache is left alone.
    #[instrument(level = "debug", skip(self, data), fields(path = %self.path.display(), len = data.len()))]
    pub fn write_content(&self, data: &[u8]) -> NodeResult<()> {
        self.require(Permissions::UPDATE, "write")?;
        self.send_hooks(&[HookName::PreWrite])?;
        self.view.write_all(&self.path, data)?;
        self.invalidate_metadata();
        self.send_hooks(&[HookName::PostWrite])
    }

    /// Open a stream on the file.
    ///
    /// `r` and `rb` need [`Permissions::READ`] and fire no hooks. Every other
    /// mode needs READ and UPDATE and is wrapped in `preWrite`/`postWrite`;
    /// a successful writable open also drops the cached metadata.
    #[instrument(level = "debug", skip(self, mode), fields(path = %self.path.display(), mode = %mode))]
    pub fn open_stream(&self, mode: OpenMode) -> NodeResult<Box<dyn FileStream>> {
        self.require(mode.required_permissions(), "open")?;
        let (pre, post) = mode.hooks();
        self.send_hooks(pre)?;
        let stream = self.view.open(&self.path, mode)?;
        if mode.writes() {
            self.invalidate_metadata();
        }
        self.send_hooks(post)?;
        Ok(stream)
    }

    /// [`open_stream`](Self::open_stream) with an `fopen`-style mode string.
    ///
    /// # Errors
    ///
    /// [`NodeError::InvalidMode`] for an unrecognized mode, before any check.
    pub fn fopen(&self, mode: &str) -> NodeResult<Box<dyn FileStream>> {
        self.open_stream(mode.parse()?)
    }

    /// Delete the file. Requires [`Permissions::DELETE`].
    ///
    /// Fires `preDelete`, unlinks, then emits `postDelete` with a
    /// [`NonExistingFile`] carrying the metadata read before the unlink. That
    /// same value is returned. Afterwards this node reports `exists() ==
    /// false` and refuses every further operation.
    ///
    /// If a `postDelete` listener fails the file is still gone: the node is
    /// marked non-existing before the listener error is returned.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn delete(&mut self) -> NodeResult<NonExistingFile> {
        self.require(Permissions::DELETE, "delete")?;
        self.send_hooks(&[HookName::PreDelete])?;
        let snapshot = self.file_info()?;
        self.view.unlink(&self.path)?;

        let terminal = NonExistingFile::with_info(
            Arc::clone(&self.root),
            Arc::clone(&self.view),
            self.path.clone(),
            snapshot,
        );
        let emitted = self
            .root
            .emit(FILES_NAMESPACE, HookName::PostDelete, &terminal);
        self.exists = false;
        self.invalidate_metadata();
        debug!("file deleted");
        emitted?;
        Ok(terminal)
    }

    /// Hash the file's content through the view. No permission check.
    ///
    /// Raw digest bytes when `raw` is set, otherwise lowercase hex as ASCII.
    /// On a deleted node this returns [`NodeError::NotFound`] without calling
    /// the view.
    pub fn hash(&self, algorithm: &str, raw: bool) -> NodeResult<Vec<u8>> {
        self.ensure_exists()?;
        self.view.hash(algorithm, &self.path, raw)
    }

    /// The checksum stored in the node's metadata.
    pub fn checksum(&self) -> NodeResult<String> {
        Ok(self.file_info()?.checksum)
    }

    /// Permissions granted on the node.
    pub fn permissions(&self) -> NodeResult<Permissions> {
        Ok(self.file_info()?.permissions)
    }

    /// Size in bytes.
    pub fn size(&self) -> NodeResult<u64> {
        Ok(self.file_info()?.size)
    }

    /// Last modification time.
    pub fn mtime(&self) -> NodeResult<SystemTime> {
        Ok(self.file_info()?.mtime)
    }

    /// Entity tag.
    pub fn etag(&self) -> NodeResult<String> {
        Ok(self.file_info()?.etag)
    }

    /// MIME type.
    pub fn mime_type(&self) -> NodeResult<String> {
        Ok(self.file_info()?.mime_type)
    }

    /// A placeholder for `path` sharing this node's view and root.
    pub fn create_non_existing_node(&self, path: impl Into<PathBuf>) -> NonExistingFile {
        NonExistingFile::new(Arc::clone(&self.root), Arc::clone(&self.view), path)
    }

    fn ensure_exists(&self) -> NodeResult<()> {
        if self.exists {
            Ok(())
        } else {
            Err(NodeError::not_found(&self.path))
        }
    }

    fn require(&self, required: Permissions, operation: &'static str) -> NodeResult<()> {
        self.ensure_exists()?;
        if self.check_permissions(required)? {
            return Ok(());
        }
        debug!(
            path = %self.path.display(),
            operation,
            required = required.bits(),
            "permission check failed"
        );
        Err(NodeError::NotPermitted {
            path: self.path.clone(),
            operation,
        })
    }
}

impl FilesystemNode for File {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.exists
    }

    fn file_info(&self) -> NodeResult<FileInfo> {
        self.ensure_exists()?;
        self.cache.get_or_fetch(|| {
            self.view
                .file_info(&self.path)?
                .ok_or_else(|| NodeError::not_found(&self.path))
        })
    }

    fn send_hooks(&self, hooks: &[HookName]) -> NodeResult<()> {
        for &hook in hooks {
            trace!(path = %self.path.display(), %hook, "sending hook");
            self.root.emit(FILES_NAMESPACE, hook, self)?;
        }
        Ok(())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("path", &self.path)
            .field("exists", &self.exists)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ViewRead, ViewWrite};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Single-file view with a fixed permission mask.
    struct MockView {
        permissions: Permissions,
        fetches: AtomicUsize,
        unlinked: AtomicUsize,
        deny_storage_writes: bool,
    }

    impl MockView {
        fn granting(permissions: Permissions) -> Arc<Self> {
            Arc::new(Self {
                permissions,
                fetches: AtomicUsize::new(0),
                unlinked: AtomicUsize::new(0),
                deny_storage_writes: false,
            })
        }

        fn denying_storage_writes(permissions: Permissions) -> Arc<Self> {
            Arc::new(Self {
                permissions,
                fetches: AtomicUsize::new(0),
                unlinked: AtomicUsize::new(0),
                deny_storage_writes: true,
            })
        }
    }

    impl ViewRead for MockView {
        fn read_all(&self, _: &Path) -> NodeResult<Vec<u8>> {
            Ok(b"content".to_vec())
        }

        fn hash(&self, algorithm: &str, _: &Path, raw: bool) -> NodeResult<Vec<u8>> {
            Ok(format!("{algorithm}:{raw}").into_bytes())
        }

        fn file_info(&self, path: &Path) -> NodeResult<Option<FileInfo>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Some(
                FileInfo::new(path, self.permissions)
                    .with_checksum("SHA1:aa")
                    .with_size(7)
                    .with_etag("etag-1")
                    .with_mime_type("text/plain"),
            ))
        }
    }

    impl ViewWrite for MockView {
        fn write_all(&self, _: &Path, _: &[u8]) -> NodeResult<()> {
            if self.deny_storage_writes {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
            }
            Ok(())
        }

        fn open(&self, _: &Path, _: OpenMode) -> NodeResult<Box<dyn FileStream>> {
            Ok(Box::new(std::io::Cursor::new(Vec::new())))
        }

        fn unlink(&self, _: &Path) -> NodeResult<()> {
            self.unlinked.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingRoot {
        hooks: Mutex<Vec<(HookName, PathBuf, bool)>>,
    }

    impl Root for RecordingRoot {
        fn emit(&self, _: &str, hook: HookName, node: &dyn FilesystemNode) -> NodeResult<()> {
            self.hooks
                .lock()
                .unwrap()
                .push((hook, node.path().to_path_buf(), node.exists()));
            Ok(())
        }
    }

    fn file(view: &Arc<MockView>, root: &Arc<RecordingRoot>) -> File {
        File::new(root.clone(), view.clone(), "/docs/report.txt")
    }

    #[test]
    fn metadata_getters_read_one_snapshot() {
        let view = MockView::granting(Permissions::READ);
        let root = Arc::new(RecordingRoot::default());
        let node = file(&view, &root);

        assert_eq!(node.size().unwrap(), 7);
        assert_eq!(node.etag().unwrap(), "etag-1");
        assert_eq!(node.mime_type().unwrap(), "text/plain");
        assert_eq!(node.mtime().unwrap(), SystemTime::UNIX_EPOCH);
        assert_eq!(node.permissions().unwrap(), Permissions::READ);
        assert_eq!(view.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn with_info_never_fetches() {
        let view = MockView::granting(Permissions::NONE);
        let root = Arc::new(RecordingRoot::default());
        let info = FileInfo::new("/docs/report.txt", Permissions::READ).with_checksum("MD5:ff");
        let node = File::with_info(root, view.clone(), "/docs/report.txt", info);

        assert_eq!(node.checksum().unwrap(), "MD5:ff");
        assert_eq!(node.read_content().unwrap(), b"content");
        assert_eq!(view.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn hash_passes_arguments_through() {
        let view = MockView::granting(Permissions::NONE);
        let root = Arc::new(RecordingRoot::default());
        let node = file(&view, &root);

        assert_eq!(node.hash("sha256", false).unwrap(), b"sha256:false");
        assert_eq!(node.hash("md5", true).unwrap(), b"md5:true");
        assert!(root.hooks.lock().unwrap().is_empty());
    }

    #[test]
    fn storage_permission_error_is_not_a_node_denial() {
        let view = MockView::denying_storage_writes(Permissions::ALL);
        let root = Arc::new(RecordingRoot::default());
        let node = file(&view, &root);

        let err = node.write_content(b"x").unwrap_err();
        assert!(!err.is_not_permitted());
        assert!(matches!(
            err,
            NodeError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied
        ));
        let hooks = root.hooks.lock().unwrap();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].0, HookName::PreWrite);
    }

    #[test]
    fn writable_open_drops_cached_metadata() {
        let view = MockView::granting(Permissions::ALL);
        let root = Arc::new(RecordingRoot::default());
        let node = file(&view, &root);

        node.size().unwrap();
        node.fopen("r").unwrap();
        assert!(node.has_cached_metadata());

        for mode in ["w", "wb", "w+", "x", "a", "r+"] {
            node.size().unwrap();
            node.fopen(mode).unwrap();
            assert!(!node.has_cached_metadata(), "{mode}");
        }
    }

    #[test]
    fn invalid_mode_fails_before_check() {
        let view = MockView::granting(Permissions::ALL);
        let root = Arc::new(RecordingRoot::default());
        let node = file(&view, &root);

        assert!(matches!(node.fopen("rw"), Err(NodeError::InvalidMode { .. })));
        assert_eq!(view.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn deleted_node_refuses_everything() {
        let view = MockView::granting(Permissions::ALL);
        let root = Arc::new(RecordingRoot::default());
        let mut node = file(&view, &root);

        node.delete().unwrap();
        assert!(!node.exists());
        assert!(!node.has_cached_metadata());
        let hooks_after_delete = root.hooks.lock().unwrap().len();

        assert!(matches!(node.read_content(), Err(NodeError::NotFound { .. })));
        assert!(matches!(node.write_content(b"x"), Err(NodeError::NotFound { .. })));
        assert!(matches!(node.fopen("r"), Err(NodeError::NotFound { .. })));
        assert!(matches!(node.hash("md5", false), Err(NodeError::NotFound { .. })));
        assert!(matches!(node.checksum(), Err(NodeError::NotFound { .. })));
        assert!(matches!(node.delete(), Err(NodeError::NotFound { .. })));

        assert_eq!(view.unlinked.load(Ordering::SeqCst), 1);
        assert_eq!(root.hooks.lock().unwrap().len(), hooks_after_delete);
    }

    #[test]
    fn non_existing_factory_shares_collaborators() {
        let view = MockView::granting(Permissions::ALL);
        let root = Arc::new(RecordingRoot::default());
        let node = file(&view, &root);

        let placeholder = node.create_non_existing_node("/docs/new.txt");
        assert_eq!(placeholder.path(), Path::new("/docs/new.txt"));
        assert!(!placeholder.exists());
        assert!(Arc::ptr_eq(placeholder.view(), node.view()));
        assert!(Arc::ptr_eq(placeholder.root(), node.root()));
        assert!(root.hooks.lock().unwrap().is_empty());
        assert_eq!(view.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn debug_shows_path_and_state() {
        let view = MockView::granting(Permissions::ALL);
        let root = Arc::new(RecordingRoot::default());
        let rendered = format!("{:?}", file(&view, &root));
        assert!(rendered.contains("/docs/report.txt"));
        assert!(rendered.contains("exists: true"));
    }
}
