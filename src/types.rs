//! Core types shared by nodes and their collaborators.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::SystemTime;

use crate::NodeError;

/// Namespace every node hook is emitted under.
pub const FILES_NAMESPACE: &str = "files";

/// Permission bitmask describing what may be done with a node.
///
/// The bit values are stable and match what metadata providers store.
///
/// # Examples
///
/// ```rust
/// use anyfs_node::Permissions;
///
/// let granted = Permissions::READ | Permissions::UPDATE;
/// assert!(granted.contains(Permissions::READ));
/// assert!(!granted.contains(Permissions::READ | Permissions::DELETE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permissions(u8);

impl Permissions {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Read content and metadata.
    pub const READ: Self = Self(1);
    /// Modify existing content.
    pub const UPDATE: Self = Self(2);
    /// Create children (meaningful for folders).
    pub const CREATE: Self = Self(4);
    /// Remove the node.
    pub const DELETE: Self = Self(8);
    /// Share the node with others.
    pub const SHARE: Self = Self(16);
    /// Every recognized bit.
    pub const ALL: Self = Self(31);

    /// Build from raw bits, dropping unrecognized ones.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bit value.
    #[inline]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `required` is granted.
    #[inline]
    pub const fn contains(&self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Union of two masks.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// Metadata snapshot for a single file.
///
/// Produced by [`ViewRead::file_info`](crate::ViewRead::file_info) and cached
/// per node until the node invalidates it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileInfo {
    /// Path the snapshot was taken for.
    pub path: PathBuf,
    /// Permissions granted to the current caller.
    pub permissions: Permissions,
    /// Stored checksum string (empty if the backend keeps none).
    pub checksum: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub mtime: SystemTime,
    /// Entity tag, changes whenever content changes.
    pub etag: String,
    /// MIME type.
    pub mime_type: String,
}

impl FileInfo {
    /// A snapshot with the given permissions and empty everything else.
    pub fn new(path: impl Into<PathBuf>, permissions: Permissions) -> Self {
        Self {
            path: path.into(),
            permissions,
            checksum: String::new(),
            size: 0,
            mtime: SystemTime::UNIX_EPOCH,
            etag: String::new(),
            mime_type: "application/octet-stream".to_string(),
        }
    }

    /// Set the checksum.
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }

    /// Set the size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the modification time.
    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = mtime;
        self
    }

    /// Set the etag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = etag.into();
        self
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Base access kind of an [`OpenMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpenAccess {
    /// `r`: read from the start.
    Read,
    /// `w`: truncate or create.
    Write,
    /// `a`: append, creating if missing.
    Append,
    /// `x`: create, failing if the file exists.
    Exclusive,
}

impl OpenAccess {
    const fn letter(self) -> char {
        match self {
            OpenAccess::Read => 'r',
            OpenAccess::Write => 'w',
            OpenAccess::Append => 'a',
            OpenAccess::Exclusive => 'x',
        }
    }
}

/// Stream open mode, parsed from the usual `fopen` spelling.
///
/// # Examples
///
/// ```rust
/// use anyfs_node::{OpenMode, Permissions};
///
/// let mode: OpenMode = "rb".parse().unwrap();
/// assert!(!mode.writes());
/// assert_eq!(mode.required_permissions(), Permissions::READ);
///
/// let mode: OpenMode = "w+".parse().unwrap();
/// assert!(mode.writes());
/// assert_eq!(mode.required_permissions(), Permissions::READ | Permissions::UPDATE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenMode {
    /// Base access kind.
    pub access: OpenAccess,
    /// `+`: open for both reading and writing.
    pub plus: bool,
    /// `b`: binary flag.
    pub binary: bool,
}

impl OpenMode {
    /// `r`
    pub const READ: Self = Self::new(OpenAccess::Read);
    /// `w`
    pub const WRITE: Self = Self::new(OpenAccess::Write);
    /// `a`
    pub const APPEND: Self = Self::new(OpenAccess::Append);
    /// `x`
    pub const EXCLUSIVE: Self = Self::new(OpenAccess::Exclusive);

    /// Plain (non-`+`, non-binary) mode.
    pub const fn new(access: OpenAccess) -> Self {
        Self {
            access,
            plus: false,
            binary: false,
        }
    }

    /// Same mode with the `+` flag.
    pub const fn plus(mut self) -> Self {
        self.plus = true;
        self
    }

    /// Same mode with the `b` flag.
    pub const fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// Returns `true` if the mode may truncate, create, append or otherwise
    /// modify the file. Only `r` and `rb` are read-only.
    pub const fn writes(&self) -> bool {
        !matches!(self.access, OpenAccess::Read) || self.plus
    }

    /// Permissions a node must grant before a stream is opened in this mode.
    pub const fn required_permissions(&self) -> Permissions {
        if self.writes() {
            Permissions::READ.union(Permissions::UPDATE)
        } else {
            Permissions::READ
        }
    }

    /// Hooks fired before and after the open, in that order.
    pub fn hooks(&self) -> (&'static [HookName], &'static [HookName]) {
        if self.writes() {
            (&[HookName::PreWrite], &[HookName::PostWrite])
        } else {
            (&[], &[])
        }
    }
}

impl FromStr for OpenMode {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NodeError::InvalidMode { mode: s.to_string() };
        let mut chars = s.chars();
        let access = match chars.next() {
            Some('r') => OpenAccess::Read,
            Some('w') => OpenAccess::Write,
            Some('a') => OpenAccess::Append,
            Some('x') => OpenAccess::Exclusive,
            _ => return Err(invalid()),
        };
        let mut mode = OpenMode::new(access);
        for c in chars {
            match c {
                'b' if !mode.binary => mode.binary = true,
                '+' if !mode.plus => mode.plus = true,
                _ => return Err(invalid()),
            }
        }
        Ok(mode)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.access.letter())?;
        if self.binary {
            f.write_str("b")?;
        }
        if self.plus {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// Named lifecycle hooks fired around node operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HookName {
    /// Before content is written or a writable stream is opened.
    PreWrite,
    /// After content was written or a writable stream was opened.
    PostWrite,
    /// Before a file is unlinked.
    PreDelete,
    /// After a file was unlinked. Payload is the non-existing representation.
    PostDelete,
}

impl HookName {
    /// Wire name of the hook.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HookName::PreWrite => "preWrite",
            HookName::PostWrite => "postWrite",
            HookName::PreDelete => "preDelete",
            HookName::PostDelete => "postDelete",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        (duration.as_secs(), duration.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (secs, nanos): (u64, u32) = Deserialize::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::new(secs, nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRITE_MODES: [&str; 14] = [
        "r+", "rb+", "w+", "wb+", "x+", "xb+", "a+", "ab+", "w", "wb", "x", "xb", "a", "ab",
    ];

    #[test]
    fn permissions_contains() {
        let p = Permissions::READ | Permissions::DELETE;
        assert!(p.contains(Permissions::READ));
        assert!(p.contains(Permissions::DELETE));
        assert!(!p.contains(Permissions::UPDATE));
        assert!(p.contains(Permissions::NONE));
    }

    #[test]
    fn permissions_from_bits_masks_unknown() {
        assert_eq!(Permissions::from_bits(0xff), Permissions::ALL);
        assert_eq!(Permissions::from_bits(0b1000_0011).bits(), 3);
    }

    #[test]
    fn permissions_bitor_assign() {
        let mut p = Permissions::NONE;
        assert!(p.is_empty());
        p |= Permissions::UPDATE;
        assert_eq!(p, Permissions::UPDATE);
    }

    #[test]
    fn all_covers_every_bit() {
        for p in [
            Permissions::READ,
            Permissions::UPDATE,
            Permissions::CREATE,
            Permissions::DELETE,
            Permissions::SHARE,
        ] {
            assert!(Permissions::ALL.contains(p));
        }
    }

    #[test]
    fn file_info_builder() {
        let info = FileInfo::new("/a.txt", Permissions::READ)
            .with_checksum("SHA1:abc")
            .with_size(5)
            .with_etag("e1");
        assert_eq!(info.checksum, "SHA1:abc");
        assert_eq!(info.size, 5);
        assert_eq!(info.etag, "e1");
        assert_eq!(info.path, PathBuf::from("/a.txt"));
    }

    #[test]
    fn read_modes_are_read_only() {
        for s in ["r", "rb"] {
            let mode: OpenMode = s.parse().unwrap();
            assert!(!mode.writes(), "{s}");
            assert_eq!(mode.required_permissions(), Permissions::READ);
            assert_eq!(mode.hooks(), (&[][..], &[][..]));
        }
    }

    #[test]
    fn write_modes_need_update() {
        for s in WRITE_MODES {
            let mode: OpenMode = s.parse().unwrap();
            assert!(mode.writes(), "{s}");
            assert_eq!(
                mode.required_permissions(),
                Permissions::READ | Permissions::UPDATE
            );
            assert_eq!(
                mode.hooks(),
                (&[HookName::PreWrite][..], &[HookName::PostWrite][..])
            );
        }
    }

    #[test]
    fn display_is_canonical() {
        for s in WRITE_MODES.iter().chain(["r", "rb"].iter()) {
            let mode: OpenMode = s.parse().unwrap();
            assert_eq!(mode.to_string(), *s);
        }
        let mode: OpenMode = "r+b".parse().unwrap();
        assert_eq!(mode.to_string(), "rb+");
    }

    #[test]
    fn invalid_modes_rejected() {
        for s in ["", "q", "c", "rr", "r++", "wbb", "rt"] {
            let err = s.parse::<OpenMode>().unwrap_err();
            assert!(matches!(err, NodeError::InvalidMode { .. }), "{s}");
        }
    }

    #[test]
    fn mode_constants() {
        assert_eq!(OpenMode::READ.to_string(), "r");
        assert_eq!(OpenMode::WRITE.binary().plus().to_string(), "wb+");
        assert_eq!(OpenMode::APPEND.to_string(), "a");
        assert_eq!(OpenMode::EXCLUSIVE.plus().to_string(), "x+");
    }

    #[test]
    fn hook_names() {
        assert_eq!(HookName::PreWrite.to_string(), "preWrite");
        assert_eq!(HookName::PostWrite.as_str(), "postWrite");
        assert_eq!(HookName::PreDelete.as_str(), "preDelete");
        assert_eq!(HookName::PostDelete.as_str(), "postDelete");
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Permissions>();
        assert_send_sync::<FileInfo>();
        assert_send_sync::<OpenMode>();
        assert_send_sync::<HookName>();
    }
}
