//! Remote file and directory node types.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::path;

/// Type of a remote filesystem node.
///
/// Displays with the WebHDFS spelling (`FILE`, `DIRECTORY`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// POSIX-style permission bits as reported by the namenode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission(pub u16);

impl Permission {
    /// Parse an octal permission string such as `"755"`.
    pub fn from_octal(s: &str) -> Option<Self> {
        u16::from_str_radix(s, 8).ok().filter(|bits| *bits <= 0o7777).map(Self)
    }

    /// Render as `rwxr-xr-x`, without the leading type character.
    pub fn symbolic(&self) -> String {
        let mut out = String::with_capacity(9);
        for shift in [6, 3, 0] {
            let bits = (self.0 >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        // Sticky bit is the only special bit HDFS honors.
        if self.0 & 0o1000 != 0 {
            let last = if self.0 & 0o001 != 0 { 't' } else { 'T' };
            out.pop();
            out.push(last);
        }
        out
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self(0o644)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

/// Metadata for one remote entry, as returned by a stat or list call.
///
/// Nodes are snapshots: nothing keeps them in sync with the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Absolute path of the entry.
    pub path: String,

    /// Final path component (empty for `/`).
    pub name: CompactString,

    /// File or directory.
    pub kind: NodeKind,

    /// Length in bytes (0 for directories).
    pub length: u64,

    /// Last modification time.
    pub modified: DateTime<Utc>,

    /// Last access time, when the namenode tracks it.
    pub accessed: Option<DateTime<Utc>>,

    /// Owning user.
    pub owner: CompactString,

    /// Owning group.
    pub group: CompactString,

    /// Permission bits.
    pub permission: Permission,

    /// Replication factor (0 for directories).
    pub replication: u16,

    /// Block size in bytes (0 for directories).
    pub block_size: u64,

    /// Number of direct children, when the server reports it.
    pub children: Option<u64>,
}

impl Node {
    /// Create a node with default metadata.
    pub fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        let path = path.into();
        Self {
            name: path::basename(&path).into(),
            path,
            kind,
            length: 0,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            accessed: None,
            owner: CompactString::default(),
            group: CompactString::default(),
            permission: Permission::default(),
            replication: 0,
            block_size: 0,
            children: None,
        }
    }

    /// Create a file node of the given length.
    pub fn file(path: impl Into<String>, length: u64) -> Self {
        Self {
            length,
            ..Self::new(path, NodeKind::File)
        }
    }

    /// Create a directory node.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            permission: Permission(0o755),
            ..Self::new(path, NodeKind::Directory)
        }
    }

    /// Set the modification time.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    /// Set owner and group.
    pub fn with_owner(mut self, owner: impl Into<CompactString>, group: impl Into<CompactString>) -> Self {
        self.owner = owner.into();
        self.group = group.into();
        self
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }
}
