//! Error kinds shared by every hdfsutils operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::NodeKind;

/// Errors that can occur while talking to the remote filesystem.
#[derive(Debug, Error)]
pub enum FsError {
    /// A path that had to exist does not.
    #[error("{path}: No such file or directory")]
    NotFound { path: String },

    /// Invalid combination of arguments.
    #[error("{message}")]
    Usage { message: String },

    /// Source and target of a move pair have different types.
    ///
    /// Moves report conflicts as events and never return this; it exists so
    /// callers can turn a [`TypeConflict`] into an error of their own.
    #[error("{0}")]
    TypeConflict(TypeConflict),

    /// Transport or permission failure reported by the remote client.
    #[error("{path}: {message}")]
    Remote { path: String, message: String },

    /// The overwrite decision source could not answer.
    #[error("cannot read answer: {message}")]
    Prompt { message: String },
}

impl FsError {
    /// Create a not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a remote error with path context.
    pub fn remote(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check whether this error means the path is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<TypeConflict> for FsError {
    fn from(conflict: TypeConflict) -> Self {
        Self::TypeConflict(conflict)
    }
}

/// Result type alias for remote filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// A move pair whose source and target kinds disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConflict {
    /// The path being moved.
    pub source: String,
    /// The existing path it would replace.
    pub target: String,
    /// Kind of the source.
    pub source_kind: NodeKind,
    /// Kind of the existing target.
    pub target_kind: NodeKind,
}

impl TypeConflict {
    /// Create a new type conflict.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_kind: NodeKind,
        target_kind: NodeKind,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_kind,
            target_kind,
        }
    }
}

impl std::fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "source({}:{}) and target({}:{}) have different types",
            self.source, self.source_kind, self.target, self.target_kind
        )
    }
}
