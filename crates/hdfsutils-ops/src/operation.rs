//! Move request types.

use serde::{Deserialize, Serialize};

use crate::conflict::OverwritePolicy;

/// How sources are combined with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveMode {
    /// Rename each source onto or into the target.
    #[default]
    Plain,
    /// Merge each source directory tree into the target directory tree.
    Overlay,
}

/// Options for move operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOptions {
    /// Plain rename or overlay merge.
    pub mode: MoveMode,
    /// What to do when a target of the same type already exists.
    pub policy: OverwritePolicy,
}

/// A move to be executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Paths to move, in the order they are processed.
    pub sources: Vec<String>,
    /// Destination path or directory.
    pub target: String,
    /// Mode and overwrite policy.
    pub options: MoveOptions,
}

impl MoveRequest {
    /// Create a plain move with the default policy.
    pub fn new<S: Into<String>>(sources: impl IntoIterator<Item = S>, target: impl Into<String>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            target: target.into(),
            options: MoveOptions::default(),
        }
    }

    /// Create an overlay merge with the default policy.
    pub fn overlay<S: Into<String>>(sources: impl IntoIterator<Item = S>, target: impl Into<String>) -> Self {
        Self::new(sources, target).with_mode(MoveMode::Overlay)
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: MoveMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Set the overwrite policy.
    pub fn with_policy(mut self, policy: OverwritePolicy) -> Self {
        self.options.policy = policy;
        self
    }
}
