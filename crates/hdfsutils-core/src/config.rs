//! Walk configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Order in which siblings are visited during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalkOrder {
    /// Sort siblings lexicographically by name.
    #[default]
    Name,
    /// Keep whatever order the remote listing returned.
    Listing,
}

/// Configuration for tree walks.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Sibling ordering policy.
    #[builder(default)]
    #[serde(default)]
    pub order: WalkOrder,

    /// Entries shallower than this are traversed but not yielded.
    #[builder(default = "0")]
    #[serde(default)]
    pub min_depth: usize,

    /// Directories at this depth are not listed (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(Some(max))) = (self.min_depth, self.max_depth) {
            if min > max {
                return Err(format!("min depth {min} exceeds max depth {max}"));
            }
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Check whether an entry at `depth` is yielded.
    pub fn yields(&self, depth: usize) -> bool {
        depth >= self.min_depth && self.max_depth.is_none_or(|max| depth <= max)
    }

    /// Check whether a directory at `depth` has its children listed.
    pub fn descends(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            order: WalkOrder::Name,
            min_depth: 0,
            max_depth: None,
        }
    }
}
