//! Remote tree walking for hdfsutils.
//!
//! # Overview
//!
//! `hdfsutils-walk` traverses a remote directory tree through the
//! [`FileSystem`] contract. Key properties:
//!
//! - **Lazy**: a directory is listed only when the walk advances past it
//! - **Depth-first, pre-order**, root included
//! - **Deterministic** sibling order by default ([`WalkOrder::Name`])
//! - **Fail-fast**: the first remote error ends the walk
//!
//! # Example
//!
//! ```rust,no_run
//! use hdfsutils_core::memory::MemoryFs;
//! use hdfsutils_walk::{Visit, Walker};
//!
//! let fs = MemoryFs::new();
//! let walker = Walker::new(&fs);
//! let stats = walker
//!     .walk("/", |entry| {
//!         println!("{}", entry.path());
//!         Visit::Continue
//!     })
//!     .unwrap();
//!
//! println!("{} files, {} directories", stats.files, stats.directories);
//! ```

mod walker;

pub use walker::{Entry, Visit, Walk, WalkStats, Walker};

// Re-export core types for convenience
pub use hdfsutils_core::{FileSystem, FsError, Node, NodeKind, WalkConfig, WalkOrder};
