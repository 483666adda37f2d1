//! Move engine for hdfsutils.
//!
//! This crate implements `mv` semantics on top of the remote
//! [`FileSystem`](hdfsutils_core::FileSystem) contract: plain renames into a
//! directory or onto a path, overwrite policies, and the overlay merge that
//! folds one directory tree into another. Every outcome is reported as a
//! [`MoveEvent`] while the move runs.

mod conflict;
mod move_op;
mod operation;
mod progress;

pub use conflict::{FixedAnswer, LinePrompt, OverwritePolicy, OverwritePrompt};
pub use move_op::{MoveSink, Mover};
pub use operation::{MoveMode, MoveOptions, MoveRequest};
pub use progress::{MoveEvent, MoveSummary};

pub use hdfsutils_core::TypeConflict as Conflict;
