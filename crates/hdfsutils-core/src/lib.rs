//! Core types and traits for hdfsutils.
//!
//! This crate provides the data structures shared by the walker, the move
//! engine and the find engine: remote nodes, error kinds, walk configuration
//! and the [`FileSystem`] contract every remote client implements.
//!
//! An in-memory implementation lives in [`memory`] so the engines can be
//! exercised without a cluster.

mod config;
mod error;
mod fs;
pub mod memory;
mod node;
pub mod path;

pub use config::{WalkConfig, WalkConfigBuilder, WalkOrder};
pub use error::{FsError, Result, TypeConflict};
pub use fs::FileSystem;
pub use node::{Node, NodeKind, Permission};
