//! Find options and their compilation into a [`Predicate`].

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use hdfsutils_core::{FsError, NodeKind, Result, WalkConfig, WalkOrder};

use crate::predicate::{NumArg, Predicate};

/// Filters and traversal limits for one find run.
///
/// Every option that is set becomes one predicate leaf; the leaves are
/// AND-ed. Numeric options keep their command-line spelling until
/// [`FindOptions::compile`] parses them.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
pub struct FindOptions {
    /// Glob on the final component.
    #[builder(setter(into, strip_option))]
    pub name: Option<String>,
    /// Case-insensitive glob on the final component.
    #[builder(setter(into, strip_option))]
    pub iname: Option<String>,
    /// Glob on the full path.
    #[builder(setter(into, strip_option))]
    pub path: Option<String>,
    /// `f` or `d`.
    #[builder(setter(into, strip_option))]
    pub file_type: Option<String>,
    /// `[+-]N[bckMG]`.
    #[builder(setter(into, strip_option))]
    pub size: Option<String>,
    /// `[+-]N` days.
    #[builder(setter(into, strip_option))]
    pub mtime: Option<String>,
    /// `[+-]N` minutes.
    #[builder(setter(into, strip_option))]
    pub mmin: Option<String>,
    #[builder(setter(into, strip_option))]
    pub user: Option<String>,
    #[builder(setter(into, strip_option))]
    pub group: Option<String>,
    /// Only empty files and directories.
    pub empty: bool,
    /// Do not report entries shallower than this.
    #[builder(setter(into, strip_option))]
    pub min_depth: Option<usize>,
    /// Do not descend below this depth.
    #[builder(setter(into, strip_option))]
    pub max_depth: Option<usize>,
    /// Keep the server's listing order instead of sorting by name.
    pub listing_order: bool,
}

impl FindOptions {
    /// Create a new options builder.
    pub fn builder() -> FindOptionsBuilder {
        FindOptionsBuilder::default()
    }

    /// Build the predicate for these options, with time tests relative to `now`.
    pub fn compile(&self, now: DateTime<Utc>) -> Result<Predicate> {
        let mut predicate = Predicate::True;

        if let Some(pattern) = &self.name {
            predicate = predicate.and(Predicate::name(pattern, false)?);
        }
        if let Some(pattern) = &self.iname {
            predicate = predicate.and(Predicate::name(pattern, true)?);
        }
        if let Some(pattern) = &self.path {
            predicate = predicate.and(Predicate::path(pattern)?);
        }
        if let Some(file_type) = &self.file_type {
            predicate = predicate.and(Predicate::Type(parse_type(file_type)?));
        }
        if let Some(size) = &self.size {
            let (arg, unit) = parse_size(size)?;
            predicate = predicate.and(Predicate::size(arg, unit));
        }
        if let Some(days) = &self.mtime {
            predicate = predicate.and(Predicate::mtime(NumArg::parse(days)?, now));
        }
        if let Some(minutes) = &self.mmin {
            predicate = predicate.and(Predicate::mmin(NumArg::parse(minutes)?, now));
        }
        if let Some(user) = &self.user {
            predicate = predicate.and(Predicate::User(user.clone()));
        }
        if let Some(group) = &self.group {
            predicate = predicate.and(Predicate::Group(group.clone()));
        }
        if self.empty {
            predicate = predicate.and(Predicate::Empty);
        }

        Ok(predicate)
    }

    /// Walk configuration for the depth limits and ordering.
    pub fn walk_config(&self) -> Result<WalkConfig> {
        let order = if self.listing_order {
            WalkOrder::Listing
        } else {
            WalkOrder::Name
        };
        WalkConfig::builder()
            .order(order)
            .min_depth(self.min_depth.unwrap_or(0))
            .max_depth(self.max_depth)
            .build()
            .map_err(|e| FsError::usage(e.to_string()))
    }
}

/// Parse a `-type` argument.
pub fn parse_type(s: &str) -> Result<NodeKind> {
    match s {
        "f" => Ok(NodeKind::File),
        "d" => Ok(NodeKind::Directory),
        other => Err(FsError::usage(format!("unknown argument to -type: {other}"))),
    }
}

/// Parse a `-size` argument into the comparison and its unit in bytes.
///
/// Without a suffix the unit is a 512-byte block.
pub fn parse_size(s: &str) -> Result<(NumArg, u64)> {
    let s = s.trim();
    let (number, unit) = match s.chars().last() {
        Some('c') => (&s[..s.len() - 1], 1),
        Some('b') => (&s[..s.len() - 1], 512),
        Some('k') => (&s[..s.len() - 1], 1024),
        Some('M') => (&s[..s.len() - 1], 1024 * 1024),
        Some('G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 512),
    };
    let arg = NumArg::parse(number)
        .map_err(|_| FsError::usage(format!("invalid argument `{s}' to -size")))?;
    Ok((arg, unit))
}
