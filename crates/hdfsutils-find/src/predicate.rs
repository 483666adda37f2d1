//! Composable tests over walked entries.

use chrono::{DateTime, Utc};
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};

use hdfsutils_core::{FsError, NodeKind, Result};
use hdfsutils_walk::Entry;

/// How a numeric argument compares, following find's `+N`, `-N` and `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compare {
    /// `-N`: strictly less than N.
    Less,
    /// `N`: exactly N.
    Equal,
    /// `+N`: strictly greater than N.
    Greater,
}

/// A parsed `[+-]N` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumArg {
    pub compare: Compare,
    pub value: u64,
}

impl NumArg {
    /// Build an argument from its parts.
    pub fn new(compare: Compare, value: u64) -> Self {
        Self { compare, value }
    }

    /// Parse `+N`, `-N` or `N`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (compare, digits) = match s.as_bytes().first() {
            Some(b'+') => (Compare::Greater, &s[1..]),
            Some(b'-') => (Compare::Less, &s[1..]),
            _ => (Compare::Equal, s),
        };
        let value = digits
            .parse()
            .map_err(|_| FsError::usage(format!("invalid numeric argument `{s}'")))?;
        Ok(Self { compare, value })
    }

    /// Check `n` against this argument.
    pub fn test(&self, n: u64) -> bool {
        match self.compare {
            Compare::Less => n < self.value,
            Compare::Equal => n == self.value,
            Compare::Greater => n > self.value,
        }
    }
}

/// A boolean test on an [`Entry`].
///
/// Leaves look at a single attribute of the node or its depth. Time leaves
/// carry the reference time they were built with, so evaluating the same
/// predicate twice gives the same answer.
#[derive(Debug, Clone, Default)]
pub enum Predicate {
    /// Matches everything.
    #[default]
    True,
    /// Matches nothing.
    False,
    /// Glob on the final path component.
    Name(GlobMatcher),
    /// Glob on the full path; `*` also matches `/`.
    Path(GlobMatcher),
    /// Kind of the node.
    Type(NodeKind),
    /// Length in `unit`-sized blocks, rounded up.
    Size { arg: NumArg, unit: u64 },
    /// Age since last modification, in whole `unit_secs` periods.
    Modified {
        arg: NumArg,
        unit_secs: i64,
        now: DateTime<Utc>,
    },
    /// Owner name.
    User(String),
    /// Group name.
    Group(String),
    /// Zero-length file or directory without children.
    Empty,
    /// Depth below the walk root.
    Depth(NumArg),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Glob on the final component, optionally ignoring case.
    pub fn name(pattern: &str, case_insensitive: bool) -> Result<Self> {
        Ok(Self::Name(glob(pattern, case_insensitive)?))
    }

    /// Glob on the full path.
    pub fn path(pattern: &str) -> Result<Self> {
        Ok(Self::Path(glob(pattern, false)?))
    }

    /// Size test in bytes-per-unit blocks.
    pub fn size(arg: NumArg, unit: u64) -> Self {
        Self::Size {
            arg,
            unit: unit.max(1),
        }
    }

    /// Modification age in days, relative to `now`.
    pub fn mtime(arg: NumArg, now: DateTime<Utc>) -> Self {
        Self::Modified {
            arg,
            unit_secs: 24 * 60 * 60,
            now,
        }
    }

    /// Modification age in minutes, relative to `now`.
    pub fn mmin(arg: NumArg, now: DateTime<Utc>) -> Self {
        Self::Modified {
            arg,
            unit_secs: 60,
            now,
        }
    }

    /// Both `self` and `other`.
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Self::True, p) | (p, Self::True) => p,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), p) => {
                left.push(p);
                Self::And(left)
            }
            (p, q) => Self::And(vec![p, q]),
        }
    }

    /// Either `self` or `other`.
    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Self::Or(mut left), p) => {
                left.push(p);
                Self::Or(left)
            }
            (p, q) => Self::Or(vec![p, q]),
        }
    }

    /// Check whether `entry` satisfies this predicate.
    pub fn matches(&self, entry: &Entry) -> bool {
        let node = &entry.node;
        match self {
            Self::True => true,
            Self::False => false,
            Self::Name(glob) => glob.is_match(node.name.as_str()),
            Self::Path(glob) => glob.is_match(node.path.as_str()),
            Self::Type(kind) => node.kind == *kind,
            Self::Size { arg, unit } => arg.test(node.length.div_ceil(*unit)),
            Self::Modified {
                arg,
                unit_secs,
                now,
            } => {
                let age = (*now - node.modified).num_seconds().max(0);
                arg.test((age / unit_secs) as u64)
            }
            Self::User(user) => node.owner.as_str() == user.as_str(),
            Self::Group(group) => node.group.as_str() == group.as_str(),
            Self::Empty => match node.kind {
                NodeKind::File => node.length == 0,
                NodeKind::Directory => node.children == Some(0),
            },
            Self::Depth(arg) => arg.test(entry.depth as u64),
            Self::And(all) => all.iter().all(|p| p.matches(entry)),
            Self::Or(any) => any.iter().any(|p| p.matches(entry)),
            Self::Not(inner) => !inner.matches(entry),
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            p => Self::Not(Box::new(p)),
        }
    }
}

fn glob(pattern: &str, case_insensitive: bool) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| FsError::usage(format!("invalid pattern `{pattern}': {e}")))
}
