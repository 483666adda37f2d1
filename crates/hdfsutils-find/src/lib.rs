//! Find engine for hdfsutils.
//!
//! A [`Finder`] walks one or more remote roots and reports every entry that
//! satisfies a [`Predicate`]. Predicates are small trees of leaves (name and
//! path globs, type, size, modification age, owner, group, emptiness, depth)
//! combined with `and`, `or` and `not`.
//!
//! [`FindOptions`] is the command-line facing layer: each option that is set
//! turns into one leaf and [`FindOptions::compile`] AND-s them together.
//!
//! ```rust,ignore
//! use hdfsutils_find::{FindOptions, Finder};
//!
//! let options = FindOptions::builder().name("*.parquet").file_type("f").build()?;
//! let finder = Finder::from_options(&client, &options, chrono::Utc::now())?;
//!
//! let summary = finder.find_all(&["/warehouse"], |entry| println!("{}", entry.path()));
//! println!("{} of {} entries matched", summary.matched, summary.visited);
//! ```

mod finder;
mod options;
mod predicate;

pub use finder::{FindSummary, Finder, Matches};
pub use options::{parse_size, parse_type, FindOptions, FindOptionsBuilder};
pub use predicate::{Compare, NumArg, Predicate};

pub use hdfsutils_walk::Entry;
