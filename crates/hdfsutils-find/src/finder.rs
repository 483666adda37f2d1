//! Walking with a predicate.

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use hdfsutils_core::{path, FileSystem, FsError, Result, WalkConfig};
use hdfsutils_walk::{Entry, Walk, Walker};

use crate::options::FindOptions;
use crate::predicate::Predicate;

/// Counters and failures for a multi-root find.
#[derive(Debug, Default)]
pub struct FindSummary {
    /// Entries walked, matched or not.
    pub visited: u64,
    /// Entries passed to the sink.
    pub matched: u64,
    /// Roots whose walk failed, with the error that ended it.
    pub failures: Vec<(String, FsError)>,
}

impl FindSummary {
    /// Check if every root was walked to the end.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Finds entries below one or more roots that satisfy a [`Predicate`].
#[derive(Debug)]
pub struct Finder<F> {
    walker: Walker<F>,
    predicate: Predicate,
}

impl<F: FileSystem> Finder<F> {
    /// Create a finder with the default walk configuration.
    pub fn new(fs: F, predicate: Predicate) -> Self {
        Self::with_config(fs, WalkConfig::default(), predicate)
    }

    /// Create a finder with a custom walk configuration.
    pub fn with_config(fs: F, config: WalkConfig, predicate: Predicate) -> Self {
        Self {
            walker: Walker::with_config(fs, config),
            predicate,
        }
    }

    /// Create a finder from command-line style options.
    pub fn from_options(fs: F, options: &FindOptions, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self::with_config(
            fs,
            options.walk_config()?,
            options.compile(now)?,
        ))
    }

    /// The compiled predicate.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Lazily yield the matching entries under `root`, root first.
    pub fn find(&self, root: &str) -> Matches<'_, F> {
        Matches {
            walk: self.walker.iter(root),
            predicate: &self.predicate,
            visited: 0,
        }
    }

    /// Search every root in order, passing matches to `sink`.
    ///
    /// A root that fails is recorded in the summary and the remaining roots
    /// are still searched.
    pub fn find_all<R, S>(&self, roots: &[R], mut sink: S) -> FindSummary
    where
        R: AsRef<str>,
        S: FnMut(&Entry),
    {
        let mut summary = FindSummary::default();

        for root in roots {
            let root = root.as_ref();
            let mut matches = self.find(root);
            let mut failed = None;

            for result in matches.by_ref() {
                match result {
                    Ok(entry) => {
                        summary.matched += 1;
                        sink(&entry);
                    }
                    Err(e) => failed = Some(e),
                }
            }
            summary.visited += matches.visited();

            if let Some(e) = failed {
                error!(root, error = %e, "find failed");
                summary.failures.push((path::normalize(root), e));
            } else {
                debug!(root, visited = matches.visited(), "find finished");
            }
        }

        summary
    }
}

/// Iterator over the matching entries of one walk.
///
/// Errors are passed through; after one the iterator is exhausted.
#[derive(Debug)]
pub struct Matches<'w, F> {
    walk: Walk<'w, F>,
    predicate: &'w Predicate,
    visited: u64,
}

impl<F: FileSystem> Matches<'_, F> {
    /// Number of entries walked so far.
    pub fn visited(&self) -> u64 {
        self.visited
    }

    /// Do not descend into the entry that was walked last.
    pub fn skip_subtree(&mut self) {
        self.walk.skip_subtree();
    }
}

impl<F: FileSystem> Iterator for Matches<'_, F> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walk.next()? {
                Ok(entry) => {
                    self.visited += 1;
                    if self.predicate.matches(&entry) {
                        return Some(Ok(entry));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdfsutils_core::memory::MemoryFs;
    use hdfsutils_core::NodeKind;

    #[test]
    fn test_matches_counts_visited() {
        let fs = MemoryFs::new();
        fs.put("/r/a.txt", "a").unwrap();
        fs.put("/r/b.log", "b").unwrap();

        let finder = Finder::new(&fs, Predicate::name("*.txt", false).unwrap());
        let mut matches = finder.find("/r");
        let found: Vec<String> = matches.by_ref().map(|e| e.unwrap().node.path).collect();

        assert_eq!(found, ["/r/a.txt"]);
        assert_eq!(matches.visited(), 3);
    }

    #[test]
    fn test_skip_subtree_through_matches() {
        let fs = MemoryFs::new();
        fs.put("/r/d/deep.txt", "x").unwrap();
        fs.put("/r/e.txt", "y").unwrap();

        let finder = Finder::new(&fs, Predicate::True);
        let mut matches = finder.find("/r");
        let mut seen = Vec::new();
        while let Some(entry) = matches.next() {
            let entry = entry.unwrap();
            if entry.node.kind == NodeKind::Directory && entry.depth == 1 {
                matches.skip_subtree();
            }
            seen.push(entry.node.path);
        }

        assert_eq!(seen, ["/r", "/r/d", "/r/e.txt"]);
    }
}
