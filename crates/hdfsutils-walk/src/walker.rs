//! Lazy depth-first walker.

use tracing::debug;

use hdfsutils_core::{path, FileSystem, Node, Result, WalkConfig, WalkOrder};

/// A node reached during a walk, with its distance from the walk root.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Remote metadata for this entry.
    pub node: Node,
    /// Depth below the walk root (the root itself is 0).
    pub depth: usize,
}

impl Entry {
    /// Absolute path of the entry.
    pub fn path(&self) -> &str {
        &self.node.path
    }

    /// Check if the entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.node.is_dir()
    }
}

/// What the walk should do after visiting an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep going, descending into directories.
    Continue,
    /// Do not list the children of this entry.
    SkipSubtree,
    /// End the walk now.
    Stop,
}

/// Counters for a completed walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files visited.
    pub files: u64,
    /// Directories visited.
    pub directories: u64,
    /// Whether the visitor ended the walk early.
    pub stopped: bool,
}

impl WalkStats {
    fn record(&mut self, entry: &Entry) {
        if entry.is_dir() {
            self.directories += 1;
        } else {
            self.files += 1;
        }
    }
}

/// Walker over a remote filesystem.
#[derive(Debug)]
pub struct Walker<F> {
    fs: F,
    config: WalkConfig,
}

impl<F: FileSystem> Walker<F> {
    /// Create a walker with the default configuration.
    pub fn new(fs: F) -> Self {
        Self::with_config(fs, WalkConfig::default())
    }

    /// Create a walker with a custom configuration.
    pub fn with_config(fs: F, config: WalkConfig) -> Self {
        Self { fs, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// The filesystem being walked.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Start a lazy walk rooted at `root`.
    ///
    /// The root is not looked up until the first call to `next`, which yields
    /// `NotFound` if it does not exist.
    pub fn iter(&self, root: &str) -> Walk<'_, F> {
        Walk {
            fs: &self.fs,
            config: &self.config,
            root: Some(path::normalize(root)),
            stack: Vec::new(),
            pending: None,
            done: false,
        }
    }

    /// Walk the tree under `root`, calling `visit` for each entry.
    pub fn walk<V>(&self, root: &str, mut visit: V) -> Result<WalkStats>
    where
        V: FnMut(&Entry) -> Visit,
    {
        let mut walk = self.iter(root);
        let mut stats = WalkStats::default();

        while let Some(entry) = walk.next() {
            let entry = entry?;
            stats.record(&entry);
            match visit(&entry) {
                Visit::Continue => {}
                Visit::SkipSubtree => walk.skip_subtree(),
                Visit::Stop => {
                    stats.stopped = true;
                    break;
                }
            }
        }

        Ok(stats)
    }
}

/// Iterator over the entries of one walk, in depth-first pre-order.
///
/// After yielding an error the iterator is exhausted.
#[derive(Debug)]
pub struct Walk<'w, F> {
    fs: &'w F,
    config: &'w WalkConfig,
    root: Option<String>,
    // Next entry to yield is on top.
    stack: Vec<Entry>,
    // Directory reached but not listed yet.
    pending: Option<(String, usize)>,
    done: bool,
}

impl<F: FileSystem> Walk<'_, F> {
    /// Do not descend into the directory that was yielded last.
    ///
    /// Has no effect if the last entry was a file.
    pub fn skip_subtree(&mut self) {
        self.pending = None;
    }

    fn expand(&mut self, dir: &str, depth: usize) -> Result<()> {
        let mut children = self.fs.list(dir)?;
        debug!(path = dir, children = children.len(), "listed directory");

        if self.config.order == WalkOrder::Name {
            children.sort_by(|a, b| a.name.cmp(&b.name));
        }

        self.stack.extend(
            children
                .into_iter()
                .rev()
                .map(|node| Entry {
                    node,
                    depth: depth + 1,
                }),
        );
        Ok(())
    }

    fn fail(&mut self, error: hdfsutils_core::FsError) -> Option<Result<Entry>> {
        self.done = true;
        self.stack.clear();
        self.pending = None;
        Some(Err(error))
    }
}

impl<F: FileSystem> Iterator for Walk<'_, F> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(root) = self.root.take() {
            match self.fs.stat(&root) {
                Ok(node) => self.stack.push(Entry { node, depth: 0 }),
                Err(e) => return self.fail(e),
            }
        }

        loop {
            if let Some((dir, depth)) = self.pending.take() {
                if let Err(e) = self.expand(&dir, depth) {
                    return self.fail(e);
                }
            }

            let Some(entry) = self.stack.pop() else {
                self.done = true;
                return None;
            };

            if entry.is_dir() && self.config.descends(entry.depth) {
                self.pending = Some((entry.node.path.clone(), entry.depth));
            }

            if self.config.yields(entry.depth) {
                return Some(Ok(entry));
            }
        }
    }
}
