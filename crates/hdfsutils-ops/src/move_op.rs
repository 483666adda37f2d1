//! Plain and overlay moves on a remote filesystem.

use tracing::{debug, error, info, warn};

use hdfsutils_core::{path, FileSystem, FsError, Node, Result, TypeConflict, WalkConfig};
use hdfsutils_walk::Walker;

use crate::conflict::{FixedAnswer, OverwritePolicy, OverwritePrompt};
use crate::operation::{MoveMode, MoveRequest};
use crate::progress::{MoveEvent, MoveSummary};

const OVERLAY_USAGE: &str = "Usage: hdmv --overlay <source_directory>... <target_directory>";

/// Receiver for the events of a move, in the order they happen.
pub trait MoveSink {
    /// Called once per renamed, skipped or conflicting pair.
    fn event(&mut self, event: &MoveEvent);
}

impl<F> MoveSink for F
where
    F: FnMut(&MoveEvent),
{
    fn event(&mut self, event: &MoveEvent) {
        self(event)
    }
}

// Forwards events and keeps the counts for the summary.
struct Recording<'s> {
    sink: &'s mut dyn MoveSink,
    summary: MoveSummary,
}

impl MoveSink for Recording<'_> {
    fn event(&mut self, event: &MoveEvent) {
        self.summary.record(event);
        self.sink.event(event);
    }
}

/// Executes [`MoveRequest`]s against a [`FileSystem`].
pub struct Mover<'a, F: ?Sized> {
    fs: &'a F,
    prompt: Box<dyn OverwritePrompt + 'a>,
}

impl<'a, F: FileSystem + ?Sized> Mover<'a, F> {
    /// Create a mover whose interactive prompt always answers no.
    pub fn new(fs: &'a F) -> Self {
        Self {
            fs,
            prompt: Box::new(FixedAnswer(false)),
        }
    }

    /// Use `prompt` to decide on overwrites under [`OverwritePolicy::Interactive`].
    pub fn with_prompt(mut self, prompt: impl OverwritePrompt + 'a) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// Run a request, reporting every pair to `sink`.
    ///
    /// Usage errors that can be decided before touching anything are returned
    /// as `Err`. Failures of individual sources are collected in
    /// [`MoveSummary::failures`] and the remaining sources are still processed.
    pub fn run(&mut self, request: &MoveRequest, sink: &mut dyn MoveSink) -> Result<MoveSummary> {
        if request.sources.is_empty() {
            return Err(FsError::usage("missing file operand"));
        }

        let mut recording = Recording {
            sink,
            summary: MoveSummary::default(),
        };
        match request.options.mode {
            MoveMode::Plain => self.run_plain(request, &mut recording)?,
            MoveMode::Overlay => self.run_overlay(request, &mut recording)?,
        }

        let summary = recording.summary;
        debug!(summary = %summary.summary(), "move finished");
        Ok(summary)
    }

    fn run_plain(&mut self, request: &MoveRequest, recording: &mut Recording<'_>) -> Result<()> {
        let target = path::normalize(&request.target);
        let policy = request.options.policy;

        if self.fs.try_stat(&target)?.as_ref().is_some_and(Node::is_dir) {
            for source in &request.sources {
                let source = path::normalize(source);
                let destination = path::join(&target, path::basename(&source));
                if let Err(e) = self.move_single(&destination, &source, policy, recording) {
                    error!(source = %source, error = %e, "move failed");
                    recording.summary.failures.push((source, e));
                }
            }
            return Ok(());
        }

        if request.sources.len() > 1 || has_trailing_slash(&request.target) {
            return Err(FsError::usage(format!(
                "target `{}' is not a directory",
                request.target
            )));
        }

        let source = path::normalize(&request.sources[0]);
        if let Err(e) = self.move_single(&target, &source, policy, recording) {
            error!(source = %source, error = %e, "move failed");
            recording.summary.failures.push((source, e));
        }
        Ok(())
    }

    fn run_overlay(&mut self, request: &MoveRequest, recording: &mut Recording<'_>) -> Result<()> {
        let target = path::normalize(&request.target);
        let sources: Vec<String> = request.sources.iter().map(|s| path::normalize(s)).collect();

        if !self.fs.try_stat(&target)?.as_ref().is_some_and(Node::is_dir) {
            return Err(FsError::usage(OVERLAY_USAGE));
        }

        // A source that cannot be stat-ed is that source's failure alone.
        let mut healthy = Vec::with_capacity(sources.len());
        for source in sources {
            match self.fs.try_stat(&source) {
                Ok(Some(node)) if node.is_dir() => healthy.push(source),
                Ok(_) => return Err(FsError::usage(OVERLAY_USAGE)),
                Err(e) => {
                    error!(source = %source, error = %e, "overlay source unavailable");
                    recording.summary.failures.push((source, e));
                }
            }
        }

        for source in healthy {
            if let Err(e) = self.overlay(&target, &source, recording) {
                error!(source = %source, error = %e, "overlay failed");
                recording.summary.failures.push((source, e));
            }
        }
        Ok(())
    }

    /// Move one `source` to exactly `target`, honoring `policy` if the
    /// target already exists.
    pub fn move_single(
        &mut self,
        target: &str,
        source: &str,
        policy: OverwritePolicy,
        sink: &mut dyn MoveSink,
    ) -> Result<()> {
        check_distinct(source, target)?;

        let source_node = self.fs.stat(source)?;
        let Some(target_node) = self.fs.try_stat(target)? else {
            return self.rename(source, target, false, sink);
        };

        if source_node.kind != target_node.kind {
            let conflict = TypeConflict::new(source, target, source_node.kind, target_node.kind);
            warn!(%conflict, "type conflict");
            sink.event(&MoveEvent::Conflict(conflict));
            return Ok(());
        }

        if self.should_overwrite(target, policy)? {
            self.fs.delete(target)?;
            self.rename(source, target, true, sink)
        } else {
            debug!(source, target, "target exists, not overwriting");
            sink.event(&MoveEvent::Skipped {
                source: source.to_string(),
                target: target.to_string(),
            });
            Ok(())
        }
    }

    /// Merge the tree under `source_dir` into the tree under `target_dir`.
    ///
    /// Entries missing from the target are renamed into place, directories
    /// present on both sides are merged recursively and files present on both
    /// sides are replaced. A kind mismatch is reported and that entry is left
    /// alone. Emptied source directories remain.
    pub fn overlay(&mut self, target_dir: &str, source_dir: &str, sink: &mut dyn MoveSink) -> Result<()> {
        let source_dir = path::normalize(source_dir);
        let target_dir = path::normalize(target_dir);
        check_distinct(&source_dir, &target_dir)?;

        let config = WalkConfig {
            min_depth: 1,
            ..WalkConfig::default()
        };
        let walker = Walker::with_config(self.fs, config);
        let mut walk = walker.iter(&source_dir);

        while let Some(entry) = walk.next() {
            let entry = entry?;
            let source = entry.path();
            let target = path::join(&target_dir, relative(&source_dir, source));

            let Some(existing) = self.fs.try_stat(&target)? else {
                walk.skip_subtree();
                self.rename(source, &target, false, sink)?;
                continue;
            };

            if entry.node.kind != existing.kind {
                walk.skip_subtree();
                let conflict = TypeConflict::new(source, target, entry.node.kind, existing.kind);
                warn!(%conflict, "type conflict");
                sink.event(&MoveEvent::Conflict(conflict));
            } else if entry.is_dir() {
                debug!(source, target = %target, "merging directory");
            } else {
                self.fs.delete(&target)?;
                self.rename(source, &target, true, sink)?;
            }
        }

        Ok(())
    }

    fn should_overwrite(&mut self, target: &str, policy: OverwritePolicy) -> Result<bool> {
        match policy {
            OverwritePolicy::Force => Ok(true),
            OverwritePolicy::NoOverwrite | OverwritePolicy::Default => Ok(false),
            OverwritePolicy::Interactive => self.prompt.confirm(target),
        }
    }

    fn rename(&self, source: &str, target: &str, replaced: bool, sink: &mut dyn MoveSink) -> Result<()> {
        self.fs.rename(source, target)?;
        info!(source, target, replaced, "moved");
        sink.event(&MoveEvent::Renamed {
            source: source.to_string(),
            target: target.to_string(),
            replaced,
        });
        Ok(())
    }
}

// Refuse a pair that is the same path, or a target inside the source.
fn check_distinct(source: &str, target: &str) -> Result<()> {
    if source == target {
        return Err(FsError::usage(format!("`{source}' and `{target}' are the same file")));
    }
    let inside = source == "/" || target.starts_with(&format!("{source}/"));
    if inside {
        return Err(FsError::usage(format!(
            "cannot move `{source}' to a subdirectory of itself, `{target}'"
        )));
    }
    Ok(())
}

// `dir/` names a directory, so it must not be created by a rename.
fn has_trailing_slash(target: &str) -> bool {
    target.len() > 1 && target.ends_with('/')
}

fn relative<'p>(root: &str, path: &'p str) -> &'p str {
    path.strip_prefix(root).unwrap_or(path).trim_start_matches('/')
}
