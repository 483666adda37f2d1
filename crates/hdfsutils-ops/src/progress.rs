//! Events and results reported by move operations.

use hdfsutils_core::{FsError, TypeConflict};

/// Something that happened to one source/target pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveEvent {
    /// `source` now lives at `target`.
    Renamed {
        source: String,
        target: String,
        /// An existing target of the same type was deleted first.
        replaced: bool,
    },
    /// The target exists and the policy or prompt declined to replace it.
    Skipped { source: String, target: String },
    /// Source and target kinds disagree; nothing was changed for this pair.
    Conflict(TypeConflict),
}

impl std::fmt::Display for MoveEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Renamed { source, target, .. } => write!(f, "{source} -> {target}"),
            Self::Skipped { source, target } => write!(f, "{source} not moved: {target} exists"),
            Self::Conflict(conflict) => write!(f, "ERROR: {conflict}"),
        }
    }
}

/// Result of a completed move request.
#[derive(Debug, Default)]
pub struct MoveSummary {
    /// Pairs renamed, including replacements.
    pub renamed: usize,
    /// Pairs left alone because the target existed.
    pub skipped: usize,
    /// Type conflicts reported.
    pub conflicts: Vec<TypeConflict>,
    /// Sources that failed, with the error that stopped them.
    pub failures: Vec<(String, FsError)>,
}

impl MoveSummary {
    pub(crate) fn record(&mut self, event: &MoveEvent) {
        match event {
            MoveEvent::Renamed { .. } => self.renamed += 1,
            MoveEvent::Skipped { .. } => self.skipped += 1,
            MoveEvent::Conflict(conflict) => self.conflicts.push(conflict.clone()),
        }
    }

    /// Check if every source was processed without conflicts or failures.
    pub fn is_success(&self) -> bool {
        self.conflicts.is_empty() && self.failures.is_empty()
    }

    /// Get a human-readable summary of the request.
    pub fn summary(&self) -> String {
        let mut text = format!("Moved {} items", self.renamed);
        if self.skipped > 0 {
            text.push_str(&format!(", {} skipped", self.skipped));
        }
        if !self.conflicts.is_empty() {
            text.push_str(&format!(", {} conflicts", self.conflicts.len()));
        }
        if !self.failures.is_empty() {
            text.push_str(&format!(", {} failed", self.failures.len()));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdfsutils_core::NodeKind;

    #[test]
    fn test_event_display() {
        let renamed = MoveEvent::Renamed {
            source: "/a/bar.txt".into(),
            target: "/b/bar.txt".into(),
            replaced: false,
        };
        assert_eq!(renamed.to_string(), "/a/bar.txt -> /b/bar.txt");

        let conflict = MoveEvent::Conflict(TypeConflict::new(
            "/a/c",
            "/b/c",
            NodeKind::Directory,
            NodeKind::File,
        ));
        assert_eq!(
            conflict.to_string(),
            "ERROR: source(/a/c:DIRECTORY) and target(/b/c:FILE) have different types"
        );
    }

    #[test]
    fn test_summary() {
        let mut summary = MoveSummary::default();
        assert!(summary.is_success());
        assert_eq!(summary.summary(), "Moved 0 items");

        summary.record(&MoveEvent::Renamed {
            source: "/a".into(),
            target: "/b".into(),
            replaced: true,
        });
        summary.record(&MoveEvent::Skipped {
            source: "/c".into(),
            target: "/d".into(),
        });
        summary.failures.push(("/e".into(), FsError::not_found("/e")));

        assert!(!summary.is_success());
        assert_eq!(summary.summary(), "Moved 1 items, 1 skipped, 1 failed");
    }
}
