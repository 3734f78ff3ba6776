use std::fmt;
use std::path::{Path, PathBuf};

use crate::artifact::ArtifactKind;

/// Why an artifact was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
    /// The operation metadata needed to render it was incomplete.
    IncompleteModel(String),
    /// Another operation in the same group already claimed this method name.
    DuplicateMethodName(String),
    EmptyGroup,
    /// The settings file exists but has no recognizable settings class.
    SettingsUnrecognized,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyExists => f.write_str("already exists"),
            SkipReason::IncompleteModel(why) => write!(f, "incomplete operation metadata: {why}"),
            SkipReason::DuplicateMethodName(name) => write!(f, "duplicate method name {name}"),
            SkipReason::EmptyGroup => f.write_str("group has no operations"),
            SkipReason::SettingsUnrecognized => {
                f.write_str("settings file has no recognizable settings class; left untouched")
            }
        }
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// Rewritten because its rendered content changed.
    Refreshed,
    /// Patched in place (settings merge).
    Updated,
    /// Up to date already; nothing written.
    Unchanged,
    Removed,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Everything one generation run did, in order.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    entries: Vec<ReportEntry>,
}

impl GenerationReport {
    pub fn record(&mut self, kind: ArtifactKind, path: impl Into<PathBuf>, outcome: Outcome) {
        self.entries.push(ReportEntry {
            kind,
            path: path.into(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    fn paths_where(&self, pred: impl Fn(&Outcome) -> bool) -> Vec<&Path> {
        self.entries
            .iter()
            .filter(|e| pred(&e.outcome))
            .map(|e| e.path.as_path())
            .collect()
    }

    pub fn created(&self) -> Vec<&Path> {
        self.paths_where(|o| *o == Outcome::Created)
    }

    pub fn skipped(&self) -> Vec<&Path> {
        self.paths_where(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// Paths whose bytes changed on disk during the run.
    pub fn written(&self) -> Vec<&Path> {
        self.paths_where(|o| {
            matches!(o, Outcome::Created | Outcome::Refreshed | Outcome::Updated | Outcome::Removed)
        })
    }

    /// Skips the user should hear about: anything other than a file that
    /// already exists or an empty group.
    pub fn warnings(&self) -> Vec<&ReportEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.outcome,
                    Outcome::Skipped(
                        SkipReason::IncompleteModel(_) | SkipReason::SettingsUnrecognized
                    )
                )
            })
            .collect()
    }

    pub fn extend(&mut self, other: GenerationReport) {
        self.entries.extend(other.entries);
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let path = entry.path.display();
            match &entry.outcome {
                Outcome::Created => writeln!(f, "  created   {path}")?,
                Outcome::Refreshed => writeln!(f, "  refreshed {path}")?,
                Outcome::Updated => writeln!(f, "  updated   {path}")?,
                Outcome::Removed => writeln!(f, "  removed   {path}")?,
                Outcome::Unchanged => {}
                Outcome::Skipped(reason) => writeln!(f, "  skipped   {path} ({reason})")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_views() {
        let mut report = GenerationReport::default();
        report.record(ArtifactKind::ClientModule, "a.py", Outcome::Created);
        report.record(
            ArtifactKind::TestModule,
            "b.py",
            Outcome::Skipped(SkipReason::AlreadyExists),
        );
        report.record(
            ArtifactKind::SettingsEntry,
            "s.py",
            Outcome::Skipped(SkipReason::SettingsUnrecognized),
        );
        report.record(ArtifactKind::LowLevelClient, "c.py", Outcome::Unchanged);

        assert_eq!(report.created(), [Path::new("a.py")]);
        assert_eq!(report.skipped().len(), 2);
        assert_eq!(report.written().len(), 1);
        assert_eq!(report.warnings().len(), 1);

        let text = report.to_string();
        assert!(text.contains("created   a.py"));
        assert!(text.contains("skipped   b.py (already exists)"));
        assert!(!text.contains("c.py"));
    }
}
