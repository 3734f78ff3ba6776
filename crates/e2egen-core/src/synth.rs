//! Writes planned artifacts under an output root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{self, Artifact, ArtifactKind, Plan, WritePolicy};
use crate::error::GeneratorError;
use crate::report::{GenerationReport, Outcome, SkipReason};

/// File name of a Python package marker.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// The output tree of one generation run, plus what the run did to it.
#[derive(Debug)]
pub struct OutputTree {
    root: PathBuf,
    report: GenerationReport,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            report: GenerationReport::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn into_report(self) -> GenerationReport {
        self.report
    }

    /// Absolute (root-joined) form of a relative destination.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn plan(&self, artifact: &Artifact) -> Plan {
        artifact::plan(&self.resolve(&artifact.path))
    }

    /// Write an artifact according to its policy. `render` is only called
    /// when the content is actually needed.
    pub fn emit<F>(&mut self, artifact: &Artifact, render: F) -> Result<Outcome, GeneratorError>
    where
        F: FnOnce() -> Result<String, GeneratorError>,
    {
        let outcome = match (artifact.policy, self.plan(artifact)) {
            (WritePolicy::CreateIfAbsent, Plan::Skip) => {
                log::debug!("{} exists, skipping", artifact.path.display());
                Outcome::Skipped(SkipReason::AlreadyExists)
            }
            (WritePolicy::CreateIfAbsent, Plan::Create) => {
                self.write(&artifact.path, &render()?)?;
                Outcome::Created
            }
            (WritePolicy::Refresh, Plan::Create) => {
                self.write(&artifact.path, &render()?)?;
                Outcome::Created
            }
            (WritePolicy::Refresh, Plan::Skip) => {
                let content = render()?;
                if self.read(&artifact.path)?.as_deref() == Some(content.as_str()) {
                    Outcome::Unchanged
                } else {
                    self.write(&artifact.path, &content)?;
                    Outcome::Refreshed
                }
            }
        };

        if matches!(outcome, Outcome::Created | Outcome::Refreshed) {
            log::info!("wrote {} {}", artifact.kind, artifact.path.display());
        }
        self.report.record(artifact.kind, artifact.path.clone(), outcome.clone());

        if let (Some(package_root), Some(parent)) =
            (&artifact.package_root, artifact.path.parent())
        {
            self.ensure_package_markers(parent, package_root)?;
        }
        Ok(outcome)
    }

    /// Create a package marker in `dir` and in every ancestor up to and
    /// including `package_root`. Existing markers are left alone.
    pub fn ensure_package_markers(
        &mut self,
        dir: &Path,
        package_root: &Path,
    ) -> Result<(), GeneratorError> {
        if !dir.starts_with(package_root) {
            log::warn!(
                "{} is outside package root {}; no package markers created",
                dir.display(),
                package_root.display()
            );
            return Ok(());
        }

        let dirs: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|d| d.starts_with(package_root))
            .map(Path::to_path_buf)
            .collect();
        for d in dirs {
            let marker = d.join(PACKAGE_MARKER);
            if artifact::plan(&self.resolve(&marker)) == Plan::Create {
                self.write(&marker, "")?;
                self.report.record(ArtifactKind::PackageMarker, marker, Outcome::Created);
            }
        }
        Ok(())
    }

    /// Record an artifact that was never planned, e.g. because its operation
    /// metadata was incomplete.
    pub fn skip(&mut self, kind: ArtifactKind, path: impl Into<PathBuf>, reason: SkipReason) {
        let path = path.into();
        match &reason {
            SkipReason::IncompleteModel(_) | SkipReason::SettingsUnrecognized => {
                log::warn!("skipping {kind} {}: {reason}", path.display());
            }
            _ => log::debug!("skipping {kind} {}: {reason}", path.display()),
        }
        self.report.record(kind, path, Outcome::Skipped(reason));
    }

    /// Overwrite an existing file in place. Only the settings merger uses this.
    pub fn update(
        &mut self,
        kind: ArtifactKind,
        relative: &Path,
        content: &str,
    ) -> Result<(), GeneratorError> {
        self.write(relative, content)?;
        log::info!("updated {kind} {}", relative.display());
        self.report.record(kind, relative, Outcome::Updated);
        Ok(())
    }

    /// Record that an artifact was examined and left as it was.
    pub fn unchanged(&mut self, kind: ArtifactKind, relative: &Path) {
        self.report.record(kind, relative, Outcome::Unchanged);
    }

    /// Read a file under the root, `None` if it does not exist.
    pub fn read(&self, relative: &Path) -> Result<Option<String>, GeneratorError> {
        let path = self.resolve(relative);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GeneratorError::io("read", path, e)),
        }
    }

    /// Remove a directory tree if it exists. This bypasses create-if-absent
    /// and is only meant for migrating away from an old layout.
    pub fn remove_dir(&mut self, relative: &Path) -> Result<bool, GeneratorError> {
        let path = self.resolve(relative);
        if !path.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&path).map_err(|e| GeneratorError::io("remove", &path, e))?;
        log::warn!("removed legacy output {}", path.display());
        self.report.record(ArtifactKind::LegacyOutput, relative, Outcome::Removed);
        Ok(true)
    }

    fn write(&self, relative: &Path, content: &str) -> Result<(), GeneratorError> {
        let path = self.resolve(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| GeneratorError::io("create directory", parent, e))?;
        }
        fs::write(&path, content).map_err(|e| GeneratorError::io("write", &path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_artifact() -> Artifact {
        Artifact::new(
            ArtifactKind::ClientModule,
            "framework/clients/http/billing/orders_client.py",
        )
        .in_package("framework")
    }

    #[test]
    fn test_emit_creates_file_and_markers() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = OutputTree::new(dir.path());

        let outcome = tree
            .emit(&client_artifact(), || Ok("class OrdersClient: ...\n".to_string()))
            .unwrap();
        assert_eq!(outcome, Outcome::Created);

        for marker in [
            "framework/__init__.py",
            "framework/clients/__init__.py",
            "framework/clients/http/__init__.py",
            "framework/clients/http/billing/__init__.py",
        ] {
            assert!(dir.path().join(marker).is_file(), "missing {marker}");
        }
        assert!(!dir.path().join(PACKAGE_MARKER).exists());
        assert_eq!(tree.report().created().len(), 5);
    }

    #[test]
    fn test_emit_never_overwrites_and_skips_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("framework/clients/http/billing/orders_client.py");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "# hand edited\n").unwrap();

        let mut tree = OutputTree::new(dir.path());
        let outcome = tree
            .emit(&client_artifact(), || panic!("render must not run for existing files"))
            .unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyExists));
        assert_eq!(fs::read_to_string(&target).unwrap(), "# hand edited\n");
    }

    #[test]
    fn test_existing_markers_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("framework")).unwrap();
        fs::write(dir.path().join("framework/__init__.py"), "from .x import y\n").unwrap();

        let mut tree = OutputTree::new(dir.path());
        tree.ensure_package_markers(Path::new("framework/settings"), Path::new("framework"))
            .unwrap();
        tree.ensure_package_markers(Path::new("framework/settings"), Path::new("framework"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("framework/__init__.py")).unwrap(),
            "from .x import y\n"
        );
        assert_eq!(tree.report().created(), [Path::new("framework/settings/__init__.py")]);
    }

    #[test]
    fn test_refresh_writes_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = OutputTree::new(dir.path());
        let artifact = Artifact::new(ArtifactKind::LowLevelClient, "internal/api.py").refreshed();

        assert_eq!(tree.emit(&artifact, || Ok("v1".into())).unwrap(), Outcome::Created);
        assert_eq!(tree.emit(&artifact, || Ok("v1".into())).unwrap(), Outcome::Unchanged);
        assert_eq!(tree.emit(&artifact, || Ok("v2".into())).unwrap(), Outcome::Refreshed);
    }

    #[test]
    fn test_remove_dir_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = OutputTree::new(dir.path());
        assert!(!tree.remove_dir(Path::new("clients")).unwrap());

        fs::create_dir_all(dir.path().join("clients/http")).unwrap();
        assert!(tree.remove_dir(Path::new("clients")).unwrap());
        assert!(!dir.path().join("clients").exists());
    }
}
