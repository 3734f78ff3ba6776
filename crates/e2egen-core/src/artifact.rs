use std::fmt;
use std::path::{Path, PathBuf};

/// The kinds of files the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Output of the low-level REST client layer.
    LowLevelClient,
    ClientModule,
    FixtureModule,
    Conftest,
    TestModule,
    SettingsEntry,
    Readme,
    PackageMarker,
    /// A directory left behind by an older layout.
    LegacyOutput,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::LowLevelClient => "low-level client",
            ArtifactKind::ClientModule => "client module",
            ArtifactKind::FixtureModule => "fixture module",
            ArtifactKind::Conftest => "conftest",
            ArtifactKind::TestModule => "test module",
            ArtifactKind::SettingsEntry => "settings",
            ArtifactKind::Readme => "readme",
            ArtifactKind::PackageMarker => "package marker",
            ArtifactKind::LegacyOutput => "legacy output",
        };
        f.write_str(name)
    }
}

/// How an artifact treats a destination that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Write only when the destination does not exist yet.
    CreateIfAbsent,
    /// Rewrite when the rendered bytes differ. Reserved for the low-level
    /// client layer, which nobody is expected to edit.
    Refresh,
}

/// Outcome of planning one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Create,
    Skip,
}

/// A file the generator intends to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Destination, relative to the output root.
    pub path: PathBuf,
    /// Topmost directory that must carry a package marker, relative to the
    /// output root. `None` for files outside any Python package.
    pub package_root: Option<PathBuf>,
    pub policy: WritePolicy,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            package_root: None,
            policy: WritePolicy::CreateIfAbsent,
        }
    }

    pub fn in_package(mut self, package_root: impl Into<PathBuf>) -> Self {
        self.package_root = Some(package_root.into());
        self
    }

    pub fn refreshed(mut self) -> Self {
        self.policy = WritePolicy::Refresh;
        self
    }
}

/// Create-if-absent: an existing destination is never planned for creation.
pub fn plan(destination: &Path) -> Plan {
    if destination.exists() {
        Plan::Skip
    } else {
        Plan::Create
    }
}

/// Directory holding one service's files under `base`.
///
/// When `base` already ends in the service's module name it is used as is, so
/// a caller that scoped the base to one service does not get double nesting.
pub fn service_dir(base: &Path, service_module: &str) -> PathBuf {
    if base.file_name().and_then(|n| n.to_str()) == Some(service_module) {
        base.to_path_buf()
    } else {
        base.join(service_module)
    }
}

/// File holding one service's module under `base`: `base` itself when it
/// already names a `.py` file, `base.py` when `base` is named after the
/// module, otherwise `base/<module>.py`.
pub fn service_file(base: &Path, module: &str) -> PathBuf {
    if base.extension().is_some_and(|ext| ext == "py") {
        return base.to_path_buf();
    }
    if base.file_name().and_then(|n| n.to_str()) == Some(module) {
        return base.with_extension("py");
    }
    base.join(format!("{module}.py"))
}

/// The first component of a relative path, used as the package root of an
/// artifact family (`framework`, `tests`, `internal`).
pub fn top_level(path: &Path) -> PathBuf {
    path.components()
        .find(|c| matches!(c, std::path::Component::Normal(_)))
        .map(|c| PathBuf::from(c.as_os_str()))
        .unwrap_or_default()
}
