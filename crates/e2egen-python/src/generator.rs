use std::path::{Path, PathBuf};

use e2egen_core::config::{E2eConfig, OutputPaths, SuiteVersion};
use e2egen_core::{CodeGenerator, GenerationReport, GeneratorError, OutputTree, ParsedApi};

use crate::emitters::{self, EmitContext};

/// What one run generates beyond the client layer.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub fixtures: bool,
    /// Implies `fixtures`.
    pub tests: bool,
    pub readme: bool,
    pub suite: SuiteVersion,
    pub async_mode: bool,
    /// Removed before clients are written, when set.
    pub legacy_clients_dir: Option<PathBuf>,
    pub paths: OutputPaths,
}

impl GenerateOptions {
    /// Clients only, laid out as `config` says.
    pub fn from_config(config: &E2eConfig) -> Self {
        Self {
            fixtures: false,
            tests: false,
            readme: false,
            suite: config.suite_version,
            async_mode: config.async_mode,
            legacy_clients_dir: config.legacy_clients_dir.as_ref().map(PathBuf::from),
            paths: config.paths.clone(),
        }
    }

    pub fn with_fixtures(&self) -> bool {
        self.fixtures || self.tests
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&E2eConfig::default())
    }
}

/// Generates a pytest suite: clients, fixtures and settings, tests, README.
pub struct PytestSuiteGenerator;

impl CodeGenerator for PytestSuiteGenerator {
    type Options = GenerateOptions;

    fn generate(
        &self,
        api: &ParsedApi,
        options: &GenerateOptions,
        tree: &mut OutputTree,
    ) -> Result<(), GeneratorError> {
        let cx = EmitContext::new(api, options)?;
        log::info!(
            "generating {} suite for {} ({} groups)",
            options.suite,
            api.service_name(),
            cx.non_empty_groups().count()
        );

        emitters::low_level::emit(&cx, tree)?;
        emitters::clients::emit(&cx, tree)?;

        if options.with_fixtures() {
            emitters::fixtures::emit(&cx, tree)?;
            emitters::settings::emit(&cx, tree)?;
            emitters::conftest::emit(&cx, tree)?;
        }
        if options.tests {
            emitters::tests::emit(&cx, tree)?;
        }
        if options.readme {
            emitters::readme::emit(&cx, tree)?;
        }
        Ok(())
    }
}

/// Run [`PytestSuiteGenerator`] against the output root `root`.
pub fn generate(
    api: &ParsedApi,
    options: &GenerateOptions,
    root: &Path,
) -> Result<GenerationReport, GeneratorError> {
    let mut tree = OutputTree::new(root);
    PytestSuiteGenerator.generate(api, options, &mut tree)?;
    Ok(tree.into_report())
}
