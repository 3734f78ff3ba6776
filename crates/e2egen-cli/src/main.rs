use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use e2egen_core::config::{self, CONFIG_FILE_NAME, E2eConfig, OutputPaths, SuiteVersion};
use e2egen_core::naming::{
    api_class_name, client_class_name, client_fixture_name, module_name, service_class_name,
    service_env_var, service_fixture_name, to_snake,
};
use e2egen_core::{ParsedApi, parse};
use e2egen_python::GenerateOptions;
use e2egen_python::emitters::{Resolved, resolve_group};
use e2egen_python::layout::Layout;

#[derive(Parser)]
#[command(
    name = "e2egen",
    about = "Idempotent pytest scaffolding from OpenAPI descriptions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate clients, and optionally fixtures and tests, for one service
    Generate(GenerateArgs),

    /// Show how a service's operations would be grouped and named
    Inspect {
        /// OpenAPI document: a file path or an http(s) URL
        #[arg(short, long)]
        spec: String,

        /// Service name (defaults to the document title)
        #[arg(long)]
        service: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .e2egen.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Service name, used for module, class and fixture names
    service: String,

    /// OpenAPI document: a file path or an http(s) URL
    #[arg(short, long)]
    spec: String,

    /// Also generate pytest fixtures and the settings entry
    #[arg(long)]
    with_fixtures: bool,

    /// Also generate one test module per operation (implies fixtures)
    #[arg(long)]
    with_tests: bool,

    /// Also generate a README (implied by --with-tests)
    #[arg(long)]
    with_readme: bool,

    /// Fixture and test layout (defaults to the config file, then v2)
    #[arg(long, value_enum)]
    suite_version: Option<SuiteArg>,

    /// Output root (defaults to the config file, then the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generate async clients and tests
    #[arg(long = "async")]
    async_mode: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SuiteArg {
    V1,
    V2,
}

impl From<SuiteArg> for SuiteVersion {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::V1 => SuiteVersion::V1,
            SuiteArg::V2 => SuiteVersion::V2,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Inspect {
            spec,
            service,
            format,
        } => cmd_inspect(&spec, service, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "e2egen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<E2eConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Extension of a path or URL, ignoring any query string or fragment.
fn source_extension(source: &str) -> Option<&str> {
    let path = source.split(['?', '#']).next().unwrap_or(source);
    Path::new(path).extension().and_then(|e| e.to_str())
}

fn fetch_spec(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to fetch {url}"))?;
    if !response.status().is_success() {
        anyhow::bail!("fetching {url} failed with HTTP {}", response.status());
    }
    response
        .text()
        .with_context(|| format!("failed to read response body from {url}"))
}

fn read_source(source: &str) -> Result<String> {
    if is_url(source) {
        log::debug!("fetching {source}");
        fetch_spec(source)
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {source}"))
    }
}

fn load_api(source: &str, service: Option<String>) -> Result<ParsedApi> {
    let content = read_source(source)?;
    let spec = parse::from_source_text(&content, source_extension(source))
        .with_context(|| format!("failed to parse {source}"))?;
    let service = service.unwrap_or_else(|| to_snake(&spec.info.title));
    Ok(ParsedApi::from_spec(service, &spec))
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let api = load_api(&args.spec, Some(args.service.clone()))?;

    let mut options = GenerateOptions::from_config(&cfg);
    options.fixtures = args.with_fixtures;
    options.tests = args.with_tests;
    options.readme = args.with_readme || args.with_tests;
    options.async_mode |= args.async_mode;
    if let Some(suite) = args.suite_version {
        options.suite = suite.into();
    }

    let root = args.output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    eprintln!(
        "Generating {} suite for {} → {}",
        options.suite,
        api.service_name(),
        root.display()
    );

    let report = e2egen_python::generate(&api, &options, &root)
        .with_context(|| format!("failed to generate into {}", root.display()))?;

    eprint!("{report}");
    for entry in report.warnings() {
        if let e2egen_core::Outcome::Skipped(reason) = &entry.outcome {
            eprintln!("warning: {} {}: {reason}", entry.kind, entry.path.display());
        }
    }
    eprintln!(
        "Wrote {} files, skipped {}.",
        report.written().len(),
        report.skipped().len()
    );
    if options.with_fixtures() {
        eprintln!(
            "\nSet {} to the base URL of {} before running the tests.",
            service_env_var(api.service_name()),
            api.service_name()
        );
    }
    Ok(())
}

fn cmd_inspect(source: &str, service: Option<String>, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let api = load_api(source, service)?;
    let summary = build_inspect_summary(&api, &cfg.paths);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(api: &ParsedApi, paths: &OutputPaths) -> serde_json::Value {
    let service = api.service_name();
    let layout = Layout::new(service, paths);

    let groups: Vec<serde_json::Value> = e2egen_core::group_operations(api)
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| {
            let operations: Vec<serde_json::Value> = group
                .operations
                .iter()
                .zip(resolve_group(api, group))
                .map(|(&id, resolved)| {
                    let op = api.operation(id);
                    let (method_name, status) = match resolved {
                        Resolved::Operation { method_name, .. } => {
                            (method_name, "ok".to_string())
                        }
                        Resolved::Incomplete { method_name, error } => {
                            (method_name, format!("incomplete: {error}"))
                        }
                        Resolved::Duplicate { method_name } => {
                            (method_name, "duplicate method name".to_string())
                        }
                    };
                    serde_json::json!({
                        "method": op.method,
                        "path": op.path,
                        "method_name": method_name,
                        "test": layout.test_path(&group.name, &method_name),
                        "status": status,
                    })
                })
                .collect();

            serde_json::json!({
                "name": group.name.to_string(),
                "module": module_name(&group.name),
                "api_class": api_class_name(&group.name),
                "client_class": client_class_name(&group.name),
                "client_fixture": client_fixture_name(&group.name),
                "operations": operations,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": api.title(),
            "version": api.version(),
        },
        "service": {
            "name": service,
            "module": layout.service_module,
            "class": service_class_name(service),
            "fixture": service_fixture_name(service),
            "env_var": service_env_var(service),
            "settings_field": layout.settings_field,
        },
        "groups": groups,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
