use minijinja::context;

use e2egen_core::artifact::{Artifact, ArtifactKind};
use e2egen_core::error::GeneratorError;
use e2egen_core::naming::service_env_var;
use e2egen_core::synth::OutputTree;

use crate::emitters::EmitContext;

pub const README_PATH: &str = "README.md";

pub fn emit(cx: &EmitContext<'_>, tree: &mut OutputTree) -> Result<(), GeneratorError> {
    let artifact = Artifact::new(ArtifactKind::Readme, README_PATH);
    tree.emit(&artifact, || emit_readme(cx))?;
    Ok(())
}

pub fn emit_readme(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    let layout = &cx.layout;
    cx.templates.render(
        "readme.md.j2",
        context! {
            version => env!("CARGO_PKG_VERSION"),
            title => cx.api.title(),
            service_name => cx.api.service_name(),
            service_env_var => service_env_var(cx.api.service_name()),
            internal_dir => layout.internal_dir().display().to_string(),
            clients_dir => layout.clients_dir().display().to_string(),
            fixtures_dir => layout.paths().fixtures.display().to_string(),
            settings_file => layout.settings_path().display().to_string(),
            tests_dir => layout.paths().tests.display().to_string(),
        },
    )
}
