use minijinja::context;

use e2egen_core::artifact::{Artifact, ArtifactKind};
use e2egen_core::error::GeneratorError;
use e2egen_core::naming::service_env_var;
use e2egen_core::report::SkipReason;
use e2egen_core::synth::OutputTree;

use crate::emitters::EmitContext;
use crate::layout::Layout;
use crate::settings_merge::{DEFAULT_INDENT, MergeOutcome, SETTINGS_CLASS, merge_field};

/// Make sure the settings class has a base URL field for this service:
/// create the module when absent, otherwise merge the field into it.
pub fn emit(cx: &EmitContext<'_>, tree: &mut OutputTree) -> Result<(), GeneratorError> {
    let path = cx.layout.settings_path();
    let artifact = Artifact::new(ArtifactKind::SettingsEntry, path.clone())
        .in_package(Layout::package_root(&cx.layout.paths().settings));

    let Some(existing) = tree.read(&path)? else {
        tree.emit(&artifact, || emit_settings_module(cx))?;
        return Ok(());
    };

    let field = &cx.layout.settings_field;
    match merge_field(&existing, field, || render_field(cx))? {
        MergeOutcome::AlreadyPresent => {
            log::debug!("{} already declares {field}", path.display());
            tree.unchanged(ArtifactKind::SettingsEntry, &path);
        }
        MergeOutcome::Inserted(merged) => {
            tree.update(ArtifactKind::SettingsEntry, &path, &merged)?;
        }
        MergeOutcome::Unrecognized(why) => {
            log::warn!("{}: {why}", path.display());
            tree.skip(ArtifactKind::SettingsEntry, path, SkipReason::SettingsUnrecognized);
        }
    }
    Ok(())
}

/// Render a fresh settings module declaring only this service's field.
pub fn emit_settings_module(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    cx.templates.render(
        "settings.py.j2",
        context! {
            header => cx.templates.header(None, true)?,
            settings_class => SETTINGS_CLASS,
            field => render_field(cx)?,
            indent => DEFAULT_INDENT,
        },
    )
}

/// The field declaration, without indentation.
fn render_field(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    let field = cx.templates.render(
        "settings_field.py.j2",
        context! {
            settings_field => cx.layout.settings_field.clone(),
            service_env_var => service_env_var(cx.api.service_name()),
        },
    )?;
    Ok(field.trim().to_string())
}
