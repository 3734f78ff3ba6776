use std::path::Path;

use minijinja::context;

use e2egen_core::artifact::{Artifact, ArtifactKind};
use e2egen_core::error::GeneratorError;
use e2egen_core::grouping::ApiGroup;
use e2egen_core::naming::{api_class_name, client_class_name};
use e2egen_core::report::SkipReason;
use e2egen_core::synth::OutputTree;

use crate::emitters::EmitContext;
use crate::layout::Layout;

/// Remove the legacy layout, then create one editable client per group.
pub fn emit(cx: &EmitContext<'_>, tree: &mut OutputTree) -> Result<(), GeneratorError> {
    if let Some(legacy) = &cx.options.legacy_clients_dir {
        remove_legacy(cx, tree, legacy)?;
    }

    let package_root = Layout::package_root(&cx.layout.paths().clients);
    for group in &cx.groups {
        let path = cx.layout.client_path(&group.name);
        if group.is_empty() {
            tree.skip(ArtifactKind::ClientModule, path, SkipReason::EmptyGroup);
            continue;
        }
        let artifact = Artifact::new(ArtifactKind::ClientModule, path).in_package(&package_root);
        tree.emit(&artifact, || emit_client(cx, group))?;
    }
    Ok(())
}

fn remove_legacy(
    cx: &EmitContext<'_>,
    tree: &mut OutputTree,
    legacy: &Path,
) -> Result<(), GeneratorError> {
    let paths = cx.layout.paths();
    let outputs = [
        &paths.internal_clients,
        &paths.clients,
        &paths.fixtures,
        &paths.tests,
        &paths.settings,
    ];
    if legacy.as_os_str().is_empty() || outputs.iter().any(|out| out.starts_with(legacy)) {
        log::warn!(
            "legacy clients directory {} overlaps the output layout; not removing it",
            legacy.display()
        );
        return Ok(());
    }
    tree.remove_dir(legacy)?;
    Ok(())
}

/// Render `<group>_client.py`.
pub fn emit_client(cx: &EmitContext<'_>, group: &ApiGroup) -> Result<String, GeneratorError> {
    cx.templates.render(
        "client.py.j2",
        context! {
            header => cx.header(true)?,
            api_import => cx.layout.api_import(&group.name),
            api_class => api_class_name(&group.name),
            client_class => client_class_name(&group.name),
            api_name => group.name.to_string(),
            service_name => cx.api.service_name(),
        },
    )
}
