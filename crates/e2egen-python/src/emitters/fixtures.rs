//! pytest fixtures: the shared `base.py` plus one module per service, shaped
//! by the suite version.

use minijinja::context;

use e2egen_core::artifact::{Artifact, ArtifactKind};
use e2egen_core::config::SuiteVersion;
use e2egen_core::error::GeneratorError;
use e2egen_core::naming::{
    client_class_name, client_fixture_name, service_class_name, service_fixture_name,
};
use e2egen_core::report::SkipReason;
use e2egen_core::synth::OutputTree;

use crate::emitters::{EmitContext, api_attribute};
use crate::layout::Layout;
use crate::settings_merge::SETTINGS_CLASS;

pub fn emit(cx: &EmitContext<'_>, tree: &mut OutputTree) -> Result<(), GeneratorError> {
    let package_root = Layout::package_root(&cx.layout.paths().fixtures);

    let base = Artifact::new(ArtifactKind::FixtureModule, cx.layout.base_fixture_path())
        .in_package(&package_root);
    tree.emit(&base, || emit_base(cx))?;

    let path = match cx.options.suite {
        SuiteVersion::V1 => cx.layout.client_fixtures_path(),
        SuiteVersion::V2 => cx.layout.service_fixture_path(),
    };
    if cx.non_empty_groups().next().is_none() {
        tree.skip(ArtifactKind::FixtureModule, path, SkipReason::EmptyGroup);
        return Ok(());
    }

    let artifact = Artifact::new(ArtifactKind::FixtureModule, path).in_package(&package_root);
    match cx.options.suite {
        SuiteVersion::V1 => tree.emit(&artifact, || emit_client_fixtures(cx))?,
        SuiteVersion::V2 => tree.emit(&artifact, || emit_service_fixture(cx))?,
    };
    Ok(())
}

/// Render `base.py`, shared by every service.
pub fn emit_base(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    cx.templates.render(
        "fixture_base.py.j2",
        context! {
            header => cx.templates.header(None, true)?,
            settings_import => cx.layout.settings_import(),
            settings_class => SETTINGS_CLASS,
        },
    )
}

/// Render the v1 module: one session fixture per API client.
pub fn emit_client_fixtures(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    let fixtures: Vec<minijinja::Value> = cx
        .non_empty_groups()
        .map(|group| {
            context! {
                fixture_name => client_fixture_name(&group.name),
                client_class => client_class_name(&group.name),
                client_import => cx.layout.client_import(&group.name),
            }
        })
        .collect();

    cx.templates.render(
        "fixture_v1.py.j2",
        context! {
            header => cx.header(true)?,
            settings_import => cx.layout.settings_import(),
            settings_field => cx.layout.settings_field.clone(),
            fixtures => fixtures,
        },
    )
}

/// Render the v2 module: a service object holding every client, and its
/// fixture.
pub fn emit_service_fixture(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    let service = cx.api.service_name();
    let clients: Vec<minijinja::Value> = cx
        .non_empty_groups()
        .map(|group| {
            context! {
                attribute => api_attribute(&group.name),
                client_class => client_class_name(&group.name),
                client_import => cx.layout.client_import(&group.name),
            }
        })
        .collect();

    cx.templates.render(
        "fixture_v2.py.j2",
        context! {
            header => cx.header(true)?,
            settings_import => cx.layout.settings_import(),
            settings_field => cx.layout.settings_field.clone(),
            service_name => service,
            service_class => service_class_name(service),
            service_fixture => service_fixture_name(service),
            clients => clients,
        },
    )
}
