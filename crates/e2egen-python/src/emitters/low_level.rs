//! The low-level REST client layer: one API class per group plus the
//! pydantic models. Nobody edits these, so they are refreshed on change.

use minijinja::context;

use e2egen_core::api::OperationContext;
use e2egen_core::artifact::{Artifact, ArtifactKind};
use e2egen_core::error::GeneratorError;
use e2egen_core::grouping::ApiGroup;
use e2egen_core::naming::{api_class_name, model_class_name};
use e2egen_core::parse::schema::{Schema, SchemaOrRef};
use e2egen_core::synth::OutputTree;

use crate::emitters::{EmitContext, Resolved, resolve_group};
use crate::layout::Layout;
use crate::type_mapper::{
    docstring_line, enum_member_name, method_arguments, model_field, path_template,
    python_string_literal, response_kind,
};

pub fn emit(cx: &EmitContext<'_>, tree: &mut OutputTree) -> Result<(), GeneratorError> {
    let package_root = Layout::package_root(&cx.layout.paths().internal_clients);

    for group in cx.non_empty_groups() {
        let path = cx.layout.api_module_path(&group.name);
        let artifact = Artifact::new(ArtifactKind::LowLevelClient, path)
            .in_package(&package_root)
            .refreshed();
        tree.emit(&artifact, || emit_api_module(cx, group))?;
    }

    let models = Artifact::new(ArtifactKind::LowLevelClient, cx.layout.models_path())
        .in_package(&package_root)
        .refreshed();
    tree.emit(&models, || emit_models(cx))?;
    Ok(())
}

/// Render `apis/<group>_api.py`.
pub fn emit_api_module(cx: &EmitContext<'_>, group: &ApiGroup) -> Result<String, GeneratorError> {
    let mut operations = Vec::new();
    let mut models: Vec<String> = Vec::new();

    for resolved in resolve_group(cx.api, group) {
        match resolved {
            Resolved::Operation {
                method_name,
                context,
            } => {
                models.extend(context.referenced_models());
                operations.push(operation_ctx(&method_name, &context));
            }
            Resolved::Incomplete { method_name, error } => {
                log::warn!("{}: leaving out {method_name}: {error}", group.name);
            }
            Resolved::Duplicate { method_name } => {
                log::debug!("{}: {method_name} already defined", group.name);
            }
        }
    }
    models.sort();
    models.dedup();

    cx.templates.render(
        "api.py.j2",
        context! {
            header => cx.header(false)?,
            api_class => api_class_name(&group.name),
            api_name => group.name.to_string(),
            service_name => cx.api.service_name(),
            http_client => if cx.options.async_mode { "AsyncClient" } else { "Client" },
            async_mode => cx.options.async_mode,
            models_import => cx.layout.models_import(),
            models => models,
            operations => operations,
        },
    )
}

fn operation_ctx(method_name: &str, ctx: &OperationContext) -> minijinja::Value {
    context! {
        method_name => method_name,
        http_method => ctx.method.to_uppercase(),
        summary => ctx.summary.as_deref().map(docstring_line).filter(|s| !s.is_empty()),
        arguments => method_arguments(ctx),
        query => ctx.parameters.query.clone(),
        header => ctx.parameters.header.clone(),
        path_template => path_template(ctx),
        body_var => ctx.request_body_model.as_ref().map(|_| crate::type_mapper::REQUEST_BODY_ARG),
        return_annotation => ctx.success_response.annotation(),
        response_kind => response_kind(&ctx.success_response),
    }
}

/// Render `models/api_models.py`. Enums and classes keep declaration order;
/// aliases come last so they can name any class.
pub fn emit_models(cx: &EmitContext<'_>) -> Result<String, GeneratorError> {
    let mut declared = Vec::new();
    let mut aliases = Vec::new();

    for (name, schema) in cx.api.schemas() {
        let name = model_class_name(name);
        match schema {
            SchemaOrRef::Schema(inner) if is_string_enum(inner) => {
                declared.push(enum_ctx(&name, inner))
            }
            SchemaOrRef::Schema(inner) if !inner.properties.is_empty() => {
                declared.push(object_ctx(&name, inner))
            }
            _ => aliases.push(context! {
                kind => "alias",
                name => name,
                target => e2egen_core::api::type_hint::schema_type_hint(schema),
            }),
        }
    }
    declared.extend(aliases);

    cx.templates.render(
        "models.py.j2",
        context! {
            header => cx.header(false)?,
            schemas => declared,
        },
    )
}

fn is_string_enum(schema: &Schema) -> bool {
    !schema.enum_values.is_empty() && schema.enum_values.iter().all(|v| v.is_string())
}

fn enum_ctx(name: &str, schema: &Schema) -> minijinja::Value {
    let mut taken: Vec<String> = Vec::new();
    let mut variants = Vec::new();
    for value in schema.enum_values.iter().filter_map(|v| v.as_str()) {
        let member = enum_member_name(value, &taken);
        variants.push(context! {
            name => member.clone(),
            value => python_string_literal(value),
        });
        taken.push(member);
    }
    context! {
        kind => "enum",
        name => name,
        variants => variants,
    }
}

fn object_ctx(name: &str, schema: &Schema) -> minijinja::Value {
    let fields: Vec<String> = schema
        .properties
        .iter()
        .map(|(prop, prop_schema)| model_field(prop, prop_schema, schema.required.contains(prop)))
        .collect();
    context! {
        kind => "object",
        name => name,
        fields => fields,
    }
}
