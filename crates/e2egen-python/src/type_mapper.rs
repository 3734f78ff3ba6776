use heck::ToShoutySnakeCase;

use e2egen_core::api::type_hint::{optional_hint, schema_type_hint};
use e2egen_core::api::{OperationContext, ResponseModel};
use e2egen_core::naming::python_identifier;
use e2egen_core::parse::schema::SchemaOrRef;

/// Keyword argument carrying the request body of a client method.
pub const REQUEST_BODY_ARG: &str = "request_body";

/// A Python string literal for `value`.
///
/// JSON string escaping is a subset of what Python accepts.
pub fn python_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Declaration of one pydantic model field, aliased when the wire name is
/// not a usable Python identifier.
pub fn model_field(original_name: &str, schema: &SchemaOrRef, required: bool) -> String {
    let name = python_identifier(original_name);
    let hint = schema_type_hint(schema);
    let hint = if required { hint } else { optional_hint(&hint) };
    let alias = python_string_literal(original_name);

    match (name == original_name, required) {
        (true, true) => format!("{name}: {hint}"),
        (true, false) => format!("{name}: {hint} = None"),
        (false, true) => format!("{name}: {hint} = Field(alias={alias})"),
        (false, false) => format!("{name}: {hint} = Field(default=None, alias={alias})"),
    }
}

/// Member name of a string enum value, unique within `taken`.
pub fn enum_member_name(value: &str, taken: &[String]) -> String {
    let mut base = value.to_shouty_snake_case();
    if base.is_empty() {
        base.push_str("VALUE");
    }
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }
    let mut name = base.clone();
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{base}_{n}");
        n += 1;
    }
    name
}

/// Keyword-only arguments of a client method: parameters in path, query,
/// header order, then the request body.
pub fn method_arguments(ctx: &OperationContext) -> Vec<String> {
    let mut args: Vec<String> = ctx
        .parameters
        .iter()
        .map(|(_, p)| {
            if p.required {
                format!("{}: {}", p.python_name, p.python_type)
            } else {
                format!("{}: {} = None", p.python_name, p.python_type)
            }
        })
        .collect();

    if let Some(model) = &ctx.request_body_model {
        args.push(if ctx.request_body_required {
            format!("{REQUEST_BODY_ARG}: {model}")
        } else {
            format!("{REQUEST_BODY_ARG}: {} = None", optional_hint(model))
        });
    }
    args
}

/// `name=name` pairs forwarding every argument of [`method_arguments`].
pub fn call_arguments(ctx: &OperationContext) -> Vec<String> {
    let mut args: Vec<String> = ctx
        .parameters
        .iter()
        .map(|(_, p)| format!("{0}={0}", p.python_name))
        .collect();
    if ctx.request_body_model.is_some() {
        args.push(format!("{REQUEST_BODY_ARG}={REQUEST_BODY_ARG}"));
    }
    args
}

/// The path as a Python f-string body, placeholders renamed to their
/// Python argument names.
pub fn path_template(ctx: &OperationContext) -> String {
    ctx.parameters
        .path
        .iter()
        .fold(ctx.path.clone(), |path, p| {
            path.replace(
                &format!("{{{}}}", p.original_name),
                &format!("{{{}}}", p.python_name),
            )
        })
}

/// Template-facing name of a response kind.
pub fn response_kind(response: &ResponseModel) -> &'static str {
    match response {
        ResponseModel::Typed(_) => "typed",
        ResponseModel::Untyped => "untyped",
        ResponseModel::Empty => "empty",
    }
}

/// First line of a summary, safe inside a triple-quoted docstring.
pub fn docstring_line(summary: &str) -> String {
    summary
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"")
}
