use serde::Serialize;

use crate::error::ContextError;
use crate::naming::{model_class_name, python_identifier};
use crate::parse::operation::{RequestBodyOrRef, ResponseOrRef, preferred_media_type};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::Components;

use super::ApiOperation;
use super::type_hint::{optional_hint, schema_type_hint};

/// What the success response of an operation deserializes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum ResponseModel {
    /// A named component model.
    Typed(String),
    /// A body without a named model; the raw response is returned.
    Untyped,
    /// No body at all.
    Empty,
}

impl ResponseModel {
    pub fn model_name(&self) -> Option<&str> {
        match self {
            ResponseModel::Typed(name) => Some(name),
            _ => None,
        }
    }

    /// Python return annotation used by generated client methods.
    pub fn annotation(&self) -> &str {
        match self {
            ResponseModel::Typed(name) => name,
            ResponseModel::Untyped => "Response",
            ResponseModel::Empty => "None",
        }
    }
}

/// One parameter as seen by templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamContext {
    /// Python identifier.
    pub python_name: String,
    /// Name on the wire.
    pub original_name: String,
    /// Python type annotation, `| None` included for optional parameters.
    pub python_type: String,
    pub required: bool,
}

/// Parameters partitioned by location. Cookie parameters are not carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationParameters {
    pub path: Vec<ParamContext>,
    pub query: Vec<ParamContext>,
    pub header: Vec<ParamContext>,
}

impl OperationParameters {
    /// All parameters in path, query, header order, tagged with location.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamContext)> {
        let path = self.path.iter().map(|p| ("path", p));
        let query = self.query.iter().map(|p| ("query", p));
        let header = self.header.iter().map(|p| ("header", p));
        path.chain(query).chain(header)
    }
}

/// Render-ready view of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationContext {
    /// Lowercase HTTP method.
    pub method: String,
    pub path: String,
    pub summary: Option<String>,
    pub request_body_model: Option<String>,
    pub request_body_required: bool,
    pub success_response: ResponseModel,
    pub parameters: OperationParameters,
}

impl OperationContext {
    /// Models a test or client method needs to import, sorted and unique.
    pub fn referenced_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self
            .request_body_model
            .iter()
            .cloned()
            .chain(self.success_response.model_name().map(str::to_string))
            .collect();
        models.sort();
        models.dedup();
        models
    }
}

pub(crate) fn build(
    op: &ApiOperation,
    components: &Components,
) -> Result<OperationContext, ContextError> {
    if !op.path.starts_with('/') {
        return Err(ContextError::InvalidPath(op.path.clone()));
    }

    let parameters = resolve_parameters(op, components)?;
    check_path_placeholders(&op.path, &parameters)?;

    let (request_body_model, request_body_required) = match &op.operation.request_body {
        Some(body) => resolve_request_body(body, components)?,
        None => (None, false),
    };

    Ok(OperationContext {
        method: op.method.to_string(),
        path: op.path.clone(),
        summary: op.summary.clone(),
        request_body_model,
        request_body_required,
        success_response: resolve_success_response(op, components)?,
        parameters,
    })
}

fn resolve_parameters(
    op: &ApiOperation,
    components: &Components,
) -> Result<OperationParameters, ContextError> {
    // Operation-level parameters override path-level ones with the same name and location.
    let mut merged: Vec<&Parameter> = Vec::new();
    for param in op.path_parameters.iter().chain(op.operation.parameters.iter()) {
        let param = resolve_parameter(param, components)?;
        merged.retain(|p| !(p.name == param.name && p.location == param.location));
        merged.push(param);
    }

    let mut out = OperationParameters::default();
    for param in merged {
        let base = param
            .schema
            .as_ref()
            .map(schema_type_hint)
            .unwrap_or_else(|| "Any".to_string());
        // Path parameters are always required, whatever the document says.
        let required = param.required || param.location == ParameterLocation::Path;
        let ctx = ParamContext {
            python_name: python_identifier(&param.name),
            original_name: param.name.clone(),
            python_type: if required { base } else { optional_hint(&base) },
            required,
        };
        match param.location {
            ParameterLocation::Path => out.path.push(ctx),
            ParameterLocation::Query => out.query.push(ctx),
            ParameterLocation::Header => out.header.push(ctx),
            ParameterLocation::Cookie => {}
        }
    }
    Ok(out)
}

fn resolve_parameter<'a>(
    param: &'a ParameterOrRef,
    components: &'a Components,
) -> Result<&'a Parameter, ContextError> {
    let mut current = param;
    // Bounded so that a reference cycle cannot loop forever.
    for _ in 0..8 {
        match current {
            ParameterOrRef::Parameter(p) => return Ok(p),
            ParameterOrRef::Ref { ref_path } => {
                current = ref_path
                    .strip_prefix("#/components/parameters/")
                    .and_then(|name| components.parameters.get(name))
                    .ok_or_else(|| ContextError::UnresolvedRef(ref_path.clone()))?;
            }
        }
    }
    Err(ContextError::UnresolvedRef(describe_ref(param)))
}

fn resolve_request_body(
    body: &RequestBodyOrRef,
    components: &Components,
) -> Result<(Option<String>, bool), ContextError> {
    let mut current = body;
    for _ in 0..8 {
        match current {
            RequestBodyOrRef::RequestBody(rb) => {
                let schema = preferred_media_type(&rb.content).and_then(|mt| mt.schema.as_ref());
                return Ok((referenced_model(schema, components)?, rb.required));
            }
            RequestBodyOrRef::Ref { ref_path } => {
                current = ref_path
                    .strip_prefix("#/components/requestBodies/")
                    .and_then(|name| components.request_bodies.get(name))
                    .ok_or_else(|| ContextError::UnresolvedRef(ref_path.clone()))?;
            }
        }
    }
    Err(ContextError::UnresolvedRef("request body reference cycle".to_string()))
}

fn resolve_success_response(
    op: &ApiOperation,
    components: &Components,
) -> Result<ResponseModel, ContextError> {
    let responses = &op.operation.responses;
    let success = responses
        .iter()
        .find(|(status, _)| status.starts_with('2'))
        .or_else(|| responses.get_key_value("default"))
        .map(|(_, response)| response);

    let Some(mut current) = success else {
        return Ok(ResponseModel::Empty);
    };
    for _ in 0..8 {
        match current {
            ResponseOrRef::Response(response) => {
                let Some(media) = preferred_media_type(&response.content) else {
                    return Ok(ResponseModel::Empty);
                };
                return Ok(match referenced_model(media.schema.as_ref(), components)? {
                    Some(model) => ResponseModel::Typed(model),
                    None => ResponseModel::Untyped,
                });
            }
            ResponseOrRef::Ref { ref_path } => {
                current = ref_path
                    .strip_prefix("#/components/responses/")
                    .and_then(|name| components.responses.get(name))
                    .ok_or_else(|| ContextError::UnresolvedRef(ref_path.clone()))?;
            }
        }
    }
    Err(ContextError::UnresolvedRef("response reference cycle".to_string()))
}

/// Class name of the component schema `schema` points at. A reference to a
/// schema the document does not declare is an error, since no model class
/// would be generated for it.
fn referenced_model(
    schema: Option<&SchemaOrRef>,
    components: &Components,
) -> Result<Option<String>, ContextError> {
    let Some(name) = schema.and_then(SchemaOrRef::component_name) else {
        return Ok(None);
    };
    if !components.schemas.contains_key(name) {
        return Err(ContextError::UnresolvedRef(format!("#/components/schemas/{name}")));
    }
    Ok(Some(model_class_name(name)))
}

fn check_path_placeholders(
    path: &str,
    parameters: &OperationParameters,
) -> Result<(), ContextError> {
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            return Err(ContextError::InvalidPath(path.to_string()));
        };
        let placeholder = &after[..end];
        if !parameters.path.iter().any(|p| p.original_name == placeholder) {
            return Err(ContextError::UndeclaredPathParam {
                path: path.to_string(),
                placeholder: placeholder.to_string(),
            });
        }
        rest = &after[end + 1..];
    }
    Ok(())
}

fn describe_ref(param: &ParameterOrRef) -> String {
    match param {
        ParameterOrRef::Ref { ref_path } => ref_path.clone(),
        ParameterOrRef::Parameter(p) => p.name.clone(),
    }
}
