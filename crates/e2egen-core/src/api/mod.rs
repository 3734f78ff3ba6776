//! The parsed API description consumed by the synthesis layer.

pub mod context;
pub mod type_hint;

use indexmap::IndexMap;

use crate::error::ContextError;
use crate::parse::operation::Operation;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::{Components, OpenApiSpec};

pub use context::{OperationContext, OperationParameters, ParamContext, ResponseModel};

/// Stable identity of an operation within one [`ParsedApi`].
///
/// Two operations are the same only when their handles are equal; structurally
/// identical operations declared twice keep distinct handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub(crate) usize);

impl OperationId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One HTTP endpoint + method, as declared in the document.
#[derive(Debug, Clone)]
pub struct ApiOperation {
    pub id: OperationId,
    /// Lowercase HTTP method.
    pub method: &'static str,
    pub path: String,
    pub tags: Vec<String>,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub deprecated: bool,
    pub(crate) path_parameters: Vec<ParameterOrRef>,
    pub(crate) operation: Operation,
}

/// The view of an API description the grouping algorithm needs.
pub trait ApiDescription {
    /// Declared tag names, in order.
    fn apis(&self) -> Vec<String>;

    /// Every operation, in document order.
    fn operation_ids(&self) -> Vec<OperationId>;

    /// Operations reachable through one tag, in document order.
    fn handlers_by_tag(&self, tag: &str) -> Vec<OperationId>;
}

/// A service's API description, flattened for generation.
#[derive(Debug, Clone)]
pub struct ParsedApi {
    service_name: String,
    title: String,
    version: String,
    apis: Vec<String>,
    operations: Vec<ApiOperation>,
    components: Components,
}

impl ParsedApi {
    /// Flatten a parsed document. Tags declared at the top level come first in
    /// declaration order, then tags only used by operations in first-use order.
    pub fn from_spec(service_name: impl Into<String>, spec: &OpenApiSpec) -> Self {
        let mut operations = Vec::new();
        for (path, item) in &spec.paths {
            for (method, op) in item.operations() {
                operations.push(ApiOperation {
                    id: OperationId(operations.len()),
                    method,
                    path: path.clone(),
                    tags: op.tags.clone(),
                    operation_id: op.operation_id.clone(),
                    summary: op.summary.clone(),
                    deprecated: op.deprecated,
                    path_parameters: item.parameters.clone(),
                    operation: op.clone(),
                });
            }
        }

        let mut apis: Vec<String> = Vec::new();
        let declared = spec.tags.iter().map(|t| &t.name);
        let used = operations.iter().flat_map(|op| op.tags.iter());
        for tag in declared.chain(used) {
            if !apis.contains(tag) {
                apis.push(tag.clone());
            }
        }

        log::debug!(
            "flattened {} operations across {} tags for {}",
            operations.len(),
            apis.len(),
            spec.info.title
        );

        Self {
            service_name: service_name.into(),
            title: spec.info.title.clone(),
            version: spec.info.version.clone(),
            apis,
            operations,
            components: spec.components.clone().unwrap_or_default(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn operations(&self) -> &[ApiOperation] {
        &self.operations
    }

    pub fn operation(&self, id: OperationId) -> &ApiOperation {
        &self.operations[id.0]
    }

    /// Component schemas, in declaration order.
    pub fn schemas(&self) -> &IndexMap<String, SchemaOrRef> {
        &self.components.schemas
    }

    /// Derive the render context of one operation.
    pub fn get_operation_context(&self, id: OperationId) -> Result<OperationContext, ContextError> {
        context::build(self.operation(id), &self.components)
    }
}

impl ApiDescription for ParsedApi {
    fn apis(&self) -> Vec<String> {
        self.apis.clone()
    }

    fn operation_ids(&self) -> Vec<OperationId> {
        self.operations.iter().map(|op| op.id).collect()
    }

    fn handlers_by_tag(&self, tag: &str) -> Vec<OperationId> {
        self.operations
            .iter()
            .filter(|op| op.tags.iter().any(|t| t == tag))
            .map(|op| op.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SPEC: &str = r#"
openapi: 3.0.3
info:
  title: Shop
  version: "2.1"
tags:
  - name: Orders
  - name: Archive
paths:
  /orders:
    get:
      tags: [Orders]
    post:
      tags: [Orders, Audit]
  /health:
    get: {}
"#;

    #[test]
    fn test_flatten_order_and_tags() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let api = ParsedApi::from_spec("shop", &spec);

        let flat: Vec<_> = api
            .operations()
            .iter()
            .map(|op| format!("{} {}", op.method, op.path))
            .collect();
        assert_eq!(flat, ["get /orders", "post /orders", "get /health"]);
        assert_eq!(api.apis(), ["Orders", "Archive", "Audit"]);
        assert_eq!(api.handlers_by_tag("Orders").len(), 2);
        assert!(api.handlers_by_tag("Archive").is_empty());
        assert_eq!(api.version(), "2.1");
    }
}
