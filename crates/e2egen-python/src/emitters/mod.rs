pub mod clients;
pub mod conftest;
pub mod fixtures;
pub mod low_level;
pub mod readme;
pub mod settings;

use std::collections::HashSet;

use e2egen_core::api::{OperationContext, ParsedApi};
use e2egen_core::error::{ContextError, GeneratorError};
use e2egen_core::grouping::{ApiGroup, GroupName, group_operations};
use e2egen_core::naming::{method_name_for, module_name, python_identifier};

use crate::generator::GenerateOptions;
use crate::layout::Layout;
use crate::templates::Templates;

/// Everything an emitter needs, computed once per run. All emitters observe
/// the same grouping.
pub struct EmitContext<'a> {
    pub api: &'a ParsedApi,
    pub options: &'a GenerateOptions,
    pub layout: Layout,
    pub templates: Templates,
    pub groups: Vec<ApiGroup>,
}

impl<'a> EmitContext<'a> {
    pub fn new(api: &'a ParsedApi, options: &'a GenerateOptions) -> Result<Self, GeneratorError> {
        Ok(Self {
            api,
            options,
            layout: Layout::new(api.service_name(), &options.paths),
            templates: Templates::new()?,
            groups: group_operations(api),
        })
    }

    pub fn non_empty_groups(&self) -> impl Iterator<Item = &ApiGroup> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    pub fn header(&self, can_edit: bool) -> Result<String, GeneratorError> {
        self.templates.header(Some(self.api.service_name()), can_edit)
    }
}

/// Attribute of the service object holding one group's client.
pub fn api_attribute(group: &GroupName) -> String {
    python_identifier(&module_name(group))
}

/// One operation of a group, as the emitters see it.
pub enum Resolved {
    Operation {
        method_name: String,
        context: OperationContext,
    },
    /// Its context could not be derived.
    Incomplete {
        method_name: String,
        error: ContextError,
    },
    /// An earlier operation of the group already uses this method name.
    Duplicate { method_name: String },
}

/// Derive the context of every operation in `group`, in group order. The
/// first operation to produce a method name keeps it.
pub fn resolve_group(api: &ParsedApi, group: &ApiGroup) -> Vec<Resolved> {
    let mut seen = HashSet::new();
    group
        .operations
        .iter()
        .map(|&id| {
            let op = api.operation(id);
            let method_name = method_name_for(op.method, &op.path);
            if !seen.insert(method_name.clone()) {
                return Resolved::Duplicate { method_name };
            }
            match api.get_operation_context(id) {
                Ok(context) => Resolved::Operation {
                    method_name,
                    context,
                },
                Err(error) => Resolved::Incomplete { method_name, error },
            }
        })
        .collect()
}
