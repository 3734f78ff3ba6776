use crate::naming::model_class_name;
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType};

/// Map a schema to its Python type annotation.
pub fn schema_type_hint(schema: &SchemaOrRef) -> String {
    match schema {
        SchemaOrRef::Ref { ref_path } => match schema.component_name() {
            Some(name) => model_class_name(name),
            None => {
                log::debug!("non-component reference {ref_path} mapped to Any");
                "Any".to_string()
            }
        },
        SchemaOrRef::Schema(inner) => inline_type_hint(inner),
    }
}

fn inline_type_hint(schema: &Schema) -> String {
    let (primary, null_listed) = schema
        .schema_type
        .as_ref()
        .map(|t| t.primary())
        .unwrap_or((None, false));
    let nullable = null_listed || schema.nullable.unwrap_or(false);

    let base = match primary {
        Some(SchemaType::String) => match schema.format.as_deref() {
            Some("binary") => "bytes".to_string(),
            _ => "str".to_string(),
        },
        Some(SchemaType::Integer) => "int".to_string(),
        Some(SchemaType::Number) => "float".to_string(),
        Some(SchemaType::Boolean) => "bool".to_string(),
        Some(SchemaType::Null) => "None".to_string(),
        Some(SchemaType::Array) => match &schema.items {
            Some(items) => format!("list[{}]", schema_type_hint(items)),
            None => "list[Any]".to_string(),
        },
        Some(SchemaType::Object) => object_hint(schema),
        None => composition_hint(schema),
    };

    if nullable { optional_hint(&base) } else { base }
}

fn object_hint(schema: &Schema) -> String {
    match &schema.additional_properties {
        Some(AdditionalProperties::Schema(values)) => {
            format!("dict[str, {}]", schema_type_hint(values))
        }
        _ => "dict[str, Any]".to_string(),
    }
}

fn composition_hint(schema: &Schema) -> String {
    let variants = if !schema.one_of.is_empty() {
        &schema.one_of
    } else if !schema.any_of.is_empty() {
        &schema.any_of
    } else if schema.all_of.len() == 1 {
        &schema.all_of
    } else if !schema.properties.is_empty() {
        return "dict[str, Any]".to_string();
    } else {
        return "Any".to_string();
    };

    let mut hints: Vec<String> = Vec::new();
    for hint in variants.iter().map(schema_type_hint) {
        if !hints.contains(&hint) {
            hints.push(hint);
        }
    }
    hints.join(" | ")
}

/// `T | None`, without doubling an existing `None` alternative.
pub fn optional_hint(hint: &str) -> String {
    if hint == "Any" || hint == "None" || hint.split(" | ").any(|part| part == "None") {
        hint.to_string()
    } else {
        format!("{hint} | None")
    }
}
