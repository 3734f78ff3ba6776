//! Canonical names shared by every emitter.
//!
//! Everything here is a pure function of its arguments. Client, fixture and
//! test generation may run in separate invocations and still have to agree on
//! module and class names, so no function in this module may consult state.

use heck::{ToSnakeCase, ToUpperCamelCase};

use crate::api::OperationContext;
use crate::grouping::GroupName;

/// Module name used for operations that belong to no tag.
pub const DEFAULT_MODULE: &str = "default";

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Canonicalize any mixed-case or delimited identifier to `lower_snake_case`.
///
/// Idempotent: `to_snake(&to_snake(x)) == to_snake(x)`.
pub fn to_snake(identifier: &str) -> String {
    sanitize(identifier).to_snake_case()
}

/// `UpperCamelCase` form of a snake-case name, used for class names.
pub fn to_camel(snake: &str) -> String {
    sanitize(snake).to_upper_camel_case()
}

/// Python module name for an API group.
pub fn module_name(group: &GroupName) -> String {
    match group {
        GroupName::Named(tag) => to_snake(tag),
        GroupName::Untagged => DEFAULT_MODULE.to_string(),
    }
}

/// Thin client class name for an API group, e.g. `OrdersClient`.
pub fn client_class_name(group: &GroupName) -> String {
    format!("{}Client", to_camel(&module_name(group)))
}

/// Low-level API class name for an API group, e.g. `OrdersApi`.
pub fn api_class_name(group: &GroupName) -> String {
    format!("{}Api", to_camel(&module_name(group)))
}

/// Per-API pytest fixture name, e.g. `orders_client`.
pub fn client_fixture_name(group: &GroupName) -> String {
    format!("{}_client", module_name(group))
}

/// Snake-case module name of a service.
pub fn service_module(service: &str) -> String {
    to_snake(service)
}

/// Service-object class name, e.g. `BillingServiceService`.
pub fn service_class_name(service: &str) -> String {
    let mut class = format!("{}Service", to_camel(&to_snake(service)));
    if class.starts_with(|c: char| c.is_ascii_digit()) {
        class.insert(0, '_');
    }
    class
}

/// Fixture (and module) name of the service object. The `_service` suffix is
/// not repeated when the service module already carries it.
pub fn service_fixture_name(service: &str) -> String {
    let module = service_module(service);
    if module == "service" || module.ends_with("_service") {
        python_identifier(&module)
    } else {
        python_identifier(&format!("{module}_service"))
    }
}

/// Attribute of the settings class holding a service's base URL.
pub fn settings_field_name(service: &str) -> String {
    python_identifier(&service_module(service))
}

/// Environment variable holding the base URL of a service.
pub fn service_env_var(service: &str) -> String {
    format!("{}_BASE_URL", service_module(service).to_uppercase())
}

/// Method name of an operation: `{method}_{snake(path)}`, trimmed of
/// underscores.
pub fn method_name(context: &OperationContext) -> String {
    method_name_for(&context.method, &context.path)
}

/// [`method_name`] from raw parts.
pub fn method_name_for(method: &str, path: &str) -> String {
    format!("{}_{}", method.to_lowercase(), to_snake(path))
        .trim_matches('_')
        .to_string()
}

/// Python class name of a component schema. Names that are already valid
/// identifiers are kept verbatim so they match the schema as written.
pub fn model_class_name(schema_name: &str) -> String {
    let valid = schema_name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && schema_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        schema_name.to_string()
    } else {
        to_camel(schema_name)
    }
}

/// A snake-case identifier that is safe to use as a Python name.
pub fn python_identifier(name: &str) -> String {
    let mut ident = to_snake(name);
    if ident.is_empty() {
        ident.push_str("value");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Dotted Python import path for a relative directory, skipping `.` parts.
pub fn import_path(path: &std::path::Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Replace every run of non-alphanumeric characters with one underscore.
fn sanitize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_variants() {
        assert_eq!(to_snake("Billing Service"), "billing_service");
        assert_eq!(to_snake("userAccounts"), "user_accounts");
        assert_eq!(to_snake("pet-store"), "pet_store");
        assert_eq!(to_snake("/orders/{orderId}/items"), "orders_order_id_items");
        assert_eq!(to_snake("HTTPStatus"), "http_status");
    }

    #[test]
    fn test_to_snake_is_idempotent() {
        for input in [
            "Billing Service",
            "/v1/orders/{orderId}",
            "HTTPStatus",
            "already_snake",
            "3dModel",
            "Ünïcode Tag",
            "__dunder__",
        ] {
            let once = to_snake(input);
            assert_eq!(to_snake(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_to_camel() {
        assert_eq!(to_camel("billing_service"), "BillingService");
        assert_eq!(to_camel("default"), "Default");
    }

    #[test]
    fn test_group_names() {
        let orders = GroupName::Named("Orders".to_string());
        assert_eq!(module_name(&orders), "orders");
        assert_eq!(client_class_name(&orders), "OrdersClient");
        assert_eq!(api_class_name(&orders), "OrdersApi");
        assert_eq!(client_fixture_name(&orders), "orders_client");

        assert_eq!(module_name(&GroupName::Untagged), "default");
        assert_eq!(client_class_name(&GroupName::Untagged), "DefaultClient");
        assert_eq!(client_fixture_name(&GroupName::Untagged), "default_client");
    }

    #[test]
    fn test_client_class_depends_on_tag_only() {
        let a = client_class_name(&GroupName::Named("User Accounts".to_string()));
        let b = client_class_name(&GroupName::Named("User Accounts".to_string()));
        assert_eq!(a, b);
        assert_eq!(a, "UserAccountsClient");
    }

    #[test]
    fn test_service_names() {
        assert_eq!(service_module("Billing Service"), "billing_service");
        assert_eq!(service_class_name("Billing Service"), "BillingServiceService");
        assert_eq!(service_fixture_name("Billing Service"), "billing_service");
        assert_eq!(service_fixture_name("billing"), "billing_service");
        assert_eq!(service_env_var("Billing Service"), "BILLING_SERVICE_BASE_URL");
        assert_eq!(settings_field_name("Billing Service"), "billing_service");
    }

    #[test]
    fn test_service_names_are_python_identifiers() {
        assert_eq!(service_module("3d printing"), "3d_printing");
        assert_eq!(settings_field_name("3d printing"), "_3d_printing");
        assert_eq!(settings_field_name("import"), "import_");
        assert_eq!(service_fixture_name("3d printing"), "_3d_printing_service");
        assert_eq!(service_class_name("3d printing"), "_3dPrintingService");
        assert_eq!(service_env_var("3d printing"), "3D_PRINTING_BASE_URL");
    }

    #[test]
    fn test_method_name() {
        assert_eq!(method_name_for("GET", "/status"), "get_status");
        assert_eq!(method_name_for("get", "/Status"), "get_status");
        assert_eq!(method_name_for("post", "/orders/{orderId}"), "post_orders_order_id");
        assert_eq!(method_name_for("get", "/"), "get");
    }

    #[test]
    fn test_python_identifier() {
        assert_eq!(python_identifier("X-Request-Id"), "x_request_id");
        assert_eq!(python_identifier("from"), "from_");
        assert_eq!(python_identifier("2fa"), "_2fa");
    }

    #[test]
    fn test_model_class_name() {
        assert_eq!(model_class_name("HTTPError"), "HTTPError");
        assert_eq!(model_class_name("order-item"), "OrderItem");
    }

    #[test]
    fn test_import_path() {
        let path = std::path::Path::new("./internal/clients/http");
        assert_eq!(import_path(path), "internal.clients.http");
    }
}
