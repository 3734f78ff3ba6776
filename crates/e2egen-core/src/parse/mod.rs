pub mod operation;
pub mod parameter;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse a document whose format is guessed from an optional file extension,
/// falling back to sniffing the first non-whitespace character.
pub fn from_source_text(input: &str, extension: Option<&str>) -> Result<OpenApiSpec, ParseError> {
    let looks_like_json = match extension {
        Some(ext) => ext.eq_ignore_ascii_case("json"),
        None => input.trim_start().starts_with('{'),
    };
    if looks_like_json {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
