//! Structural insertion of one field into an existing settings module.
//!
//! The module is parsed with tree-sitter. Only a file that parses cleanly and
//! declares a top-level `class Settings` with an indented body is touched.
//! Everything else, including fields added by hand, is kept byte for byte.

use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Name of the settings class fields are merged into.
pub const SETTINGS_CLASS: &str = "Settings";

/// Indentation used when the class body gives no better hint.
pub const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The class already assigns the field; nothing to do.
    AlreadyPresent,
    /// The full new file content.
    Inserted(String),
    /// The file was not recognized and must be left alone.
    Unrecognized(Unrecognized),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unrecognized {
    #[error("file is not valid Python")]
    Unparseable,

    #[error("no top-level class Settings")]
    MissingClass,

    /// `class Settings: ...` with its body on the header line.
    #[error("class Settings has no indented body")]
    InlineBody,

    #[error("the field declaration would not parse inside class Settings")]
    InvalidDeclaration,
}

/// Insert the declaration returned by `render` as a new last statement of the
/// settings class, unless a statement of the class already assigns `field`.
///
/// `render` is only called when an insertion happens. The declaration is
/// indented like the existing fields of the class.
pub fn merge_field<F, E>(source: &str, field: &str, render: F) -> Result<MergeOutcome, E>
where
    F: FnOnce() -> Result<String, E>,
{
    let Some(tree) = parse_python(source) else {
        return Ok(MergeOutcome::Unrecognized(Unrecognized::Unparseable));
    };
    let Some(class) = find_settings_class(tree.root_node(), source) else {
        return Ok(MergeOutcome::Unrecognized(Unrecognized::MissingClass));
    };
    let Some(body) = class.child_by_field_name("body") else {
        return Ok(MergeOutcome::Unrecognized(Unrecognized::MissingClass));
    };
    if body.start_position().row == class.start_position().row {
        return Ok(MergeOutcome::Unrecognized(Unrecognized::InlineBody));
    }

    let statements = body_statements(body);
    if statements.iter().any(|s| assigned_name(*s, source) == Some(field)) {
        return Ok(MergeOutcome::AlreadyPresent);
    }
    let Some(last) = statements.last() else {
        return Ok(MergeOutcome::Unrecognized(Unrecognized::InlineBody));
    };

    let indent = detect_indent(&statements, source);
    let declaration = render()?;
    let offset = insertion_offset(source, last.end_byte());

    let mut merged = String::with_capacity(source.len() + declaration.len() + indent.len() + 2);
    merged.push_str(&source[..offset]);
    if !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(indent);
    merged.push_str(declaration.trim());
    merged.push('\n');
    merged.push_str(&source[offset..]);

    // Never hand back a file that no longer parses.
    if parse_python(&merged).is_none() {
        return Ok(MergeOutcome::Unrecognized(Unrecognized::InvalidDeclaration));
    }
    Ok(MergeOutcome::Inserted(merged))
}

/// A syntax tree of `source`, or `None` when it contains any syntax error.
fn parse_python(source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
        log::error!("cannot load the Python grammar: {err}");
        return None;
    }
    let tree = parser.parse(source, None)?;
    if tree.root_node().has_error() {
        None
    } else {
        Some(tree)
    }
}

fn find_settings_class<'t>(root: Node<'t>, source: &str) -> Option<Node<'t>> {
    let mut cursor = root.walk();
    let candidates: Vec<Node<'t>> = root
        .named_children(&mut cursor)
        .filter_map(|node| match node.kind() {
            "class_definition" => Some(node),
            "decorated_definition" => node
                .child_by_field_name("definition")
                .filter(|def| def.kind() == "class_definition"),
            _ => None,
        })
        .collect();

    candidates.into_iter().find(|class| {
        class
            .child_by_field_name("name")
            .and_then(|name| name.utf8_text(source.as_bytes()).ok())
            == Some(SETTINGS_CLASS)
    })
}

fn body_statements(body: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|node| node.kind() != "comment")
        .collect()
}

/// Name bound by a plain or annotated assignment statement.
fn assigned_name<'s>(statement: Node<'_>, source: &'s str) -> Option<&'s str> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let assignment = statement
        .named_child(0)
        .filter(|node| node.kind() == "assignment")?;
    let left = assignment
        .child_by_field_name("left")
        .filter(|node| node.kind() == "identifier")?;
    left.utf8_text(source.as_bytes()).ok()
}

/// Leading whitespace of the first field, falling back to the first
/// statement of any kind, then to [`DEFAULT_INDENT`].
fn detect_indent<'s>(statements: &[Node<'_>], source: &'s str) -> &'s str {
    let anchor = statements
        .iter()
        .find(|s| assigned_name(**s, source).is_some())
        .or_else(|| statements.first());
    let Some(anchor) = anchor else {
        return DEFAULT_INDENT;
    };

    let start = anchor.start_byte();
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..start];
    if !prefix.is_empty() && prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        DEFAULT_INDENT
    }
}

/// Start of the line following the one a statement ends on. Trailing
/// whitespace a block node may span is not part of the statement.
fn insertion_offset(source: &str, end: usize) -> usize {
    let end = source[..end].trim_end().len();
    source[end..].find('\n').map_or(source.len(), |i| end + i + 1)
}
