use minijinja::{Environment, Value, context};

use e2egen_core::GeneratorError;

const TEMPLATES: &[(&str, &str)] = &[
    ("header.py.j2", include_str!("../templates/header.py.j2")),
    ("api.py.j2", include_str!("../templates/api.py.j2")),
    ("models.py.j2", include_str!("../templates/models.py.j2")),
    ("client.py.j2", include_str!("../templates/client.py.j2")),
    ("fixture_base.py.j2", include_str!("../templates/fixture_base.py.j2")),
    ("fixture_v1.py.j2", include_str!("../templates/fixture_v1.py.j2")),
    ("fixture_v2.py.j2", include_str!("../templates/fixture_v2.py.j2")),
    ("conftest.py.j2", include_str!("../templates/conftest.py.j2")),
    ("settings.py.j2", include_str!("../templates/settings.py.j2")),
    ("settings_field.py.j2", include_str!("../templates/settings_field.py.j2")),
    ("test_v1.py.j2", include_str!("../templates/test_v1.py.j2")),
    ("test_v2.py.j2", include_str!("../templates/test_v2.py.j2")),
    ("readme.md.j2", include_str!("../templates/readme.md.j2")),
];

/// The bundled templates, compiled once per run.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, GeneratorError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source).map_err(template_error)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String, GeneratorError> {
        self.env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(template_error)
    }

    /// Header comment placed at the top of every generated Python file.
    /// Always ends with one blank line.
    pub fn header(
        &self,
        service_name: Option<&str>,
        can_edit: bool,
    ) -> Result<String, GeneratorError> {
        let text = self.render(
            "header.py.j2",
            context! {
                version => env!("CARGO_PKG_VERSION"),
                service_name => service_name,
                can_edit => can_edit,
            },
        )?;
        Ok(format!("{}\n\n", text.trim_end()))
    }
}

fn template_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Template(format!("{err:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_ends_with_blank_line() {
        let templates = Templates::new().unwrap();
        let header = templates.header(Some("billing"), false).unwrap();
        assert!(header.starts_with("# Generated by e2egen"));
        assert!(header.contains("for billing."));
        assert!(header.contains("Do not edit"));
        assert!(header.ends_with("\n\n"));
        assert!(!header.ends_with("\n\n\n"));

        let editable = templates.header(None, true).unwrap();
        assert!(editable.contains("edit freely"));
        assert!(!editable.contains(" for "));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let templates = Templates::new().unwrap();
        let err = templates.render("missing.j2", context! {}).unwrap_err();
        assert!(matches!(err, GeneratorError::Template(_)));
    }
}
