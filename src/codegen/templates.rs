//! Template loading and rendering
//!
//! The Kotlin sources are produced from Tera templates embedded in the
//! binary. Identifier variants (`upper_first`, `upper_snake`) and KDoc
//! blocks are computed by filters at render time, so the contexts only carry
//! the declared names and raw comments.

use crate::comments::format_kdoc;
use crate::naming::{upper_first, upper_snake};
use crate::GeneratorError;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Template for the shared coroutine adapters file
pub const ADAPTERS_TEMPLATE: &str = "Adapters.kt";

/// Template for a service's abstract server base class
pub const IMPL_BASE_TEMPLATE: &str = "ImplBase.kt";

/// Template for a service's client stub extensions
pub const STUB_EXTENSIONS_TEMPLATE: &str = "StubExtensions.kt";

/// Renders a named template against a context
pub trait Renderer {
    /// Render `template` with `context`, returning the file contents
    fn render(&self, template: &str, context: &Context) -> Result<String, GeneratorError>;
}

/// The production `Renderer`, backed by the embedded Kotlin templates
pub struct KotlinTemplates {
    tera: Tera,
}

impl KotlinTemplates {
    /// Parse the embedded templates and register the naming filters
    pub fn load() -> Result<Self, GeneratorError> {
        let mut tera = Tera::default();

        tera.register_filter("upper_first", upper_first_filter);
        tera.register_filter("upper_snake", upper_snake_filter);
        tera.register_filter("kdoc", kdoc_filter);

        tera.add_raw_templates(vec![
            (
                ADAPTERS_TEMPLATE,
                include_str!("../../templates/Adapters.kt.tera"),
            ),
            (
                IMPL_BASE_TEMPLATE,
                include_str!("../../templates/ImplBase.kt.tera"),
            ),
            (
                STUB_EXTENSIONS_TEMPLATE,
                include_str!("../../templates/StubExtensions.kt.tera"),
            ),
        ])
        .map_err(|e| GeneratorError::Template(format!("Failed to load templates: {:?}", e)))?;

        Ok(Self { tera })
    }
}

impl Renderer for KotlinTemplates {
    fn render(&self, template: &str, context: &Context) -> Result<String, GeneratorError> {
        self.tera
            .render(template, context)
            .map_err(|e| GeneratorError::Template(format!("Failed to render {}: {:?}", template, e)))
    }
}

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{} filter expects a string", filter)))
}

fn upper_first_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(upper_first(string_arg(value, "upper_first")?)))
}

fn upper_snake_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(upper_snake(string_arg(value, "upper_snake")?)))
}

/// `{{ documentation | kdoc(indent=4) }}`
fn kdoc_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let comment = string_arg(value, "kdoc")?;
    let indent = match args.get("indent") {
        Some(indent) => indent
            .as_u64()
            .and_then(|indent| usize::try_from(indent).ok())
            .ok_or_else(|| tera::Error::msg("kdoc filter expects a non-negative integer indent"))?,
        None => 0,
    };
    Ok(Value::String(format_kdoc(comment, indent)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(KotlinTemplates::load().is_ok());
    }

    #[test]
    fn test_naming_filters() {
        let mut tera = Tera::default();
        tera.register_filter("upper_first", upper_first_filter);
        tera.register_filter("upper_snake", upper_snake_filter);
        tera.add_raw_template(
            "names",
            "get{{ name | upper_first }}Method METHODID_{{ name | upper_snake }}",
        )
        .unwrap();

        let mut context = Context::new();
        context.insert("name", "someStreamingCall");
        assert_eq!(
            tera.render("names", &context).unwrap(),
            "getSomeStreamingCallMethod METHODID_SOME_STREAMING_CALL"
        );
    }

    #[test]
    fn test_kdoc_filter() {
        let mut tera = Tera::default();
        tera.register_filter("kdoc", kdoc_filter);
        tera.add_raw_template("doc", "    {{ doc | kdoc(indent=4) }}")
            .unwrap();

        let mut context = Context::new();
        context.insert("doc", " Says hello\n");
        assert_eq!(
            tera.render("doc", &context).unwrap(),
            "    /**\n     * <pre>\n     *  Says hello\n     * </pre>\n     */"
        );
    }

    #[test]
    fn test_kdoc_filter_rejects_bad_indent() {
        let mut tera = Tera::default();
        tera.register_filter("kdoc", kdoc_filter);
        tera.add_raw_template("negative", "{{ doc | kdoc(indent=-4) }}")
            .unwrap();
        tera.add_raw_template("text", "{{ doc | kdoc(indent=\"four\") }}")
            .unwrap();

        let mut context = Context::new();
        context.insert("doc", " Says hello\n");
        assert!(tera.render("negative", &context).is_err());
        assert!(tera.render("text", &context).is_err());
    }

    #[test]
    fn test_filter_rejects_non_string() {
        let mut tera = Tera::default();
        tera.register_filter("upper_snake", upper_snake_filter);
        tera.add_raw_template("bad", "{{ n | upper_snake }}").unwrap();

        let mut context = Context::new();
        context.insert("n", &3);
        assert!(tera.render("bad", &context).is_err());
    }
}
