// crates/serve/src/render/template.rs

use crate::Error;
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::io::Write;

/// Trait for template engines that render a template source to an
/// arbitrary `Write`.
pub trait TemplateEngine: Send + Sync {
    fn render_str_to_write<M, W>(
        &self,
        template_name: &str,
        source: &str,
        model: &M,
        out: &mut W,
    ) -> Result<(), Error>
    where
        M: Serialize,
        W: Write;

    fn render_str<M>(&self, template_name: &str, source: &str, model: &M) -> Result<String, Error>
    where
        M: Serialize,
    {
        let mut buf = Vec::new();
        self.render_str_to_write(template_name, source, model, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Renders Twig theme templates with MiniJinja, whose syntax covers the
/// Twig subset themes use (`{{ }}`, `{% if %}`, `{% for %}`, filters).
///
/// There is no caching: each call builds a fresh environment holding the
/// one template being rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwigEngine;

impl TemplateEngine for TwigEngine {
    fn render_str_to_write<M, W>(
        &self,
        template_name: &str,
        source: &str,
        model: &M,
        out: &mut W,
    ) -> Result<(), Error>
    where
        M: Serialize,
        W: Write,
    {
        let mut env = Environment::new();
        // Twig escapes HTML in every template regardless of its name.
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_keep_trailing_newline(true);

        env.add_template(template_name, source)?;
        let tmpl = env.get_template(template_name)?;
        let rendered = tmpl.render(model)?;

        out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_variables_and_loops() {
        let html = TwigEngine
            .render_str(
                "header",
                "<ul>{% for l in links %}<li>{{ l }}</li>{% endfor %}</ul>",
                &json!({ "links": ["a", "b"] }),
            )
            .expect("render");
        assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn escapes_html_by_default() {
        let html = TwigEngine
            .render_str("t", "<p>{{ v }}</p>", &json!({ "v": "<b>" }))
            .expect("render");
        assert_eq!(html, "<p>&lt;b&gt;</p>");
    }

    #[test]
    fn keeps_trailing_newline() {
        let html = TwigEngine
            .render_str("t", "<footer></footer>\n", &json!({}))
            .expect("render");
        assert_eq!(html, "<footer></footer>\n");
    }

    #[test]
    fn syntax_error_is_a_template_error() {
        let err = TwigEngine
            .render_str("broken", "{% if %}", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }
}
