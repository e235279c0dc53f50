use super::ThemeAsset;
use crate::render::{TemplateEngine, TwigEngine};
use crate::Error;
use domain::asset::AssetType;
use serde::Serialize;
use serde_json::{json, Value as Json};

/// HTML asset whose content is a Twig template rendered on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwigAsset {
    template: String,
}

impl TwigAsset {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template as HTML with the given data.
    pub fn render_html<M: Serialize>(&self, data: &M) -> Result<String, Error> {
        TwigEngine.render_str("theme.twig", &self.template, data)
    }
}

impl ThemeAsset for TwigAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Twig
    }

    fn content_type(&self) -> &'static str {
        AssetType::Twig.content_type()
    }

    fn value(&self) -> Json {
        Json::String(self.template.clone())
    }

    fn raw_str(&self) -> &str {
        &self.template
    }

    /// Rendered HTML plus the template. The envelope type is `html`, the
    /// form `data` is in.
    fn as_array(&self) -> Result<Json, Error> {
        Ok(json!({
            "data": self.render_html(&json!({}))?,
            "template": self.template,
            "type": AssetType::Html,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_rendered_html_and_template() {
        let asset = TwigAsset::new("<h1>{{ 1 + 1 }}</h1>");
        let v = asset.as_array().unwrap();
        assert_eq!(
            v,
            json!({
                "data": "<h1>2</h1>",
                "template": "<h1>{{ 1 + 1 }}</h1>",
                "type": "html",
            })
        );
    }

    #[test]
    fn raw_render_returns_template_source() {
        let asset = TwigAsset::new("{{ title }}");
        let out = asset.render(Some(AssetType::Twig));
        assert_eq!(out.text(), "{{ title }}");
        assert_eq!(out.content_type, "text/html");
        assert_eq!(asset.allowed_types(), vec![AssetType::Twig]);
    }

    #[test]
    fn render_html_uses_data() {
        let asset = TwigAsset::new("Hello {{ name }}");
        let html = asset.render_html(&json!({ "name": "forum" })).unwrap();
        assert_eq!(html, "Hello forum");
    }
}
