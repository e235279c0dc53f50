use super::ThemeAsset;
use domain::asset::AssetType;
use serde_json::Value as Json;

/// Static HTML markup (header, footer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlAsset {
    html: String,
}

impl HtmlAsset {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl ThemeAsset for HtmlAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Html
    }

    fn content_type(&self) -> &'static str {
        AssetType::Html.content_type()
    }

    fn value(&self) -> Json {
        Json::String(self.html.clone())
    }

    fn raw_str(&self) -> &str {
        &self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_raw_markup_as_html() {
        let asset = HtmlAsset::new("<header>hi</header>");
        let out = asset.render(Some(AssetType::Html));
        assert_eq!(out.text(), "<header>hi</header>");
        assert_eq!(out.content_type, "text/html");
    }

    #[test]
    fn only_html_is_allowed() {
        assert_eq!(HtmlAsset::new("").allowed_types(), vec![AssetType::Html]);
    }

    #[test]
    fn envelope_has_no_extra_fields() {
        let v = HtmlAsset::new("<p/>").as_array().unwrap();
        assert_eq!(v, json!({ "data": "<p/>", "type": "html" }));
    }
}
