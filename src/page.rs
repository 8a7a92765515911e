/// Read-only view of the host page used by the extraction strategies
use serde_json::Value;
use url::Url;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

use crate::extractor::ExtractError;

/// Everything a strategy may look at on the current page
///
/// The live implementation reads the DOM and page globals; tests supply
/// synthetic fixtures.
pub trait PageSurface {
    /// Attribute `name` of the first element matching `selector`
    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ExtractError>;

    /// Full navigation URL
    fn location(&self) -> String;

    /// Text content of every inline `<script>` element, in document order
    fn script_texts(&self) -> Vec<String>;

    /// A page global serialized as JSON text, if defined
    fn global_text(&self, name: &str) -> Result<Option<String>, ExtractError>;

    /// A page global parsed into a JSON tree
    fn global_json(&self, name: &str) -> Result<Option<Value>, ExtractError> {
        match self.global_text(name)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| ExtractError::Json(e.to_string())),
            None => Ok(None),
        }
    }
}

/// URL path of a location, e.g. "/watch" or "/@somebody/videos"
pub fn path_of(location: &str) -> Option<String> {
    Url::parse(location).ok().map(|url| url.path().to_string())
}

/// Content-detail ("watch") page
pub fn is_watch_page(location: &str) -> bool {
    path_of(location).is_some_and(|path| path == "/watch")
}

/// Channel handle for `/@name` style URLs
pub fn handle_from_location(location: &str) -> Option<String> {
    let path = path_of(location)?;
    let handle = path.strip_prefix("/@")?.split('/').next()?;
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}

/// The live document of the window this module runs in
pub struct LiveDocument {
    window: Window,
    document: Document,
}

impl LiveDocument {
    pub fn new(window: Window, document: Document) -> Self {
        LiveDocument { window, document }
    }

    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(LiveDocument::new(window, document))
    }

    fn query(&self, selector: &str) -> Result<Option<Element>, ExtractError> {
        self.document
            .query_selector(selector)
            .map_err(|e| ExtractError::Dom(format!("{}: {:?}", selector, e)))
    }
}

impl PageSurface for LiveDocument {
    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ExtractError> {
        Ok(self.query(selector)?.and_then(|el| el.get_attribute(name)))
    }

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn script_texts(&self) -> Vec<String> {
        let Ok(scripts) = self.document.query_selector_all("script") else {
            return Vec::new();
        };
        (0..scripts.length())
            .filter_map(|i| scripts.item(i))
            .filter_map(|node| node.text_content())
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn global_text(&self, name: &str) -> Result<Option<String>, ExtractError> {
        let value = js_sys::Reflect::get(&self.window, &JsValue::from_str(name))
            .map_err(|e| ExtractError::Dom(format!("window.{}: {:?}", name, e)))?;
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        let text = js_sys::JSON::stringify(&value)
            .map_err(|e| ExtractError::Json(format!("window.{}: {:?}", name, e)))?;
        // JSON.stringify yields undefined for functions and symbols
        Ok(text.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("https://www.youtube.com/watch?v=abc"), Some("/watch".to_string()));
        assert_eq!(path_of("https://www.youtube.com/"), Some("/".to_string()));
        assert_eq!(path_of("not a url"), None);
    }

    #[test]
    fn test_is_watch_page() {
        assert!(is_watch_page("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_watch_page("https://www.youtube.com/watchlist?list=x"));
        assert!(!is_watch_page("https://www.youtube.com/@someone"));
    }

    #[test]
    fn test_handle_from_location() {
        assert_eq!(
            handle_from_location("https://www.youtube.com/@rustlang/videos"),
            Some("rustlang".to_string())
        );
        assert_eq!(
            handle_from_location("https://www.youtube.com/@rustlang"),
            Some("rustlang".to_string())
        );
        assert_eq!(handle_from_location("https://www.youtube.com/@"), None);
        assert_eq!(handle_from_location("https://www.youtube.com/channel/UC123"), None);
    }
}
