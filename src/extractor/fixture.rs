/// Synthetic page used by the extraction tests
use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::ExtractError;
use crate::page::PageSurface;

#[derive(Debug, Default)]
pub struct FixturePage {
    location: String,
    attributes: HashMap<(String, String), String>,
    scripts: Vec<String>,
    globals: HashMap<String, String>,
    failing_selectors: HashSet<String>,
}

impl FixturePage {
    pub fn at(location: &str) -> Self {
        FixturePage {
            location: location.to_string(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.attributes
            .insert((selector.to_string(), name.to_string()), value.to_string());
        self
    }

    pub fn with_script(mut self, text: &str) -> Self {
        self.scripts.push(text.to_string());
        self
    }

    pub fn with_global(mut self, name: &str, value: Value) -> Self {
        self.globals.insert(name.to_string(), value.to_string());
        self
    }

    /// A global whose serialization is not parseable JSON
    pub fn with_broken_global(mut self, name: &str) -> Self {
        self.globals.insert(name.to_string(), "{not json".to_string());
        self
    }

    /// A selector the DOM refuses to evaluate
    pub fn failing_selector(mut self, selector: &str) -> Self {
        self.failing_selectors.insert(selector.to_string());
        self
    }
}

impl PageSurface for FixturePage {
    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, ExtractError> {
        if self.failing_selectors.contains(selector) {
            return Err(ExtractError::Dom(format!("{}: SyntaxError", selector)));
        }
        Ok(self
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn script_texts(&self) -> Vec<String> {
        self.scripts.clone()
    }

    fn global_text(&self, name: &str) -> Result<Option<String>, ExtractError> {
        Ok(self.globals.get(name).cloned())
    }
}
