//! Layout document adapter.
//!
//! A layout document keeps its root components under a `components` object:
//!
//! ```json
//! {"components": {"checkout": {"component": "uiComponent", "children": {}}}}
//! ```
//!
//! The adapter finds a root there, hands it to the tree model, and writes the
//! edited tree back into the same place.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{ComponentError, ComponentResult, ComponentTree};

/// Key of the object holding the root components.
pub const COMPONENTS_KEY: &str = "components";

/// Build the tree rooted at `document.components[root_name]`.
pub fn parse(document: &Value, root_name: &str) -> ComponentResult<ComponentTree> {
    let entry = document
        .get(COMPONENTS_KEY)
        .and_then(|components| components.get(root_name))
        .ok_or_else(|| ComponentError::RootNotFound(root_name.to_string()))?;

    match entry {
        Value::Object(attributes) => ComponentTree::from_attributes(root_name, attributes.clone()),
        _ => Err(ComponentError::InvalidComponent {
            name: root_name.to_string(),
            reason: "root component must be an object".to_string(),
        }),
    }
}

/// A whole layout document; only `components` is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDocument {
    document: Value,
}

impl LayoutDocument {
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// Read and parse a JSON layout file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let text = fs::read_to_string(path).with_path_context("read layout", path)?;
        let document = serde_json::from_str(&text)
            .map_err(|e| ApplicationError::json(path.display().to_string(), e))?;
        debug!("loaded layout document");
        Ok(Self::new(document))
    }

    /// Write the document as JSON, replacing the file.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&self, path: &Path, pretty: bool) -> ApplicationResult<()> {
        let mut text = self.render(pretty)?;
        text.push('\n');
        fs::write(path, text).with_path_context("write layout", path)
    }

    pub fn render(&self, pretty: bool) -> ApplicationResult<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.document)
        } else {
            serde_json::to_string(&self.document)
        };
        rendered.map_err(|e| ApplicationError::json("serialize layout", e))
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }

    /// Names of all root components, in document order.
    pub fn root_names(&self) -> Vec<&str> {
        self.document
            .get(COMPONENTS_KEY)
            .and_then(Value::as_object)
            .map(|components| components.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn parse_root(&self, root_name: &str) -> ComponentResult<ComponentTree> {
        parse(&self.document, root_name)
    }

    /// Store the serialized `tree` under `components[<root name>]`.
    ///
    /// Replaces an existing root of that name or adds a new one.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn replace_root(&mut self, tree: &ComponentTree) -> ComponentResult<()> {
        let root_name = tree.name(tree.root()).unwrap_or_default().to_string();
        let components = self
            .document
            .get_mut(COMPONENTS_KEY)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ComponentError::RootNotFound(root_name.clone()))?;
        components.insert(root_name, tree.to_value());
        Ok(())
    }
}

impl FromStr for LayoutDocument {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
            .map(Self::new)
            .map_err(|e| ApplicationError::json("parse layout", e))
    }
}
