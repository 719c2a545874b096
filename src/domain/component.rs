//! Component node: name, structural links and the schema-less attribute bag.
//!
//! Well-known layout keys get typed accessors; everything else is reachable
//! through the generic attribute methods and is preserved verbatim.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::domain::arena::ComponentId;
use crate::domain::error::{ComponentError, ComponentResult};

/// Attribute bag of a component (insertion ordered).
pub type Attributes = Map<String, Value>;

/// Key holding the nested child structures in the serialized form.
pub const CHILDREN_KEY: &str = "children";

/// Attribute keys with typed accessors.
pub mod keys {
    pub const COMPONENT: &str = "component";
    pub const CONFIG: &str = "config";
    pub const DATA_SCOPE: &str = "dataScope";
    pub const DISPLAY_AREA: &str = "displayArea";
    pub const LABEL: &str = "label";
    pub const PROVIDER: &str = "provider";
    pub const SORT_ORDER: &str = "sortOrder";
    pub const VALIDATION: &str = "validation";
    pub const FILTER_BY: &str = "filterBy";
    pub const VISIBLE: &str = "visible";
    pub const REQUIRED: &str = "required";
}

/// One named component of a layout tree.
///
/// Structure (`parent`, `children`) is owned by the [`ComponentTree`] and can
/// only change through its methods, which keep both sides of every link in
/// sync. Attributes are freely editable.
///
/// [`ComponentTree`]: crate::domain::ComponentTree
#[derive(Debug, Clone)]
pub struct ComponentNode {
    pub(crate) name: String,
    pub(crate) attributes: Attributes,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: IndexMap<String, ComponentId>,
    /// Children were given as a JSON list rather than an object.
    pub(crate) list_children: bool,
}

impl ComponentNode {
    pub(crate) fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            parent: None,
            children: IndexMap::new(),
            list_children: false,
        }
    }

    /// Component name, unique among its siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn child(&self, name: &str) -> Option<ComponentId> {
        self.children.get(name).copied()
    }

    /// Child handles in insertion order.
    pub fn children(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.children.values().copied()
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.keys().map(String::as_str)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    // ------------------------------------------------------------------
    // Generic attribute access
    // ------------------------------------------------------------------

    /// All non-structural attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// True if the key is present, even when its value is `null`.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Set an arbitrary attribute.
    ///
    /// `children` is structural and rejected; use the tree's child operations.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> ComponentResult<&mut Self> {
        let key = key.into();
        if key == CHILDREN_KEY {
            return Err(ComponentError::ReservedAttribute(key));
        }
        self.attributes.insert(key, value.into());
        Ok(self)
    }

    /// Remove an attribute entirely, so it is no longer serialized.
    pub fn remove_attribute(&mut self, key: &str) -> ComponentResult<Option<Value>> {
        if key == CHILDREN_KEY {
            return Err(ComponentError::ReservedAttribute(key.to_string()));
        }
        Ok(self.attributes.shift_remove(key))
    }

    fn store(&mut self, key: &str, value: Value) -> &mut Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    fn map_attribute(&self, key: &str) -> Option<&Attributes> {
        self.attributes.get(key).and_then(Value::as_object)
    }

    fn flag(&self, key: &str) -> bool {
        self.attributes.get(key).is_some_and(is_truthy)
    }

    // ------------------------------------------------------------------
    // Typed views over well-known keys
    // ------------------------------------------------------------------

    /// JS component the renderer instantiates, e.g. `uiComponent`.
    pub fn component(&self) -> Option<&str> {
        self.str_attribute(keys::COMPONENT)
    }

    pub fn set_component(&mut self, component: impl Into<String>) -> &mut Self {
        self.store(keys::COMPONENT, Value::String(component.into()))
    }

    /// Component config; empty when absent or not an object.
    pub fn config(&self) -> Attributes {
        self.map_attribute(keys::CONFIG).cloned().unwrap_or_default()
    }

    /// Shallow-merge `config` into the existing config, or replace it.
    ///
    /// Merging overwrites keys present in both and keeps keys only present in
    /// the existing config.
    pub fn set_config(&mut self, config: Attributes, replace: bool) -> &mut Self {
        let merged = if replace {
            config
        } else {
            let mut current = self.config();
            current.extend(config);
            current
        };
        self.store(keys::CONFIG, Value::Object(merged))
    }

    pub fn data_scope(&self) -> Option<&str> {
        self.str_attribute(keys::DATA_SCOPE)
    }

    pub fn set_data_scope(&mut self, data_scope: impl Into<String>) -> &mut Self {
        self.store(keys::DATA_SCOPE, Value::String(data_scope.into()))
    }

    pub fn display_area(&self) -> Option<&str> {
        self.str_attribute(keys::DISPLAY_AREA)
    }

    pub fn set_display_area(&mut self, display_area: impl Into<String>) -> &mut Self {
        self.store(keys::DISPLAY_AREA, Value::String(display_area.into()))
    }

    /// Labels are usually strings but may be translation objects.
    pub fn label(&self) -> Option<&Value> {
        self.attributes.get(keys::LABEL)
    }

    pub fn set_label(&mut self, label: impl Into<Value>) -> &mut Self {
        self.store(keys::LABEL, label.into())
    }

    pub fn provider(&self) -> Option<&str> {
        self.str_attribute(keys::PROVIDER)
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) -> &mut Self {
        self.store(keys::PROVIDER, Value::String(provider.into()))
    }

    pub fn sort_order(&self) -> Option<&str> {
        self.str_attribute(keys::SORT_ORDER)
    }

    pub fn set_sort_order(&mut self, sort_order: impl Into<String>) -> &mut Self {
        self.store(keys::SORT_ORDER, Value::String(sort_order.into()))
    }

    /// Validation rules; `None` when absent or explicitly `null`.
    pub fn validation(&self) -> Option<&Attributes> {
        self.map_attribute(keys::VALIDATION)
    }

    /// `None` stores an explicit `null`, which is kept on serialization.
    pub fn set_validation(&mut self, validation: Option<Attributes>) -> &mut Self {
        self.store(keys::VALIDATION, validation.map_or(Value::Null, Value::Object))
    }

    pub fn filter_by(&self) -> Option<&Attributes> {
        self.map_attribute(keys::FILTER_BY)
    }

    /// `None` stores an explicit `null`, which is kept on serialization.
    pub fn set_filter_by(&mut self, filter_by: Option<Attributes>) -> &mut Self {
        self.store(keys::FILTER_BY, filter_by.map_or(Value::Null, Value::Object))
    }

    /// False unless `visible` is present and truthy.
    pub fn is_visible(&self) -> bool {
        self.flag(keys::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.store(keys::VISIBLE, Value::Bool(visible))
    }

    /// False unless `required` is present and truthy.
    pub fn is_required(&self) -> bool {
        self.flag(keys::REQUIRED)
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.store(keys::REQUIRED, Value::Bool(required))
    }
}

/// Loose boolean reading of layout flags.
///
/// `null`, `false`, zero, `""`, `"0"` and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
