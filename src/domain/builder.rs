//! Building component trees from nested layout structures and turning them
//! back into that shape.

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::arena::{ComponentId, ComponentTree};
use crate::domain::component::{Attributes, ComponentNode, CHILDREN_KEY};
use crate::domain::error::{ComponentError, ComponentResult};

/// Child structures split off a component's attributes, in document order.
type ChildEntries = Vec<(String, Attributes)>;

impl ComponentTree {
    /// Build a tree whose root is `name` with the given attributes.
    ///
    /// A `children` entry in `attributes` is materialized recursively, one
    /// component per entry, and removed from the attribute bag.
    #[instrument(level = "debug", skip(attributes))]
    pub fn from_attributes(name: &str, attributes: Attributes) -> ComponentResult<Self> {
        let (attributes, children, list) = split_children(name, attributes)?;
        let mut tree = Self::new(name);
        let root = tree.root();
        if let Some(node) = tree.node_mut(root) {
            node.attributes = attributes;
            node.list_children = list;
        }
        tree.build_children(root, children)?;
        debug!(root = name, nodes = tree.node_count(), "built component tree");
        Ok(tree)
    }

    /// Build a detached component (with its subtree) ready for `add_child`.
    ///
    /// On error nothing is left behind in the arena.
    #[instrument(level = "debug", skip(self, attributes))]
    pub fn create_component(
        &mut self,
        name: &str,
        attributes: Attributes,
    ) -> ComponentResult<ComponentId> {
        let (attributes, children, list) = split_children(name, attributes)?;
        let id = ComponentId(self.arena.insert(new_node(name, attributes, list)));
        if let Err(e) = self.build_children(id, children) {
            self.reclaim(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Iteratively attach `children` below `parent`, depth-first.
    fn build_children(
        &mut self,
        parent: ComponentId,
        children: ChildEntries,
    ) -> ComponentResult<()> {
        let mut stack = vec![(parent, children)];

        while let Some((parent_id, entries)) = stack.pop() {
            for (name, attributes) in entries {
                let (attributes, grandchildren, list) = split_children(&name, attributes)?;
                let id = ComponentId(self.arena.insert(new_node(name, attributes, list)));
                self.attach(parent_id, id);
                if !grandchildren.is_empty() {
                    stack.push((id, grandchildren));
                }
            }
        }

        Ok(())
    }

    /// Serialized form of `id`: its attributes plus, when it has children, a
    /// `children` entry holding each child's serialized form in order.
    ///
    /// Children parsed from a list are written as a list again while their
    /// names are still `"0"`, `"1"`, ... in sequence.
    pub fn as_array(&self, id: ComponentId) -> Option<Attributes> {
        let node = self.node(id)?;
        let mut data = node.attributes().clone();

        if node.has_children() {
            let children = if is_list_like(node) {
                Value::Array(
                    node.children()
                        .filter_map(|child| self.as_array(child))
                        .map(Value::Object)
                        .collect(),
                )
            } else {
                Value::Object(
                    node.children
                        .iter()
                        .filter_map(|(name, &child)| {
                            self.as_array(child).map(|c| (name.clone(), Value::Object(c)))
                        })
                        .collect(),
                )
            };
            data.insert(CHILDREN_KEY.to_string(), children);
        }

        Some(data)
    }

    /// Serialized form of the whole tree.
    pub fn to_value(&self) -> Value {
        Value::Object(self.as_array(self.root()).unwrap_or_default())
    }
}

impl Serialize for ComponentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn is_list_like(node: &ComponentNode) -> bool {
    node.list_children
        && node
            .child_names()
            .enumerate()
            .all(|(i, name)| name == i.to_string())
}

fn new_node(name: impl Into<String>, attributes: Attributes, list_children: bool) -> ComponentNode {
    let mut node = ComponentNode::new(name, attributes);
    node.list_children = list_children;
    node
}

/// Separate the structural `children` entry from the attribute bag.
///
/// The flag tells whether the children came as a list.
fn split_children(
    name: &str,
    mut attributes: Attributes,
) -> ComponentResult<(Attributes, ChildEntries, bool)> {
    let entry = attributes.shift_remove(CHILDREN_KEY);
    let list = matches!(entry, Some(Value::Array(_)));
    let children = match entry {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(child, value)| child_entry(name, child, value))
            .collect::<ComponentResult<_>>()?,
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, value)| child_entry(name, i.to_string(), value))
            .collect::<ComponentResult<_>>()?,
        Some(other) => {
            return Err(ComponentError::InvalidComponent {
                name: name.to_string(),
                reason: format!("children must be an object or a list, found {}", kind(&other)),
            })
        }
    };
    Ok((attributes, children, list))
}

fn child_entry(parent: &str, child: String, value: Value) -> ComponentResult<(String, Attributes)> {
    match value {
        Value::Object(attributes) => Ok((child, attributes)),
        other => Err(ComponentError::InvalidComponent {
            name: format!("{}.{}", parent, child),
            reason: format!("component must be an object, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn given_nested_children_when_building_then_preserves_order() {
        let tree = ComponentTree::from_attributes(
            "form",
            attrs(json!({"children": {"z": {}, "a": {}, "m": {"children": {"2": {}, "1": {}}}}})),
        )
        .unwrap();

        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.child_names().collect::<Vec<_>>(), vec!["z", "a", "m"]);

        let m = tree.get_child(tree.root(), "m").unwrap();
        let m_node = tree.node(m).unwrap();
        assert_eq!(m_node.child_names().collect::<Vec<_>>(), vec!["2", "1"]);
        assert!(!m_node.has_attribute(CHILDREN_KEY));
    }

    #[test]
    fn given_list_children_when_building_then_named_by_index() {
        let input = json!({
            "component": "Magento_Ui/js/form/components/group",
            "children": [{"label": "Line 1"}, {"label": "Line 2"}]
        });

        let tree = ComponentTree::from_attributes("street", attrs(input.clone())).unwrap();

        assert!(tree.has_child(tree.root(), "0"));
        assert!(tree.has_child(tree.root(), "1"));
        assert_eq!(tree.to_value(), input);
    }

    #[test]
    fn given_null_children_when_building_then_no_children() {
        let tree =
            ComponentTree::from_attributes("leaf", attrs(json!({"children": null}))).unwrap();

        assert!(!tree.has_children(tree.root()));
        assert_eq!(tree.to_value(), json!({}));
    }

    #[test]
    fn given_scalar_children_when_building_then_invalid_component() {
        let result = ComponentTree::from_attributes("leaf", attrs(json!({"children": "nope"})));

        assert!(matches!(
            result,
            Err(ComponentError::InvalidComponent { ref name, .. }) if name == "leaf"
        ));
    }

    #[test]
    fn given_non_object_child_when_creating_then_nothing_left_behind() {
        let mut tree = ComponentTree::new("root");

        let result = tree.create_component(
            "broken",
            attrs(json!({"children": {"ok": {"children": {"bad": 3}}}})),
        );

        assert!(matches!(
            result,
            Err(ComponentError::InvalidComponent { ref name, .. }) if name == "ok.bad"
        ));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn given_object_children_with_index_names_when_serializing_then_stays_object() {
        let input = json!({"children": {"0": {"label": "a"}, "1": {"label": "b"}}});

        let tree = ComponentTree::from_attributes("root", attrs(input.clone())).unwrap();

        assert!(tree.to_value()[CHILDREN_KEY].is_object());
        assert_eq!(tree.to_value(), input);
    }

    #[test]
    fn given_list_children_when_one_removed_then_emits_object() {
        let mut tree = ComponentTree::from_attributes(
            "street",
            attrs(json!({"children": [{"label": "Line 1"}, {"label": "Line 2"}]})),
        )
        .unwrap();

        tree.remove_child(tree.root(), "0").unwrap();

        assert_eq!(tree.to_value(), json!({"children": {"1": {"label": "Line 2"}}}));
    }

    #[test]
    fn given_list_children_when_appending_next_index_then_stays_list() {
        let mut tree = ComponentTree::from_attributes(
            "street",
            attrs(json!({"children": [{"label": "Line 1"}]})),
        )
        .unwrap();
        let line = tree
            .create_component("1", attrs(json!({"label": "Line 2"})))
            .unwrap();

        tree.add_child(tree.root(), line).unwrap();

        assert_eq!(
            tree.to_value(),
            json!({"children": [{"label": "Line 1"}, {"label": "Line 2"}]})
        );
    }

    #[test]
    fn given_reordered_names_when_serializing_then_emits_object() {
        let tree = ComponentTree::from_attributes(
            "group",
            attrs(json!({"children": {"1": {}, "0": {}}})),
        )
        .unwrap();

        assert!(tree.to_value()[CHILDREN_KEY].is_object());
    }

    #[test]
    fn given_tree_when_serializing_with_serde_then_matches_to_value() {
        let tree = ComponentTree::from_attributes(
            "checkout",
            attrs(json!({"component": "uiComponent", "children": {"steps": {}}})),
        )
        .unwrap();

        let text = serde_json::to_string(&tree).unwrap();

        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), tree.to_value());
    }
}
