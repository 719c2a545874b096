//! Single edit operations on a component tree.
//!
//! Paths are resolved from the root; an empty path addresses the root itself
//! for attribute edits.

use std::fmt;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{ComponentError, ComponentId, ComponentResult, ComponentTree};

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    SetAttribute {
        path: String,
        key: String,
        value: Value,
    },
    RemoveAttribute {
        path: String,
        key: String,
    },
    Remove {
        path: String,
    },
    Move {
        source: String,
        destination: String,
    },
}

impl Edit {
    /// Apply the edit; errors leave the tree unchanged.
    #[instrument(level = "debug", skip(tree))]
    pub fn apply(&self, tree: &mut ComponentTree, separator: &str) -> ComponentResult<()> {
        let root = tree.root();
        match self {
            Edit::SetAttribute { path, key, value } => {
                let target = resolve(tree, path, separator)?;
                tree.node_mut(target)
                    .ok_or(ComponentError::StaleComponent)?
                    .set_attribute(key.as_str(), value.clone())?;
            }
            Edit::RemoveAttribute { path, key } => {
                let target = resolve(tree, path, separator)?;
                tree.node_mut(target)
                    .ok_or(ComponentError::StaleComponent)?
                    .remove_attribute(key)?;
            }
            Edit::Remove { path } => {
                tree.remove_nested_child(root, path, separator)?;
            }
            Edit::Move {
                source,
                destination,
            } => tree.move_nested_child(root, source, destination, separator)?,
        }
        debug!(edit = %self, "applied edit");
        Ok(())
    }

    /// Read a command line value as JSON, or as a plain string if it is not JSON.
    pub fn parse_value(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::SetAttribute { path, key, value } => write!(f, "set {}[{}] = {}", path, key, value),
            Edit::RemoveAttribute { path, key } => write!(f, "unset {}[{}]", path, key),
            Edit::Remove { path } => write!(f, "remove {}", path),
            Edit::Move {
                source,
                destination,
            } => write!(f, "move {} -> {}", source, destination),
        }
    }
}

fn resolve(tree: &ComponentTree, path: &str, separator: &str) -> ComponentResult<ComponentId> {
    if path.is_empty() {
        return Ok(tree.root());
    }
    tree.get_nested_child(tree.root(), path, separator)
        .ok_or_else(|| ComponentError::PathNotFound(path.to_string()))
}
