use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::component::{Attributes, ComponentNode};
use crate::domain::error::{ComponentError, ComponentResult};
use crate::domain::path::{join_path, split_path};

/// Handle to a component inside a [`ComponentTree`].
///
/// Handles are generational: once a component is removed, its handle stops
/// resolving instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) Index);

/// Arena-based component tree.
///
/// Every node, attached or detached, lives in one generational arena owned
/// by the tree. Parent links are plain indices and never own anything.
#[derive(Debug)]
pub struct ComponentTree {
    /// Arena storage for all component nodes
    pub(crate) arena: Arena<ComponentNode>,
    /// Index of the root component
    pub(crate) root: ComponentId,
}

impl ComponentTree {
    /// Create a tree holding a single root without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = ComponentId(arena.insert(ComponentNode::new(name, Attributes::new())));
        Self { arena, root }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Number of live nodes, detached ones included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.arena.contains(id.0)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, id: ComponentId) -> Option<&ComponentNode> {
        self.arena.get(id.0)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node_mut(&mut self, id: ComponentId) -> Option<&mut ComponentNode> {
        self.arena.get_mut(id.0)
    }

    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.node(id).map(ComponentNode::name)
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.node(id).and_then(ComponentNode::parent)
    }

    fn live_node(&self, id: ComponentId) -> ComponentResult<&ComponentNode> {
        self.node(id).ok_or(ComponentError::StaleComponent)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn has_child(&self, id: ComponentId, name: &str) -> bool {
        self.node(id).is_some_and(|node| node.has_child(name))
    }

    pub fn get_child(&self, id: ComponentId, name: &str) -> Option<ComponentId> {
        self.node(id).and_then(|node| node.child(name))
    }

    pub fn has_nested_child(&self, id: ComponentId, path: &str, separator: &str) -> bool {
        self.get_nested_child(id, path, separator).is_some()
    }

    /// Follow `path` from `id`, one direct child per segment.
    ///
    /// Returns `None` as soon as a segment is missing.
    #[instrument(level = "trace", skip(self))]
    pub fn get_nested_child(
        &self,
        id: ComponentId,
        path: &str,
        separator: &str,
    ) -> Option<ComponentId> {
        split_path(path, separator)
            .into_iter()
            .try_fold(id, |current, name| self.get_child(current, name))
    }

    /// Child handles in insertion order.
    pub fn children(&self, id: ComponentId) -> Vec<ComponentId> {
        self.node(id)
            .map(|node| node.children().collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, id: ComponentId) -> bool {
        self.node(id).is_some_and(ComponentNode::has_children)
    }

    /// True iff the current parent of `id` is exactly `other`.
    pub fn is_child_of(&self, id: ComponentId, other: ComponentId) -> bool {
        self.parent(id) == Some(other)
    }

    /// True if following parents from `id` reaches the root.
    pub fn is_attached(&self, id: ComponentId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return self.contains(current);
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Path of `id` relative to the root; `None` for the root itself and for
    /// detached or removed components.
    pub fn path_of(&self, id: ComponentId, separator: &str) -> Option<String> {
        let mut names = Vec::new();
        let mut current = id;
        while current != self.root {
            let node = self.node(current)?;
            names.push(node.name());
            current = node.parent()?;
        }
        if names.is_empty() {
            return None;
        }
        names.reverse();
        Some(join_path(names, separator))
    }

    fn is_ancestor_or_self(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Append a detached component to the children of `parent`.
    ///
    /// Returns `parent`, so several children can be added in a row.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
    ) -> ComponentResult<ComponentId> {
        let parent_node = self.live_node(parent)?;
        let child_node = self.live_node(child)?;

        if child == self.root || child_node.parent().is_some() {
            return Err(ComponentError::AlreadyAttached(child_node.name().to_string()));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(ComponentError::CycleDetected(child_node.name().to_string()));
        }
        if parent_node.has_child(child_node.name()) {
            return Err(ComponentError::DuplicateChild {
                parent: parent_node.name().to_string(),
                child: child_node.name().to_string(),
            });
        }

        self.attach(parent, child);
        Ok(parent)
    }

    /// Remove the child `name` of `parent` with its whole subtree.
    ///
    /// Returns the serialized form of the removed subtree. All handles into
    /// it are stale afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(
        &mut self,
        parent: ComponentId,
        name: &str,
    ) -> ComponentResult<Attributes> {
        let parent_node = self.live_node(parent)?;
        let child = parent_node
            .child(name)
            .ok_or_else(|| ComponentError::MissingChild {
                parent: parent_node.name().to_string(),
                child: name.to_string(),
            })?;

        let removed = self.as_array(child).ok_or(ComponentError::StaleComponent)?;
        self.detach(child);
        self.reclaim(child);
        debug!(component = name, "removed component subtree");
        Ok(removed)
    }

    /// Remove `id` from its parent; no-op for the root and detached nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: ComponentId) -> ComponentResult<Option<Attributes>> {
        let node = self.live_node(id)?;
        match node.parent() {
            Some(parent) => {
                let name = node.name().to_string();
                self.remove_child(parent, &name).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Resolve `path` from `id` and remove the target from its own parent.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_nested_child(
        &mut self,
        id: ComponentId,
        path: &str,
        separator: &str,
    ) -> ComponentResult<Attributes> {
        let target = self
            .get_nested_child(id, path, separator)
            .ok_or_else(|| ComponentError::PathNotFound(path.to_string()))?;
        let parent = self
            .parent(target)
            .ok_or_else(|| ComponentError::PathNotFound(path.to_string()))?;
        let name = self.live_node(target)?.name().to_string();
        self.remove_child(parent, &name)
    }

    /// Move the component at `source` below the component at `destination`.
    ///
    /// Both paths are resolved from `id`. Every precondition is checked before
    /// the tree changes, so a failed move leaves both subtrees untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn move_nested_child(
        &mut self,
        id: ComponentId,
        source: &str,
        destination: &str,
        separator: &str,
    ) -> ComponentResult<()> {
        let source_id = self
            .get_nested_child(id, source, separator)
            .ok_or_else(|| ComponentError::PathNotFound(source.to_string()))?;
        let destination_id = self
            .get_nested_child(id, destination, separator)
            .ok_or_else(|| ComponentError::PathNotFound(destination.to_string()))?;

        let source_node = self.live_node(source_id)?;
        let destination_node = self.live_node(destination_id)?;
        let name = source_node.name().to_string();

        if destination_node.has_child(&name) {
            return Err(ComponentError::DuplicateChild {
                parent: destination_node.name().to_string(),
                child: name,
            });
        }
        if self.is_ancestor_or_self(source_id, destination_id) {
            return Err(ComponentError::CycleDetected(name));
        }

        self.detach(source_id);
        self.attach(destination_id, source_id);
        debug!(source, destination, "moved component");
        Ok(())
    }

    /// Drop a detached component and its subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, id: ComponentId) -> ComponentResult<()> {
        let node = self.live_node(id)?;
        if id == self.root || node.parent().is_some() {
            return Err(ComponentError::AlreadyAttached(node.name().to_string()));
        }
        self.reclaim(id);
        Ok(())
    }

    /// Unlink `id` from its parent, clearing both sides of the link.
    fn detach(&mut self, id: ComponentId) {
        let Some(node) = self.arena.get_mut(id.0) else {
            return;
        };
        let Some(parent) = node.parent.take() else {
            return;
        };
        let name = node.name.clone();
        if let Some(parent_node) = self.arena.get_mut(parent.0) {
            parent_node.children.shift_remove(&name);
        }
    }

    /// Link a detached `child` as last child of `parent`. Callers check names.
    pub(crate) fn attach(&mut self, parent: ComponentId, child: ComponentId) {
        let name = match self.arena.get_mut(child.0) {
            Some(node) => {
                node.parent = Some(parent);
                node.name.clone()
            }
            None => return,
        };
        if let Some(parent_node) = self.arena.get_mut(parent.0) {
            parent_node.children.insert(name, child);
        }
    }

    /// Free `id` and every descendant from the arena.
    pub(crate) fn reclaim(&mut self, id: ComponentId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current.0) {
                stack.extend(node.children.into_values());
            }
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels below and including the root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, id: ComponentId) -> usize {
        if let Some(node) = self.node(id) {
            1 + node
                .children()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Paths of every attached component except the root, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn paths(&self, separator: &str) -> Vec<String> {
        self.iter()
            .filter_map(|(id, _)| self.path_of(id, separator))
            .collect()
    }

    /// Paths of components without children.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self, separator: &str) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| !node.has_children())
            .filter_map(|(id, _)| self.path_of(id, separator))
            .collect()
    }
}

/// Pre-order traversal from the root, children left to right.
pub struct TreeIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<ComponentId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ComponentTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (ComponentId, &'a ComponentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.values().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

/// Post-order traversal from the root; children come before their parent.
pub struct PostOrderIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<(ComponentId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ComponentTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root(), false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (ComponentId, &'a ComponentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children.values().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
