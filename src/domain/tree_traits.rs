use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{ComponentId, ComponentTree};
use crate::domain::component::ComponentNode;

pub trait TreeDisplay {
    /// Render the whole tree.
    fn to_tree_string(&self) -> Tree<String>;

    /// Render the subtree below `id`, `None` if `id` is not in the tree.
    fn subtree_to_tree_string(&self, id: ComponentId) -> Option<Tree<String>>;
}

impl TreeDisplay for ComponentTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        self.subtree_to_tree_string(self.root())
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }

    fn subtree_to_tree_string(&self, id: ComponentId) -> Option<Tree<String>> {
        fn build_tree(tree: &ComponentTree, node: &ComponentNode, parent_tree: &mut Tree<String>) {
            for child_id in node.children() {
                if let Some(child) = tree.node(child_id) {
                    let mut child_tree = Tree::new(label(child));
                    build_tree(tree, child, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let node = self.node(id)?;
        let mut rendered = Tree::new(label(node));
        build_tree(self, node, &mut rendered);
        Some(rendered)
    }
}

/// `name (component)`, or just the name when no component is set.
fn label(node: &ComponentNode) -> String {
    match node.component() {
        Some(component) => format!("{} ({})", node.name(), component),
        None => node.name().to_string(),
    }
}
