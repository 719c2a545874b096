//! Domain layer: the component tree model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod component;
pub mod error;
pub mod path;
pub mod tree_traits;

pub use arena::{ComponentId, ComponentTree, PostOrderIterator, TreeIterator};
pub use component::{is_truthy, keys, Attributes, ComponentNode, CHILDREN_KEY};
pub use error::{ComponentError, ComponentResult};
pub use path::{join_path, split_path, DEFAULT_SEPARATOR};
pub use tree_traits::TreeDisplay;
