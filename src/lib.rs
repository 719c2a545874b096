//! Parse, edit and re-serialize nested UI component layouts.
//!
//! A layout document holds root components under `components`; each component
//! is a map of attributes with an optional `children` map of further
//! components. [`domain::ComponentTree`] turns one root into an arena-backed
//! tree that supports dotted-path navigation, structural edits and lossless
//! serialization back into the nested form.
//!
//! ```
//! use jslayout::application::parse;
//! use jslayout::domain::DEFAULT_SEPARATOR;
//! use serde_json::json;
//!
//! let document = json!({"components": {"checkout": {"children": {
//!     "steps": {"children": {"shipping-step": {"sortOrder": "1"}}}
//! }}}});
//!
//! let mut tree = parse(&document, "checkout").unwrap();
//! let step = tree
//!     .get_nested_child(tree.root(), "steps.shipping-step", DEFAULT_SEPARATOR)
//!     .unwrap();
//! tree.node_mut(step).unwrap().set_sort_order("2");
//!
//! assert_eq!(
//!     tree.to_value()["children"]["steps"]["children"]["shipping-step"]["sortOrder"],
//!     json!("2")
//! );
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
