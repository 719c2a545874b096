//! Application layer: document adapter and edit operations
//!
//! This layer connects raw layout documents to the domain tree model.

pub mod document;
pub mod edit;
pub mod error;
pub mod error_ext;

pub use document::{parse, LayoutDocument, COMPONENTS_KEY};
pub use edit::Edit;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
