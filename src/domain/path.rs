//! Component paths: child names joined by a separator, e.g. `steps.shipping-step`.

use itertools::Itertools;

/// Separator used when the caller does not pick one.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Split a path into child names.
///
/// An empty separator yields the whole path as a single name.
pub fn split_path<'a>(path: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return vec![path];
    }
    path.split(separator).collect()
}

/// Join child names into a path.
pub fn join_path<I, S>(names: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: std::fmt::Display,
{
    names.into_iter().join(separator)
}
