//! Dotted key-path lookup inside a message tree.

use serde_json::Value;

/// Outcome of walking a dotted path through a message tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The path ends on a string leaf.
    Text(&'a str),

    /// The path ends on a nested group of messages rather than a single
    /// message. Not translatable; callers display the key itself.
    Group,

    /// Some segment is missing, an intermediate node is not an object, or
    /// the leaf is neither a string nor an object.
    NotFound,
}

impl<'a> Resolved<'a> {
    pub fn text(self) -> Option<&'a str> {
        match self {
            Resolved::Text(text) => Some(text),
            Resolved::Group | Resolved::NotFound => None,
        }
    }
}

/// Walk `path` (segments separated by `.`) from `tree`.
///
/// Never panics, whatever the shape of the tree.
///
/// # Example
/// ```
/// use rest_i18n::i18n::{resolve, Resolved};
/// use serde_json::json;
///
/// let tree = json!({ "nested": { "msg": "First level" } });
/// assert_eq!(resolve("nested.msg", &tree), Resolved::Text("First level"));
/// assert_eq!(resolve("nested", &tree), Resolved::Group);
/// assert_eq!(resolve("nested.other", &tree), Resolved::NotFound);
/// ```
pub fn resolve<'a>(path: &str, tree: &'a Value) -> Resolved<'a> {
    let mut node = tree;

    for segment in path.split('.') {
        node = match node.as_object().and_then(|map| map.get(segment)) {
            Some(child) => child,
            None => return Resolved::NotFound,
        };
    }

    match node {
        Value::String(text) => Resolved::Text(text),
        Value::Object(_) => Resolved::Group,
        _ => Resolved::NotFound,
    }
}
