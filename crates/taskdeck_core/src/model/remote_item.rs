//! Remote post record consumed by the viewer.

use serde::{Deserialize, Serialize};

/// One externally supplied post.
///
/// Only `id`, `title` and `body` are consumed; other payload keys such as
/// `userId` are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl RemoteItem {
    pub fn new(id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Case-insensitive substring match over title and body.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}
