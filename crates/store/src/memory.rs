use crate::{CommentRecord, PostRecord, PostStore, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use skilllinkup_core::Locale;
use std::path::Path;

/// Post store backed by a fixed set of records.
///
/// Used by `serve --posts <file>` for local development and by tests.
/// Records without a locale are visible in every locale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryPostStore {
    #[serde(default)]
    posts: Vec<PostRecord>,
    #[serde(default)]
    comments: Vec<CommentRecord>,
}

impl InMemoryPostStore {
    pub fn new(posts: Vec<PostRecord>, comments: Vec<CommentRecord>) -> Self {
        Self { posts, comments }
    }

    /// Load a `{"posts": [...], "comments": [...]}` fixture file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn visible(record: &PostRecord, locale: Locale) -> bool {
        record.locale.is_none_or(|l| l == locale)
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn get_by_slug(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<Option<PostRecord>, StoreError> {
        Ok(self
            .posts
            .iter()
            .find(|p| p.slug == slug && Self::visible(p, locale))
            .cloned())
    }

    async fn list(&self, locale: Locale, limit: usize) -> Result<Vec<PostRecord>, StoreError> {
        let mut posts: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|p| Self::visible(p, locale))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.total_cmp(&a.published_at));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn comments_by_post(&self, post_id: &str) -> Result<Vec<CommentRecord>, StoreError> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }
}
