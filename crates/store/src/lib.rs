// Read-only access to the external post store (posts and comments)

pub mod adapter;
pub mod http;
pub mod memory;
pub mod records;

use async_trait::async_trait;
use skilllinkup_core::Locale;
use thiserror::Error;

pub use adapter::{LoadOptions, PostLoadError, load_post_page};
pub use http::HttpPostStore;
pub use memory::InMemoryPostStore;
pub use records::{CommentRecord, PostRecord};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Network failure, timeout or a 5xx from the store
    #[error("post store unavailable: {0}")]
    Unavailable(String),

    /// The store answered but refused the query
    #[error("post store rejected query: {0}")]
    Rejected(String),

    /// The store answered with a payload we cannot read
    #[error("unexpected post store payload: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// The queries this site issues against the post store
#[async_trait]
pub trait PostStore: Send + Sync {
    /// `posts:getBySlug`
    async fn get_by_slug(&self, slug: &str, locale: Locale)
    -> Result<Option<PostRecord>, StoreError>;

    /// `posts:list`, newest first
    async fn list(&self, locale: Locale, limit: usize) -> Result<Vec<PostRecord>, StoreError>;

    /// `comments:getByPost`
    async fn comments_by_post(&self, post_id: &str) -> Result<Vec<CommentRecord>, StoreError>;
}
