//! Post retrieval for the `post/{slug}` route.
//!
//! The primary lookup decides between found and not found. A found post
//! triggers two dependent calls (related posts, comments), issued one after
//! the other. What a failure means depends on the [`FailurePolicy`]:
//!
//! - `Strict`: any failure in the sequence is reported as not found, and the
//!   already fetched post is discarded.
//! - `Degraded`: a failing primary lookup is `Unavailable`; failing
//!   secondary calls leave the related posts or comments empty.

use crate::{PostStore, StoreError};
use skilllinkup_core::{CommentView, FailurePolicy, Locale, PostPage, PostView};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PostLoadError {
    #[error("post not found")]
    NotFound,

    #[error(transparent)]
    Unavailable(StoreError),
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub related_limit: usize,
    pub policy: FailurePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            related_limit: 3,
            policy: FailurePolicy::default(),
        }
    }
}

/// Fetch a post with its related posts and comments
pub async fn load_post_page(
    store: &dyn PostStore,
    slug: &str,
    locale: Locale,
    options: LoadOptions,
) -> Result<PostPage, PostLoadError> {
    let post = match fetch_post(store, slug, locale).await {
        Ok(Some(post)) => post,
        Ok(None) => return Err(PostLoadError::NotFound),
        Err(e) => {
            tracing::error!(slug, %locale, error = %e, "post lookup failed");
            return Err(match options.policy {
                FailurePolicy::Strict => PostLoadError::NotFound,
                FailurePolicy::Degraded => PostLoadError::Unavailable(e),
            });
        }
    };

    let related = match fetch_related(store, &post, locale, options.related_limit).await {
        Ok(related) => related,
        Err(e) => secondary_failure(options.policy, slug, "related posts", e)?,
    };

    let comments = match fetch_comments(store, &post.id).await {
        Ok(comments) => comments,
        Err(e) => secondary_failure(options.policy, slug, "comments", e)?,
    };

    Ok(PostPage {
        post,
        related,
        comments,
    })
}

fn secondary_failure<T: Default>(
    policy: FailurePolicy,
    slug: &str,
    what: &str,
    error: StoreError,
) -> Result<T, PostLoadError> {
    match policy {
        FailurePolicy::Strict => {
            tracing::error!(slug, what, error = %error, "post page discarded");
            Err(PostLoadError::NotFound)
        }
        FailurePolicy::Degraded => {
            tracing::warn!(slug, what, error = %error, "rendering post without {}", what);
            Ok(T::default())
        }
    }
}

async fn fetch_post(
    store: &dyn PostStore,
    slug: &str,
    locale: Locale,
) -> Result<Option<PostView>, StoreError> {
    store
        .get_by_slug(slug, locale)
        .await?
        .map(PostView::try_from)
        .transpose()
}

async fn fetch_related(
    store: &dyn PostStore,
    post: &PostView,
    locale: Locale,
    limit: usize,
) -> Result<Vec<PostView>, StoreError> {
    // one extra so the current post can be dropped without coming up short
    let records = store.list(locale, limit + 1).await?;
    records
        .into_iter()
        .filter(|r| r.id != post.id)
        .take(limit)
        .map(PostView::try_from)
        .collect()
}

async fn fetch_comments(
    store: &dyn PostStore,
    post_id: &str,
) -> Result<Vec<CommentView>, StoreError> {
    store
        .comments_by_post(post_id)
        .await?
        .into_iter()
        .map(CommentView::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommentRecord, InMemoryPostStore, PostRecord};
    use async_trait::async_trait;

    fn post(id: &str, slug: &str, published_at: f64) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            slug: slug.to_string(),
            locale: None,
            title: format!("Post {}", id),
            content: "Body".to_string(),
            excerpt: None,
            feature_img: None,
            published_at,
            read_time: Some(4),
            meta_title: None,
            meta_description: None,
            author_name: "Author".to_string(),
            category_name: None,
            tags: vec![],
            views: 0,
        }
    }

    fn comment(id: &str, post_id: &str) -> CommentRecord {
        CommentRecord {
            id: id.to_string(),
            post_id: post_id.to_string(),
            author_name: "Reader".to_string(),
            content: "Thanks".to_string(),
            created_at: 0.0,
        }
    }

    fn store() -> InMemoryPostStore {
        InMemoryPostStore::new(
            vec![
                post("p1", "first", 1.0),
                post("p2", "second", 2.0),
                post("p3", "third", 3.0),
                post("p4", "fourth", 4.0),
            ],
            vec![comment("c1", "p1"), comment("c2", "p2")],
        )
    }

    /// Store that fails selected calls and delegates the rest
    struct FailingStore {
        inner: InMemoryPostStore,
        fail_primary: Option<StoreError>,
        fail_related: bool,
        fail_comments: bool,
    }

    impl FailingStore {
        fn new() -> Self {
            Self {
                inner: store(),
                fail_primary: None,
                fail_related: false,
                fail_comments: false,
            }
        }
    }

    #[async_trait]
    impl PostStore for FailingStore {
        async fn get_by_slug(
            &self,
            slug: &str,
            locale: Locale,
        ) -> Result<Option<PostRecord>, StoreError> {
            match &self.fail_primary {
                Some(e) => Err(e.clone()),
                None => self.inner.get_by_slug(slug, locale).await,
            }
        }

        async fn list(&self, locale: Locale, limit: usize) -> Result<Vec<PostRecord>, StoreError> {
            if self.fail_related {
                return Err(StoreError::Unavailable("list timed out".to_string()));
            }
            self.inner.list(locale, limit).await
        }

        async fn comments_by_post(&self, post_id: &str) -> Result<Vec<CommentRecord>, StoreError> {
            if self.fail_comments {
                return Err(StoreError::Rejected("comments disabled".to_string()));
            }
            self.inner.comments_by_post(post_id).await
        }
    }

    fn options(policy: FailurePolicy) -> LoadOptions {
        LoadOptions {
            related_limit: 2,
            policy,
        }
    }

    #[tokio::test]
    async fn test_found_post_with_related_and_comments() {
        let store = store();
        let page = load_post_page(&store, "fourth", Locale::En, options(FailurePolicy::Strict))
            .await
            .unwrap();
        assert_eq!(page.post.id, "p4");
        let related: Vec<_> = page.related.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(related, vec!["p3", "p2"]);
        assert!(page.comments.is_empty());

        let page = load_post_page(&store, "first", Locale::Nl, options(FailurePolicy::Strict))
            .await
            .unwrap();
        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].id, "c1");
    }

    #[tokio::test]
    async fn test_missing_slug_is_not_found() {
        let store = store();
        for policy in [FailurePolicy::Strict, FailurePolicy::Degraded] {
            let result = load_post_page(&store, "nope", Locale::En, options(policy)).await;
            assert!(matches!(result, Err(PostLoadError::NotFound)));
        }
    }

    #[tokio::test]
    async fn test_strict_related_failure_discards_post() {
        let store = FailingStore {
            fail_related: true,
            ..FailingStore::new()
        };
        let result = load_post_page(&store, "first", Locale::En, options(FailurePolicy::Strict)).await;
        assert!(matches!(result, Err(PostLoadError::NotFound)));
    }

    #[tokio::test]
    async fn test_strict_primary_failure_is_not_found() {
        let store = FailingStore {
            fail_primary: Some(StoreError::Unavailable("down".to_string())),
            ..FailingStore::new()
        };
        let result = load_post_page(&store, "first", Locale::En, options(FailurePolicy::Strict)).await;
        assert!(matches!(result, Err(PostLoadError::NotFound)));
    }

    #[tokio::test]
    async fn test_degraded_primary_failure_is_unavailable() {
        let store = FailingStore {
            fail_primary: Some(StoreError::Unavailable("down".to_string())),
            ..FailingStore::new()
        };
        let result =
            load_post_page(&store, "first", Locale::En, options(FailurePolicy::Degraded)).await;
        match result {
            Err(PostLoadError::Unavailable(e)) => assert!(e.is_transient()),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_degraded_secondary_failures_keep_post() {
        let store = FailingStore {
            fail_related: true,
            fail_comments: true,
            ..FailingStore::new()
        };
        let page = load_post_page(&store, "first", Locale::En, options(FailurePolicy::Degraded))
            .await
            .unwrap();
        assert_eq!(page.post.slug, "first");
        assert!(page.related.is_empty());
        assert!(page.comments.is_empty());
    }

    #[tokio::test]
    async fn test_strict_comment_failure_is_not_found() {
        let store = FailingStore {
            fail_comments: true,
            ..FailingStore::new()
        };
        let result = load_post_page(&store, "first", Locale::En, options(FailurePolicy::Strict)).await;
        assert!(matches!(result, Err(PostLoadError::NotFound)));
    }
}
