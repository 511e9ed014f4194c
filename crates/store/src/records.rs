//! Store-side record shapes and their mapping to view types.
//!
//! The store speaks camelCase with epoch-millisecond timestamps; templates
//! read the snake_case view types from `skilllinkup_core`. The `TryFrom`
//! impls below are the only place the two namings meet.

use crate::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skilllinkup_core::{CommentView, Locale, PostView};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_img: Option<String>,
    /// Milliseconds since the Unix epoch
    pub published_at: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_id: String,
    pub author_name: String,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub created_at: f64,
}

fn timestamp(millis: f64, field: &str) -> Result<DateTime<Utc>, StoreError> {
    if !millis.is_finite() {
        return Err(StoreError::Decode(format!("{} is not a number", field)));
    }
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or_else(|| StoreError::Decode(format!("{} out of range: {}", field, millis)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<PostRecord> for PostView {
    type Error = StoreError;

    fn try_from(record: PostRecord) -> Result<Self, Self::Error> {
        Ok(PostView {
            published_at: timestamp(record.published_at, "publishedAt")?,
            id: record.id,
            slug: record.slug,
            title: record.title,
            content: record.content,
            excerpt: non_empty(record.excerpt),
            feature_img: non_empty(record.feature_img),
            read_time: record.read_time,
            meta_title: non_empty(record.meta_title),
            meta_description: non_empty(record.meta_description),
            author_name: record.author_name,
            category_name: non_empty(record.category_name),
            tags: record.tags,
            views: record.views,
        })
    }
}

impl TryFrom<CommentRecord> for CommentView {
    type Error = StoreError;

    fn try_from(record: CommentRecord) -> Result<Self, Self::Error> {
        Ok(CommentView {
            created_at: timestamp(record.created_at, "createdAt")?,
            id: record.id,
            author_name: record.author_name,
            content: record.content,
        })
    }
}
