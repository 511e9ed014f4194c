use crate::content::{Localized, PageContent};
use crate::locale::Locale;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when neither the environment nor site.toml provides one
pub const FALLBACK_SITE_URL: &str = "https://skilllinkup.com";

/// Complete site: settings plus every page with both locale branches loaded
#[derive(Debug, Clone)]
pub struct Site {
    pub info: SiteInfo,
    pub store: Option<StoreConfig>,
    pub pages: Vec<Page>,
}

impl Site {
    /// Find a page by its fixed path (`""` is the locale home page)
    pub fn page(&self, path: &str) -> Option<&Page> {
        let path = path.trim_matches('/');
        self.pages.iter().find(|p| p.def.path == path)
    }

    /// Absolute URL for a path under a locale
    pub fn locale_url(&self, locale: Locale, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/{}", self.info.url, locale)
        } else {
            format!("{}/{}/{}", self.info.url, locale, path)
        }
    }

    /// Absolute URL for a site asset such as `/static/logo.png`
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.info.url, path.trim_start_matches('/'))
        }
    }
}

/// Site-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    /// Base URL without trailing slash
    pub url: String,
    pub default_locale: Locale,
    pub author: String,
    pub logo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Connection settings for the external post store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub related_limit: usize,
    pub failure_policy: FailurePolicy,
}

/// How the post route maps store failures to responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Any failure in the retrieval sequence is a 404
    Strict,
    /// Primary failures are 503, secondary failures render without the extras
    #[default]
    Degraded,
}

/// What kind of page this is, for Open Graph and JSON-LD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Article,
    Website,
}

impl PageKind {
    pub const fn og_type(self) -> &'static str {
        match self {
            PageKind::Article => "article",
            PageKind::Website => "website",
        }
    }
}

/// Fixed per-page constants from site.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDef {
    /// Route path below the locale segment, e.g. `guides/freelance-rates`
    pub path: String,
    /// Directory holding `en.toml` and `nl.toml`, relative to the site root
    pub content: PathBuf,
    pub kind: PageKind,
    pub published: NaiveDate,
    pub modified: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A page with its content loaded for every locale
#[derive(Debug, Clone)]
pub struct Page {
    pub def: PageDef,
    pub content: Localized<PageContent>,
}

/// Post as displayed, after mapping from the store's field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_img: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub tags: Vec<String>,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the post route renders
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub post: PostView,
    pub related: Vec<PostView>,
    pub comments: Vec<CommentView>,
}

/// Reading time as shown next to a post, e.g. "5 min"
pub fn format_read_time(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m > 0 => format!("{} min", m),
        _ => "1 min".to_string(),
    }
}
