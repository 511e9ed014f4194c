use crate::content::load_page_content;
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::types::*;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the site manifest inside a site directory
pub const MANIFEST_FILE: &str = "site.toml";

/// Environment variables consulted for the base URL, in priority order
pub const SITE_URL_VARS: &[&str] = &["SITE_URL", "NEXT_PUBLIC_SITE_URL"];

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSiteInfo,
    #[serde(default)]
    store: Option<RawStoreConfig>,
    #[serde(default)]
    page: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawSiteInfo {
    name: String,
    url: Option<String>,
    #[serde(default = "default_locale")]
    default_locale: String,
    author: String,
    logo: String,
    twitter: Option<String>,
}

fn default_locale() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
struct RawStoreConfig {
    base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default)]
    max_retries: u32,
    #[serde(default = "default_related_limit")]
    related_limit: usize,
    #[serde(default)]
    failure_policy: FailurePolicy,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_related_limit() -> usize {
    3
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    path: String,
    content: String,
    #[serde(default)]
    kind: PageKind,
    published: String, // Parse as NaiveDate
    modified: Option<String>,
    image: Option<String>,
}

/// The manifest with page content not yet loaded
#[derive(Debug, Clone)]
pub struct Manifest {
    pub info: SiteInfo,
    pub store: Option<StoreConfig>,
    pub pages: Vec<PageDef>,
}

/// Read the site URL override from the environment
pub fn site_url_from_env() -> Option<String> {
    SITE_URL_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.trim().is_empty())
}

/// Load a site directory: manifest plus every page's locale bundles
pub fn load_site<P: AsRef<Path>>(dir: P) -> Result<Site> {
    let dir = dir.as_ref();
    let raw = fs::read_to_string(dir.join(MANIFEST_FILE))?;
    let manifest = parse_site_toml_str(&raw, site_url_from_env())?;
    load_pages(dir, manifest)
}

/// Load page content for an already parsed manifest
pub fn load_pages(dir: &Path, manifest: Manifest) -> Result<Site> {
    let pages = manifest
        .pages
        .into_iter()
        .map(|def| {
            let content = load_page_content(dir.join(&def.content), &page_label(&def))?;
            Ok(Page { def, content })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(pages = pages.len(), url = %manifest.info.url, "site loaded");

    Ok(Site {
        info: manifest.info,
        store: manifest.store,
        pages,
    })
}

fn page_label(def: &PageDef) -> String {
    if def.path.is_empty() {
        "home".to_string()
    } else {
        def.path.clone()
    }
}

/// Parse site.toml from a string (useful for testing)
///
/// `env_url` wins over the manifest's `url`; with neither set the
/// hard-coded fallback is used.
pub fn parse_site_toml_str(content: &str, env_url: Option<String>) -> Result<Manifest> {
    let raw: RawConfig = toml::from_str(content)?;

    let url = match env_url.or(raw.site.url) {
        Some(url) => normalize_url(&url)?,
        None => {
            tracing::debug!("no site URL configured, using {}", FALLBACK_SITE_URL);
            FALLBACK_SITE_URL.to_string()
        }
    };

    let default_locale = Locale::parse(&raw.site.default_locale).ok_or_else(|| {
        Error::ConfigParse(format!(
            "Unsupported default_locale '{}', expected 'en' or 'nl'",
            raw.site.default_locale
        ))
    })?;

    let info = SiteInfo {
        name: raw.site.name,
        url,
        default_locale,
        author: raw.site.author,
        logo: raw.site.logo,
        twitter: raw.site.twitter,
    };

    let store = raw
        .store
        .map(|s| {
            if s.related_limit == 0 {
                return Err(Error::ConfigParse(
                    "store.related_limit must be at least 1".to_string(),
                ));
            }
            Ok(StoreConfig {
                base_url: normalize_url(&s.base_url)?,
                timeout: Duration::from_secs(s.timeout_secs),
                max_retries: s.max_retries,
                related_limit: s.related_limit,
                failure_policy: s.failure_policy,
            })
        })
        .transpose()?;

    let mut seen = HashSet::new();
    let pages = raw
        .page
        .into_iter()
        .map(|p| {
            let path = validate_route_path(&p.path)?;
            if !seen.insert(path.clone()) {
                return Err(Error::ConfigParse(format!("Duplicate page path '{}'", path)));
            }

            let published = parse_date(&p.published, "page.published")?;
            let modified = match p.modified {
                Some(m) => parse_date(&m, "page.modified")?,
                None => published,
            };
            if modified < published {
                return Err(Error::ConfigParse(format!(
                    "page '{}' modified date is before its published date",
                    path
                )));
            }

            Ok(PageDef {
                path,
                content: validate_path(&p.content, "page.content")?,
                kind: p.kind,
                published,
                modified,
                image: p.image,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Manifest { info, store, pages })
}

fn parse_date(value: &str, field_name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::ConfigParse(format!("Invalid {}: {}", field_name, e)))
}

fn normalize_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::ConfigParse(format!(
            "URL must start with http:// or https://: '{}'",
            url
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a page route path.
///
/// Paths are lowercase slugs separated by `/`. The empty path is the
/// locale home page. `post` is reserved for the dynamic post route.
fn validate_route_path(path: &str) -> Result<String> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Ok(String::new());
    }

    for segment in path.split('/') {
        let valid = !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(Error::ConfigParse(format!(
                "Invalid page path '{}': segments must be lowercase slugs",
                path
            )));
        }
    }

    if path == "post" || path.starts_with("post/") {
        return Err(Error::ConfigParse(format!(
            "Invalid page path '{}': 'post' is reserved for blog posts",
            path
        )));
    }

    Ok(path.to_string())
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references so a manifest
/// cannot read content from outside the site directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    Ok(path.to_path_buf())
}
