//! Per-locale page content.
//!
//! Each page keeps one bundle per locale (`en.toml`, `nl.toml`) in its
//! content directory. Both bundles deserialize into the same [`PageContent`]
//! shape, so a key the renderer needs cannot exist in one language only:
//! the page fails to load instead of rendering a hole.

use crate::error::{Error, Result};
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One value per locale. Selecting returns a whole branch, never a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: T,
    pub nl: T,
}

impl<T> Localized<T> {
    pub fn select(&self, locale: Locale) -> &T {
        match locale {
            Locale::En => &self.en,
            Locale::Nl => &self.nl,
        }
    }
}

/// Display strings for one page in one locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageContent {
    pub meta: MetaContent,
    pub hero: Hero,
    /// Label for this page in the breadcrumb trail
    pub breadcrumb: String,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<ComparisonTable>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    pub cta: Cta,
    #[serde(default)]
    pub related: Vec<RelatedLink>,
}

/// Head metadata text. Kept apart from the hero so the two can differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaContent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hero {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub heading: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonTable {
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cta {
    pub title: String,
    pub text: String,
    pub button: String,
    /// Site path without locale prefix, e.g. `/platforms/comparison`
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedLink {
    pub title: String,
    pub href: String,
}

/// File name of a locale's bundle inside a page content directory
pub fn bundle_file_name(locale: Locale) -> String {
    format!("{}.toml", locale.as_str())
}

/// Load both locale bundles of a page
pub fn load_page_content<P: AsRef<Path>>(dir: P, page: &str) -> Result<Localized<PageContent>> {
    let dir = dir.as_ref();
    Ok(Localized {
        en: load_bundle(dir, page, Locale::En)?,
        nl: load_bundle(dir, page, Locale::Nl)?,
    })
}

fn load_bundle(dir: &Path, page: &str, locale: Locale) -> Result<PageContent> {
    let path = dir.join(bundle_file_name(locale));
    let raw = fs::read_to_string(&path).map_err(|e| Error::Content {
        page: page.to_string(),
        locale: locale.to_string(),
        message: format!("cannot read {}: {}", path.display(), e),
    })?;
    parse_bundle_str(&raw, page, locale)
}

/// Parse one bundle from a string (useful for testing)
pub fn parse_bundle_str(raw: &str, page: &str, locale: Locale) -> Result<PageContent> {
    let content: PageContent = toml::from_str(raw).map_err(|e| Error::Content {
        page: page.to_string(),
        locale: locale.to_string(),
        message: e.message().to_string(),
    })?;

    if let Some(table) = &content.table {
        for (i, row) in table.rows.iter().enumerate() {
            if row.len() != table.headers.len() {
                return Err(Error::Content {
                    page: page.to_string(),
                    locale: locale.to_string(),
                    message: format!(
                        "table row {} has {} cells, expected {}",
                        i + 1,
                        row.len(),
                        table.headers.len()
                    ),
                });
            }
        }
    }

    Ok(content)
}
