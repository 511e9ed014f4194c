//! Head metadata for content pages and posts.
//!
//! Title and description come from a page's `meta` bundle table, not from
//! its hero text, so the two are free to differ.

use crate::html::html_escape;
use serde::Serialize;
use skilllinkup_core::{Locale, Page, PageKind, PostView, Site};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub alternates: Alternates,
    pub robots: Robots,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    pub alternate_locale: Vec<String>,
    #[serde(rename = "type")]
    pub og_type: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternates {
    pub canonical: String,
    /// `(hreflang, url)` pairs, including `x-default`
    pub languages: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

impl Robots {
    pub const INDEX: Robots = Robots {
        index: true,
        follow: true,
    };
    pub const NO_INDEX: Robots = Robots {
        index: false,
        follow: true,
    };

    pub fn directive(&self) -> String {
        format!(
            "{}, {}",
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" }
        )
    }
}

/// Inputs shared by every metadata record
struct MetaParts<'a> {
    site: &'a Site,
    locale: Locale,
    /// Route below the locale segment
    path: &'a str,
    title: String,
    description: String,
    keywords: Vec<String>,
    og_type: &'static str,
    image: Option<&'a str>,
    published_time: Option<String>,
    modified_time: Option<String>,
    robots: Robots,
}

fn assemble(parts: MetaParts<'_>) -> MetadataRecord {
    let site = parts.site;
    let canonical = site.locale_url(parts.locale, parts.path);
    let image = site.asset_url(parts.image.unwrap_or(&site.info.logo));

    let mut languages: Vec<(String, String)> = Locale::ALL
        .iter()
        .map(|l| (l.as_str().to_string(), site.locale_url(*l, parts.path)))
        .collect();
    languages.push((
        "x-default".to_string(),
        site.locale_url(site.info.default_locale, parts.path),
    ));

    MetadataRecord {
        title: parts.title.clone(),
        description: parts.description.clone(),
        keywords: parts.keywords,
        open_graph: OpenGraph {
            title: parts.title.clone(),
            description: parts.description.clone(),
            url: canonical.clone(),
            site_name: site.info.name.clone(),
            locale: parts.locale.og_locale().to_string(),
            alternate_locale: Locale::ALL
                .iter()
                .filter(|l| **l != parts.locale)
                .map(|l| l.og_locale().to_string())
                .collect(),
            og_type: parts.og_type.to_string(),
            images: vec![image.clone()],
            published_time: parts.published_time,
            modified_time: parts.modified_time,
        },
        twitter: TwitterCard {
            card: "summary_large_image".to_string(),
            title: parts.title,
            description: parts.description,
            images: vec![image],
            creator: site.info.twitter.clone(),
        },
        alternates: Alternates {
            canonical,
            languages,
        },
        robots: parts.robots,
    }
}

/// Metadata for a content page in one locale
pub fn build_metadata(site: &Site, page: &Page, locale: Locale) -> MetadataRecord {
    let meta = &page.content.select(locale).meta;
    let is_article = page.def.kind == PageKind::Article;

    assemble(MetaParts {
        site,
        locale,
        path: &page.def.path,
        title: meta.title.clone(),
        description: meta.description.clone(),
        keywords: meta.keywords.clone(),
        og_type: page.def.kind.og_type(),
        image: page.def.image.as_deref(),
        published_time: is_article.then(|| page.def.published.to_string()),
        modified_time: is_article.then(|| page.def.modified.to_string()),
        robots: Robots::INDEX,
    })
}

/// Metadata for a blog post fetched from the store
pub fn build_post_metadata(site: &Site, post: &PostView, locale: Locale) -> MetadataRecord {
    let path = post_path(&post.slug);
    let description = post
        .meta_description
        .clone()
        .or_else(|| post.excerpt.clone())
        .unwrap_or_else(|| summarize(&post.content, 160));

    assemble(MetaParts {
        site,
        locale,
        path: &path,
        title: post.meta_title.clone().unwrap_or_else(|| post.title.clone()),
        description,
        keywords: post.tags.clone(),
        og_type: "article",
        image: post.feature_img.as_deref(),
        published_time: Some(post.published_at.to_rfc3339()),
        modified_time: None,
        robots: Robots::INDEX,
    })
}

/// Metadata for error pages: not indexed, canonical to the locale home
pub fn build_error_metadata(site: &Site, locale: Locale, title: &str) -> MetadataRecord {
    assemble(MetaParts {
        site,
        locale,
        path: "",
        title: title.to_string(),
        description: title.to_string(),
        keywords: vec![],
        og_type: "website",
        image: None,
        published_time: None,
        modified_time: None,
        robots: Robots::NO_INDEX,
    })
}

/// Route of a post below the locale segment
pub fn post_path(slug: &str) -> String {
    format!("post/{}", slug)
}

/// Plain-text prefix of markdown, cut at a word boundary
fn summarize(markdown: &str, max_chars: usize) -> String {
    let text: String = markdown
        .split_whitespace()
        .map(|w| w.trim_matches(|c| matches!(c, '#' | '*' | '_' | '`' | '>')))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(i) => format!("{}…", &cut[..i]),
        None => format!("{}…", cut),
    }
}

/// Render the record as `<head>` tags
pub fn render_head_tags(meta: &MetadataRecord) -> String {
    let mut tags = vec![
        format!("<title>{}</title>", html_escape(&meta.title)),
        meta_name("description", &meta.description),
    ];
    if !meta.keywords.is_empty() {
        tags.push(meta_name("keywords", &meta.keywords.join(", ")));
    }
    tags.push(meta_name("robots", &meta.robots.directive()));
    tags.push(format!(
        r#"<link rel="canonical" href="{}">"#,
        html_escape(&meta.alternates.canonical)
    ));
    for (lang, url) in &meta.alternates.languages {
        tags.push(format!(
            r#"<link rel="alternate" hreflang="{}" href="{}">"#,
            html_escape(lang),
            html_escape(url)
        ));
    }

    let og = &meta.open_graph;
    tags.push(meta_property("og:title", &og.title));
    tags.push(meta_property("og:description", &og.description));
    tags.push(meta_property("og:url", &og.url));
    tags.push(meta_property("og:site_name", &og.site_name));
    tags.push(meta_property("og:locale", &og.locale));
    for alt in &og.alternate_locale {
        tags.push(meta_property("og:locale:alternate", alt));
    }
    tags.push(meta_property("og:type", &og.og_type));
    for image in &og.images {
        tags.push(meta_property("og:image", image));
    }
    if let Some(published) = &og.published_time {
        tags.push(meta_property("article:published_time", published));
    }
    if let Some(modified) = &og.modified_time {
        tags.push(meta_property("article:modified_time", modified));
    }

    let tw = &meta.twitter;
    tags.push(meta_name("twitter:card", &tw.card));
    tags.push(meta_name("twitter:title", &tw.title));
    tags.push(meta_name("twitter:description", &tw.description));
    for image in &tw.images {
        tags.push(meta_name("twitter:image", image));
    }
    if let Some(creator) = &tw.creator {
        tags.push(meta_name("twitter:creator", creator));
    }

    tags.join("\n    ")
}

fn meta_name(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        html_escape(name),
        html_escape(content)
    )
}

fn meta_property(property: &str, content: &str) -> String {
    format!(
        r#"<meta property="{}" content="{}">"#,
        html_escape(property),
        html_escape(content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_post, sample_site};

    #[test]
    fn test_canonical_follows_site_url_locale_and_path() {
        let site = sample_site("https://example.test");
        for page in &site.pages {
            for locale in Locale::ALL {
                let meta = build_metadata(&site, page, locale);
                let expected = if page.def.path.is_empty() {
                    format!("https://example.test/{}", locale)
                } else {
                    format!("https://example.test/{}/{}", locale, page.def.path)
                };
                assert_eq!(meta.alternates.canonical, expected);
                assert_eq!(meta.open_graph.url, expected);
            }
        }
    }

    #[test]
    fn test_metadata_uses_selected_locale_only() {
        let site = sample_site("https://example.test");
        let page = site.page("guides/freelance-rates").unwrap();

        let nl = build_metadata(&site, page, Locale::Nl);
        assert_eq!(nl.title, page.content.nl.meta.title);
        assert_eq!(nl.open_graph.locale, "nl_NL");
        assert_eq!(nl.open_graph.alternate_locale, vec!["en_US".to_string()]);

        let fallback = build_metadata(&site, page, Locale::resolve("de"));
        assert_eq!(fallback.title, page.content.en.meta.title);
        assert_eq!(fallback.description, page.content.en.meta.description);
    }

    #[test]
    fn test_hreflang_alternates() {
        let site = sample_site("https://example.test");
        let page = site.page("guides/freelance-rates").unwrap();
        let meta = build_metadata(&site, page, Locale::En);
        assert_eq!(
            meta.alternates.languages,
            vec![
                (
                    "en".to_string(),
                    "https://example.test/en/guides/freelance-rates".to_string()
                ),
                (
                    "nl".to_string(),
                    "https://example.test/nl/guides/freelance-rates".to_string()
                ),
                (
                    "x-default".to_string(),
                    "https://example.test/en/guides/freelance-rates".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_article_times_and_image() {
        let site = sample_site("https://example.test");
        let page = site.page("guides/freelance-rates").unwrap();
        let meta = build_metadata(&site, page, Locale::En);
        assert_eq!(meta.open_graph.og_type, "article");
        assert_eq!(meta.open_graph.published_time.as_deref(), Some("2025-01-15"));
        assert_eq!(meta.open_graph.modified_time.as_deref(), Some("2025-03-01"));
        assert_eq!(
            meta.open_graph.images,
            vec!["https://example.test/static/og/rates.png".to_string()]
        );
        assert_eq!(meta.twitter.card, "summary_large_image");
        assert_eq!(meta.robots.directive(), "index, follow");
    }

    #[test]
    fn test_website_page_has_no_article_times() {
        let site = sample_site("https://example.test");
        let home = site.page("").unwrap();
        let meta = build_metadata(&site, home, Locale::Nl);
        assert_eq!(meta.open_graph.og_type, "website");
        assert!(meta.open_graph.published_time.is_none());
        // falls back to the site logo
        assert_eq!(
            meta.open_graph.images,
            vec!["https://example.test/static/logo.png".to_string()]
        );
    }

    #[test]
    fn test_post_metadata_prefers_meta_fields() {
        let site = sample_site("https://example.test");
        let mut post = sample_post();
        post.meta_title = Some("Upwork of Fiverr? | SkillLinkup".to_string());
        post.meta_description = Some("Eerlijke vergelijking".to_string());

        let meta = build_post_metadata(&site, &post, Locale::Nl);
        assert_eq!(meta.title, "Upwork of Fiverr? | SkillLinkup");
        assert_eq!(meta.description, "Eerlijke vergelijking");
        assert_eq!(
            meta.alternates.canonical,
            "https://example.test/nl/post/upwork-vs-fiverr"
        );
        assert_eq!(meta.keywords, post.tags);
    }

    #[test]
    fn test_post_metadata_falls_back_to_content() {
        let site = sample_site("https://example.test");
        let mut post = sample_post();
        post.meta_title = None;
        post.meta_description = None;
        post.excerpt = None;
        post.content = "## Intro\n\nUpwork and **Fiverr** compared.".to_string();

        let meta = build_post_metadata(&site, &post, Locale::En);
        assert_eq!(meta.title, post.title);
        assert_eq!(meta.description, "Intro Upwork and Fiverr compared.");
    }

    #[test]
    fn test_summarize_cuts_at_word() {
        let text = "one two three four five";
        assert_eq!(summarize(text, 11), "one two…");
        assert_eq!(summarize(text, 100), text);
    }

    #[test]
    fn test_error_metadata_not_indexed() {
        let site = sample_site("https://example.test");
        let meta = build_error_metadata(&site, Locale::En, "Page not found");
        assert_eq!(meta.robots.directive(), "noindex, follow");
    }

    #[test]
    fn test_head_tags_escape_values() {
        let site = sample_site("https://example.test");
        let mut post = sample_post();
        post.meta_title = Some("Tips & \"tricks\"".to_string());
        let head = render_head_tags(&build_post_metadata(&site, &post, Locale::En));
        assert!(head.contains("<title>Tips &amp; &quot;tricks&quot;</title>"));
        assert!(head.contains(r#"<meta property="og:title" content="Tips &amp; &quot;tricks&quot;">"#));
        assert!(head.contains(r#"<link rel="alternate" hreflang="nl""#));
        assert!(head.contains(r#"<meta name="twitter:creator" content="@skilllinkup">"#));
    }
}
