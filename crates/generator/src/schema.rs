// schema.org JSON-LD records embedded in page heads

use crate::html::ui;
use crate::metadata::post_path;
use anyhow::{Context, Result};
use serde::Serialize;
use skilllinkup_core::{Locale, Page, PostView, Site};

const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub headline: String,
    pub description: String,
    pub author: Author,
    pub publisher: Organization,
    pub date_published: String,
    pub date_modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub in_language: &'static str,
    pub main_entity_of_page: WebPageRef,
}

/// Site author (an Organization) or post writer (a Person)
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub logo: ImageObject,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbListSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

fn publisher(site: &Site) -> Organization {
    Organization {
        schema_type: "Organization",
        name: site.info.name.clone(),
        logo: ImageObject {
            schema_type: "ImageObject",
            url: site.asset_url(&site.info.logo),
        },
    }
}

/// Article record for a content page, mirroring its metadata text
pub fn article_schema(site: &Site, page: &Page, locale: Locale) -> ArticleSchema {
    let meta = &page.content.select(locale).meta;
    ArticleSchema {
        context: SCHEMA_CONTEXT,
        schema_type: "Article",
        headline: meta.title.clone(),
        description: meta.description.clone(),
        author: Author {
            schema_type: "Organization",
            name: site.info.author.clone(),
        },
        publisher: publisher(site),
        date_published: page.def.published.to_string(),
        date_modified: page.def.modified.to_string(),
        image: page.def.image.as_deref().map(|i| site.asset_url(i)),
        in_language: locale.as_str(),
        main_entity_of_page: WebPageRef {
            schema_type: "WebPage",
            id: site.locale_url(locale, &page.def.path),
        },
    }
}

/// Article record for a store post
pub fn post_article_schema(site: &Site, post: &PostView, locale: Locale) -> ArticleSchema {
    let published = post.published_at.to_rfc3339();
    ArticleSchema {
        context: SCHEMA_CONTEXT,
        schema_type: "BlogPosting",
        headline: post.title.clone(),
        description: post
            .meta_description
            .clone()
            .or_else(|| post.excerpt.clone())
            .unwrap_or_else(|| post.title.clone()),
        author: Author {
            schema_type: "Person",
            name: post.author_name.clone(),
        },
        publisher: publisher(site),
        date_published: published.clone(),
        date_modified: published,
        image: post.feature_img.as_deref().map(|i| site.asset_url(i)),
        in_language: locale.as_str(),
        main_entity_of_page: WebPageRef {
            schema_type: "WebPage",
            id: site.locale_url(locale, &post_path(&post.slug)),
        },
    }
}

/// Home -> current page trail. `path` is the route below the locale.
pub fn breadcrumb_schema(site: &Site, locale: Locale, path: &str, name: &str) -> BreadcrumbListSchema {
    let mut items = vec![ListItem {
        schema_type: "ListItem",
        position: 1,
        name: ui(locale).home.to_string(),
        item: site.locale_url(locale, ""),
    }];
    if !path.trim_matches('/').is_empty() {
        items.push(ListItem {
            schema_type: "ListItem",
            position: 2,
            name: name.to_string(),
            item: site.locale_url(locale, path),
        });
    }

    BreadcrumbListSchema {
        context: SCHEMA_CONTEXT,
        schema_type: "BreadcrumbList",
        item_list_element: items,
    }
}

/// Serialize for embedding inside `<script type="application/ld+json">`.
///
/// `<` is written as `\u003c` so no string value can close the script element.
pub fn to_script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize structured data")?;
    Ok(json.replace('<', "\\u003c"))
}

/// A ready-to-embed `<script>` element
pub fn script_tag<T: Serialize>(value: &T) -> Result<String> {
    Ok(format!(
        r#"<script type="application/ld+json">{}</script>"#,
        to_script_json(value)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_post, sample_site};
    use serde_json::Value;

    #[test]
    fn test_article_json_has_headline_and_date() {
        let site = sample_site("https://example.test");
        for page in &site.pages {
            for locale in Locale::ALL {
                let json = to_script_json(&article_schema(&site, page, locale)).unwrap();
                let parsed: Value = serde_json::from_str(&json).unwrap();
                assert_eq!(parsed["@context"], "https://schema.org");
                assert_eq!(parsed["@type"], "Article");
                assert!(!parsed["headline"].as_str().unwrap().is_empty());
                assert!(!parsed["datePublished"].as_str().unwrap().is_empty());
                assert_eq!(parsed["inLanguage"], locale.as_str());
            }
        }
    }

    #[test]
    fn test_article_mirrors_metadata() {
        let site = sample_site("https://example.test");
        let page = site.page("guides/freelance-rates").unwrap();
        let article = article_schema(&site, page, Locale::Nl);
        assert_eq!(article.headline, page.content.nl.meta.title);
        assert_eq!(article.date_published, "2025-01-15");
        assert_eq!(article.date_modified, "2025-03-01");
        assert_eq!(
            article.main_entity_of_page.id,
            "https://example.test/nl/guides/freelance-rates"
        );
        assert_eq!(
            article.publisher.logo.url,
            "https://example.test/static/logo.png"
        );
    }

    #[test]
    fn test_author_type_follows_source() {
        let site = sample_site("https://example.test");
        let page = site.page("guides/freelance-rates").unwrap();
        let article: Value =
            serde_json::from_str(&to_script_json(&article_schema(&site, page, Locale::En)).unwrap())
                .unwrap();
        assert_eq!(article["author"]["@type"], "Organization");
        assert_eq!(article["author"]["name"], "SkillLinkup Team");

        let post: Value = serde_json::from_str(
            &to_script_json(&post_article_schema(&site, &sample_post(), Locale::En)).unwrap(),
        )
        .unwrap();
        assert_eq!(post["author"]["@type"], "Person");
        assert_eq!(post["author"]["name"], "Sanne de Vries");
    }

    #[test]
    fn test_breadcrumb_positions() {
        let site = sample_site("https://example.test");
        let crumbs = breadcrumb_schema(&site, Locale::Nl, "guides/freelance-rates", "Tarieven");
        let json: Value = serde_json::from_str(&to_script_json(&crumbs).unwrap()).unwrap();
        let items = json["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[0]["item"], "https://example.test/nl");
        assert_eq!(items[1]["name"], "Tarieven");
        assert_eq!(items[1]["item"], "https://example.test/nl/guides/freelance-rates");

        let home = breadcrumb_schema(&site, Locale::En, "", "Home");
        assert_eq!(home.item_list_element.len(), 1);
    }

    #[test]
    fn test_post_schema() {
        let site = sample_site("https://example.test");
        let post = sample_post();
        let json: Value =
            serde_json::from_str(&to_script_json(&post_article_schema(&site, &post, Locale::En)).unwrap())
                .unwrap();
        assert_eq!(json["@type"], "BlogPosting");
        assert_eq!(json["headline"], post.title.as_str());
        assert_eq!(json["author"]["name"], post.author_name.as_str());
        assert_eq!(json["datePublished"], "2025-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_script_json_cannot_close_script() {
        let site = sample_site("https://example.test");
        let mut post = sample_post();
        post.title = "</script><script>alert(1)</script>".to_string();
        let tag = script_tag(&post_article_schema(&site, &post, Locale::En)).unwrap();
        assert_eq!(tag.matches("</script>").count(), 1);
        assert!(tag.ends_with("</script>"));

        let json = to_script_json(&post_article_schema(&site, &post, Locale::En)).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["headline"], "</script><script>alert(1)</script>");
    }
}
