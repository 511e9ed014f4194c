// Page rendering: head metadata, JSON-LD, HTML documents, sitemap

pub mod html;
pub mod metadata;
pub mod render;
pub mod schema;
pub mod sitemap;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use skilllinkup_core::{Locale, Site};

pub use metadata::{MetadataRecord, build_metadata, build_post_metadata};
pub use render::{RenderOptions, render_not_found, render_page, render_post, render_unavailable};
pub use sitemap::{robots_txt, sitemap_xml};

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

/// Output file for a page route, e.g. `nl/guides/rates/index.html`
pub fn page_file_path(locale: Locale, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("{}/index.html", locale)
    } else {
        format!("{}/{}/index.html", locale, path)
    }
}

/// Render every content page in every locale, plus crawler files.
///
/// Posts are not included: they only exist in the post store.
pub fn generate_site(site: &Site, options: RenderOptions) -> Result<GeneratedSite> {
    let mut pages = Vec::with_capacity(site.pages.len() * Locale::ALL.len() + 1);
    for page in &site.pages {
        for locale in Locale::ALL {
            let html = render_page(site, page, locale, options)
                .with_context(|| format!("Failed to render {}/{}", locale, page.def.path))?;
            pages.push((page_file_path(locale, &page.def.path), html));
        }
    }
    pages.push(("404.html".to_string(), render_not_found(site, site.info.default_locale, options)));

    let root_redirect = format!(
        "<!DOCTYPE html>\n<html><head><meta http-equiv=\"refresh\" content=\"0; url=/{0}\"><link rel=\"canonical\" href=\"{1}\"></head><body><a href=\"/{0}\">{1}</a></body></html>\n",
        site.info.default_locale,
        site.locale_url(site.info.default_locale, "")
    );

    let assets = vec![
        ("index.html".to_string(), root_redirect.into_bytes()),
        ("sitemap.xml".to_string(), sitemap_xml(site).into_bytes()),
        ("robots.txt".to_string(), robots_txt(site).into_bytes()),
    ];

    tracing::debug!(pages = pages.len(), assets = assets.len(), "site generated");

    Ok(GeneratedSite { pages, assets })
}
