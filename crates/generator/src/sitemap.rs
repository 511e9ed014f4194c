use crate::html::html_escape;
use skilllinkup_core::{Locale, Site};

/// sitemap.xml with one `<url>` per page and locale, cross-linked by hreflang
pub fn sitemap_xml(site: &Site) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for page in &site.pages {
        let alternates: String = Locale::ALL
            .iter()
            .map(|l| {
                format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                    l,
                    html_escape(&site.locale_url(*l, &page.def.path))
                )
            })
            .collect();

        for locale in Locale::ALL {
            out.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n{}  </url>\n",
                html_escape(&site.locale_url(locale, &page.def.path)),
                page.def.modified,
                alternates
            ));
        }
    }

    out.push_str("</urlset>\n");
    out
}

pub fn robots_txt(site: &Site) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        site.info.url
    )
}
