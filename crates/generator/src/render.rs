use crate::html::{format_date, html_escape, locale_href, other_locale, ui};
use crate::metadata::{
    MetadataRecord, build_error_metadata, build_metadata, build_post_metadata, post_path,
    render_head_tags,
};
use crate::schema::{article_schema, breadcrumb_schema, post_article_schema, script_tag};
use anyhow::Result;
use pulldown_cmark::{Options, Parser, html};
use skilllinkup_core::content::{ComparisonTable, Cta, RelatedLink, Section, Stat, Tool};
use skilllinkup_core::{Locale, Page, PostPage, PostView, Site, format_read_time};

/// Output switches shared by the server and the static build
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Inject the SSE reload script (serve --watch)
    pub live_reload: bool,
}

const STYLESHEET: &str = r#"
        :root {
            --primary: #2563eb;
            --primary-dark: #1d4ed8;
            --text: #1f2937;
            --muted: #6b7280;
            --surface: #f8fafc;
            --border: #e5e7eb;
        }
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            color: var(--text);
            background: #ffffff;
        }
        header.site, footer.site {
            max-width: 1000px;
            margin: 0 auto;
            padding: 1rem 1.5rem;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        footer.site { color: var(--muted); font-size: 0.9rem; border-top: 1px solid var(--border); }
        main { max-width: 1000px; margin: 0 auto; padding: 0 1.5rem 3rem; }
        a { color: var(--primary); }
        .hero { padding: 3rem 0 2rem; }
        .hero .badge {
            display: inline-block;
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 999px;
            padding: 0.25rem 0.75rem;
            font-size: 0.85rem;
            margin-bottom: 1rem;
        }
        .hero h1 { font-size: 2.5rem; line-height: 1.2; margin-bottom: 0.75rem; }
        .hero p { font-size: 1.2rem; color: var(--muted); }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 1rem; margin: 2rem 0; }
        .stat { background: var(--surface); border-radius: 8px; padding: 1.25rem; text-align: center; }
        .stat strong { display: block; font-size: 1.8rem; color: var(--primary); }
        section { margin: 2.5rem 0; }
        section h2 { font-size: 1.6rem; margin-bottom: 0.75rem; }
        section p { margin-bottom: 0.75rem; }
        section ul { padding-left: 1.25rem; }
        table { width: 100%; border-collapse: collapse; margin: 1rem 0; }
        caption { text-align: left; font-weight: 600; margin-bottom: 0.5rem; }
        th, td { border: 1px solid var(--border); padding: 0.6rem; text-align: left; }
        th { background: var(--surface); }
        .tools { display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 1rem; }
        .tool { border: 1px solid var(--border); border-radius: 8px; padding: 1.25rem; }
        .tool h3 { margin-bottom: 0.5rem; }
        .cta { background: var(--primary); color: #fff; border-radius: 12px; padding: 2rem; text-align: center; }
        .cta a.button {
            display: inline-block;
            margin-top: 1rem;
            background: #fff;
            color: var(--primary-dark);
            padding: 0.75rem 1.5rem;
            border-radius: 8px;
            text-decoration: none;
            font-weight: 600;
        }
        .related ul { list-style: none; }
        .related li { padding: 0.5rem 0; border-bottom: 1px solid var(--border); }
        .post-meta { color: var(--muted); font-size: 0.95rem; margin: 0.5rem 0 1.5rem; }
        .post-body img, .feature-img { max-width: 100%; border-radius: 8px; }
        .post-body h2 { margin: 1.5rem 0 0.75rem; }
        .post-body p { margin-bottom: 1rem; }
        .tags span { background: var(--surface); border-radius: 4px; padding: 0.2rem 0.5rem; margin-right: 0.25rem; font-size: 0.85rem; }
        .comment { border-bottom: 1px solid var(--border); padding: 0.75rem 0; }
"#;

const RELOAD_SCRIPT: &str = r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => {
            console.log('Reloading...');
            location.reload();
        };
        eventSource.onerror = () => {
            console.log('Site server disconnected');
            eventSource.close();
        };
    </script>"#;

/// Wrap a body in the full document with head metadata and JSON-LD
fn document(
    site: &Site,
    locale: Locale,
    path: &str,
    meta: &MetadataRecord,
    json_ld: &[String],
    body: &str,
    options: RenderOptions,
) -> String {
    let strings = ui(locale);
    let switch_to = other_locale(locale);
    let switch_href = locale_href(switch_to, path);
    let reload_script = if options.live_reload { RELOAD_SCRIPT } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {head}
    {json_ld}
    <style>{style}</style>
</head>
<body>
    <header class="site">
        <a class="brand" href="{home}">{name}</a>
        <a class="lang-switch" hreflang="{switch_lang}" href="{switch_href}">{switch_label}</a>
    </header>
    <main>
{body}
    </main>
    <footer class="site">
        <span>&copy; {name}</span>
        <span>{language}</span>
    </footer>
    {reload_script}
</body>
</html>"#,
        lang = locale,
        head = render_head_tags(meta),
        json_ld = json_ld.join("\n    "),
        style = STYLESHEET,
        home = locale_href(locale, "/"),
        name = html_escape(&site.info.name),
        switch_lang = switch_to,
        switch_href = html_escape(&switch_href),
        switch_label = strings.switch_language,
        body = body,
        language = strings.language_name,
        reload_script = reload_script,
    )
}

/// Render a content page in one locale.
///
/// Everything on the page comes from the one branch `locale` selects.
pub fn render_page(site: &Site, page: &Page, locale: Locale, options: RenderOptions) -> Result<String> {
    let content = page.content.select(locale);
    let meta = build_metadata(site, page, locale);
    let json_ld = vec![
        script_tag(&article_schema(site, page, locale))?,
        script_tag(&breadcrumb_schema(
            site,
            locale,
            &page.def.path,
            &content.breadcrumb,
        ))?,
    ];

    let mut body = String::new();
    body.push_str(&render_hero(
        content.hero.badge.as_deref(),
        &content.hero.title,
        &content.hero.subtitle,
    ));
    body.push_str(&render_stats(&content.stats));
    for section in &content.sections {
        body.push_str(&render_section(section));
    }
    if let Some(table) = &content.table {
        body.push_str(&render_table(table));
    }
    body.push_str(&render_tools(&content.tools));
    body.push_str(&render_cta(&content.cta, locale));
    body.push_str(&render_link_list(ui(locale).related, &content.related, locale));

    Ok(document(site, locale, &page.def.path, &meta, &json_ld, &body, options))
}

fn render_hero(badge: Option<&str>, title: &str, subtitle: &str) -> String {
    let badge_html = badge
        .map(|b| format!(r#"<span class="badge">{}</span>"#, html_escape(b)))
        .unwrap_or_default();
    format!(
        r#"        <div class="hero">
            {}
            <h1>{}</h1>
            <p>{}</p>
        </div>
"#,
        badge_html,
        html_escape(title),
        html_escape(subtitle)
    )
}

fn render_stats(stats: &[Stat]) -> String {
    if stats.is_empty() {
        return String::new();
    }
    let items: String = stats
        .iter()
        .map(|s| {
            format!(
                r#"<div class="stat"><strong>{}</strong><span>{}</span></div>"#,
                html_escape(&s.value),
                html_escape(&s.label)
            )
        })
        .collect();
    format!("        <div class=\"stats\">{}</div>\n", items)
}

fn render_section(section: &Section) -> String {
    let paragraphs: String = section
        .paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", html_escape(p)))
        .collect();
    let bullets = if section.bullets.is_empty() {
        String::new()
    } else {
        let items: String = section
            .bullets
            .iter()
            .map(|b| format!("<li>{}</li>", html_escape(b)))
            .collect();
        format!("<ul>{}</ul>", items)
    };
    format!(
        "        <section>\n            <h2>{}</h2>\n            {}{}\n        </section>\n",
        html_escape(&section.heading),
        paragraphs,
        bullets
    )
}

fn render_table(table: &ComparisonTable) -> String {
    let headers: String = table
        .headers
        .iter()
        .map(|h| format!(r#"<th scope="col">{}</th>"#, html_escape(h)))
        .collect();
    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|c| format!("<td>{}</td>", html_escape(c)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        "        <section class=\"comparison\">\n            <table><caption>{}</caption><thead><tr>{}</tr></thead><tbody>{}</tbody></table>\n        </section>\n",
        html_escape(&table.caption),
        headers,
        rows
    )
}

fn render_tools(tools: &[Tool]) -> String {
    if tools.is_empty() {
        return String::new();
    }
    let cards: String = tools
        .iter()
        .map(|tool| {
            let name = match &tool.url {
                Some(url) => format!(
                    r#"<a href="{}" rel="noopener" target="_blank">{}</a>"#,
                    html_escape(url),
                    html_escape(&tool.name)
                ),
                None => html_escape(&tool.name),
            };
            let tips = if tool.tips.is_empty() {
                String::new()
            } else {
                let items: String = tool
                    .tips
                    .iter()
                    .map(|t| format!("<li>{}</li>", html_escape(t)))
                    .collect();
                format!("<ul>{}</ul>", items)
            };
            format!(
                r#"<div class="tool"><h3>{}</h3><p>{}</p>{}</div>"#,
                name,
                html_escape(&tool.description),
                tips
            )
        })
        .collect();
    format!("        <section class=\"tools\">{}</section>\n", cards)
}

fn render_cta(cta: &Cta, locale: Locale) -> String {
    format!(
        r#"        <section class="cta">
            <h2>{}</h2>
            <p>{}</p>
            <a class="button" href="{}">{}</a>
        </section>
"#,
        html_escape(&cta.title),
        html_escape(&cta.text),
        html_escape(&locale_href(locale, &cta.href)),
        html_escape(&cta.button)
    )
}

fn render_link_list(heading: &str, links: &[RelatedLink], locale: Locale) -> String {
    if links.is_empty() {
        return String::new();
    }
    let items: String = links
        .iter()
        .map(|l| {
            format!(
                r#"<li><a href="{}">{}</a></li>"#,
                html_escape(&locale_href(locale, &l.href)),
                html_escape(&l.title)
            )
        })
        .collect();
    format!(
        "        <section class=\"related\">\n            <h2>{}</h2>\n            <ul>{}</ul>\n        </section>\n",
        html_escape(heading),
        items
    )
}

/// Markdown post body to HTML.
///
/// Raw HTML inside the markdown is passed through; post bodies come from
/// the editorial store, not from visitors.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Render the dynamic post route
pub fn render_post(site: &Site, page: &PostPage, locale: Locale, options: RenderOptions) -> Result<String> {
    let post = &page.post;
    let strings = ui(locale);
    let path = post_path(&post.slug);
    let meta = build_post_metadata(site, post, locale);
    let json_ld = vec![
        script_tag(&post_article_schema(site, post, locale))?,
        script_tag(&breadcrumb_schema(site, locale, &path, &post.title))?,
    ];

    let category = post
        .category_name
        .as_deref()
        .map(|c| format!(r#"<span class="badge">{}</span>"#, html_escape(c)))
        .unwrap_or_default();
    let feature = post
        .feature_img
        .as_deref()
        .map(|src| {
            format!(
                r#"<img class="feature-img" src="{}" alt="{}">"#,
                html_escape(src),
                html_escape(&post.title)
            )
        })
        .unwrap_or_default();
    let tags = if post.tags.is_empty() {
        String::new()
    } else {
        let spans: String = post
            .tags
            .iter()
            .map(|t| format!("<span>#{}</span>", html_escape(t)))
            .collect();
        format!(r#"<div class="tags">{}</div>"#, spans)
    };

    let mut body = format!(
        r#"        <article>
            <div class="hero">
                {category}
                <h1>{title}</h1>
                <div class="post-meta">{by} {author} &middot; {published} <time datetime="{datetime}">{date}</time> &middot; {read_time} {read} &middot; {views} {views_label}</div>
            </div>
            {feature}
            <div class="post-body">{content}</div>
            {tags}
        </article>
"#,
        category = category,
        title = html_escape(&post.title),
        by = strings.by,
        author = html_escape(&post.author_name),
        published = strings.published,
        datetime = post.published_at.to_rfc3339(),
        date = format_date(&post.published_at, locale),
        read_time = format_read_time(post.read_time),
        read = strings.read_time,
        views = post.views,
        views_label = strings.views,
        feature = feature,
        content = markdown_to_html(&post.content),
        tags = tags,
    );

    body.push_str(&render_comments(page, locale));
    body.push_str(&render_related_posts(&page.related, locale));

    Ok(document(site, locale, &path, &meta, &json_ld, &body, options))
}

fn render_comments(page: &PostPage, locale: Locale) -> String {
    let strings = ui(locale);
    let list = if page.comments.is_empty() {
        format!("<p>{}</p>", strings.no_comments)
    } else {
        page.comments
            .iter()
            .map(|c| {
                format!(
                    r#"<div class="comment"><strong>{}</strong> <time datetime="{}">{}</time><p>{}</p></div>"#,
                    html_escape(&c.author_name),
                    c.created_at.to_rfc3339(),
                    format_date(&c.created_at, locale),
                    html_escape(&c.content)
                )
            })
            .collect()
    };
    format!(
        "        <section class=\"comments\">\n            <h2>{} ({})</h2>\n            {}\n        </section>\n",
        strings.comments,
        page.comments.len(),
        list
    )
}

fn render_related_posts(related: &[PostView], locale: Locale) -> String {
    let links: Vec<RelatedLink> = related
        .iter()
        .map(|p| RelatedLink {
            title: p.title.clone(),
            href: format!("/{}", post_path(&p.slug)),
        })
        .collect();
    render_link_list(ui(locale).related_posts, &links, locale)
}

/// Localized 404 page
pub fn render_not_found(site: &Site, locale: Locale, options: RenderOptions) -> String {
    let strings = ui(locale);
    render_error(site, locale, strings.not_found_title, strings.not_found_text, options)
}

/// Localized 503 page for a post store outage
pub fn render_unavailable(site: &Site, locale: Locale, options: RenderOptions) -> String {
    let strings = ui(locale);
    render_error(
        site,
        locale,
        strings.unavailable_title,
        strings.unavailable_text,
        options,
    )
}

fn render_error(site: &Site, locale: Locale, title: &str, text: &str, options: RenderOptions) -> String {
    let meta = build_error_metadata(site, locale, title);
    let body = format!(
        r#"        <div class="hero">
            <h1>{}</h1>
            <p>{}</p>
            <p><a href="{}">{}</a></p>
        </div>
"#,
        html_escape(title),
        html_escape(text),
        locale_href(locale, "/"),
        ui(locale).back_home
    );
    document(site, locale, "", &meta, &[], &body, options)
}
