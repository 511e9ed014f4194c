// Fixtures shared by the generator tests

use chrono::{NaiveDate, TimeZone, Utc};
use skilllinkup_core::content::{
    ComparisonTable, Cta, Hero, MetaContent, RelatedLink, Section, Stat, Tool,
};
use skilllinkup_core::{
    Locale, Localized, Page, PageContent, PageDef, PageKind, PostView, Site, SiteInfo,
};
use std::path::PathBuf;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn content(
    title: &str,
    hero: &str,
    stat_label: &str,
    cta_button: &str,
    table: Option<ComparisonTable>,
    tools: Vec<Tool>,
) -> PageContent {
    PageContent {
        meta: MetaContent {
            title: title.to_string(),
            description: format!("{} description", title),
            keywords: vec!["freelance".to_string()],
        },
        hero: Hero {
            badge: Some("2025".to_string()),
            title: hero.to_string(),
            subtitle: format!("{} subtitle", hero),
        },
        breadcrumb: title.to_string(),
        stats: vec![Stat {
            value: "€65".to_string(),
            label: stat_label.to_string(),
        }],
        sections: vec![Section {
            heading: format!("{} section", hero),
            paragraphs: vec!["Paragraph".to_string()],
            bullets: vec!["Bullet".to_string()],
        }],
        table,
        tools,
        cta: Cta {
            title: format!("{} cta", hero),
            text: "Text".to_string(),
            button: cta_button.to_string(),
            href: "/platforms/comparison".to_string(),
        },
        related: vec![RelatedLink {
            title: "Home".to_string(),
            href: "/".to_string(),
        }],
    }
}

/// Two pages: a website home and an article guide
pub fn sample_site(url: &str) -> Site {
    let home = Page {
        def: PageDef {
            path: String::new(),
            content: PathBuf::from("content/home"),
            kind: PageKind::Website,
            published: date(2024, 11, 1),
            modified: date(2025, 2, 1),
            image: None,
        },
        content: Localized {
            en: content(
                "Compare freelance platforms",
                "Find your next client",
                "Platforms reviewed",
                "Start comparing",
                None,
                vec![],
            ),
            nl: content(
                "Vergelijk freelance platforms",
                "Vind je volgende opdrachtgever",
                "Platforms beoordeeld",
                "Begin met vergelijken",
                None,
                vec![],
            ),
        },
    };

    let table = |headers: [&str; 2], cell: &str| ComparisonTable {
        caption: "Fees".to_string(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: vec![vec!["Upwork".to_string(), cell.to_string()]],
    };
    let tools = |description: &str| {
        vec![Tool {
            name: "Toggl".to_string(),
            description: description.to_string(),
            url: Some("https://toggl.com".to_string()),
            tips: vec!["Tip".to_string()],
        }]
    };

    let rates = Page {
        def: PageDef {
            path: "guides/freelance-rates".to_string(),
            content: PathBuf::from("content/freelance-rates"),
            kind: PageKind::Article,
            published: date(2025, 1, 15),
            modified: date(2025, 3, 1),
            image: Some("/static/og/rates.png".to_string()),
        },
        content: Localized {
            en: content(
                "Freelance rates guide",
                "Set your hourly rate",
                "Average hourly rate",
                "Compare platforms",
                Some(table(["Platform", "Fee"], "10%")),
                tools("Time tracking"),
            ),
            nl: content(
                "Gids freelance tarieven",
                "Bepaal je uurtarief",
                "Gemiddeld uurtarief",
                "Vergelijk nu",
                Some(table(["Platform", "Kosten"], "10%")),
                tools("Urenregistratie"),
            ),
        },
    };

    Site {
        info: SiteInfo {
            name: "SkillLinkup".to_string(),
            url: url.to_string(),
            default_locale: Locale::En,
            author: "SkillLinkup Team".to_string(),
            logo: "/static/logo.png".to_string(),
            twitter: Some("@skilllinkup".to_string()),
        },
        store: None,
        pages: vec![home, rates],
    }
}

pub fn sample_post() -> PostView {
    PostView {
        id: "p1".to_string(),
        slug: "upwork-vs-fiverr".to_string(),
        title: "Upwork vs Fiverr".to_string(),
        content: "Comparing Upwork and **Fiverr** for Dutch freelancers.".to_string(),
        excerpt: Some("Which platform fits you?".to_string()),
        feature_img: Some("/static/posts/upwork-vs-fiverr.png".to_string()),
        published_at: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
        read_time: Some(7),
        meta_title: None,
        meta_description: None,
        author_name: "Sanne de Vries".to_string(),
        category_name: Some("Platforms".to_string()),
        tags: vec!["upwork".to_string(), "fiverr".to_string()],
        views: 1200,
    }
}
