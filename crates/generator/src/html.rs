use chrono::Datelike;
use skilllinkup_core::{Locale, Localized};

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Prefix a site path with the locale segment. External links pass through.
pub fn locale_href(locale: Locale, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") || href.starts_with('#') {
        return href.to_string();
    }
    let path = href.trim_matches('/');
    if path.is_empty() {
        format!("/{}", locale)
    } else {
        format!("/{}/{}", locale, path)
    }
}

/// Fixed interface text that is not part of any page's content
#[derive(Debug)]
pub struct UiStrings {
    pub home: &'static str,
    pub language_name: &'static str,
    pub switch_language: &'static str,
    pub related: &'static str,
    pub related_posts: &'static str,
    pub comments: &'static str,
    pub no_comments: &'static str,
    pub published: &'static str,
    pub read_time: &'static str,
    pub views: &'static str,
    pub by: &'static str,
    pub not_found_title: &'static str,
    pub not_found_text: &'static str,
    pub unavailable_title: &'static str,
    pub unavailable_text: &'static str,
    pub back_home: &'static str,
    pub months: [&'static str; 12],
}

pub static UI: Localized<UiStrings> = Localized {
    en: UiStrings {
        home: "Home",
        language_name: "English",
        switch_language: "Nederlands",
        related: "Related guides",
        related_posts: "More articles",
        comments: "Comments",
        no_comments: "No comments yet.",
        published: "Published",
        read_time: "read",
        views: "views",
        by: "by",
        not_found_title: "Page not found",
        not_found_text: "The page you are looking for does not exist or has moved.",
        unavailable_title: "Temporarily unavailable",
        unavailable_text: "We could not load this article right now. Please try again in a moment.",
        back_home: "Back to the homepage",
        months: [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ],
    },
    nl: UiStrings {
        home: "Home",
        language_name: "Nederlands",
        switch_language: "English",
        related: "Gerelateerde gidsen",
        related_posts: "Meer artikelen",
        comments: "Reacties",
        no_comments: "Nog geen reacties.",
        published: "Gepubliceerd",
        read_time: "leestijd",
        views: "weergaven",
        by: "door",
        not_found_title: "Pagina niet gevonden",
        not_found_text: "De pagina die je zoekt bestaat niet of is verplaatst.",
        unavailable_title: "Tijdelijk niet beschikbaar",
        unavailable_text: "We konden dit artikel nu niet laden. Probeer het zo opnieuw.",
        back_home: "Terug naar de homepage",
        months: [
            "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus",
            "september", "oktober", "november", "december",
        ],
    },
};

pub fn ui(locale: Locale) -> &'static UiStrings {
    UI.select(locale)
}

/// Human-readable date: "January 15, 2025" / "15 januari 2025"
pub fn format_date<D: Datelike>(date: &D, locale: Locale) -> String {
    let month = ui(locale).months[date.month0() as usize];
    match locale {
        Locale::En => format!("{} {}, {}", month, date.day(), date.year()),
        Locale::Nl => format!("{} {} {}", date.day(), month, date.year()),
    }
}

/// The other published locale, for the language switcher
pub fn other_locale(locale: Locale) -> Locale {
    match locale {
        Locale::En => Locale::Nl,
        Locale::Nl => Locale::En,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_html_escape_basic_characters() {
        assert_eq!(html_escape("Hello World"), "Hello World");
        assert_eq!(html_escape("Test & Test"), "Test &amp; Test");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("'single'"), "&#x27;single&#x27;");
    }

    #[test]
    fn test_html_escape_xss_attempts() {
        assert_eq!(
            html_escape("<script>alert('XSS')</script>"),
            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;"
        );
        assert_eq!(
            html_escape("\" onmouseover=\"alert(1)"),
            "&quot; onmouseover=&quot;alert(1)"
        );
    }

    #[test]
    fn test_html_escape_unicode() {
        assert_eq!(html_escape("€65 per uur"), "€65 per uur");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn test_locale_href() {
        assert_eq!(locale_href(Locale::Nl, "/guides/rates"), "/nl/guides/rates");
        assert_eq!(locale_href(Locale::En, "guides/rates/"), "/en/guides/rates");
        assert_eq!(locale_href(Locale::En, "/"), "/en");
        assert_eq!(
            locale_href(Locale::Nl, "https://www.upwork.com"),
            "https://www.upwork.com"
        );
        assert_eq!(locale_href(Locale::Nl, "#faq"), "#faq");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(format_date(&date, Locale::En), "January 15, 2025");
        assert_eq!(format_date(&date, Locale::Nl), "15 januari 2025");
    }

    #[test]
    fn test_other_locale() {
        assert_eq!(other_locale(Locale::En), Locale::Nl);
        assert_eq!(other_locale(Locale::Nl), Locale::En);
    }
}
