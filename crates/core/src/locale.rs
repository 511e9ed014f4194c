use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the site is published in.
///
/// English is the fallback: anything that is not exactly `nl` resolves to
/// [`Locale::En`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Nl,
}

impl Locale {
    /// Every published locale, in the order pages are generated.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Nl];

    /// Resolve a route segment. Never fails: unknown values render English.
    pub fn resolve(segment: &str) -> Self {
        if segment == "nl" { Locale::Nl } else { Locale::En }
    }

    /// Strict parse used for configuration values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Locale::En),
            "nl" => Some(Locale::Nl),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Nl => "nl",
        }
    }

    /// Open Graph locale tag (`og:locale`)
    pub const fn og_locale(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Nl => "nl_NL",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped locale, built from route params and dropped with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleContext {
    pub locale: Locale,
}

impl LocaleContext {
    pub fn from_segment(segment: &str) -> Self {
        Self {
            locale: Locale::resolve(segment),
        }
    }
}
