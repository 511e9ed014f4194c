pub mod config;
pub mod content;
pub mod error;
pub mod locale;
pub mod types;

pub use config::load_site;
pub use content::{Localized, PageContent};
pub use error::{Error, Result};
pub use locale::{Locale, LocaleContext};
pub use types::*;
