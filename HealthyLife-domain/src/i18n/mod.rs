//! Localized strings for labels and validation messages.
//!
//! Catalogs are embedded at compile time. Lookups fall back from the
//! requested locale to English and finally to the key itself.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::error;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

type Catalog = HashMap<String, String>;

static EN: Lazy<Catalog> = Lazy::new(|| load_catalog("en", include_str!("locales/en.json")));
static ML: Lazy<Catalog> = Lazy::new(|| load_catalog("ml", include_str!("locales/ml.json")));

fn load_catalog(name: &str, json: &str) -> Catalog {
    serde_json::from_str(json).unwrap_or_else(|e| {
        error!("Failed to parse {} locale catalog: {}", name, e);
        HashMap::new()
    })
}

/// Supported interface languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ml,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ml];

    pub const fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ml => "ml",
        }
    }

    /// Name of the language in that language
    pub const fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ml => "മലയാളം",
        }
    }

    /// First supported language in an `Accept-Language` header value
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .filter_map(|tag| tag.trim().split('-').next())
            .find_map(|primary| primary.parse().ok())
    }

    fn catalog(self) -> &'static Catalog {
        match self {
            Locale::En => Lazy::force(&EN),
            Locale::Ml => Lazy::force(&ML),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ml" => Ok(Locale::Ml),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

/// Translation context for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up `key`: current locale, then English, then the key itself
    pub fn t(&self, key: &str) -> String {
        self.locale
            .catalog()
            .get(key)
            .or_else(|| Locale::En.catalog().get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Look up `key` and replace every `{{name}}` placeholder
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        params.iter().fold(self.t(key), |text, (name, value)| {
            text.replace(&format!("{{{{{}}}}}", name), value)
        })
    }
}
