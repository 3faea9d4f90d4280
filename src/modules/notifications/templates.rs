//! Provider email templates.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Each provider template renders inside the shared `layout` partial.

use std::collections::HashMap;
use std::fmt;

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

/// Language an email is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    English,
    Spanish,
    Portuguese,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Spanish => "es",
            Locale::Portuguese => "pt",
        }
    }

    pub fn subject(&self, wallet: &str) -> String {
        match self {
            Locale::English => format!("Transaction Confirmation - {}", wallet),
            Locale::Spanish => format!("Confirmación de Transacción - {}", wallet),
            Locale::Portuguese => format!("Confirmação de Transação - {}", wallet),
        }
    }

    pub fn chrono_locale(&self) -> chrono::Locale {
        match self {
            Locale::English => chrono::Locale::en_US,
            Locale::Spanish => chrono::Locale::es_ES,
            Locale::Portuguese => chrono::Locale::pt_BR,
        }
    }

    /// strftime pattern for the human-readable date.
    pub fn date_format(&self) -> &'static str {
        match self {
            Locale::English => "%B %-d, %Y",
            Locale::Spanish | Locale::Portuguese => "%-d de %B de %Y",
        }
    }

    /// strftime pattern for the human-readable time.
    pub fn time_format(&self) -> &'static str {
        match self {
            Locale::English => "%-I:%M %p",
            Locale::Spanish | Locale::Portuguese => "%H:%M",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a wallet name into a template lookup key:
/// trimmed, lowercased, with all whitespace removed.
pub fn provider_key(wallet: &str) -> String {
    wallet
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

const LAYOUT: &str = include_str!("../../../templates/layout.hbs");

const TEMPLATES: &[(&str, Locale, &str)] = &[
    ("binance", Locale::English, include_str!("../../../templates/binance.hbs")),
    ("coinbase", Locale::English, include_str!("../../../templates/coinbase.hbs")),
    ("bitso", Locale::English, include_str!("../../../templates/bitso.hbs")),
    ("cashapp", Locale::English, include_str!("../../../templates/cashapp.hbs")),
    ("trustwallet", Locale::English, include_str!("../../../templates/trustwallet.hbs")),
    ("paypal", Locale::English, include_str!("../../../templates/paypal.hbs")),
    ("bitso", Locale::Spanish, include_str!("../../../templates/bitso_es.hbs")),
    ("bitso", Locale::Portuguese, include_str!("../../../templates/bitso_pt.hbs")),
];

/// Read-only mapping of (provider key, locale) to a compiled template.
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
    names: HashMap<(String, Locale), String>,
}

impl TemplateRegistry {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_partial("layout", LAYOUT)?;

        let mut names = HashMap::new();
        for (provider, locale, source) in TEMPLATES {
            let name = format!("{}.{}", provider, locale);
            handlebars.register_template_string(&name, *source)?;
            names.insert((provider.to_string(), *locale), name);
        }

        Ok(Self { handlebars, names })
    }

    /// Name of the template registered for `wallet` in `locale`, if any.
    pub fn resolve(&self, wallet: &str, locale: Locale) -> Option<&str> {
        self.names
            .get(&(provider_key(wallet), locale))
            .map(String::as_str)
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, RenderError> {
        self.handlebars.render(name, context)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
