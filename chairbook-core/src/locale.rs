//! Locale tokens for label formatting.
//!
//! A locale only changes how month names are spelled in header labels.
//! Date arithmetic never looks at it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChairbookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
    Fr,
    Es,
}

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

const SHORT_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const SHORT_DE: [&str; 12] = [
    "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
];
const SHORT_FR: [&str; 12] = [
    "janv", "févr", "mars", "avr", "mai", "juin", "juil", "août", "sept", "oct", "nov", "déc",
];
const SHORT_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

impl Locale {
    /// Full month name. `month` is 1-based.
    pub fn month_name(self, month: u32) -> &'static str {
        let table = match self {
            Locale::En => &MONTHS_EN,
            Locale::De => &MONTHS_DE,
            Locale::Fr => &MONTHS_FR,
            Locale::Es => &MONTHS_ES,
        };
        table[month_index(month)]
    }

    /// Abbreviated month name. `month` is 1-based.
    pub fn short_month_name(self, month: u32) -> &'static str {
        let table = match self {
            Locale::En => &SHORT_EN,
            Locale::De => &SHORT_DE,
            Locale::Fr => &SHORT_FR,
            Locale::Es => &SHORT_ES,
        };
        table[month_index(month)]
    }

    /// Parse a locale token, falling back to English for anything unknown.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_else(|_| {
            tracing::warn!(token, "unknown locale token, using en");
            Locale::En
        })
    }
}

fn month_index(month: u32) -> usize {
    (month.clamp(1, 12) - 1) as usize
}

impl FromStr for Locale {
    type Err = ChairbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept region-qualified tokens like "de-AT" or "en_GB".
        let lang = s.split(['-', '_']).next().unwrap_or("").to_lowercase();
        match lang.as_str() {
            "en" => Ok(Locale::En),
            "de" => Ok(Locale::De),
            "fr" => Ok(Locale::Fr),
            "es" => Ok(Locale::Es),
            _ => Err(ChairbookError::Parse(format!("unknown locale '{s}'"))),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::Es => "es",
        };
        write!(f, "{token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_qualified_tokens_parse() {
        assert_eq!("de-AT".parse::<Locale>().unwrap(), Locale::De);
        assert_eq!("en_GB".parse::<Locale>().unwrap(), Locale::En);
    }

    #[test]
    fn test_unknown_token_falls_back_to_english() {
        assert_eq!(Locale::from_token("xx"), Locale::En);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(Locale::En.month_name(3), "March");
        assert_eq!(Locale::De.short_month_name(10), "Okt");
    }
}
