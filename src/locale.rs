//! Locale identifiers and the formatting data attached to them
//!
//! A [`Locale`] is a language plus an optional country. It selects the
//! decimal and grouping separators used by numeric conversions and the month
//! and weekday names used by date/time conversions. Renders that do not name
//! a locale use the process-wide default, see [`Locale::process_default`].

use crate::error::LocaleError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

/// Environment variables consulted for the POSIX locale, in priority order
pub const POSIX_LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_NUMERIC", "LANG"];

static PROCESS_DEFAULT: Lazy<RwLock<Locale>> =
    Lazy::new(|| RwLock::new(crate::config::initial_locale()));

/// A language with an optional country, e.g. `de` or `de-CH`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// Lower-case ISO 639 code, empty for the root locale
    language: Cow<'static, str>,
    /// Upper-case ISO 3166 code or UN M.49 digits, empty when absent
    country: Cow<'static, str>,
}

impl Locale {
    /// Language- and country-neutral locale
    pub const ROOT: Locale = Locale::from_static("", "");
    pub const ENGLISH: Locale = Locale::from_static("en", "");
    pub const GERMAN: Locale = Locale::from_static("de", "");
    pub const FRENCH: Locale = Locale::from_static("fr", "");
    pub const ITALIAN: Locale = Locale::from_static("it", "");
    pub const SPANISH: Locale = Locale::from_static("es", "");
    pub const JAPANESE: Locale = Locale::from_static("ja", "");
    pub const US: Locale = Locale::from_static("en", "US");
    pub const UK: Locale = Locale::from_static("en", "GB");
    pub const CANADA: Locale = Locale::from_static("en", "CA");
    pub const CANADA_FRENCH: Locale = Locale::from_static("fr", "CA");
    pub const GERMANY: Locale = Locale::from_static("de", "DE");
    pub const FRANCE: Locale = Locale::from_static("fr", "FR");
    pub const ITALY: Locale = Locale::from_static("it", "IT");

    const fn from_static(language: &'static str, country: &'static str) -> Self {
        Self {
            language: Cow::Borrowed(language),
            country: Cow::Borrowed(country),
        }
    }

    /// Create a locale from a language code and an optional country code
    pub fn new(language: &str, country: Option<&str>) -> Result<Self, LocaleError> {
        let language = language.trim();
        let country = country.map(str::trim).unwrap_or("");

        let language_ok = language.is_empty()
            || ((2..=8).contains(&language.len())
                && language.chars().all(|c| c.is_ascii_alphabetic()));
        if !language_ok || !is_country_code(country) || (language.is_empty() && !country.is_empty())
        {
            let tag = if country.is_empty() {
                language.to_string()
            } else {
                format!("{}-{}", language, country)
            };
            return Err(LocaleError::InvalidTag(tag));
        }

        Ok(Self {
            language: Cow::Owned(language.to_ascii_lowercase()),
            country: Cow::Owned(country.to_ascii_uppercase()),
        })
    }

    /// Parse a BCP 47 tag (`de-CH`) or a POSIX locale name (`de_CH.UTF-8@euro`)
    ///
    /// `C`, `POSIX`, `und` and the empty string name the root locale. Script
    /// and variant subtags are skipped.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let trimmed = tag.trim();
        let base = trimmed
            .split(|c: char| c == '.' || c == '@')
            .next()
            .unwrap_or("");

        if matches!(base, "" | "C" | "POSIX" | "und") {
            return Ok(Self::ROOT);
        }

        let mut subtags = base.split(|c: char| c == '-' || c == '_');
        let language = subtags.next().unwrap_or("");
        let country = subtags.find(|subtag| is_country_code(subtag) && !subtag.is_empty());

        Self::new(language, country).map_err(|_| LocaleError::InvalidTag(trimmed.to_string()))
    }

    /// Read the locale from the POSIX environment (`LC_ALL`, `LC_NUMERIC`, `LANG`)
    pub fn from_env() -> Option<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        POSIX_LOCALE_VARS.iter().find_map(|name| {
            let value = lookup(name)?;
            if value.trim().is_empty() {
                return None;
            }
            match Self::parse(&value) {
                Ok(locale) => Some(locale),
                Err(err) => {
                    log::warn!("Ignoring {}: {}", name, err);
                    None
                }
            }
        })
    }

    /// Lower-case language code, empty for the root locale
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Upper-case country code, if any
    pub fn country(&self) -> Option<&str> {
        if self.country.is_empty() {
            None
        } else {
            Some(&self.country)
        }
    }

    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }

    /// BCP 47 form: `de-CH`, `fr`, or `und` for the root locale
    pub fn to_tag(&self) -> String {
        match (self.is_root(), self.country()) {
            (true, _) => "und".to_string(),
            (false, Some(country)) => format!("{}-{}", self.language, country),
            (false, None) => self.language.to_string(),
        }
    }

    /// Decimal and grouping separators for this locale
    pub fn number_symbols(&self) -> NumberSymbols {
        let (decimal_separator, grouping_separator) =
            match (self.language.as_ref(), self.country.as_ref()) {
                ("de" | "it" | "rm", "CH" | "LI") => ('.', '\u{2019}'),
                ("fr", _) => (',', '\u{202f}'),
                (
                    "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" | "el" | "ro" | "hr"
                    | "sl" | "sr",
                    _,
                ) => (',', '.'),
                (
                    "ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "uk" | "hu" | "bg"
                    | "et" | "lt" | "lv",
                    _,
                ) => (',', '\u{a0}'),
                _ => ('.', ','),
            };

        NumberSymbols {
            decimal_separator,
            grouping_separator,
            grouping_size: 3,
        }
    }

    /// Month and weekday names for this locale, English when not tabulated
    pub fn date_symbols(&self) -> &'static DateSymbols {
        match self.language.as_ref() {
            "de" => &GERMAN_DATES,
            "fr" => &FRENCH_DATES,
            "es" => &SPANISH_DATES,
            "it" => &ITALIAN_DATES,
            _ => &ENGLISH_DATES,
        }
    }

    /// The locale used by renders that do not name one
    ///
    /// Initialized on first use from [`crate::config::Config::load`].
    pub fn process_default() -> Locale {
        match PROCESS_DEFAULT.read() {
            Ok(locale) => locale.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the process-wide default locale
    pub fn set_process_default(locale: Locale) {
        log::debug!("Default locale set to '{}'", locale.to_tag());
        match PROCESS_DEFAULT.write() {
            Ok(mut current) => *current = locale,
            Err(poisoned) => *poisoned.into_inner() = locale,
        }
    }
}

fn is_country_code(code: &str) -> bool {
    code.is_empty()
        || (code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        || (code.len() == 3 && code.chars().all(|c| c.is_ascii_digit()))
}

impl fmt::Display for Locale {
    /// POSIX-style `de_CH`; the root locale displays as an empty string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.country() {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_tag()
    }
}

/// Separators used by numeric conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal_separator: char,
    pub grouping_separator: char,
    /// Digits per group in the integer part
    pub grouping_size: usize,
}

/// Names used by date/time conversions
#[derive(Debug, PartialEq, Eq)]
pub struct DateSymbols {
    pub months: [&'static str; 12],
    pub short_months: [&'static str; 12],
    /// Monday first
    pub weekdays: [&'static str; 7],
    pub short_weekdays: [&'static str; 7],
}

static ENGLISH_DATES: DateSymbols = DateSymbols {
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
    short_months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ],
    short_weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
};

static GERMAN_DATES: DateSymbols = DateSymbols {
    months: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
        "Oktober", "November", "Dezember",
    ],
    short_months: [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ],
    weekdays: [
        "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag",
    ],
    short_weekdays: ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"],
};

static FRENCH_DATES: DateSymbols = DateSymbols {
    months: [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
        "octobre", "novembre", "décembre",
    ],
    short_months: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
        "nov.", "déc.",
    ],
    weekdays: [
        "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    ],
    short_weekdays: ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."],
};

static SPANISH_DATES: DateSymbols = DateSymbols {
    months: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
        "octubre", "noviembre", "diciembre",
    ],
    short_months: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ],
    weekdays: [
        "lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo",
    ],
    short_weekdays: ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"],
};

static ITALIAN_DATES: DateSymbols = DateSymbols {
    months: [
        "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno", "luglio", "agosto",
        "settembre", "ottobre", "novembre", "dicembre",
    ],
    short_months: [
        "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
    ],
    weekdays: [
        "lunedì", "martedì", "mercoledì", "giovedì", "venerdì", "sabato", "domenica",
    ],
    short_weekdays: ["lun", "mar", "mer", "gio", "ven", "sab", "dom"],
};
