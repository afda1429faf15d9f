//! VIES member country rules.
//!
//! Each member state has a display name, an anchored pattern matched against
//! the full identifier (`country_code + number`), and an optional display
//! formatter. Rules follow the django-vies 2.2.2 data set, plus `XI`
//! (Northern Ireland), which VIES serves with the GB number format.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::format::{dk_format, fr_format, gb_format};

/// Display formatter for the number part of an identifier.
pub type Formatter = fn(&str) -> String;

/// Validation rule for one VIES member country.
pub struct CountryRule {
    /// Two-letter VIES country code (note: Greece is `EL`, not `GR`).
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
    /// Anchored pattern for `code + number`.
    pub pattern: Regex,
    /// Optional grouping for display. Never affects validation.
    pub formatter: Option<Formatter>,
}

impl CountryRule {
    /// Whether a full identifier (prefix included) matches this country's pattern.
    pub fn matches(&self, vatin: &str) -> bool {
        self.pattern.is_match(vatin)
    }

    /// Format a number (without prefix) for display.
    pub fn format(&self, number: &str) -> String {
        match self.formatter {
            Some(f) => f(number),
            None => number.to_string(),
        }
    }
}

impl fmt::Debug for CountryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountryRule")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Raw rule data, sorted by code for binary search.
const RULES: &[(&str, &str, &str, Option<Formatter>)] = &[
    ("AT", "Austria", r"^ATU\d{8}$", None),
    ("BE", "Belgium", r"^BE0?\d{9}$", None),
    ("BG", "Bulgaria", r"^BG\d{9,10}$", None),
    ("CY", "Cyprus", r"^CY\d{8}[A-Z]$", None),
    ("CZ", "Czech Republic", r"^CZ\d{8,10}$", None),
    ("DE", "Germany", r"^DE\d{9}$", None),
    ("DK", "Denmark", r"^DK\d{8}$", Some(dk_format)),
    ("EE", "Estonia", r"^EE\d{9}$", None),
    ("EL", "Greece", r"^EL\d{9}$", None),
    ("ES", "Spain", r"^ES[A-Z0-9]\d{7}[A-Z0-9]$", None),
    ("FI", "Finland", r"^FI\d{8}$", None),
    (
        "FR",
        "France",
        r"^FR[A-HJ-NP-Z0-9][A-HJ-NP-Z0-9]\d{9}$",
        Some(fr_format),
    ),
    (
        "GB",
        "United Kingdom",
        r"^(GB(GD|HA)\d{3}|GB\d{9}|GB\d{12})$",
        Some(gb_format),
    ),
    ("HR", "Croatia", r"^HR\d{11}$", None),
    ("HU", "Hungary", r"^HU\d{8}$", None),
    ("IE", "Ireland", r"^IE\d[A-Z0-9\+\*]\d{5}[A-Z]{1,2}$", None),
    ("IT", "Italy", r"^IT\d{11}$", None),
    ("LT", "Lithuania", r"^LT(\d{9}|\d{12})$", None),
    ("LU", "Luxembourg", r"^LU\d{8}$", None),
    ("LV", "Latvia", r"^LV\d{11}$", None),
    ("MT", "Malta", r"^MT\d{8}$", None),
    ("NL", "The Netherlands", r"^NL\d{9}B\d{2}$", None),
    ("PL", "Poland", r"^PL\d{10}$", None),
    ("PT", "Portugal", r"^PT\d{9}$", None),
    ("RO", "Romania", r"^RO\d{2,10}$", None),
    ("SE", "Sweden", r"^SE\d{10}01$", None),
    ("SI", "Slovenia", r"^SI\d{8}$", None),
    ("SK", "Slovakia", r"^SK\d{10}$", None),
    (
        "XI",
        "Northern Ireland",
        r"^(XI(GD|HA)\d{3}|XI\d{9}|XI\d{12})$",
        Some(gb_format),
    ),
];

static COUNTRY_RULES: LazyLock<Vec<CountryRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(code, name, pattern, formatter)| CountryRule {
            code,
            name,
            pattern: Regex::new(pattern).unwrap(),
            formatter,
        })
        .collect()
});

/// Look up the rule for a (normalized, upper-case) country code.
pub fn lookup(code: &str) -> Option<&'static CountryRule> {
    let rules: &'static [CountryRule] = &COUNTRY_RULES;
    rules
        .binary_search_by(|rule| rule.code.cmp(code))
        .ok()
        .map(|idx| &rules[idx])
}

/// Whether `code` is a VIES member country code.
pub fn is_member_country(code: &str) -> bool {
    lookup(code).is_some()
}

/// All rules, sorted by code.
pub fn country_rules() -> &'static [CountryRule] {
    &COUNTRY_RULES
}

/// All supported country codes, sorted.
pub fn member_country_codes() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|&(code, ..)| code)
}

/// Select-box choices: an empty `("", "--")` entry followed by `(code, code)`
/// for every member country.
pub fn country_choices() -> Vec<(&'static str, &'static str)> {
    std::iter::once(("", "--"))
        .chain(member_country_codes().map(|code| (code, code)))
        .collect()
}
