//! Country rules, syntax validation, and the [`Vatin`] value object.
//!
//! Everything here is offline: a [`Vatin`] can be built and checked
//! against its country's pattern without the `vies` feature.

pub mod countries;
mod error;
pub mod format;
pub mod messages;
mod vatin;

pub use countries::{
    CountryRule, Formatter, country_choices, country_rules, is_member_country, lookup,
    member_country_codes,
};
pub use error::*;
pub use messages::{MSG_NOT_ISO_COUNTRY, MSG_NOT_MEMBER_COUNTRY, no_translate};
pub use vatin::Vatin;
