//! Validation message templates and the translation hook.
//!
//! Templates are English msgids containing a `{code}` placeholder. A
//! translation function receives the template and returns the localized
//! template; the placeholder is substituted afterwards, so translations
//! keep control over word order.

/// Template for a country code that does not start with a letter.
pub const MSG_NOT_ISO_COUNTRY: &str = "{code} is not a valid ISO_3166-1 country code.";

/// Template for a country code that is not in the member table.
pub const MSG_NOT_MEMBER_COUNTRY: &str = "{code} is not a VIES member country.";

/// Identity translation, used when the caller does not localize.
pub fn no_translate(msg: &str) -> String {
    msg.to_string()
}

/// Translate `template` and substitute the country code.
pub(crate) fn render(template: &str, code: &str, translate: &dyn Fn(&str) -> String) -> String {
    translate(template).replace("{code}", code)
}
