use std::fmt;

use super::countries::{self, CountryRule};
use super::error::VatinError;
use super::messages::{self, MSG_NOT_ISO_COUNTRY, MSG_NOT_MEMBER_COUNTRY};

/// A European VAT identification number.
///
/// Construction normalizes both parts to upper case and checks the country
/// against the VIES member table. A number that does not match its
/// country's pattern still constructs; [`Vatin::matches_pattern`] reports
/// the mismatch and remote validity checks treat it as invalid.
pub struct Vatin {
    country_code: String,
    number: String,
    rule: &'static CountryRule,
    #[cfg(feature = "vies")]
    pub(crate) remote: crate::vies::RemoteState,
}

impl Vatin {
    /// Create a VAT identifier from a country code and the number part.
    ///
    /// ```
    /// use vatin::Vatin;
    ///
    /// let vatin = Vatin::new("cz", "26428091").unwrap();
    /// assert_eq!(vatin.country_code(), "CZ");
    /// assert!(vatin.matches_pattern());
    /// ```
    ///
    /// # Errors
    ///
    /// [`VatinError::NotIsoCountryCode`] if the code does not start with a
    /// letter, [`VatinError::NotMemberCountry`] if it is not a VIES member.
    pub fn new(country_code: &str, number: &str) -> Result<Self, VatinError> {
        Self::new_localized(country_code, number, &messages::no_translate)
    }

    /// Like [`Vatin::new`], with error messages passed through `translate`.
    ///
    /// `translate` receives the English template (see
    /// [`MSG_NOT_MEMBER_COUNTRY`]) and returns the localized template; the
    /// `{code}` placeholder is substituted afterwards.
    pub fn new_localized(
        country_code: &str,
        number: &str,
        translate: &dyn Fn(&str) -> String,
    ) -> Result<Self, VatinError> {
        let country_code: String = country_code
            .trim()
            .chars()
            .take(2)
            .collect::<String>()
            .to_uppercase();
        let number = number.trim().to_uppercase();

        if !country_code
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            return Err(VatinError::NotIsoCountryCode {
                message: messages::render(MSG_NOT_ISO_COUNTRY, &country_code, translate),
                code: country_code,
            });
        }

        let Some(rule) = countries::lookup(&country_code) else {
            return Err(VatinError::NotMemberCountry {
                message: messages::render(MSG_NOT_MEMBER_COUNTRY, &country_code, translate),
                code: country_code,
            });
        };

        Ok(Self {
            country_code,
            number,
            rule,
            #[cfg(feature = "vies")]
            remote: crate::vies::RemoteState::default(),
        })
    }

    /// Parse a combined identifier such as `"CZ26428091"`.
    ///
    /// The first two characters are the country code, the rest the number.
    pub fn parse(vat_id: &str) -> Result<Self, VatinError> {
        let vat_id = vat_id.trim();
        let split = vat_id
            .char_indices()
            .nth(2)
            .map_or(vat_id.len(), |(idx, _)| idx);
        Self::new(&vat_id[..split], &vat_id[split..])
    }

    /// Upper-case two-letter country code.
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Upper-case number without the country prefix.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The member country rule this identifier was validated against.
    pub fn country(&self) -> &'static CountryRule {
        self.rule
    }

    /// Whether `country_code + number` matches the country's pattern.
    pub fn matches_pattern(&self) -> bool {
        self.rule.matches(&self.to_string())
    }

    /// The number grouped for display, e.g. `"1234 5678"` for Denmark.
    pub fn formatted(&self) -> String {
        self.rule.format(&self.number)
    }
}

impl fmt::Display for Vatin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.country_code, self.number)
    }
}

impl fmt::Debug for Vatin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Vatin");
        s.field("country_code", &self.country_code)
            .field("number", &self.number);
        #[cfg(feature = "vies")]
        s.field("result", &self.remote.result);
        s.finish()
    }
}

impl PartialEq for Vatin {
    fn eq(&self, other: &Self) -> bool {
        self.country_code == other.country_code && self.number == other.number
    }
}

impl Eq for Vatin {}
