use thiserror::Error;

/// Errors raised while constructing a [`Vatin`](super::Vatin).
///
/// These are local and deterministic: they are never retried. The message
/// is already rendered through the caller's translation function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum VatinError {
    /// The country code does not start with a letter.
    #[error("{message}")]
    NotIsoCountryCode {
        /// Normalized country code as given.
        code: String,
        /// Rendered (possibly translated) message.
        message: String,
    },

    /// The country code is not a VIES member country.
    #[error("{message}")]
    NotMemberCountry {
        /// Normalized country code as given.
        code: String,
        /// Rendered (possibly translated) message.
        message: String,
    },
}

impl VatinError {
    /// The offending country code.
    pub fn code(&self) -> &str {
        match self {
            Self::NotIsoCountryCode { code, .. } | Self::NotMemberCountry { code, .. } => code,
        }
    }
}
