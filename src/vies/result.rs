use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a VIES `checkVat` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViesResult {
    /// Country code echoed by the service.
    pub country_code: String,
    /// Number echoed by the service.
    pub vat_number: String,
    /// Date the registry answered the request.
    pub request_date: Option<NaiveDate>,
    /// Whether the VAT number is currently valid.
    pub valid: bool,
    /// Registered company name (if the member state discloses it).
    pub name: Option<String>,
    /// Registered address (if the member state discloses it).
    pub address: Option<String>,
}

/// Error from the VIES service or the transport in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViesError {
    /// Network or HTTP client error.
    Network(String),
    /// The service rejected or could not process the request
    /// (e.g. `MS_UNAVAILABLE`, `INVALID_INPUT`).
    Fault(String),
    /// Failed to parse the response.
    Parse(String),
}

/// Fault codes that waiting will not fix.
const PERMANENT_FAULTS: &[&str] = &["INVALID_INPUT", "INVALID_REQUESTER_INFO"];

impl ViesError {
    /// Whether the retry policy should try again after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Fault(code) => !PERMANENT_FAULTS.contains(&code.trim()),
            Self::Parse(_) => false,
        }
    }
}

impl fmt::Display for ViesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "VIES network error: {e}"),
            Self::Fault(e) => write!(f, "VIES fault: {e}"),
            Self::Parse(e) => write!(f, "VIES parse error: {e}"),
        }
    }
}

impl std::error::Error for ViesError {}

/// Drop the `"---"` placeholder VIES uses for undisclosed fields.
pub(crate) fn disclosed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| v != "---" && !v.is_empty())
}

/// Parse `YYYY-MM-DD` with an optional zone or time suffix
/// (`"2015-12-07+01:00"`, `"2024-01-15T13:01:07.588Z"`).
pub(crate) fn parse_request_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            log::warn!("ignoring unparseable VIES requestDate '{raw}': {e}");
            None
        }
    }
}
