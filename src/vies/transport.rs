use super::result::{ViesError, ViesResult};

/// A connection to the VIES `checkVat` operation.
///
/// [`RestClient`](super::RestClient) talks to the public REST API; tests
/// and callers with their own HTTP stack can provide another implementation.
pub trait ViesTransport: Send {
    /// Check `vat_number` (without prefix) for `country_code`.
    fn check_vat(&self, country_code: &str, vat_number: &str) -> Result<ViesResult, ViesError>;
}

impl<T: ViesTransport + Sync> ViesTransport for std::sync::Arc<T> {
    fn check_vat(&self, country_code: &str, vat_number: &str) -> Result<ViesResult, ViesError> {
        (**self).check_vat(country_code, vat_number)
    }
}
