//! Remote verification of a [`Vatin`].

use crate::core::Vatin;

use super::rest::RestClient;
use super::result::{ViesError, ViesResult};
use super::retry::RetryPolicy;
use super::transport::ViesTransport;

/// Per-identifier remote state: the memoized client, the retry policy,
/// and the last successful result.
#[derive(Default)]
pub(crate) struct RemoteState {
    pub(crate) client: Option<Box<dyn ViesTransport>>,
    pub(crate) retry: RetryPolicy,
    pub(crate) result: Option<ViesResult>,
}

impl Vatin {
    /// Use `client` for remote checks instead of the default [`RestClient`].
    pub fn with_client(mut self, client: impl ViesTransport + 'static) -> Self {
        self.remote.client = Some(Box::new(client));
        self
    }

    /// Replace the default [`RetryPolicy`].
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.remote.retry = policy;
        self
    }

    /// Check this identifier against VIES and store the response.
    ///
    /// The client is created on first use and kept for the lifetime of the
    /// identifier. Each failed attempt is logged; retryable failures are
    /// retried per the configured policy and the last one is returned.
    ///
    /// # Errors
    ///
    /// The [`ViesError`] of the last attempt once the policy gives up.
    pub fn verify(&mut self) -> Result<bool, ViesError> {
        let vatin = self.to_string();
        let country_code = self.country_code().to_string();
        let number = self.number().to_string();

        let client = match &mut self.remote.client {
            Some(client) => client,
            slot @ None => {
                log::debug!("creating default VIES client for {vatin}");
                slot.insert(Box::new(RestClient::new()?))
            }
        };

        let result = self.remote.retry.run(|attempt| {
            client.check_vat(&country_code, &number).inspect_err(|e| {
                log::error!("VIES check of {vatin} failed on attempt {attempt}: {e}");
            })
        })?;

        let valid = result.valid;
        log::debug!("VIES check of {vatin}: valid={valid}");
        self.remote.result = Some(result);
        Ok(valid)
    }

    /// Syntax and registry validity: the number matches its country's
    /// pattern and VIES reports it as valid.
    ///
    /// A pattern mismatch returns `Ok(false)` without a remote call.
    pub fn is_valid(&mut self) -> Result<bool, ViesError> {
        if !self.matches_pattern() {
            log::debug!(
                "{} does not match the {} pattern",
                self,
                self.country().name
            );
            return Ok(false);
        }
        self.verify()
    }

    /// The response of the last successful [`Vatin::verify`], if any.
    pub fn result(&self) -> Option<&ViesResult> {
        self.remote.result.as_ref()
    }
}
