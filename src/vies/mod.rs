//! VIES registry checks.
//!
//! Verifies a [`Vatin`](crate::Vatin) against the EU VIES service and
//! records the registered name and address.
//!
//! # Example
//!
//! ```ignore
//! use vatin::Vatin;
//!
//! // Blocking, requires network
//! let mut vatin = Vatin::new("CZ", "26428091")?;
//! assert!(vatin.is_valid()?);
//! println!("{:?}", vatin.result().and_then(|r| r.name.as_deref()));
//! ```

mod rest;
mod result;
mod retry;
#[cfg(feature = "soap")]
mod soap;
mod transport;
mod verify;

pub use rest::{DEFAULT_TIMEOUT, RestClient, VIES_REST_URL};
pub use result::{ViesError, ViesResult};
pub use retry::RetryPolicy;
#[cfg(feature = "soap")]
pub use soap::{SoapClient, VIES_SOAP_URL, check_vat_envelope, parse_check_vat_response};
pub use transport::ViesTransport;

pub(crate) use verify::RemoteState;
