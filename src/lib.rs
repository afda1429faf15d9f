//! # vatin
//!
//! European VAT identification number (VATIN) validation in two stages:
//! an offline syntax check against per-country patterns, and an online
//! check against the EU VIES registry that also returns the registered
//! business name and address.
//!
//! ## Quick Start
//!
//! ```rust
//! use vatin::Vatin;
//!
//! let vatin = Vatin::new("dk", "12345678").unwrap();
//! assert_eq!(vatin.to_string(), "DK12345678");
//! assert!(vatin.matches_pattern());
//! assert_eq!(vatin.formatted(), "1234 5678");
//!
//! assert!(Vatin::new("US", "123456789").is_err());
//! ```
//!
//! With the `vies` feature, [`Vatin::verify`] and [`Vatin::is_valid`]
//! query the registry (blocking, with retries) and
//! [`Vatin::result`] exposes the response.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Country rules, syntax validation, display formatting |
//! | `vies` | VIES REST client, retry policy, remote verification |
//! | `soap` | VIES SOAP client |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "vies")]
pub mod vies;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
