//! EU VIES REST API client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::result::{ViesError, ViesResult, disclosed, parse_request_date};
use super::transport::ViesTransport;

/// Public VIES REST endpoint.
pub const VIES_REST_URL: &str =
    "https://ec.europa.eu/taxation_customs/vies/rest-api/check-vat-number";

/// Default request timeout for both clients.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// VIES API response structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViesApiResponse {
    country_code: Option<String>,
    vat_number: Option<String>,
    valid: Option<bool>,
    request_date: Option<String>,
    name: Option<String>,
    address: Option<String>,
    // Error fields
    error_wrappers: Option<Vec<ViesErrorWrapper>>,
}

#[derive(Debug, Deserialize)]
struct ViesErrorWrapper {
    error: Option<String>,
    message: Option<String>,
}

/// VIES API request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViesRequest<'a> {
    country_code: &'a str,
    vat_number: &'a str,
}

/// Blocking client for the VIES REST API.
///
/// The API has no authentication — it is a free public service.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl RestClient {
    /// Client for the public endpoint with the default timeout.
    pub fn new() -> Result<Self, ViesError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Client for the public endpoint with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ViesError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ViesError::Network(e.to_string()))?;
        Ok(Self {
            http,
            url: VIES_REST_URL.to_string(),
        })
    }

    /// Point the client at another endpoint (a proxy or a test server).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// The endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ViesTransport for RestClient {
    fn check_vat(&self, country_code: &str, vat_number: &str) -> Result<ViesResult, ViesError> {
        let req = ViesRequest {
            country_code,
            vat_number,
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .map_err(|e| ViesError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ViesError::Network(e.to_string()))?;

        classify(status, &body, country_code, vat_number)
    }
}

/// Map an HTTP status and body to a result.
///
/// A fault code in `errorWrappers` wins over the bare HTTP status, since
/// member-state faults may arrive with a non-2xx status.
pub(crate) fn classify(
    status: StatusCode,
    body: &str,
    country_code: &str,
    vat_number: &str,
) -> Result<ViesResult, ViesError> {
    if !status.is_success() {
        if let Some(fault) = serde_json::from_str::<ViesApiResponse>(body)
            .ok()
            .and_then(|r| fault_of(&r))
        {
            return Err(ViesError::Fault(fault));
        }
        return Err(ViesError::Fault(format!("HTTP {status}: {body}")));
    }

    parse_response(body, country_code, vat_number)
}

/// Parse a REST response body.
pub(crate) fn parse_response(
    body: &str,
    country_code: &str,
    vat_number: &str,
) -> Result<ViesResult, ViesError> {
    let api_resp: ViesApiResponse = serde_json::from_str(body)
        .map_err(|e: serde_json::Error| ViesError::Parse(e.to_string()))?;

    if let Some(fault) = fault_of(&api_resp) {
        return Err(ViesError::Fault(fault));
    }

    Ok(into_result(api_resp, country_code, vat_number))
}

fn fault_of(api_resp: &ViesApiResponse) -> Option<String> {
    let err = api_resp.error_wrappers.as_ref()?.first()?;
    Some(
        err.error
            .clone()
            .or_else(|| err.message.clone())
            .unwrap_or_else(|| "unknown error".into()),
    )
}

fn into_result(api_resp: ViesApiResponse, country_code: &str, vat_number: &str) -> ViesResult {
    ViesResult {
        country_code: api_resp
            .country_code
            .unwrap_or_else(|| country_code.to_string()),
        vat_number: api_resp
            .vat_number
            .unwrap_or_else(|| vat_number.to_string()),
        request_date: api_resp.request_date.as_deref().and_then(parse_request_date),
        valid: api_resp.valid.unwrap_or(false),
        name: disclosed(api_resp.name),
        address: disclosed(api_resp.address),
    }
}
