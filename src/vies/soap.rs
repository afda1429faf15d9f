//! VIES SOAP `checkVat` client.
//!
//! The classic VIES interface is a SOAP 1.1 service. Requests are a fixed
//! envelope; responses are read by local element name so namespace prefixes
//! (`ns2:`, `env:`, `soap:`) don't matter.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use reqwest::StatusCode;
use std::io::Cursor;
use std::time::Duration;

use super::rest::DEFAULT_TIMEOUT;
use super::result::{ViesError, ViesResult, disclosed, parse_request_date};
use super::transport::ViesTransport;

/// Public VIES SOAP endpoint.
pub const VIES_SOAP_URL: &str =
    "https://ec.europa.eu/taxation_customs/vies/services/checkVatService";

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const CHECK_VAT_NS: &str = "urn:ec.europa.eu:taxud:vies:services:checkVat:types";

/// Blocking client for the VIES SOAP service.
#[derive(Debug, Clone)]
pub struct SoapClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl SoapClient {
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
            url: VIES_SOAP_URL.to_string(),
        })
    }

    /// Point the client at another endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// The endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ViesTransport for SoapClient {
    fn check_vat(&self, country_code: &str, vat_number: &str) -> Result<ViesResult, ViesError> {
        let envelope = check_vat_envelope(country_code, vat_number)?;

        let resp = self
            .http
            .post(&self.url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "")
            .body(envelope)
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
/// Faults come back as HTTP 500 with a `soap:Fault` body; a non-2xx status
/// without a readable envelope becomes a fault carrying the status.
pub(crate) fn classify(
    status: StatusCode,
    body: &str,
    country_code: &str,
    vat_number: &str,
) -> Result<ViesResult, ViesError> {
    match parse_check_vat_response(body, country_code, vat_number) {
        Err(ViesError::Parse(_)) if !status.is_success() => {
            Err(ViesError::Fault(format!("HTTP {status}: {body}")))
        }
        other => other,
    }
}

fn xml_io(e: impl std::fmt::Display) -> ViesError {
    ViesError::Parse(format!("XML write error: {e}"))
}

/// Build the SOAP request envelope for `checkVat`.
pub fn check_vat_envelope(country_code: &str, vat_number: &str) -> Result<String, ViesError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer
        .write_event(Event::Decl(quick_xml::events::BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            None,
        )))
        .map_err(xml_io)?;

    let mut envelope = BytesStart::new("soapenv:Envelope");
    envelope.push_attribute(("xmlns:soapenv", SOAP_ENV_NS));
    envelope.push_attribute(("xmlns:urn", CHECK_VAT_NS));
    writer.write_event(Event::Start(envelope)).map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("soapenv:Body")))
        .map_err(xml_io)?;
    writer
        .write_event(Event::Start(BytesStart::new("urn:checkVat")))
        .map_err(xml_io)?;
    for (name, text) in [("urn:countryCode", country_code), ("urn:vatNumber", vat_number)] {
        writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
    }
    for name in ["urn:checkVat", "soapenv:Body", "soapenv:Envelope"] {
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
    }

    let buf = writer.into_inner().into_inner();
    String::from_utf8(buf).map_err(|e| ViesError::Parse(format!("XML UTF-8 error: {e}")))
}

#[derive(Default)]
struct SoapParsed {
    in_response: bool,
    in_fault: bool,
    country_code: Option<String>,
    vat_number: Option<String>,
    request_date: Option<String>,
    valid: Option<bool>,
    name: Option<String>,
    address: Option<String>,
    fault_string: Option<String>,
}

impl SoapParsed {
    fn handle_text(&mut self, element: &str, text: String) {
        if self.in_fault {
            if element == "faultstring" {
                self.fault_string = Some(text);
            }
            return;
        }
        if !self.in_response {
            return;
        }
        match element {
            "countryCode" => self.country_code = Some(text),
            "vatNumber" => self.vat_number = Some(text),
            "requestDate" => self.request_date = Some(text),
            "valid" => self.valid = Some(text.trim() == "true"),
            "name" => self.name = Some(text),
            "address" => self.address = Some(text),
            _ => {}
        }
    }
}

fn local_name(qname: &[u8]) -> String {
    let name = std::str::from_utf8(qname).unwrap_or("");
    name.rsplit(':').next().unwrap_or(name).to_string()
}

/// Parse a `checkVatResponse` or `Fault` envelope.
pub fn parse_check_vat_response(
    xml: &str,
    country_code: &str,
    vat_number: &str,
) -> Result<ViesResult, ViesError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut p = SoapParsed::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e.name().as_ref());
                match name.as_str() {
                    "checkVatResponse" => p.in_response = true,
                    "Fault" => p.in_fault = true,
                    _ => {}
                }
                path.push(name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if let Some(element) = path.last() {
                    p.handle_text(element, text);
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ViesError::Parse(format!("XML parse error: {e}")));
            }
            _ => {}
        }
    }

    if p.in_fault {
        return Err(ViesError::Fault(
            p.fault_string.unwrap_or_else(|| "unknown fault".into()),
        ));
    }
    if !p.in_response {
        return Err(ViesError::Parse("no checkVatResponse element".into()));
    }
    let Some(valid) = p.valid else {
        return Err(ViesError::Parse("checkVatResponse without <valid>".into()));
    };

    Ok(ViesResult {
        country_code: p.country_code.unwrap_or_else(|| country_code.to_string()),
        vat_number: p.vat_number.unwrap_or_else(|| vat_number.to_string()),
        request_date: p.request_date.as_deref().and_then(parse_request_date),
        valid,
        name: disclosed(p.name),
        address: disclosed(p.address),
    })
}
