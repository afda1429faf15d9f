//! Remote verification scenarios against a scripted VIES transport.

#![cfg(feature = "vies")]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use chrono::NaiveDate;
use log::{Level, LevelFilter, Log, Metadata, Record};
use vatin::Vatin;
use vatin::vies::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Captures every log record so tests can count failure logs.
struct CaptureLogger;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn init_logger() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Debug);
    });
}

/// Error-level records mentioning `needle`.
fn error_logs(needle: &str) -> usize {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, msg)| *level == Level::Error && msg.contains(needle))
        .count()
}

/// Records at any level mentioning `needle`.
fn all_logs(needle: &str) -> usize {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, msg)| msg.contains(needle))
        .count()
}

/// Transport that replays a script, then repeats `fallback`.
struct ScriptedVies {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Result<ViesResult, ViesError>>>,
    fallback: Result<ViesResult, ViesError>,
}

impl ScriptedVies {
    fn new(
        script: Vec<Result<ViesResult, ViesError>>,
        fallback: Result<ViesResult, ViesError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
            fallback,
        })
    }

    fn always(outcome: Result<ViesResult, ViesError>) -> Arc<Self> {
        Self::new(Vec::new(), outcome)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ViesTransport for ScriptedVies {
    fn check_vat(&self, _country_code: &str, _vat_number: &str) -> Result<ViesResult, ViesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn registered(cc: &str, number: &str, valid: bool, name: Option<&str>) -> ViesResult {
    ViesResult {
        country_code: cc.into(),
        vat_number: number.into(),
        request_date: NaiveDate::from_ymd_opt(2015, 12, 7),
        valid,
        name: name.map(String::from),
        address: name.map(|_| "Vinohradská 1597/174\nPRAHA 3 - VINOHRADY\n130 00  PRAHA 3".into()),
    }
}

fn unavailable() -> ViesError {
    ViesError::Fault("MS_UNAVAILABLE".into())
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy::new()
        .with_initial_backoff(Duration::ZERO)
        .with_max_attempts(attempts)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn e_fractal_is_valid() {
    let vies = ScriptedVies::always(Ok(registered(
        "CZ",
        "26428091",
        true,
        Some("e-FRACTAL, s.r.o."),
    )));
    let mut vatin = Vatin::new("CZ", "26428091")
        .unwrap()
        .with_client(vies.clone());

    assert!(vatin.matches_pattern());
    assert!(vatin.result().is_none());
    assert!(vatin.is_valid().unwrap());

    let result = vatin.result().unwrap();
    assert!(result.valid);
    assert_eq!(result.name.as_deref(), Some("e-FRACTAL, s.r.o."));
    assert_eq!(result.country_code, "CZ");
    assert_eq!(vies.calls(), 1);
}

#[test]
fn transient_faults_are_retried() {
    init_logger();
    let vies = ScriptedVies::new(
        vec![Err(unavailable()), Err(unavailable())],
        Ok(registered("CZ", "12345678", true, Some("ACME s.r.o."))),
    );
    let mut vatin = Vatin::new("CZ", "12345678")
        .unwrap()
        .with_client(vies.clone())
        .with_retry(fast_retry(5));

    assert!(vatin.is_valid().unwrap());
    assert_eq!(vies.calls(), 3);
    assert_eq!(error_logs("CZ12345678"), 2);
    assert_eq!(
        vatin.result().unwrap().name.as_deref(),
        Some("ACME s.r.o.")
    );
}

#[test]
fn persistent_fault_surfaces_after_budget() {
    init_logger();
    let vies = ScriptedVies::always(Err(unavailable()));
    let mut vatin = Vatin::new("CZ", "87654321")
        .unwrap()
        .with_client(vies.clone())
        .with_retry(fast_retry(3));

    let err = vatin.verify().unwrap_err();
    assert_eq!(err, unavailable());
    assert_eq!(vies.calls(), 3);
    assert_eq!(error_logs("CZ87654321"), 3);
    assert!(vatin.result().is_none());
}

#[test]
fn persistent_fault_bounded_by_elapsed_time() {
    let vies = ScriptedVies::always(Err(ViesError::Network("connection refused".into())));
    let policy = RetryPolicy::new()
        .with_initial_backoff(Duration::from_millis(10))
        .with_max_backoff(Duration::from_millis(10))
        .with_max_elapsed(Duration::from_millis(60));
    let mut vatin = Vatin::new("DE", "123456789")
        .unwrap()
        .with_client(vies.clone())
        .with_retry(policy);

    assert!(matches!(vatin.verify(), Err(ViesError::Network(_))));
    assert!(vies.calls() >= 2);
}

#[test]
fn fault_text_logged_once_per_attempt() {
    init_logger();
    let fault = ViesError::Fault("MS_MAX_CONCURRENT_REQ".into());
    let vies = ScriptedVies::always(Err(fault.clone()));
    let mut vatin = Vatin::new("SK", "2022749619")
        .unwrap()
        .with_client(vies.clone())
        .with_retry(fast_retry(3));

    assert_eq!(vatin.verify().unwrap_err(), fault);
    assert_eq!(vies.calls(), 3);
    assert_eq!(all_logs("MS_MAX_CONCURRENT_REQ"), 3);
    assert_eq!(error_logs("MS_MAX_CONCURRENT_REQ"), 3);
}

#[test]
fn invalid_input_is_not_retried() {
    let vies = ScriptedVies::always(Err(ViesError::Fault("INVALID_INPUT".into())));
    let mut vatin = Vatin::new("DE", "987654321")
        .unwrap()
        .with_client(vies.clone())
        .with_retry(fast_retry(5));

    assert!(vatin.verify().is_err());
    assert_eq!(vies.calls(), 1);
}

#[test]
fn pattern_mismatch_skips_remote_call() {
    let vies = ScriptedVies::always(Ok(registered("DE", "12", true, None)));
    let mut vatin = Vatin::new("DE", "12").unwrap().with_client(vies.clone());

    assert!(!vatin.matches_pattern());
    assert!(!vatin.is_valid().unwrap());
    assert_eq!(vies.calls(), 0);
    assert!(vatin.result().is_none());
}

#[test]
fn registry_says_invalid() {
    let vies = ScriptedVies::always(Ok(registered("DE", "111111111", false, None)));
    let mut vatin = Vatin::new("DE", "111111111")
        .unwrap()
        .with_client(vies.clone());

    assert!(!vatin.verify().unwrap());
    assert!(!vatin.is_valid().unwrap());
    let result = vatin.result().unwrap();
    assert!(!result.valid);
    assert!(result.name.is_none());
}

#[test]
fn client_is_reused_across_calls() {
    let vies = ScriptedVies::new(
        vec![Ok(registered("AT", "U12345678", true, None))],
        Ok(registered("AT", "U12345678", false, None)),
    );
    let mut vatin = Vatin::new("AT", "U12345678")
        .unwrap()
        .with_client(vies.clone());

    assert!(vatin.verify().unwrap());
    assert!(!vatin.verify().unwrap());
    assert_eq!(vies.calls(), 2);
    assert!(!vatin.result().unwrap().valid);
}

#[test]
fn failed_reverification_keeps_previous_result() {
    let vies = ScriptedVies::new(
        vec![Ok(registered("LU", "12345678", true, None))],
        Err(unavailable()),
    );
    let mut vatin = Vatin::new("LU", "12345678")
        .unwrap()
        .with_client(vies.clone())
        .with_retry(RetryPolicy::no_retry());

    assert!(vatin.verify().unwrap());
    assert!(vatin.verify().is_err());
    assert!(vatin.result().unwrap().valid);
}

#[test]
fn identifiers_do_not_share_state() {
    let a = ScriptedVies::always(Ok(registered("PL", "1234567890", true, None)));
    let b = ScriptedVies::always(Err(unavailable()));
    let mut first = Vatin::new("PL", "1234567890").unwrap().with_client(a.clone());
    let mut second = Vatin::new("PL", "1234567890")
        .unwrap()
        .with_client(b.clone())
        .with_retry(RetryPolicy::no_retry());

    assert!(first.verify().unwrap());
    assert!(second.verify().is_err());
    assert!(first.result().is_some());
    assert!(second.result().is_none());
    assert_eq!((a.calls(), b.calls()), (1, 1));
}

#[test]
fn result_serializes() {
    let r = registered("CZ", "26428091", true, Some("e-FRACTAL, s.r.o."));
    let json = serde_json::to_string(&r).unwrap();
    assert!(json.contains("\"request_date\":\"2015-12-07\""));
    let back: ViesResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
}

#[test]
fn vies_error_display() {
    let e = ViesError::Network("timeout".into());
    assert!(e.to_string().contains("timeout"));

    let e = ViesError::Fault("MS_UNAVAILABLE".into());
    assert!(e.to_string().contains("MS_UNAVAILABLE"));

    let e = ViesError::Parse("invalid json".into());
    assert!(e.to_string().contains("invalid json"));
}

#[test]
fn rest_client_defaults() {
    let client = RestClient::new().unwrap();
    assert_eq!(client.url(), VIES_REST_URL);
}
