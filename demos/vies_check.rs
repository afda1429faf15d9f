use std::time::Duration;

use vatin::Vatin;
use vatin::vies::RetryPolicy;

fn main() {
    // Syntax validation (no network required)
    println!("=== VAT ID Syntax Validation ===\n");

    let test_ids = [
        "CZ26428091",
        "ATU12345678",
        "FRAB123456789",
        "DK12345678",
        "NL123456789B01",
        "DE12345678",  // too short
        "XX999999999", // unknown country
        "1Z12345678",  // not a country code
    ];

    for id in &test_ids {
        match Vatin::parse(id) {
            Ok(v) if v.matches_pattern() => {
                println!("  {id} => ok ({}, {})", v.country().name, v.formatted())
            }
            Ok(v) => println!("  {id} => pattern mismatch for {}", v.country().name),
            Err(e) => println!("  {id} => INVALID: {e}"),
        }
    }

    // Registry check (requires network)
    println!("\n=== VIES Registry Check ===\n");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ids = if args.is_empty() {
        vec!["CZ26428091".to_string()]
    } else {
        args
    };

    for id in &ids {
        let mut vatin = match Vatin::parse(id) {
            Ok(v) => v.with_retry(RetryPolicy::new().with_max_elapsed(Duration::from_secs(5))),
            Err(e) => {
                println!("  {id} => INVALID: {e}");
                continue;
            }
        };
        match vatin.is_valid() {
            Ok(valid) => {
                println!("  {id} => valid={valid}");
                if let Some(r) = vatin.result() {
                    println!("    name:    {}", r.name.as_deref().unwrap_or("—"));
                    println!("    address: {}", r.address.as_deref().unwrap_or("—"));
                }
            }
            Err(e) => println!("  {id} => VIES unavailable: {e}"),
        }
    }
}
