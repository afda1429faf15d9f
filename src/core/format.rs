//! Country-specific display grouping for VAT numbers.
//!
//! Formatters take the number part without the country prefix and only
//! insert spaces. They are pure and never used for validation.

/// Denmark: groups of four (`"12345678"` → `"1234 5678"`).
pub fn dk_format(v: &str) -> String {
    let chars: Vec<char> = v.chars().collect();
    chars
        .chunks(4)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// France: two-character key plus first two digits, then the rest
/// (`"AB123456789"` → `"AB12 3456789"`).
pub fn fr_format(v: &str) -> String {
    match v.char_indices().nth(4) {
        Some((split, _)) => format!("{} {}", &v[..split], &v[split..]),
        None => v.to_string(),
    }
}

/// United Kingdom / Northern Ireland: `"123 4567 89"`, with a trailing
/// three-digit branch group for 12-digit numbers. Other lengths (including
/// the `GD`/`HA` government forms) are returned unchanged.
pub fn gb_format(v: &str) -> String {
    if !v.is_ascii() {
        return v.to_string();
    }
    match v.len() {
        9 => format!("{} {} {}", &v[..3], &v[3..7], &v[7..9]),
        12 => format!("{} {}", gb_format(&v[..9]), &v[9..12]),
        _ => v.to_string(),
    }
}
