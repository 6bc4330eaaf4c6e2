use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // base58 alphabet: no 0, O, I or l
    static ref ADDRESS_PATTERN: Regex = Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{25,90}$").unwrap();
}

// Inclusive bounds for a single disbursement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountBounds {
    pub min: u64,
    pub max: u64,
}

// Destination wallet must be 25-90 base58 characters
pub fn validate_address(address: &str) -> bool {
    ADDRESS_PATTERN.is_match(address)
}

// Amount must be a finite whole number inside [min, max]
pub fn validate_amount(amount: f64, min: u64, max: u64) -> bool {
    amount.is_finite() && amount.fract() == 0.0 && amount >= min as f64 && amount <= max as f64
}

// JSON number or numeric string, anything else is None
pub fn amount_from_json(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 40 characters, all from the accepted alphabet
    const WALLET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefg";

    #[test]
    fn accepts_base58_address_in_length_range() {
        assert_eq!(WALLET.len(), 40);
        assert!(validate_address(WALLET));
        assert!(validate_address(&"z".repeat(25)));
        assert!(validate_address(&"z".repeat(90)));
    }

    #[test]
    fn rejects_address_outside_length_range() {
        assert!(!validate_address(""));
        assert!(!validate_address(&"z".repeat(24)));
        assert!(!validate_address(&"z".repeat(91)));
    }

    #[test]
    fn rejects_ambiguous_and_foreign_characters() {
        for bad in ['0', 'O', 'I', 'l', '-', '_', ' ', '+', '/', 'é'] {
            let mut address = WALLET[..39].to_string();
            address.push(bad);
            assert!(!validate_address(&address), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_address_with_trailing_newline() {
        assert!(!validate_address(&format!("{WALLET}\n")));
    }

    #[test]
    fn amount_inside_bounds_is_accepted() {
        assert!(validate_amount(1.0, 1, 5));
        assert!(validate_amount(3.0, 1, 5));
        assert!(validate_amount(5.0, 1, 5));
    }

    #[test]
    fn amount_outside_bounds_or_fractional_is_rejected() {
        assert!(!validate_amount(0.0, 1, 5));
        assert!(!validate_amount(6.0, 1, 5));
        assert!(!validate_amount(9.0, 1, 5));
        assert!(!validate_amount(-1.0, 1, 5));
        assert!(!validate_amount(2.5, 1, 5));
        assert!(!validate_amount(f64::NAN, 1, 5));
        assert!(!validate_amount(f64::INFINITY, 1, 5));
    }

    #[test]
    fn amount_is_read_from_numbers_and_numeric_strings() {
        assert_eq!(amount_from_json(&json!(3)), Some(3.0));
        assert_eq!(amount_from_json(&json!(2.5)), Some(2.5));
        assert_eq!(amount_from_json(&json!(" 4 ")), Some(4.0));
        assert_eq!(amount_from_json(&json!("four")), None);
        assert_eq!(amount_from_json(&json!(null)), None);
        assert_eq!(amount_from_json(&json!([3])), None);
        assert_eq!(amount_from_json(&json!(true)), None);
    }
}
