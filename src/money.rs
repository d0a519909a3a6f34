use rust_decimal::{Decimal, RoundingStrategy};
use validator::ValidationError;

/// Largest accepted integer part is 12 digits.
const MAX_INTEGER_DIGITS: u32 = 12;
const FRACTION_DIGITS: u32 = 2;

/// Round to 2 fraction digits, half-up, always carrying scale 2 ("5" becomes "5.00").
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(FRACTION_DIGITS);
    rounded
}

/// `part / whole * 100`, rounded; zero when `whole` is zero.
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return round2(Decimal::ZERO);
    }
    round2(part * Decimal::ONE_HUNDRED / whole)
}

/// Validate a monetary amount: at least 0.01, at most 12 integer digits and 2 fraction digits.
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        let mut error = ValidationError::new("amount_must_be_positive");
        error.message = Some("Amount must be greater than 0".into());
        return Err(error);
    }
    if amount.normalize().scale() > FRACTION_DIGITS {
        let mut error = ValidationError::new("amount_fraction_digits");
        error.message = Some("Amount must have at most 2 decimal places".into());
        return Err(error);
    }
    if integer_digits(amount) > MAX_INTEGER_DIGITS {
        let mut error = ValidationError::new("amount_integer_digits");
        error.message = Some("Amount must have at most 12 integer digits".into());
        return Err(error);
    }
    Ok(())
}

fn integer_digits(amount: &Decimal) -> u32 {
    let mut whole = amount.abs().trunc();
    let ten = Decimal::TEN;
    let mut digits = 0;
    while whole >= Decimal::ONE {
        whole = (whole / ten).trunc();
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(d("1.005")).to_string(), "1.01");
        assert_eq!(round2(d("1.004")).to_string(), "1.00");
        assert_eq!(round2(d("-1.005")).to_string(), "-1.01");
        assert_eq!(round2(d("7")).to_string(), "7.00");
    }

    #[test]
    fn test_percent_zero_whole() {
        assert_eq!(percent(d("200.00"), Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(d("200.00"), d("1000.00")).to_string(), "20.00");
        assert_eq!(percent(d("1"), d("3")).to_string(), "33.33");
        assert_eq!(percent(d("2"), d("3")).to_string(), "66.67");
    }

    #[test]
    fn test_validate_amount_accepts_normal_values() {
        assert!(validate_amount(&d("0.01")).is_ok());
        assert!(validate_amount(&d("12.5")).is_ok());
        assert!(validate_amount(&d("10.500")).is_ok());
        assert!(validate_amount(&d("999999999999.99")).is_ok());
    }

    #[test]
    fn test_validate_amount_rejects_bad_shapes() {
        assert!(validate_amount(&d("0")).is_err());
        assert!(validate_amount(&d("-5.00")).is_err());
        assert!(validate_amount(&d("1.001")).is_err());
        assert!(validate_amount(&d("1000000000000.00")).is_err());
    }
}
