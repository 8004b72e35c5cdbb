//! Boundary checks run before any calculation. Nothing is clamped here.

use crate::error::CalcError;
use crate::policy::{Limits, YEARS_CEILING};

type Result<T> = std::result::Result<T, CalcError>;

pub fn finite(field: &'static str, v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CalcError::invalid(field, format!("{v} is not a finite number")))
    }
}

pub fn positive(field: &'static str, v: f64) -> Result<f64> {
    finite(field, v)?;
    if v <= 0.0 {
        return Err(CalcError::invalid(field, format!("must be positive, got {v}")));
    }
    Ok(v)
}

pub fn non_negative(field: &'static str, v: f64) -> Result<f64> {
    finite(field, v)?;
    if v < 0.0 {
        return Err(CalcError::invalid(field, format!("cannot be negative, got {v}")));
    }
    Ok(v)
}

pub fn within(field: &'static str, v: f64, lo: f64, hi: f64) -> Result<f64> {
    finite(field, v)?;
    if v < lo || v > hi {
        return Err(CalcError::invalid(
            field,
            format!("must be between {lo} and {hi}, got {v}"),
        ));
    }
    Ok(v)
}

/// Whole years in 1..=max, never above `YEARS_CEILING` whatever the configured max.
pub fn years(field: &'static str, v: u32, max: u32) -> Result<u32> {
    let max = max.min(YEARS_CEILING);
    if v == 0 || v > max {
        return Err(CalcError::invalid(
            field,
            format!("must be between 1 and {max} years, got {v}"),
        ));
    }
    Ok(v)
}

/// Price > 0 and 0 <= down payment <= price.
pub fn price_and_down_payment(price: f64, down_payment: f64) -> Result<()> {
    positive("property_price", price)?;
    non_negative("down_payment", down_payment)?;
    if down_payment > price {
        return Err(CalcError::invalid(
            "down_payment",
            format!("{down_payment} exceeds property price {price}"),
        ));
    }
    Ok(())
}

pub fn interest_rate(field: &'static str, v: f64, limits: &Limits) -> Result<f64> {
    within(field, v, 0.0, limits.max_interest_rate_percent)
}

pub fn loan_term(field: &'static str, v: u32, limits: &Limits) -> Result<u32> {
    years(field, v, limits.max_term_years)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(finite("x", f64::NAN).is_err());
        assert!(positive("x", f64::INFINITY).is_err());
    }

    #[test]
    fn down_payment_may_equal_price() {
        assert!(price_and_down_payment(500_000.0, 500_000.0).is_ok());
        assert!(price_and_down_payment(500_000.0, 500_000.01).is_err());
        assert!(price_and_down_payment(0.0, 0.0).is_err());
        assert!(price_and_down_payment(500_000.0, -1.0).is_err());
    }

    #[test]
    fn term_bounds() {
        let limits = Limits::default();
        assert!(loan_term("term_years", 0, &limits).is_err());
        assert!(loan_term("term_years", 35, &limits).is_ok());
        assert!(loan_term("term_years", 36, &limits).is_err());
    }

    #[test]
    fn years_never_exceed_the_ceiling() {
        assert!(years("term_years", YEARS_CEILING, u32::MAX).is_ok());
        let err = years("term_years", 400_000_000, u32::MAX).unwrap_err();
        assert!(err.to_string().contains(&format!("between 1 and {YEARS_CEILING}")));
    }

    #[test]
    fn error_names_the_field() {
        let err = interest_rate("annual_interest_rate_percent", 120.0, &Limits::default()).unwrap_err();
        assert_eq!(err.field(), "annual_interest_rate_percent");
        assert!(err.to_string().contains("between 0 and 100"));
    }
}
