//! Side-by-side appreciation of two properties over a holding period.

use crate::error::CalcError;
use crate::policy::Policy;
use crate::types::{ComparedProperty, ComparisonInputs, ComparisonSide, Pick, PropertyComparison};
use crate::validate;

fn side(
    field: &'static str,
    p: &ComparedProperty,
    growth: f64,
) -> Result<ComparisonSide, CalcError> {
    let price = validate::positive(field, p.price)?;
    let price_per_sq_ft = match p.size_sq_ft {
        Some(size) => Some(price / validate::positive("size_sq_ft", size)?),
        None => None,
    };
    let future_value = price * growth;
    Ok(ComparisonSide {
        price,
        future_value,
        capital_gain: future_value - price,
        roi_percent: (future_value - price) / price * 100.0,
        price_per_sq_ft,
    })
}

fn pick(a: f64, b: f64, lower_wins: bool) -> Pick {
    if a == b {
        Pick::Tie
    } else if (a < b) == lower_wins {
        Pick::First
    } else {
        Pick::Second
    }
}

pub fn compare_properties(
    inputs: &ComparisonInputs,
    policy: &Policy,
) -> Result<PropertyComparison, CalcError> {
    validate::within(
        "appreciation_rate_percent",
        inputs.appreciation_rate_percent,
        0.0,
        policy.limits.max_appreciation_rate_percent,
    )?;
    validate::years(
        "holding_period_years",
        inputs.holding_period_years,
        policy.limits.max_analysis_period_years,
    )?;

    let growth =
        (1.0 + inputs.appreciation_rate_percent / 100.0).powi(inputs.holding_period_years as i32);
    let first = side("first_price", &inputs.first, growth)?;
    let second = side("second_price", &inputs.second, growth)?;

    Ok(PropertyComparison {
        first,
        second,
        cheaper: pick(first.price, second.price, true),
        larger_gain: pick(first.capital_gain, second.capital_gain, false),
        holding_period_years: inputs.holding_period_years,
    })
}
