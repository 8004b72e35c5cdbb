//! Rent-vs-buy net worth projection.
//!
//! Both households start with the same cash (the down payment) and spend the same
//! amount every month. The buyer spends it on the mortgage and upkeep; the renter on
//! rent. Whoever spends less on housing invests the difference. The renter also
//! invests the down payment, minus the security deposit parked with the landlord.
//!
//!   net worth (buy)  = property value - loan balance + buyer's portfolio
//!   net worth (rent) = renter's portfolio + security deposit
//!
//! Portfolios compound monthly at the rate equivalent to the annual return. Rent is
//! flat within a year and steps up on each anniversary.

use crate::error::CalcError;
use crate::loan::{monthly_payment, monthly_rate, remaining_balance};
use crate::policy::Policy;
use crate::types::{RentVsBuyInputs, RentVsBuyResult, YearSnapshot};
use crate::validate;

fn validate_inputs(i: &RentVsBuyInputs, policy: &Policy) -> Result<(), CalcError> {
    let limits = &policy.limits;
    validate::price_and_down_payment(i.property_price, i.down_payment)?;
    validate::interest_rate("interest_rate_percent", i.interest_rate_percent, limits)?;
    validate::loan_term("loan_term_years", i.loan_term_years, limits)?;
    validate::within(
        "property_appreciation_rate_percent",
        i.property_appreciation_rate_percent,
        -limits.max_appreciation_rate_percent,
        limits.max_appreciation_rate_percent,
    )?;
    validate::non_negative("annual_maintenance_cost", i.annual_maintenance_cost)?;
    validate::non_negative("annual_property_tax", i.annual_property_tax)?;
    validate::positive("monthly_rent", i.monthly_rent)?;
    validate::within(
        "annual_rent_increase_rate_percent",
        i.annual_rent_increase_rate_percent,
        0.0,
        limits.max_rent_increase_rate_percent,
    )?;
    validate::non_negative("security_deposit", i.security_deposit)?;
    validate::within(
        "investment_return_rate_percent",
        i.investment_return_rate_percent,
        0.0,
        limits.max_investment_return_rate_percent,
    )?;
    validate::years(
        "analysis_period_years",
        i.analysis_period_years,
        limits.max_analysis_period_years,
    )?;
    Ok(())
}

pub fn analyze_rent_vs_buy(
    inputs: &RentVsBuyInputs,
    policy: &Policy,
) -> Result<RentVsBuyResult, CalcError> {
    validate_inputs(inputs, policy)?;

    let loan_amount = inputs.property_price - inputs.down_payment;
    let r = monthly_rate(inputs.interest_rate_percent);
    let n = inputs.loan_term_years * 12;
    let mortgage = monthly_payment(loan_amount, r, n);

    let horizon = inputs.analysis_period_years * 12;
    let growth = 1.0 + inputs.investment_return_rate_percent / 100.0;
    let monthly_growth = growth.powf(1.0 / 12.0);
    let appreciation = 1.0 + inputs.property_appreciation_rate_percent / 100.0;
    let rent_step = 1.0 + inputs.annual_rent_increase_rate_percent / 100.0;
    let upkeep = (inputs.annual_maintenance_cost + inputs.annual_property_tax) / 12.0;

    let mut rent = inputs.monthly_rent;
    let mut renter = inputs.down_payment - inputs.security_deposit;
    let mut buyer = 0.0;
    let mut rent_paid = 0.0;
    let mut mortgage_paid = 0.0;
    let mut yearly = Vec::with_capacity(inputs.analysis_period_years as usize);

    for month in 1..=horizon {
        let installment = if month <= n { mortgage } else { 0.0 };
        let gap = installment + upkeep - rent;
        if gap > 0.0 {
            renter += gap;
        } else {
            buyer -= gap;
        }
        renter *= monthly_growth;
        buyer *= monthly_growth;
        rent_paid += rent;
        mortgage_paid += installment;

        if month % 12 == 0 {
            let year = month / 12;
            let property_value = inputs.property_price * appreciation.powi(year as i32);
            let loan_balance = remaining_balance(loan_amount, r, n, month);
            yearly.push(YearSnapshot {
                year,
                property_value,
                loan_balance,
                net_worth_buying: property_value - loan_balance + buyer,
                net_worth_renting: renter + inputs.security_deposit,
            });
            rent *= rent_step;
        }
    }

    let break_even_years = yearly
        .iter()
        .find(|y| y.net_worth_buying > y.net_worth_renting)
        .map(|y| y.year);

    // horizon >= 12 months, so there is always a final snapshot
    let end = yearly.last().copied().ok_or_else(|| {
        CalcError::invalid("analysis_period_years", "analysis produced no yearly figures")
    })?;
    let years = inputs.analysis_period_years as f64;

    Ok(RentVsBuyResult {
        net_worth_after_buying: end.net_worth_buying,
        net_worth_after_renting: end.net_worth_renting,
        is_buying_better: end.net_worth_buying > end.net_worth_renting,
        break_even_years,
        total_cost_of_buying: inputs.down_payment
            + mortgage_paid
            + (inputs.annual_maintenance_cost + inputs.annual_property_tax) * years,
        total_cost_of_renting: rent_paid,
        projected_property_value: end.property_value,
        remaining_loan_balance: end.loan_balance,
        monthly_mortgage_payment: mortgage,
        yearly,
        inputs: *inputs,
    })
}
