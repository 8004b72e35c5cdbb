//! Upfront purchase costs and total cost of ownership.

use crate::error::CalcError;
use crate::loan;
use crate::policy::Policy;
use crate::types::{CostBreakdownInputs, CostBreakdownResult};
use crate::validate;

pub fn calculate_cost_breakdown(
    inputs: &CostBreakdownInputs,
    policy: &Policy,
) -> Result<CostBreakdownResult, CalcError> {
    let price = validate::positive("property_price", inputs.property_price)?;
    validate::within("down_payment_percent", inputs.down_payment_percent, 0.0, 100.0)?;
    validate::interest_rate(
        "annual_interest_rate_percent",
        inputs.annual_interest_rate_percent,
        &policy.limits,
    )?;
    validate::loan_term("loan_term_years", inputs.loan_term_years, &policy.limits)?;

    let fees = &policy.fees;
    let down_payment_amount = price * inputs.down_payment_percent / 100.0;
    let loan_amount = price - down_payment_amount;

    let registration_fee = price * fees.registration_rate;
    let transfer_fee = price * fees.transfer_rate;
    let agency_fee = price * fees.agency_rate;
    let mortgage_registration_fee = loan_amount * fees.mortgage_registration_rate;
    let valuation_fee = fees.valuation_fee;
    let mortgage_processing_fee =
        (loan_amount * fees.mortgage_processing_rate).min(fees.mortgage_processing_cap);
    let title_deed_fee = fees.title_deed_fee;

    let financed = loan::loan_figures(
        loan_amount,
        inputs.annual_interest_rate_percent,
        inputs.loan_term_years,
    );

    let total_upfront_costs = down_payment_amount
        + registration_fee
        + transfer_fee
        + agency_fee
        + mortgage_registration_fee
        + valuation_fee
        + mortgage_processing_fee
        + title_deed_fee;

    Ok(CostBreakdownResult {
        registration_fee,
        transfer_fee,
        agency_fee,
        mortgage_registration_fee,
        valuation_fee,
        mortgage_processing_fee,
        title_deed_fee,
        down_payment_amount,
        loan_amount,
        monthly_payment: financed.monthly_payment,
        total_interest_paid: financed.total_interest,
        total_upfront_costs,
        total_cost_of_ownership: total_upfront_costs + loan_amount + financed.total_interest,
    })
}
