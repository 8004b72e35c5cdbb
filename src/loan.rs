//! Fixed-rate amortizing mortgage: monthly payment, totals, first/last installment split
//! and the full schedule.
//!
//! payment = P × r × (1 + r)^n / ((1 + r)^n - 1), with r the monthly rate and n the
//! number of monthly payments. A zero rate degrades to P / n; a zero loan pays nothing.

use crate::error::CalcError;
use crate::policy::Policy;
use crate::types::{AmortizationSchedule, Installment, LoanInputs, LoanResult, YearSummary};
use crate::validate;

pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Level monthly payment. `powi` keeps integer exponents exact-ish.
pub fn monthly_payment(principal: f64, monthly_rate: f64, n: u32) -> f64 {
    if principal <= 0.0 || n == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / n as f64;
    }
    let factor = (1.0 + monthly_rate).powi(n as i32);
    principal * (monthly_rate * factor) / (factor - 1.0)
}

/// Outstanding balance after `paid` of `n` level payments (closed form).
pub fn remaining_balance(principal: f64, monthly_rate: f64, n: u32, paid: u32) -> f64 {
    if principal <= 0.0 || paid >= n {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal * (1.0 - paid as f64 / n as f64);
    }
    let pmt = monthly_payment(principal, monthly_rate, n);
    let grown = (1.0 + monthly_rate).powi(paid as i32);
    principal * grown - pmt * (grown - 1.0) / monthly_rate
}

/// Walks the schedule recurrence one installment at a time.
#[derive(Debug, Clone)]
pub struct Amortization {
    balance: f64,
    rate: f64,
    payment: f64,
    period: u32,
    n: u32,
}

impl Amortization {
    pub fn new(principal: f64, monthly_rate: f64, n: u32) -> Self {
        Self {
            balance: principal.max(0.0),
            rate: monthly_rate,
            payment: monthly_payment(principal, monthly_rate, n),
            period: 0,
            n: if principal > 0.0 { n } else { 0 },
        }
    }
}

impl Iterator for Amortization {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.period >= self.n {
            return None;
        }
        self.period += 1;
        let interest = self.balance * self.rate;
        let principal = self.payment - interest;
        self.balance -= principal;
        Some(Installment {
            period: self.period,
            payment: self.payment,
            principal,
            interest,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.n - self.period) as usize;
        (left, Some(left))
    }
}

fn validate_inputs(inputs: &LoanInputs, policy: &Policy) -> Result<(), CalcError> {
    validate::price_and_down_payment(inputs.property_price, inputs.down_payment)?;
    validate::interest_rate(
        "annual_interest_rate_percent",
        inputs.annual_interest_rate_percent,
        &policy.limits,
    )?;
    validate::loan_term("term_years", inputs.term_years, &policy.limits)?;
    Ok(())
}

/// Core math without validation; callers that already validated reuse it.
pub(crate) fn loan_figures(loan_amount: f64, annual_rate_percent: f64, term_years: u32) -> LoanResult {
    let n = term_years * 12;
    let r = monthly_rate(annual_rate_percent);

    if loan_amount <= 0.0 {
        return LoanResult {
            loan_amount: 0.0,
            monthly_payment: 0.0,
            total_interest: 0.0,
            total_payable: 0.0,
            loan_to_value_ratio: 0.0,
            first_month_principal: 0.0,
            first_month_interest: 0.0,
            last_month_principal: 0.0,
            last_month_interest: 0.0,
            number_of_payments: n,
        };
    }

    let payment = monthly_payment(loan_amount, r, n);
    let total_payable = payment * n as f64;
    let first_month_interest = loan_amount * r;
    let last = Amortization::new(loan_amount, r, n)
        .last()
        .unwrap_or(Installment {
            period: 0,
            payment,
            principal: 0.0,
            interest: 0.0,
            balance: 0.0,
        });

    LoanResult {
        loan_amount,
        monthly_payment: payment,
        total_interest: total_payable - loan_amount,
        total_payable,
        loan_to_value_ratio: 0.0,
        first_month_principal: payment - first_month_interest,
        first_month_interest,
        last_month_principal: last.principal,
        last_month_interest: last.interest,
        number_of_payments: n,
    }
}

pub fn calculate_loan(inputs: &LoanInputs, policy: &Policy) -> Result<LoanResult, CalcError> {
    validate_inputs(inputs, policy)?;
    let loan_amount = inputs.property_price - inputs.down_payment;
    let mut result = loan_figures(
        loan_amount,
        inputs.annual_interest_rate_percent,
        inputs.term_years,
    );
    result.loan_to_value_ratio = loan_amount / inputs.property_price * 100.0;
    Ok(result)
}

/// Month-by-month table plus yearly rollups. A fully paid-up purchase has no rows.
pub fn amortization_schedule(
    inputs: &LoanInputs,
    policy: &Policy,
) -> Result<AmortizationSchedule, CalcError> {
    let loan = calculate_loan(inputs, policy)?;
    let r = monthly_rate(inputs.annual_interest_rate_percent);
    let installments: Vec<Installment> =
        Amortization::new(loan.loan_amount, r, loan.number_of_payments).collect();

    let years = installments
        .chunks(12)
        .enumerate()
        .map(|(i, months)| YearSummary {
            year: i as u32 + 1,
            principal: months.iter().map(|m| m.principal).sum(),
            interest: months.iter().map(|m| m.interest).sum(),
            closing_balance: months.last().map(|m| m.balance).unwrap_or(0.0),
        })
        .collect();

    Ok(AmortizationSchedule {
        loan,
        installments,
        years,
    })
}
