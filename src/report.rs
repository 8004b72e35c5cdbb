//! Plain-text rendering of command outcomes.

use chrono::NaiveDate;

use crate::catalog::PropertyRecord;
use crate::dispatch::Outcome;
use crate::format::{money, percent, thousands, years};
use crate::types::{
    AmortizationSchedule, CommunityChargeResult, CostBreakdownResult, DocumentChecklist,
    LoanResult, Pick, PropertyComparison, RentVsBuyResult, ServiceChargeInputs, ServiceChargeResult,
};

pub const HELP: &str = "\
Commands (one per line, key=value arguments):
  loan        price= down= rate= term= [property=]
  schedule    price= down= rate= term= [property=] [monthly]
  costs       price= down= rate= term= [property=]
  service     type= size= age= amenities=pool,gym,... [property=]
  community   community=\"Dubai Marina\" type= size= [property=]
  rentvsbuy   price= down= rate= term= appreciation= maintenance= tax=
              rent= rent_increase= deposit= return= years= [property=]
  compare     a=<id>|price_a= b=<id>|price_b= [size_a= size_b=] appreciation= years=
  properties  list the catalog
  checklist   nationality= [buyer=salaried|self_employed|investor|other]
              [residence=resident|non_resident] [bank=] [mortgage] [off-plan] [ready]
  help        this text
Numbers take 1_000_000, 1.2m, 250k. down= is an amount (down=250k) or a share
of the price (down=20%) for every command.
Add --json to any command for machine-readable output.";

struct Sheet {
    width: usize,
    lines: Vec<String>,
}

impl Sheet {
    fn new(title: &str, date: NaiveDate) -> Self {
        Self {
            width: 28,
            lines: vec![format!("{title} ({})", date.format("%Y-%m-%d"))],
        }
    }

    fn row(&mut self, label: &str, value: impl AsRef<str>) -> &mut Self {
        self.lines
            .push(format!("  {label:<w$} {}", value.as_ref(), w = self.width));
        self
    }

    fn raw(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    fn finish(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn render(outcome: &Outcome, currency: &str, date: NaiveDate) -> String {
    match outcome {
        Outcome::Loan(r) => loan(r, currency, date),
        Outcome::Schedule { schedule, monthly } => schedule_table(schedule, *monthly, currency, date),
        Outcome::Costs(r) => costs(r, currency, date),
        Outcome::Service { inputs, estimate } => service(inputs, estimate, currency, date),
        Outcome::Community(r) => community(r, currency, date),
        Outcome::RentVsBuy(r) => rent_vs_buy(r, currency, date),
        Outcome::Compare(r) => compare(r, currency, date),
        Outcome::Properties(list) => properties(list, currency),
        Outcome::Checklist(c) => checklist(c, date),
        Outcome::Help => HELP.to_string(),
    }
}

fn loan(r: &LoanResult, cur: &str, date: NaiveDate) -> String {
    let mut s = Sheet::new("Mortgage", date);
    s.row("Loan amount", money(r.loan_amount, cur))
        .row("Loan-to-value", percent(r.loan_to_value_ratio))
        .row("Monthly payment", money(r.monthly_payment, cur))
        .row("Total interest", money(r.total_interest, cur))
        .row("Total payable", money(r.total_payable, cur));
    if r.loan_amount > 0.0 {
        s.row("Payments", r.number_of_payments.to_string())
            .row(
                "First month principal/int.",
                format!("{} / {}", thousands(r.first_month_principal), thousands(r.first_month_interest)),
            )
            .row(
                "Last month principal/int.",
                format!("{} / {}", thousands(r.last_month_principal), thousands(r.last_month_interest)),
            );
    }
    s.finish()
}

fn schedule_table(sch: &AmortizationSchedule, monthly: bool, cur: &str, date: NaiveDate) -> String {
    let mut s = Sheet::new("Amortization schedule", date);
    s.row("Loan amount", money(sch.loan.loan_amount, cur))
        .row("Monthly payment", money(sch.loan.monthly_payment, cur));
    if sch.installments.is_empty() {
        s.raw("  No loan, nothing to amortize.");
        return s.finish();
    }
    if monthly {
        s.raw(format!("  {:>5} {:>14} {:>14} {:>16}", "Month", "Principal", "Interest", "Balance"));
        for i in &sch.installments {
            s.raw(format!(
                "  {:>5} {:>14} {:>14} {:>16}",
                i.period,
                thousands(i.principal),
                thousands(i.interest),
                thousands(i.balance)
            ));
        }
    } else {
        s.raw(format!("  {:>5} {:>14} {:>14} {:>16}", "Year", "Principal", "Interest", "Balance"));
        for y in &sch.years {
            s.raw(format!(
                "  {:>5} {:>14} {:>14} {:>16}",
                y.year,
                thousands(y.principal),
                thousands(y.interest),
                thousands(y.closing_balance)
            ));
        }
    }
    s.finish()
}

fn costs(r: &CostBreakdownResult, cur: &str, date: NaiveDate) -> String {
    let mut s = Sheet::new("Purchase costs", date);
    for (label, fee) in r.fees() {
        s.row(label, money(fee, cur));
    }
    s.row("Total upfront costs", money(r.total_upfront_costs, cur))
        .row("Down payment", money(r.down_payment_amount, cur))
        .row("Loan amount", money(r.loan_amount, cur))
        .row("Monthly payment", money(r.monthly_payment, cur))
        .row("Total interest", money(r.total_interest_paid, cur))
        .row("Total cost of ownership", money(r.total_cost_of_ownership, cur));
    s.finish()
}

fn service(i: &ServiceChargeInputs, r: &ServiceChargeResult, cur: &str, date: NaiveDate) -> String {
    let mut s = Sheet::new("Service charge estimate", date);
    s.row(
        "Property",
        format!("{} {} sqft, {} years old", i.property_type, thousands(i.size_sq_ft), i.age_years),
    )
    .row("Annual", money(r.annual_estimate, cur))
    .row("Monthly", money(r.monthly_estimate, cur));
    s.finish()
}

fn community(r: &CommunityChargeResult, cur: &str, date: NaiveDate) -> String {
    let mut s = Sheet::new(&format!("Community charges: {}", r.community), date);
    s.row("Service rate per sqft", money(r.service_rate_per_sq_ft, cur))
        .row("Service charge", money(r.service_charge, cur))
        .row("District cooling", money(r.cooling_charge, cur))
        .row("Building maintenance", money(r.building_maintenance_fee, cur))
        .row("Security", money(r.security_fee, cur))
        .row("Cleaning", money(r.cleaning_fee, cur))
        .row("Parking", money(r.parking_fee, cur))
        .row("Gym and pool", money(r.gym_and_pool_fee, cur))
        .row("Miscellaneous", money(r.misc_charges, cur))
        .row("Total annual", money(r.total_annual, cur))
        .row("Monthly", money(r.monthly, cur));
    s.finish()
}

fn rent_vs_buy(r: &RentVsBuyResult, cur: &str, date: NaiveDate) -> String {
    let mut s = Sheet::new(
        &format!("Rent vs buy over {} years", r.inputs.analysis_period_years),
        date,
    );
    s.row("Net worth if buying", money(r.net_worth_after_buying, cur))
        .row("Net worth if renting", money(r.net_worth_after_renting, cur))
        .row("Better choice", if r.is_buying_better { "buy" } else { "rent" })
        .row("Break-even", years(r.break_even_years))
        .row("Monthly mortgage", money(r.monthly_mortgage_payment, cur))
        .row("Total cost of buying", money(r.total_cost_of_buying, cur))
        .row("Total cost of renting", money(r.total_cost_of_renting, cur))
        .row("Projected property value", money(r.projected_property_value, cur))
        .row("Remaining loan balance", money(r.remaining_loan_balance, cur));
    s.raw(format!("  {:>4} {:>16} {:>16}", "Year", "Buying", "Renting"));
    for y in &r.yearly {
        s.raw(format!(
            "  {:>4} {:>16} {:>16}",
            y.year,
            thousands(y.net_worth_buying),
            thousands(y.net_worth_renting)
        ));
    }
    s.finish()
}

fn compare(r: &PropertyComparison, cur: &str, date: NaiveDate) -> String {
    let pick = |p: Pick| match p {
        Pick::First => "A",
        Pick::Second => "B",
        Pick::Tie => "tie",
    };
    let per_sq_ft = |v: Option<f64>| v.map(|x| money(x, cur)).unwrap_or_else(|| "-".to_string());
    let mut s = Sheet::new(
        &format!("Comparison over {} years", r.holding_period_years),
        date,
    );
    s.row("Price A / B", format!("{} / {}", money(r.first.price, cur), money(r.second.price, cur)))
        .row(
            "Future value A / B",
            format!("{} / {}", money(r.first.future_value, cur), money(r.second.future_value, cur)),
        )
        .row(
            "Capital gain A / B",
            format!("{} / {}", money(r.first.capital_gain, cur), money(r.second.capital_gain, cur)),
        )
        .row(
            "ROI A / B",
            format!("{} / {}", percent(r.first.roi_percent), percent(r.second.roi_percent)),
        )
        .row(
            "Price per sqft A / B",
            format!("{} / {}", per_sq_ft(r.first.price_per_sq_ft), per_sq_ft(r.second.price_per_sq_ft)),
        )
        .row("Cheaper", pick(r.cheaper))
        .row("Larger gain", pick(r.larger_gain));
    s.finish()
}

fn properties(list: &[PropertyRecord], cur: &str) -> String {
    if list.is_empty() {
        return "No properties in catalog.".to_string();
    }
    list.iter()
        .map(|p| {
            let size = p
                .size_sq_ft
                .map(|v| format!(", {} sqft", thousands(v)))
                .unwrap_or_default();
            let kind = p.property_type.map(|t| format!(", {t}")).unwrap_or_default();
            format!("#{:<4} {} - {}{kind}{size}", p.id, p.name, money(p.price, cur))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn checklist(c: &DocumentChecklist, date: NaiveDate) -> String {
    let mut s = Sheet::new(&format!("Document checklist, {} documents", c.document_count()), date);
    for (title, docs) in c.sections().iter().filter(|(_, d)| !d.is_empty()) {
        s.raw(format!("{title}:"));
        for d in docs.iter() {
            s.raw(format!("  [ ] {d}"));
        }
    }
    s.raw("Notes:");
    for n in &c.notes {
        s.raw(format!("  - {n}"));
    }
    s.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::generate_checklist;
    use crate::costs::calculate_cost_breakdown;
    use crate::loan::calculate_loan;
    use crate::policy::Policy;
    use crate::rent_vs_buy::analyze_rent_vs_buy;
    use crate::types::{
        BuyerType, ChecklistInputs, CostBreakdownInputs, LoanInputs, RentVsBuyInputs,
        ResidenceStatus,
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn loan_report_has_dated_header_and_figures() {
        let r = calculate_loan(
            &LoanInputs {
                property_price: 1_000_000.0,
                down_payment: 200_000.0,
                annual_interest_rate_percent: 3.5,
                term_years: 25,
            },
            &Policy::default(),
        )
        .unwrap();
        let text = render(&Outcome::Loan(r), "AED", day());
        assert!(text.starts_with("Mortgage (2026-10-16)"));
        assert!(text.contains("AED 800,000.00"));
        assert!(text.contains("AED 4,004.99"));
        assert!(text.contains("80.00%"));
    }

    #[test]
    fn cash_purchase_report_has_no_installment_rows() {
        let r = calculate_loan(
            &LoanInputs {
                property_price: 750_000.0,
                down_payment: 750_000.0,
                annual_interest_rate_percent: 4.0,
                term_years: 25,
            },
            &Policy::default(),
        )
        .unwrap();
        let text = render(&Outcome::Loan(r), "AED", day());
        assert!(!text.contains("Payments"));
        assert!(!text.contains("First month"));
        assert!(!text.contains("Last month"));
        assert!(text.contains("Monthly payment"));
    }

    #[test]
    fn cost_sheet_total_is_labelled_as_costs() {
        let r = calculate_cost_breakdown(
            &CostBreakdownInputs {
                property_price: 1_000_000.0,
                down_payment_percent: 20.0,
                loan_term_years: 25,
                annual_interest_rate_percent: 3.5,
            },
            &Policy::default(),
        )
        .unwrap();
        let text = render(&Outcome::Costs(r), "AED", day());
        let total = text
            .lines()
            .find(|l| l.trim_start().starts_with("Total upfront costs"))
            .unwrap();
        assert!(total.ends_with(&money(r.total_upfront_costs, "AED")));
        assert!(!text.contains("Total upfront fees"));
    }

    #[test]
    fn rent_vs_buy_report_says_never_without_break_even() {
        let r = analyze_rent_vs_buy(
            &RentVsBuyInputs {
                property_price: 1_000_000.0,
                down_payment: 200_000.0,
                interest_rate_percent: 4.5,
                loan_term_years: 25,
                property_appreciation_rate_percent: 2.0,
                annual_maintenance_cost: 15_000.0,
                annual_property_tax: 2_000.0,
                monthly_rent: 2_500.0,
                annual_rent_increase_rate_percent: 0.0,
                security_deposit: 5_000.0,
                investment_return_rate_percent: 7.0,
                analysis_period_years: 25,
            },
            &Policy::default(),
        )
        .unwrap();
        let text = render(&Outcome::RentVsBuy(r), "", day());
        assert!(text.contains("Break-even"));
        assert!(text.contains("never"));
        assert!(text.contains("rent"));
        // one row per year plus the header rows
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("25 ")).count(), 1);
    }

    #[test]
    fn checklist_prints_boxes_and_skips_empty_sections() {
        let c = generate_checklist(&ChecklistInputs {
            buyer_type: BuyerType::Salaried,
            nationality: "UAE".to_string(),
            residence_status: ResidenceStatus::UaeResident,
            mortgage_required: false,
            bank: None,
            off_plan: false,
            ready: true,
        })
        .unwrap();
        let text = render(&Outcome::Checklist(c.clone()), "AED", day());
        assert!(text.starts_with(&format!("Document checklist, {} documents (2026-10-16)", c.document_count())));
        assert!(text.contains("  [ ] Family Book copy"));
        // cash purchase by a national: no bank or visa paperwork
        assert!(!text.contains("Bank:"));
        assert!(!text.contains("Visa and residency:"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  [ ] ")).count(), c.document_count());
        assert!(text.contains("Notes:"));
    }

    #[test]
    fn empty_catalog_and_help() {
        assert_eq!(render(&Outcome::Properties(vec![]), "AED", day()), "No properties in catalog.");
        assert!(render(&Outcome::Help, "AED", day()).contains("rentvsbuy"));
        assert!(render(&Outcome::Help, "AED", day()).contains("checklist"));
    }
}
