//! Turn parsed requests into calculator inputs, run them, and hand back the outcome.
//! Missing inputs are filled from the catalog first, then from the calculator defaults.

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{PropertyCatalog, PropertyRecord};
use crate::checklist::generate_checklist;
use crate::comparison::compare_properties;
use crate::costs::calculate_cost_breakdown;
use crate::error::{CommandError, ParseError};
use crate::loan::{amortization_schedule, calculate_loan};
use crate::parser::{Amount, Args, Command, Request};
use crate::policy::Policy;
use crate::rent_vs_buy::analyze_rent_vs_buy;
use crate::service_charge::{estimate_community_charges, estimate_service_charge};
use crate::types::{
    AmortizationSchedule, Amenities, Bank, BuyerType, ChecklistInputs, CommunityChargeInputs, CommunityChargeResult,
    ComparedProperty, ComparisonInputs, CostBreakdownInputs, CostBreakdownResult, LoanInputs,
    DocumentChecklist, LoanResult, PropertyComparison, PropertyType, RentVsBuyInputs,
    RentVsBuyResult, ResidenceStatus, ServiceChargeInputs, ServiceChargeResult,
};

pub const DEFAULT_INTEREST_RATE_PERCENT: f64 = 3.5;
pub const DEFAULT_TERM_YEARS: u32 = 25;
pub const DEFAULT_DOWN_PAYMENT_PERCENT: f64 = 20.0;
pub const DEFAULT_APPRECIATION_RATE_PERCENT: f64 = 3.0;
pub const DEFAULT_ANNUAL_MAINTENANCE: f64 = 5_000.0;
pub const DEFAULT_ANNUAL_PROPERTY_TAX: f64 = 2_000.0;
pub const DEFAULT_RENT_PERCENT_OF_PRICE: f64 = 0.5; // per month
pub const DEFAULT_DEPOSIT_MONTHS: f64 = 2.0;
pub const DEFAULT_RENT_INCREASE_PERCENT: f64 = 5.0;
pub const DEFAULT_INVESTMENT_RETURN_PERCENT: f64 = 7.0;
pub const DEFAULT_ANALYSIS_YEARS: u32 = 10;
pub const DEFAULT_SIZE_SQ_FT: f64 = 1_000.0;
pub const DEFAULT_COMPARISON_APPRECIATION_PERCENT: f64 = 5.0;
pub const DEFAULT_HOLDING_YEARS: u32 = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Outcome {
    Loan(LoanResult),
    Schedule {
        schedule: AmortizationSchedule,
        monthly: bool,
    },
    Costs(CostBreakdownResult),
    Service {
        inputs: ServiceChargeInputs,
        estimate: ServiceChargeResult,
    },
    Community(CommunityChargeResult),
    RentVsBuy(RentVsBuyResult),
    Compare(PropertyComparison),
    Properties(Vec<PropertyRecord>),
    Checklist(DocumentChecklist),
    Help,
}

pub struct Dispatcher<C> {
    policy: Policy,
    catalog: C,
}

impl<C: PropertyCatalog> Dispatcher<C> {
    pub fn new(policy: Policy, catalog: C) -> Self {
        Self { policy, catalog }
    }

    pub fn execute(&self, req: &Request) -> Result<Outcome, CommandError> {
        debug!("Executing {:?} with {:?}", req.command, req.args);
        let a = &req.args;
        let outcome = match req.command {
            Command::Loan => {
                a.only(&["price", "down", "rate", "term", "property"], &[])?;
                Outcome::Loan(calculate_loan(&self.loan_inputs(a)?, &self.policy)?)
            }
            Command::Schedule => {
                a.only(&["price", "down", "rate", "term", "property"], &["monthly", "yearly"])?;
                let schedule = amortization_schedule(&self.loan_inputs(a)?, &self.policy)?;
                Outcome::Schedule {
                    schedule,
                    monthly: a.flag("monthly"),
                }
            }
            Command::Costs => {
                a.only(&["price", "down", "rate", "term", "property"], &[])?;
                Outcome::Costs(calculate_cost_breakdown(&self.cost_inputs(a)?, &self.policy)?)
            }
            Command::Service => {
                let amenity_flags = ["pool", "gym", "concierge", "security", "parking", "playground"];
                a.only(&["type", "size", "age", "amenities", "property"], &amenity_flags)?;
                let inputs = self.service_inputs(a)?;
                let estimate = estimate_service_charge(&inputs, &self.policy)?;
                Outcome::Service { inputs, estimate }
            }
            Command::Community => {
                a.only(&["community", "type", "size", "property"], &[])?;
                Outcome::Community(estimate_community_charges(
                    &self.community_inputs(a)?,
                    &self.policy,
                )?)
            }
            Command::RentVsBuy => {
                a.only(
                    &[
                        "price",
                        "down",
                        "rate",
                        "term",
                        "appreciation",
                        "maintenance",
                        "tax",
                        "rent",
                        "rent_increase",
                        "deposit",
                        "return",
                        "years",
                        "property",
                    ],
                    &[],
                )?;
                let r = analyze_rent_vs_buy(&self.rent_vs_buy_inputs(a)?, &self.policy)?;
                info!(
                    "Rent vs buy over {}y: buy {:.0} / rent {:.0}",
                    r.inputs.analysis_period_years, r.net_worth_after_buying, r.net_worth_after_renting
                );
                Outcome::RentVsBuy(r)
            }
            Command::Compare => {
                a.only(
                    &["a", "b", "price_a", "price_b", "size_a", "size_b", "appreciation", "years"],
                    &[],
                )?;
                Outcome::Compare(compare_properties(&self.comparison_inputs(a)?, &self.policy)?)
            }
            Command::Properties => {
                a.only(&[], &[])?;
                Outcome::Properties(self.catalog.list().to_vec())
            }
            Command::Checklist => {
                a.only(
                    &["buyer", "nationality", "residence", "bank"],
                    &["mortgage", "offplan", "off-plan", "off_plan", "ready"],
                )?;
                let c = generate_checklist(&self.checklist_inputs(a)?)?;
                info!("Checklist with {} documents", c.document_count());
                Outcome::Checklist(c)
            }
            Command::Help => Outcome::Help,
        };
        Ok(outcome)
    }

    // ---------- Input assembly ----------

    fn record(&self, a: &Args, key: &str) -> Result<Option<&PropertyRecord>, ParseError> {
        match a.id(key)? {
            None => Ok(None),
            Some(id) => self
                .catalog
                .get(id)
                .map(Some)
                .ok_or(ParseError::UnknownProperty(id)),
        }
    }

    fn price(&self, a: &Args, listing: Option<&PropertyRecord>) -> Result<f64, ParseError> {
        a.money("price")?
            .or(listing.map(|p| p.price))
            .ok_or(ParseError::Missing("price"))
    }

    fn loan_inputs(&self, a: &Args) -> Result<LoanInputs, ParseError> {
        let listing = self.record(a, "property")?;
        let property_price = self.price(a, listing)?;
        let down = a
            .amount("down")?
            .unwrap_or(Amount::PercentOf(DEFAULT_DOWN_PAYMENT_PERCENT));
        Ok(LoanInputs {
            property_price,
            down_payment: down.resolve(property_price),
            annual_interest_rate_percent: a.rate("rate")?.unwrap_or(DEFAULT_INTEREST_RATE_PERCENT),
            term_years: a.years("term")?.unwrap_or(DEFAULT_TERM_YEARS),
        })
    }

    fn cost_inputs(&self, a: &Args) -> Result<CostBreakdownInputs, ParseError> {
        let listing = self.record(a, "property")?;
        let property_price = self.price(a, listing)?;
        // same down= rule as loan: bare is an amount, % is a share; the cost sheet wants percent
        let down_payment_percent = match a.amount("down")? {
            Some(Amount::PercentOf(p)) => p,
            Some(Amount::Absolute(v)) if property_price != 0.0 => v / property_price * 100.0,
            // zero price: let the engine reject it rather than divide by it
            Some(Amount::Absolute(v)) => v,
            None => DEFAULT_DOWN_PAYMENT_PERCENT,
        };
        Ok(CostBreakdownInputs {
            property_price,
            down_payment_percent,
            loan_term_years: a.years("term")?.unwrap_or(DEFAULT_TERM_YEARS),
            annual_interest_rate_percent: a.rate("rate")?.unwrap_or(DEFAULT_INTEREST_RATE_PERCENT),
        })
    }

    fn property_type(
        &self,
        a: &Args,
        listing: Option<&PropertyRecord>,
    ) -> Result<PropertyType, ParseError> {
        match a.text("type") {
            Some(raw) => raw.parse().map_err(|_| ParseError::BadValue {
                key: "type".to_string(),
                value: raw.to_string(),
            }),
            None => Ok(listing
                .and_then(|p| p.property_type)
                .unwrap_or(PropertyType::Apartment)),
        }
    }

    fn size(&self, a: &Args, listing: Option<&PropertyRecord>) -> Result<f64, ParseError> {
        Ok(a.money("size")?
            .or(listing.and_then(|p| p.size_sq_ft))
            .unwrap_or(DEFAULT_SIZE_SQ_FT))
    }

    fn service_inputs(&self, a: &Args) -> Result<ServiceChargeInputs, ParseError> {
        let listing = self.record(a, "property")?;
        let mut amenities = Amenities::default();
        let listed = a
            .text("amenities")
            .map(|s| s.split(',').map(str::trim).filter(|n| !n.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();
        for name in listed {
            if !amenities.set(name, true) {
                return Err(ParseError::BadValue {
                    key: "amenities".to_string(),
                    value: name.to_string(),
                });
            }
        }
        for flag in a.flags() {
            amenities.set(flag, true);
        }
        Ok(ServiceChargeInputs {
            property_type: self.property_type(a, listing)?,
            size_sq_ft: self.size(a, listing)?,
            age_years: a.rate("age")?.unwrap_or(0.0),
            amenities,
        })
    }

    fn community_inputs(&self, a: &Args) -> Result<CommunityChargeInputs, ParseError> {
        let listing = self.record(a, "property")?;
        let community = a
            .text("community")
            .map(str::to_string)
            .or_else(|| listing.and_then(|p| p.community.clone()))
            .ok_or(ParseError::Missing("community"))?;
        Ok(CommunityChargeInputs {
            community,
            property_type: self.property_type(a, listing)?,
            size_sq_ft: self.size(a, listing)?,
        })
    }

    fn rent_vs_buy_inputs(&self, a: &Args) -> Result<RentVsBuyInputs, ParseError> {
        let loan = self.loan_inputs(a)?;
        let monthly_rent = a
            .money("rent")?
            .unwrap_or(loan.property_price * DEFAULT_RENT_PERCENT_OF_PRICE / 100.0);
        Ok(RentVsBuyInputs {
            property_price: loan.property_price,
            down_payment: loan.down_payment,
            interest_rate_percent: loan.annual_interest_rate_percent,
            loan_term_years: loan.term_years,
            property_appreciation_rate_percent: a
                .rate("appreciation")?
                .unwrap_or(DEFAULT_APPRECIATION_RATE_PERCENT),
            annual_maintenance_cost: a.money("maintenance")?.unwrap_or(DEFAULT_ANNUAL_MAINTENANCE),
            annual_property_tax: a.money("tax")?.unwrap_or(DEFAULT_ANNUAL_PROPERTY_TAX),
            monthly_rent,
            annual_rent_increase_rate_percent: a
                .rate("rent_increase")?
                .unwrap_or(DEFAULT_RENT_INCREASE_PERCENT),
            security_deposit: a
                .money("deposit")?
                .unwrap_or(monthly_rent * DEFAULT_DEPOSIT_MONTHS),
            investment_return_rate_percent: a
                .rate("return")?
                .unwrap_or(DEFAULT_INVESTMENT_RETURN_PERCENT),
            analysis_period_years: a.years("years")?.unwrap_or(DEFAULT_ANALYSIS_YEARS),
        })
    }

    fn compared(&self, a: &Args, side: &str) -> Result<ComparedProperty, ParseError> {
        let (price_key, size_key, missing) = match side {
            "a" => ("price_a", "size_a", "price_a"),
            _ => ("price_b", "size_b", "price_b"),
        };
        let listing = self.record(a, side)?;
        let price = a
            .money(price_key)?
            .or(listing.map(|p| p.price))
            .ok_or(ParseError::Missing(missing))?;
        Ok(ComparedProperty {
            price,
            size_sq_ft: a.money(size_key)?.or(listing.and_then(|p| p.size_sq_ft)),
        })
    }

    fn comparison_inputs(&self, a: &Args) -> Result<ComparisonInputs, ParseError> {
        Ok(ComparisonInputs {
            first: self.compared(a, "a")?,
            second: self.compared(a, "b")?,
            appreciation_rate_percent: a
                .rate("appreciation")?
                .unwrap_or(DEFAULT_COMPARISON_APPRECIATION_PERCENT),
            holding_period_years: a.years("years")?.unwrap_or(DEFAULT_HOLDING_YEARS),
        })
    }

    fn checklist_inputs(&self, a: &Args) -> Result<ChecklistInputs, ParseError> {
        fn choice<T: std::str::FromStr>(a: &Args, key: &str, default: T) -> Result<T, ParseError> {
            match a.text(key) {
                None => Ok(default),
                Some(raw) => raw.parse().map_err(|_| ParseError::BadValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
            }
        }
        let nationality = a
            .text("nationality")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ParseError::Missing("nationality"))?;
        let bank = a.text("bank").map(Bank::from_name);
        let off_plan = ["offplan", "off-plan", "off_plan"].iter().any(|f| a.flag(f));
        Ok(ChecklistInputs {
            buyer_type: choice(a, "buyer", BuyerType::Salaried)?,
            nationality: nationality.to_string(),
            residence_status: choice(a, "residence", ResidenceStatus::UaeResident)?,
            // naming a lender implies a mortgage
            mortgage_required: a.flag("mortgage") || bank.is_some(),
            bank,
            off_plan,
            ready: a.flag("ready") || !off_plan,
        })
    }
}
