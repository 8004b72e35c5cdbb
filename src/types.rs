//! Input and result records for every calculator. Plain values, recomputed per call.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::CalcError;

// ---------- Loan ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoanInputs {
    pub property_price: f64,
    pub down_payment: f64,
    pub annual_interest_rate_percent: f64,
    pub term_years: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoanResult {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_payable: f64,
    pub loan_to_value_ratio: f64, // percent
    pub first_month_principal: f64,
    pub first_month_interest: f64,
    pub last_month_principal: f64,
    pub last_month_interest: f64,
    pub number_of_payments: u32,
}

/// One row of the amortization table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    pub period: u32, // 1-based month
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64, // after this payment
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearSummary {
    pub year: u32,
    pub principal: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmortizationSchedule {
    pub loan: LoanResult,
    pub installments: Vec<Installment>,
    pub years: Vec<YearSummary>,
}

// ---------- Cost breakdown ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdownInputs {
    pub property_price: f64,
    pub down_payment_percent: f64,
    pub loan_term_years: u32,
    pub annual_interest_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdownResult {
    pub registration_fee: f64,
    pub transfer_fee: f64,
    pub agency_fee: f64,
    pub mortgage_registration_fee: f64,
    pub valuation_fee: f64,
    pub mortgage_processing_fee: f64,
    pub title_deed_fee: f64,
    pub down_payment_amount: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest_paid: f64,
    pub total_upfront_costs: f64,
    pub total_cost_of_ownership: f64,
}

impl CostBreakdownResult {
    /// The seven fees, in display order.
    pub fn fees(&self) -> [(&'static str, f64); 7] {
        [
            ("Registration", self.registration_fee),
            ("Transfer", self.transfer_fee),
            ("Agency", self.agency_fee),
            ("Mortgage registration", self.mortgage_registration_fee),
            ("Valuation", self.valuation_fee),
            ("Mortgage processing", self.mortgage_processing_fee),
            ("Title deed", self.title_deed_fee),
        ]
    }
}

// ---------- Service charge ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    Villa,
    Townhouse,
}

impl FromStr for PropertyType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apartment" | "flat" => Ok(PropertyType::Apartment),
            "villa" => Ok(PropertyType::Villa),
            "townhouse" => Ok(PropertyType::Townhouse),
            other => Err(CalcError::invalid(
                "property_type",
                format!("'{other}' is not one of apartment, villa, townhouse"),
            )),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::Townhouse => "townhouse",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Amenities {
    pub pool: bool,
    pub gym: bool,
    pub concierge: bool,
    pub security: bool,
    pub parking: bool,
    pub playground: bool,
}

impl Amenities {
    /// Set a flag by name. Returns false for an unknown amenity.
    pub fn set(&mut self, name: &str, on: bool) -> bool {
        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "pool" => &mut self.pool,
            "gym" => &mut self.gym,
            "concierge" => &mut self.concierge,
            "security" => &mut self.security,
            "parking" => &mut self.parking,
            "playground" => &mut self.playground,
            _ => return false,
        };
        *slot = on;
        true
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ServiceChargeInputs {
    pub property_type: PropertyType,
    pub size_sq_ft: f64,
    pub age_years: f64,
    pub amenities: Amenities,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ServiceChargeResult {
    pub annual_estimate: f64,
    pub monthly_estimate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityChargeInputs {
    pub community: String,
    pub property_type: PropertyType,
    pub size_sq_ft: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityChargeResult {
    pub community: String,
    pub service_rate_per_sq_ft: f64,
    pub service_charge: f64,
    pub cooling_charge: f64,
    pub building_maintenance_fee: f64,
    pub security_fee: f64,
    pub cleaning_fee: f64,
    pub parking_fee: f64,
    pub gym_and_pool_fee: f64,
    pub misc_charges: f64,
    pub total_annual: f64,
    pub monthly: f64,
}

// ---------- Rent vs buy ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RentVsBuyInputs {
    // purchase side
    pub property_price: f64,
    pub down_payment: f64,
    pub interest_rate_percent: f64,
    pub loan_term_years: u32,
    pub property_appreciation_rate_percent: f64,
    pub annual_maintenance_cost: f64,
    pub annual_property_tax: f64,
    // rental side
    pub monthly_rent: f64,
    pub annual_rent_increase_rate_percent: f64,
    pub security_deposit: f64,
    // analysis
    pub investment_return_rate_percent: f64,
    pub analysis_period_years: u32,
}

/// Net worth of both households at the end of a year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearSnapshot {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub net_worth_buying: f64,
    pub net_worth_renting: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentVsBuyResult {
    pub net_worth_after_buying: f64,
    pub net_worth_after_renting: f64,
    pub is_buying_better: bool,
    /// First year buying pulls ahead; `None` if it never does within the horizon.
    pub break_even_years: Option<u32>,
    pub total_cost_of_buying: f64,
    pub total_cost_of_renting: f64,
    pub projected_property_value: f64,
    pub remaining_loan_balance: f64,
    pub monthly_mortgage_payment: f64,
    pub yearly: Vec<YearSnapshot>,
    pub inputs: RentVsBuyInputs,
}

impl RentVsBuyResult {
    /// Break-even as a number of years, `f64::INFINITY` when never reached.
    pub fn break_even_years_f64(&self) -> f64 {
        self.break_even_years
            .map(f64::from)
            .unwrap_or(f64::INFINITY)
    }
}

// ---------- Comparison ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComparedProperty {
    pub price: f64,
    pub size_sq_ft: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComparisonInputs {
    pub first: ComparedProperty,
    pub second: ComparedProperty,
    pub appreciation_rate_percent: f64,
    pub holding_period_years: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComparisonSide {
    pub price: f64,
    pub future_value: f64,
    pub capital_gain: f64,
    pub roi_percent: f64,
    pub price_per_sq_ft: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Pick {
    First,
    Second,
    Tie,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PropertyComparison {
    pub first: ComparisonSide,
    pub second: ComparisonSide,
    pub cheaper: Pick,
    pub larger_gain: Pick,
    pub holding_period_years: u32,
}

// ---------- Document checklist ----------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    Salaried,
    SelfEmployed,
    Investor,
    Other,
}

fn token(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

impl FromStr for BuyerType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match token(s).as_str() {
            "salaried" | "employee" => Ok(BuyerType::Salaried),
            "self_employed" | "selfemployed" | "business" => Ok(BuyerType::SelfEmployed),
            "investor" => Ok(BuyerType::Investor),
            "other" => Ok(BuyerType::Other),
            other => Err(CalcError::invalid(
                "buyer_type",
                format!("'{other}' is not one of salaried, self_employed, investor, other"),
            )),
        }
    }
}

impl fmt::Display for BuyerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuyerType::Salaried => "salaried",
            BuyerType::SelfEmployed => "self-employed",
            BuyerType::Investor => "investor",
            BuyerType::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResidenceStatus {
    UaeResident,
    NonResident,
}

impl FromStr for ResidenceStatus {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match token(s).as_str() {
            "resident" | "uae_resident" => Ok(ResidenceStatus::UaeResident),
            "non_resident" | "nonresident" | "overseas" => Ok(ResidenceStatus::NonResident),
            other => Err(CalcError::invalid(
                "residence_status",
                format!("'{other}' is not one of resident, non_resident"),
            )),
        }
    }
}

/// Lenders with their own forms; anyone else gets the generic bank list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Bank {
    EmiratesNbd,
    Adcb,
    Dib,
    Mashreq,
    Other,
}

impl Bank {
    pub fn from_name(name: &str) -> Self {
        match token(name).as_str() {
            "emirates_nbd" | "enbd" | "emiratesnbd" => Bank::EmiratesNbd,
            "adcb" => Bank::Adcb,
            "dib" => Bank::Dib,
            "mashreq" => Bank::Mashreq,
            _ => Bank::Other,
        }
    }

    /// Display name; `None` for the generic case.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Bank::EmiratesNbd => Some("Emirates NBD"),
            Bank::Adcb => Some("ADCB"),
            Bank::Dib => Some("DIB"),
            Bank::Mashreq => Some("Mashreq"),
            Bank::Other => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistInputs {
    pub buyer_type: BuyerType,
    pub nationality: String,
    pub residence_status: ResidenceStatus,
    pub mortgage_required: bool,
    pub bank: Option<Bank>,
    pub off_plan: bool,
    pub ready: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentChecklist {
    pub identity: Vec<String>,
    pub income_proof: Vec<String>,
    pub property: Vec<String>,
    pub bank: Vec<String>,
    pub visa: Vec<String>,
    pub additional: Vec<String>,
    pub notes: Vec<String>,
}

impl DocumentChecklist {
    /// Document sections in display order; notes are not documents.
    pub fn sections(&self) -> [(&'static str, &[String]); 6] {
        [
            ("Identity", self.identity.as_slice()),
            ("Income proof", self.income_proof.as_slice()),
            ("Property", self.property.as_slice()),
            ("Bank", self.bank.as_slice()),
            ("Visa and residency", self.visa.as_slice()),
            ("Additional", self.additional.as_slice()),
        ]
    }

    pub fn document_count(&self) -> usize {
        self.sections().iter().map(|(_, docs)| docs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_parses_case_insensitively() {
        assert_eq!("Villa".parse::<PropertyType>().unwrap(), PropertyType::Villa);
        assert_eq!(" TOWNHOUSE ".parse::<PropertyType>().unwrap(), PropertyType::Townhouse);
        assert_eq!("flat".parse::<PropertyType>().unwrap(), PropertyType::Apartment);
    }

    #[test]
    fn unknown_property_type_is_invalid_input() {
        let err = "penthouse".parse::<PropertyType>().unwrap_err();
        assert_eq!(err.field(), "property_type");
    }

    #[test]
    fn checklist_enums_parse_loosely() {
        assert_eq!("Self-Employed".parse::<BuyerType>().unwrap(), BuyerType::SelfEmployed);
        assert_eq!("non resident".parse::<ResidenceStatus>().unwrap(), ResidenceStatus::NonResident);
        assert_eq!("buyer_type", "retired".parse::<BuyerType>().unwrap_err().field());
        assert_eq!(Bank::from_name("Emirates-NBD"), Bank::EmiratesNbd);
        assert_eq!(Bank::from_name("HSBC"), Bank::Other);
        assert_eq!(Bank::Other.name(), None);
    }

    #[test]
    fn amenities_set_by_name() {
        let mut a = Amenities::default();
        assert!(a.set("Pool", true));
        assert!(a.set("parking", true));
        assert!(!a.set("sauna", true));
        assert!(a.pool && a.parking && !a.gym);
    }
}
