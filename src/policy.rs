//! Fee schedule, service-charge rate tables and input bounds.
//!
//! Every number here is policy, not math. The constants are the built-in table;
//! `Policy` carries them at runtime so `config.yaml` can override any of them.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::types::PropertyType;

// ---------- Upfront fees ----------

pub const REGISTRATION_FEE_RATE: f64 = 0.04; // of property price
pub const TRANSFER_FEE_RATE: f64 = 0.02; // of property price
pub const AGENCY_FEE_RATE: f64 = 0.02; // of property price
pub const MORTGAGE_REGISTRATION_FEE_RATE: f64 = 0.0025; // of loan amount
pub const VALUATION_FEE: f64 = 3_000.0;
pub const MORTGAGE_PROCESSING_FEE_RATE: f64 = 0.01; // of loan amount
pub const MORTGAGE_PROCESSING_FEE_CAP: f64 = 10_000.0;
pub const TITLE_DEED_FEE: f64 = 580.0;

// ---------- Service charge (per 1000 sqft) ----------

pub const APARTMENT_BASE_RATE: f64 = 12.0;
pub const VILLA_BASE_RATE: f64 = 8.0;
pub const TOWNHOUSE_BASE_RATE: f64 = 10.0;

pub const NEW_BUILDING_MAX_AGE: f64 = 2.0; // strictly below
pub const NEW_BUILDING_FACTOR: f64 = 1.10;
pub const OLD_BUILDING_MIN_AGE: f64 = 10.0; // strictly above
pub const OLD_BUILDING_FACTOR: f64 = 0.90;

pub const POOL_SURCHARGE: f64 = 500.0;
pub const GYM_SURCHARGE: f64 = 300.0;
pub const CONCIERGE_SURCHARGE: f64 = 800.0;
pub const SECURITY_SURCHARGE: f64 = 400.0;
pub const PARKING_SURCHARGE: f64 = 200.0;
pub const PLAYGROUND_SURCHARGE: f64 = 150.0;

// ---------- Community charges (per sqft per year) ----------

pub const DEFAULT_COMMUNITY_SERVICE_RATE: f64 = 12.0;

/// (community key, service rate, district cooling rate). Cooling 0 means individual units.
pub const COMMUNITY_RATES: &[(&str, f64, f64)] = &[
    ("DUBAI_MARINA", 15.0, 6.0),
    ("DOWNTOWN_DUBAI", 18.0, 7.0),
    ("PALM_JUMEIRAH", 20.0, 7.5),
    ("JUMEIRAH_LAKE_TOWERS", 14.0, 6.0),
    ("BUSINESS_BAY", 16.0, 6.5),
    ("JUMEIRAH_VILLAGE_CIRCLE", 12.0, 5.0),
    ("DUBAI_SPORTS_CITY", 10.0, 4.5),
    ("INTERNATIONAL_CITY", 8.0, 4.0),
    ("DUBAI_SILICON_OASIS", 9.0, 4.5),
    ("ARABIAN_RANCHES", 12.0, 0.0),
    ("EMIRATES_HILLS", 22.0, 0.0),
    ("THE_SPRINGS", 11.0, 0.0),
    ("THE_GREENS", 13.0, 5.5),
    ("DUBAI_HILLS_ESTATE", 15.0, 6.0),
    ("BLUEWATERS_ISLAND", 22.0, 7.5),
];

pub const CLEANING_RATE_PER_SQFT: f64 = 1.5;
pub const MISC_CHARGE_RATE: f64 = 0.05; // of the fixed fees plus cleaning

/// (size strictly below, annual building maintenance fee); larger units pay the top fee.
pub const BUILDING_MAINTENANCE_BANDS: &[(f64, f64)] =
    &[(800.0, 2_000.0), (1_500.0, 3_000.0), (2_500.0, 4_000.0)];
pub const BUILDING_MAINTENANCE_TOP_FEE: f64 = 5_000.0;

/// Annual (security, parking, gym and pool) per property type.
pub const APARTMENT_FIXED_FEES: (f64, f64, f64) = (1_500.0, 1_000.0, 2_000.0);
pub const VILLA_FIXED_FEES: (f64, f64, f64) = (2_500.0, 0.0, 3_000.0);
pub const TOWNHOUSE_FIXED_FEES: (f64, f64, f64) = (2_000.0, 0.0, 2_500.0);

// ---------- Input bounds ----------

pub const MAX_INTEREST_RATE_PERCENT: f64 = 100.0;
pub const MAX_TERM_YEARS: u32 = 35;
pub const MAX_APPRECIATION_RATE_PERCENT: f64 = 20.0;
pub const MAX_RENT_INCREASE_RATE_PERCENT: f64 = 20.0;
pub const MAX_INVESTMENT_RETURN_RATE_PERCENT: f64 = 30.0;
pub const MAX_ANALYSIS_PERIOD_YEARS: u32 = 30;
/// No configured limit may exceed this; month counts stay far inside `u32` and `i32`.
pub const YEARS_CEILING: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub registration_rate: f64,
    pub transfer_rate: f64,
    pub agency_rate: f64,
    pub mortgage_registration_rate: f64,
    pub valuation_fee: f64,
    pub mortgage_processing_rate: f64,
    pub mortgage_processing_cap: f64,
    pub title_deed_fee: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            registration_rate: REGISTRATION_FEE_RATE,
            transfer_rate: TRANSFER_FEE_RATE,
            agency_rate: AGENCY_FEE_RATE,
            mortgage_registration_rate: MORTGAGE_REGISTRATION_FEE_RATE,
            valuation_fee: VALUATION_FEE,
            mortgage_processing_rate: MORTGAGE_PROCESSING_FEE_RATE,
            mortgage_processing_cap: MORTGAGE_PROCESSING_FEE_CAP,
            title_deed_fee: TITLE_DEED_FEE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenitySurcharges {
    pub pool: f64,
    pub gym: f64,
    pub concierge: f64,
    pub security: f64,
    pub parking: f64,
    pub playground: f64,
}

impl Default for AmenitySurcharges {
    fn default() -> Self {
        Self {
            pool: POOL_SURCHARGE,
            gym: GYM_SURCHARGE,
            concierge: CONCIERGE_SURCHARGE,
            security: SECURITY_SURCHARGE,
            parking: PARKING_SURCHARGE,
            playground: PLAYGROUND_SURCHARGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceChargeRates {
    pub apartment: f64, // per 1000 sqft
    pub villa: f64,
    pub townhouse: f64,
    pub new_building_max_age: f64,
    pub new_building_factor: f64,
    pub old_building_min_age: f64,
    pub old_building_factor: f64,
    pub amenities: AmenitySurcharges,
}

impl ServiceChargeRates {
    pub fn base_rate(&self, t: PropertyType) -> f64 {
        match t {
            PropertyType::Apartment => self.apartment,
            PropertyType::Villa => self.villa,
            PropertyType::Townhouse => self.townhouse,
        }
    }

    pub fn age_factor(&self, age_years: f64) -> f64 {
        if age_years < self.new_building_max_age {
            self.new_building_factor
        } else if age_years > self.old_building_min_age {
            self.old_building_factor
        } else {
            1.0
        }
    }
}

impl Default for ServiceChargeRates {
    fn default() -> Self {
        Self {
            apartment: APARTMENT_BASE_RATE,
            villa: VILLA_BASE_RATE,
            townhouse: TOWNHOUSE_BASE_RATE,
            new_building_max_age: NEW_BUILDING_MAX_AGE,
            new_building_factor: NEW_BUILDING_FACTOR,
            old_building_min_age: OLD_BUILDING_MIN_AGE,
            old_building_factor: OLD_BUILDING_FACTOR,
            amenities: AmenitySurcharges::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityRate {
    pub name: String,
    pub service_rate: f64,
    pub cooling_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityRates {
    pub default_service_rate: f64,
    pub communities: Vec<CommunityRate>,
}

impl CommunityRates {
    /// Lookup by normalized key ("Dubai Marina" -> "DUBAI_MARINA"). Unknown -> default rate, no cooling.
    pub fn lookup(&self, community: &str) -> (f64, f64) {
        let key = community_key(community);
        self.communities
            .iter()
            .find(|c| community_key(&c.name) == key)
            .map(|c| (c.service_rate, c.cooling_rate))
            .unwrap_or((self.default_service_rate, 0.0))
    }
}

impl Default for CommunityRates {
    fn default() -> Self {
        Self {
            default_service_rate: DEFAULT_COMMUNITY_SERVICE_RATE,
            communities: COMMUNITY_RATES
                .iter()
                .map(|(name, service, cooling)| CommunityRate {
                    name: (*name).to_string(),
                    service_rate: *service,
                    cooling_rate: *cooling,
                })
                .collect(),
        }
    }
}

pub fn community_key(name: &str) -> String {
    name.trim().to_uppercase().replace([' ', '-'], "_")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_interest_rate_percent: f64,
    pub max_term_years: u32,
    pub max_appreciation_rate_percent: f64, // symmetric: depreciation down to -max
    pub max_rent_increase_rate_percent: f64,
    pub max_investment_return_rate_percent: f64,
    pub max_analysis_period_years: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_interest_rate_percent: MAX_INTEREST_RATE_PERCENT,
            max_term_years: MAX_TERM_YEARS,
            max_appreciation_rate_percent: MAX_APPRECIATION_RATE_PERCENT,
            max_rent_increase_rate_percent: MAX_RENT_INCREASE_RATE_PERCENT,
            max_investment_return_rate_percent: MAX_INVESTMENT_RETURN_RATE_PERCENT,
            max_analysis_period_years: MAX_ANALYSIS_PERIOD_YEARS,
        }
    }
}

impl Limits {
    /// Reject configured bounds the engine cannot honour.
    pub fn check(&self) -> Result<(), CalcError> {
        for (field, years) in [
            ("limits.max_term_years", self.max_term_years),
            ("limits.max_analysis_period_years", self.max_analysis_period_years),
        ] {
            if years == 0 || years > YEARS_CEILING {
                return Err(CalcError::invalid(
                    field,
                    format!("must be between 1 and {YEARS_CEILING}, got {years}"),
                ));
            }
        }
        for (field, pct) in [
            ("limits.max_interest_rate_percent", self.max_interest_rate_percent),
            ("limits.max_appreciation_rate_percent", self.max_appreciation_rate_percent),
            ("limits.max_rent_increase_rate_percent", self.max_rent_increase_rate_percent),
            ("limits.max_investment_return_rate_percent", self.max_investment_return_rate_percent),
        ] {
            if !pct.is_finite() || pct < 0.0 {
                return Err(CalcError::invalid(
                    field,
                    format!("must be a non-negative number, got {pct}"),
                ));
            }
        }
        Ok(())
    }
}

/// Everything the engine treats as a tunable number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub fees: FeeSchedule,
    pub service_charge: ServiceChargeRates,
    pub community: CommunityRates,
    pub limits: Limits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_lookup_normalizes_names() {
        let rates = CommunityRates::default();
        assert_eq!(rates.lookup("Dubai Marina"), (15.0, 6.0));
        assert_eq!(rates.lookup("  palm jumeirah "), (20.0, 7.5));
        assert_eq!(rates.lookup("dubai-hills-estate"), (15.0, 6.0));
    }

    #[test]
    fn unknown_community_falls_back_to_default() {
        let rates = CommunityRates::default();
        assert_eq!(rates.lookup("Atlantis"), (DEFAULT_COMMUNITY_SERVICE_RATE, 0.0));
    }

    #[test]
    fn age_factor_bands() {
        let r = ServiceChargeRates::default();
        assert_eq!(r.age_factor(0.0), 1.10);
        assert_eq!(r.age_factor(1.99), 1.10);
        assert_eq!(r.age_factor(2.0), 1.0);
        assert_eq!(r.age_factor(10.0), 1.0);
        assert_eq!(r.age_factor(10.5), 0.90);
    }

    #[test]
    fn limits_above_the_year_ceiling_are_rejected() {
        assert!(Limits::default().check().is_ok());
        let huge = Limits {
            max_term_years: u32::MAX,
            ..Limits::default()
        };
        assert_eq!(huge.check().unwrap_err().field(), "limits.max_term_years");
        let zero = Limits {
            max_analysis_period_years: 0,
            ..Limits::default()
        };
        assert!(zero.check().is_err());
        let negative = Limits {
            max_interest_rate_percent: -1.0,
            ..Limits::default()
        };
        assert!(negative.check().is_err());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let p: Policy = serde_yaml::from_str("fees:\n  valuation_fee: 3500\n").unwrap();
        assert_eq!(p.fees.valuation_fee, 3500.0);
        assert_eq!(p.fees.title_deed_fee, TITLE_DEED_FEE);
        assert_eq!(p.limits.max_term_years, MAX_TERM_YEARS);
    }
}
