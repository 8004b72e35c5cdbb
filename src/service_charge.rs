//! Annual service-charge estimates: the quick amenity-based estimate and the
//! community breakdown with district cooling.

use crate::error::CalcError;
use crate::policy::{
    Policy, APARTMENT_FIXED_FEES, BUILDING_MAINTENANCE_BANDS, BUILDING_MAINTENANCE_TOP_FEE,
    CLEANING_RATE_PER_SQFT, MISC_CHARGE_RATE, TOWNHOUSE_FIXED_FEES, VILLA_FIXED_FEES,
};
use crate::types::{
    CommunityChargeInputs, CommunityChargeResult, PropertyType, ServiceChargeInputs,
    ServiceChargeResult,
};
use crate::validate;

pub fn estimate_service_charge(
    inputs: &ServiceChargeInputs,
    policy: &Policy,
) -> Result<ServiceChargeResult, CalcError> {
    let size = validate::positive("size_sq_ft", inputs.size_sq_ft)?;
    let age = validate::non_negative("age_years", inputs.age_years)?;

    let rates = &policy.service_charge;
    let mut annual = size * (rates.base_rate(inputs.property_type) / 1000.0);
    annual *= rates.age_factor(age);

    // flat surcharges go on after the age adjustment
    let a = &inputs.amenities;
    let s = &rates.amenities;
    for (on, amount) in [
        (a.pool, s.pool),
        (a.gym, s.gym),
        (a.concierge, s.concierge),
        (a.security, s.security),
        (a.parking, s.parking),
        (a.playground, s.playground),
    ] {
        if on {
            annual += amount;
        }
    }

    Ok(ServiceChargeResult {
        annual_estimate: annual,
        monthly_estimate: annual / 12.0,
    })
}

fn building_maintenance_fee(size: f64) -> f64 {
    BUILDING_MAINTENANCE_BANDS
        .iter()
        .find(|(below, _)| size < *below)
        .map(|(_, fee)| *fee)
        .unwrap_or(BUILDING_MAINTENANCE_TOP_FEE)
}

pub fn estimate_community_charges(
    inputs: &CommunityChargeInputs,
    policy: &Policy,
) -> Result<CommunityChargeResult, CalcError> {
    let size = validate::positive("size_sq_ft", inputs.size_sq_ft)?;
    let (service_rate, cooling_rate) = policy.community.lookup(&inputs.community);

    let service_charge = size * service_rate;
    let cooling_charge = size * cooling_rate;
    let building_maintenance_fee = building_maintenance_fee(size);
    let (security_fee, parking_fee, gym_and_pool_fee) = match inputs.property_type {
        PropertyType::Apartment => APARTMENT_FIXED_FEES,
        PropertyType::Villa => VILLA_FIXED_FEES,
        PropertyType::Townhouse => TOWNHOUSE_FIXED_FEES,
    };
    let cleaning_fee = size * CLEANING_RATE_PER_SQFT;
    let misc_charges = (building_maintenance_fee
        + security_fee
        + cleaning_fee
        + parking_fee
        + gym_and_pool_fee)
        * MISC_CHARGE_RATE;

    let total_annual = service_charge
        + cooling_charge
        + building_maintenance_fee
        + security_fee
        + cleaning_fee
        + parking_fee
        + gym_and_pool_fee
        + misc_charges;

    Ok(CommunityChargeResult {
        community: inputs.community.trim().to_string(),
        service_rate_per_sq_ft: service_rate,
        service_charge,
        cooling_charge,
        building_maintenance_fee,
        security_fee,
        cleaning_fee,
        parking_fee,
        gym_and_pool_fee,
        misc_charges,
        total_annual,
        monthly: total_annual / 12.0,
    })
}
