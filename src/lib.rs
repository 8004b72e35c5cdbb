//! Real-estate financial calculators: mortgage amortization, purchase costs,
//! service charges, rent-vs-buy projection, property comparison and the
//! purchase document checklist.
//!
//! The calculators are pure functions over an input record and a [`Policy`].
//! The parser, dispatcher and report modules make up the command-line front end.

pub mod catalog;
pub mod checklist;
pub mod comparison;
pub mod config;
pub mod costs;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod loan;
pub mod parser;
pub mod policy;
pub mod rent_vs_buy;
pub mod report;
pub mod service_charge;
pub mod types;
pub mod validate;

pub use checklist::generate_checklist;
pub use comparison::compare_properties;
pub use costs::calculate_cost_breakdown;
pub use error::{CalcError, CommandError, ParseError};
pub use loan::{amortization_schedule, calculate_loan};
pub use policy::Policy;
pub use rent_vs_buy::analyze_rent_vs_buy;
pub use service_charge::{estimate_community_charges, estimate_service_charge};
