//! Hedge sizing module
//!
//! Exposure of existing holdings against a leveraged reference position,
//! and the call contracts needed to close the gap

mod contracts;
mod exposure;

pub use contracts::{
    contracts_needed, per_contract_exposure, premium_cost, CombinedRow, HedgeLeg,
};
pub use exposure::{shares_for_value, ExposureRow, Holding, ReferencePosition};
