//! Reinsurance treaties: data, loading and eligibility

mod catalog;
mod data;
pub mod loader;

pub use catalog::{is_eligible, sort_for_allocation, TreatyCatalog};
pub use data::{Treaty, TreatyStatus, TreatyType};
pub use loader::{load_treaties, load_treaties_from_reader};
