//! Policy data structures and register loading

mod data;
pub mod loader;

pub use data::{InsuredType, LineOfBusiness, Policy, PolicySnapshot, PolicyStatus};
pub use loader::{load_policies, load_policies_from_reader, parse_date, parse_timestamp};
