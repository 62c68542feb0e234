//! Command, query and result types exchanged with the services.
//!
//! These are plain value objects; validation and defaulting happen in the
//! service that consumes them.

pub mod daily;
pub mod financial;
pub mod flocks;
pub mod ledger;
pub mod reports;
