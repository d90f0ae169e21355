//! Outbound adapters implementing the domain's repository ports.
//!
//! Only PostgreSQL persistence lives here; adapters translate between Diesel
//! rows and domain types and hold no business rules.

pub mod persistence;
