//! Domain aggregates exposed by the contacts service layer.

pub mod contact;
pub mod display;
pub mod stats;
pub mod types;
