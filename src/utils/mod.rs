//! Utility modules for the VoluntTrac client.
//!
//! - [`datetime`] - Form/timestamp conversions and display formatting
//! - [`geo`] - Great-circle distance for location filtering

pub mod datetime;
pub mod geo;
