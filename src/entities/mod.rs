//! Entity type definitions
//!
//! - [`Element`] - one circuit element with tolerance, drift and a seeded variation model
//! - [`ToleranceBand`] - signed percentage interval for random spread

pub mod band;
pub mod element;

pub use band::ToleranceBand;
pub use element::{Element, ElementSpec, DEFAULT_SIGMA, ROOM_TEMPERATURE};
