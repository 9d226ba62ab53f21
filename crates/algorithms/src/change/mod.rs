//! Change detection kernels
//!
//! Two rapid-change-assessment variants over a before/after band pair:
//! - binary: flag pixels whose relative change exceeds a threshold
//! - percentage: signed change scaled to [-100, 100] with a dead-zone

mod percentage;
mod rapid;

pub use percentage::{PercentChange, PercentChangeParams};
pub use rapid::{RapidChange, RapidChangeParams};
