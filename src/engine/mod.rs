//! Risk scoring engines.
//!
//! Submodules:
//! - `flood`     — gauge level + rate of rise + rainfall → flood warning zones.
//! - `landslide` — rainfall + humidity + wind + cloud → landslide warning zones.
//!
//! Both engines are pure over their inputs and share only the score
//! classification in `model::RiskLevel`.

pub mod flood;
pub mod landslide;

pub use flood::FloodRiskEngine;
pub use landslide::LandslideRiskEngine;
