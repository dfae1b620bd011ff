pub mod engine;
pub mod error;
pub mod phase;
pub mod price;

pub use engine::SaleEngine;
pub use error::SaleError;
pub use phase::SalePhase;
pub use price::{LeadinCurve, LinearCurve};
