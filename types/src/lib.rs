pub mod coremask;
pub mod region;
pub mod sale;

pub use coremask::{CoreMask, MaskError};
pub use region::{Region, RegionError, RegionId, RegionRecord};
pub use sale::{ConfigError, SaleConfiguration, SaleInfo};
