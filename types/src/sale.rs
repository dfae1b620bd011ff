use rct_common::{Balance, BlockNumber, CoreIndex, Timeslice, CORE_PARTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("region_length must be greater than zero")]
    ZeroRegionLength,
    #[error("leadin_length must be greater than zero")]
    ZeroLeadinLength,
    #[error("renewal_bump {0} must be at most 100 percent")]
    BumpTooLarge(u32),
    #[error("ideal_bulk_proportion {0} exceeds one full core (57600 parts)")]
    ProportionTooLarge(u32),
}

/// The tunables of a sale cycle. Loaded once per cycle and immutable for
/// its duration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaleConfiguration {
    /// Blocks ahead of `now` used when deriving the earliest timeslice a
    /// sale may commit for.
    pub advance_notice: BlockNumber,
    /// Length in blocks of the interlude preceding each leadin.
    pub interlude_length: BlockNumber,
    /// Length in blocks of the leadin price-discovery period.
    pub leadin_length: BlockNumber,
    /// Length in timeslices of the region window sold each cycle.
    pub region_length: Timeslice,
    /// The proportion of offered cores which must be sold to latch the
    /// sellout price, in parts of [`CORE_PARTS`].
    pub ideal_bulk_proportion: u32,
    /// Upper bound on the cores offered per cycle, if any.
    pub limit_cores_offered: Option<u16>,
    /// Percentage added to the sellout price when seeding the next cycle
    /// and when pricing renewals.
    pub renewal_bump: u32,
    /// Timeslices after which an unpaid contribution lapses.
    pub contribution_timeout: Timeslice,
}

impl SaleConfiguration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_length == 0 {
            return Err(ConfigError::ZeroRegionLength);
        }
        if self.leadin_length == 0 {
            return Err(ConfigError::ZeroLeadinLength);
        }
        if self.renewal_bump > 100 {
            return Err(ConfigError::BumpTooLarge(self.renewal_bump));
        }
        if self.ideal_bulk_proportion > CORE_PARTS {
            return Err(ConfigError::ProportionTooLarge(self.ideal_bulk_proportion));
        }
        Ok(())
    }
}

/// The mutable state of one sale cycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaleInfo {
    /// Block at which this cycle began (start of the interlude).
    pub sale_start: BlockNumber,
    /// Length in blocks of the leadin, frozen from the configuration.
    pub leadin_length: BlockNumber,
    /// The cycle's target price: the regular-phase sale price, and the
    /// floor the leadin decays to.
    pub price: Balance,
    /// The price at which the ideal core count was first reached. `None`
    /// until that happens; set exactly once per cycle.
    pub sellout_price: Option<Balance>,
    /// First timeslice of the region window being sold.
    pub region_begin: Timeslice,
    /// One past the last timeslice of the region window being sold.
    pub region_end: Timeslice,
    /// The first core index assigned this cycle.
    pub first_core: CoreIndex,
    /// How many cores must sell for the cycle to count as having found
    /// its clearing price.
    pub ideal_cores_sold: u16,
    /// Number of cores offered this cycle.
    pub cores_offered: u16,
    /// Number of cores sold so far; monotonically increasing, reset only
    /// at rollover.
    pub cores_sold: u16,
}
