use crate::{
    phase::{phase_at, SalePhase},
    price::{LeadinCurve, LinearCurve},
    SaleError,
};
use rct_clock::{commit_timeslice_at, timeslice_at};
use rct_common::{AccountId, Balance, BlockNumber, CORE_MASK_BITS, CORE_PARTS};
use rct_types::{CoreMask, Region, RegionId, SaleConfiguration, SaleInfo};
use tracing::{debug, info};

/// The state machine of one sale cycle.
///
/// All mutation goes through `&mut self`, so concurrent purchase attempts
/// are serialized by construction: `cores_sold` increments and the
/// sellout-price latch are not commutative. The engine computes prices
/// but never inspects balances; settlement belongs to the caller's ledger
/// collaborator.
pub struct SaleEngine<C: LeadinCurve = LinearCurve> {
    config: SaleConfiguration,
    sale: SaleInfo,
    curve: C,
}

impl SaleEngine<LinearCurve> {
    /// Opens a new sale at block `now` with the default linear leadin.
    pub fn start(
        config: SaleConfiguration,
        now: BlockNumber,
        target_price: Balance,
        core_count: u16,
    ) -> Result<Self, SaleError> {
        Self::start_with_curve(config, now, target_price, core_count, LinearCurve)
    }

    /// Adopts an externally seeded `SaleInfo`, e.g. state read back from
    /// chain storage.
    pub fn resume(config: SaleConfiguration, sale: SaleInfo) -> Result<Self, SaleError> {
        Self::resume_with_curve(config, sale, LinearCurve)
    }
}

impl<C: LeadinCurve> SaleEngine<C> {
    pub fn start_with_curve(
        config: SaleConfiguration,
        now: BlockNumber,
        target_price: Balance,
        core_count: u16,
        curve: C,
    ) -> Result<Self, SaleError> {
        config.validate()?;
        let region_begin = commit_timeslice_at(now, config.advance_notice);
        let cores_offered = config
            .limit_cores_offered
            .map_or(core_count, |limit| core_count.min(limit));
        let sale = SaleInfo {
            sale_start: now,
            leadin_length: config.leadin_length,
            price: target_price,
            sellout_price: None,
            region_begin,
            region_end: region_begin + config.region_length,
            first_core: 0,
            ideal_cores_sold: ideal_cores(config.ideal_bulk_proportion, cores_offered),
            cores_offered,
            cores_sold: 0,
        };
        info!(
            sale_start = sale.sale_start,
            region_begin = sale.region_begin,
            region_end = sale.region_end,
            cores_offered = sale.cores_offered,
            price = sale.price,
            "bulk sale started"
        );
        Ok(Self {
            config,
            sale,
            curve,
        })
    }

    pub fn resume_with_curve(
        config: SaleConfiguration,
        sale: SaleInfo,
        curve: C,
    ) -> Result<Self, SaleError> {
        config.validate()?;
        Ok(Self {
            config,
            sale,
            curve,
        })
    }

    pub fn config(&self) -> &SaleConfiguration {
        &self.config
    }

    pub fn sale(&self) -> &SaleInfo {
        &self.sale
    }

    /// The phase at `block`.
    pub fn phase(&self, block: BlockNumber) -> SalePhase {
        phase_at(
            block,
            self.sale.sale_start,
            self.config.interlude_length,
            self.sale.leadin_length,
        )
    }

    /// The full-core purchase price at `block`.
    pub fn price_at(&self, block: BlockNumber) -> Balance {
        match self.phase(block) {
            // During the interlude the upcoming target price is already
            // observable; after the leadin it is the settled sale price.
            SalePhase::Interlude | SalePhase::Regular => self.sale.price,
            SalePhase::Leadin => {
                let leadin_start = self.sale.sale_start + self.config.interlude_length;
                self.curve.price_at(
                    self.sale.price,
                    block.saturating_sub(leadin_start),
                    self.sale.leadin_length,
                )
            }
        }
    }

    /// Whether the region window being sold has already elapsed; once
    /// true, the caller must [`Self::rollover`] before selling again.
    pub fn needs_rollover(&self, block: BlockNumber) -> bool {
        timeslice_at(block) >= self.sale.region_end
    }

    /// Purchases a full core. See [`Self::purchase_masked`].
    pub fn purchase(
        &mut self,
        block: BlockNumber,
        buyer: AccountId,
        max_price: Balance,
    ) -> Result<Region, SaleError> {
        self.purchase_masked(block, buyer, max_price, CoreMask::complete())
    }

    /// Purchases capacity on the next unsold core, pro-rated over the set
    /// bits of `mask`. Permitted during the leadin (at the decaying
    /// price) and the regular phase; the interlude rejects purchases.
    pub fn purchase_masked(
        &mut self,
        block: BlockNumber,
        buyer: AccountId,
        max_price: Balance,
        mask: CoreMask,
    ) -> Result<Region, SaleError> {
        let current = self.phase(block);
        if current == SalePhase::Interlude {
            return Err(SaleError::WrongPhase { current });
        }
        if self.needs_rollover(block) {
            return Err(SaleError::SaleEnded);
        }
        if mask.is_void() {
            return Err(SaleError::VoidMask);
        }
        if self.sale.cores_sold >= self.sale.cores_offered {
            return Err(SaleError::SoldOut {
                cores_offered: self.sale.cores_offered,
            });
        }

        let full_price = self.price_at(block);
        let price = prorate(full_price, mask.count_ones());
        if price > max_price {
            return Err(SaleError::Overpriced { price, max_price });
        }

        let core = self.sale.first_core + self.sale.cores_sold;
        self.sale.cores_sold += 1;
        if self.sale.sellout_price.is_none() && self.sale.cores_sold >= self.sale.ideal_cores_sold {
            self.sale.sellout_price = Some(full_price);
            info!(
                price = full_price,
                cores_sold = self.sale.cores_sold,
                "ideal core count reached; sellout price latched"
            );
        }

        let region_id = RegionId::new(self.sale.region_begin, core, mask);
        let mut region = Region::new(region_id, self.sale.region_end, buyer)?;
        region.settle(price)?;
        debug!(%region_id, price, phase = %current, "core sold");
        Ok(region)
    }

    /// Renews an expiring region into this cycle's window at the bumped
    /// price of its last settled purchase. The workload stays on its
    /// core, so the old core index is kept; renewal still consumes one of
    /// the offered cores. Permitted during the interlude (which exists
    /// for exactly this) and the regular phase.
    pub fn renew(&mut self, block: BlockNumber, region: &Region) -> Result<Region, SaleError> {
        let current = self.phase(block);
        if current == SalePhase::Leadin {
            return Err(SaleError::WrongPhase { current });
        }
        if self.needs_rollover(block) {
            return Err(SaleError::SaleEnded);
        }
        let paid = region.record.paid.ok_or(SaleError::RenewalNotAllowed)?;
        if self.sale.cores_sold >= self.sale.cores_offered {
            return Err(SaleError::SoldOut {
                cores_offered: self.sale.cores_offered,
            });
        }

        let price = bump(paid, self.config.renewal_bump);
        self.sale.cores_sold += 1;

        let region_id = RegionId::new(
            self.sale.region_begin,
            region.region_id.core,
            region.region_id.mask,
        );
        let mut renewed = Region::new(region_id, self.sale.region_end, region.record.owner)?;
        renewed.settle(price)?;
        info!(%region_id, price, "region renewed");
        Ok(renewed)
    }

    /// Begins the next cycle at block `now`: the region window advances by
    /// `region_length`, the sold counter resets, and the target price is
    /// seeded from the bumped sellout price when one was latched.
    pub fn rollover(&mut self, now: BlockNumber) {
        let price = match self.sale.sellout_price {
            Some(sellout) => bump(sellout, self.config.renewal_bump),
            None => self.sale.price,
        };
        self.sale = SaleInfo {
            sale_start: now,
            leadin_length: self.config.leadin_length,
            price,
            sellout_price: None,
            region_begin: self.sale.region_begin + self.config.region_length,
            region_end: self.sale.region_end + self.config.region_length,
            first_core: self.sale.first_core,
            ideal_cores_sold: self.sale.ideal_cores_sold,
            cores_offered: self.sale.cores_offered,
            cores_sold: 0,
        };
        info!(
            sale_start = now,
            region_begin = self.sale.region_begin,
            region_end = self.sale.region_end,
            price,
            "sale cycle rolled over"
        );
    }
}

fn prorate(price: Balance, set_bits: u32) -> Balance {
    (price as u128 * set_bits as u128 / CORE_MASK_BITS as u128) as Balance
}

fn bump(price: Balance, percent: u32) -> Balance {
    (price as u128 * (100 + percent as u128) / 100) as Balance
}

fn ideal_cores(proportion: u32, cores_offered: u16) -> u16 {
    (proportion as u64 * cores_offered as u64 / CORE_PARTS as u64) as u16
}
