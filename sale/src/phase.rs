use rct_common::BlockNumber;
use std::fmt::{Display, Formatter};

/// The phases of one sale cycle, strictly ordered; transitions are driven
/// only by the monotonically advancing block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SalePhase {
    /// No purchases; the upcoming target price can be observed and
    /// expiring regions renewed.
    Interlude,
    /// Dutch-auction price discovery: the price decays from its opening
    /// value toward the cycle's target price.
    Leadin,
    /// Fixed-price sale at the target price until the cores run out or
    /// the region window elapses.
    Regular,
}

impl Display for SalePhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SalePhase::Interlude => write!(f, "interlude"),
            SalePhase::Leadin => write!(f, "leadin"),
            SalePhase::Regular => write!(f, "regular"),
        }
    }
}

/// The phase at `block` for a cycle started at `sale_start`. Blocks below
/// `sale_start` are clamped into the interlude; the clock input is
/// monotonic, so they only occur when a caller replays an old height.
pub fn phase_at(
    block: BlockNumber,
    sale_start: BlockNumber,
    interlude_length: BlockNumber,
    leadin_length: BlockNumber,
) -> SalePhase {
    let elapsed = block.saturating_sub(sale_start);
    if elapsed < interlude_length {
        SalePhase::Interlude
    } else if elapsed < interlude_length.saturating_add(leadin_length) {
        SalePhase::Leadin
    } else {
        SalePhase::Regular
    }
}
