use rct_common::{BlockNumber, Timeslice, TIMESLICE_PERIOD};
use std::marker::PhantomData;

/// The external chain-observation collaborator. The sale model never
/// reads time itself; it only consumes block heights supplied through
/// this trait, which must be monotonically non-decreasing.
pub trait BlockHeightProvider {
    fn current_block() -> BlockNumber;
}

/// The timeslice containing `block`. Integer floor division; a one-block
/// discrepancy here would change region identity, so no other rounding is
/// ever applied.
pub fn timeslice_at(block: BlockNumber) -> Timeslice {
    block / TIMESLICE_PERIOD
}

/// The earliest timeslice a sale may commit for, seen from `block`.
pub fn commit_timeslice_at(block: BlockNumber, advance_notice: BlockNumber) -> Timeslice {
    timeslice_at(block.saturating_add(advance_notice))
}

pub struct RelayClock<T: BlockHeightProvider> {
    _phantom: PhantomData<T>,
}

impl<T: BlockHeightProvider> RelayClock<T> {
    pub fn current_timeslice() -> Timeslice {
        timeslice_at(T::current_block())
    }

    pub fn current_commit_timeslice(advance_notice: BlockNumber) -> Timeslice {
        commit_timeslice_at(T::current_block(), advance_notice)
    }
}
