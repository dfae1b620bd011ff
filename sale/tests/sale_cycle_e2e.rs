//! End-to-end walk through a full sale cycle: interlude, leadin price
//! discovery, regular sale, sellout, rollover and renewal, with the
//! purchased regions persisted through the packed-id region store.

use rct_common::{AccountId, Balance, CORE_PARTS};
use rct_sale::{SaleEngine, SaleError, SalePhase};
use rct_storage::{MemoryRegionStore, RegionStore};
use rct_types::{CoreMask, RegionId, SaleConfiguration};
use std::error::Error;

const UNIT: Balance = 1_000_000_000_000;
const INITIAL_PRICE: Balance = 50 * UNIT;
const CORE_COUNT: u16 = 10;

fn config() -> SaleConfiguration {
    SaleConfiguration {
        advance_notice: 20,
        interlude_length: 10,
        leadin_length: 10,
        region_length: 30,
        ideal_bulk_proportion: CORE_PARTS / 2,
        limit_cores_offered: Some(50),
        renewal_bump: 10,
        contribution_timeout: 5,
    }
}

fn account(byte: u8) -> AccountId {
    AccountId::new([byte; 32])
}

#[test]
fn sale_cycle_e2e() -> Result<(), Box<dyn Error>> {
    rct_common::utils::tracing::setup_timed_tracing();

    let mut engine = SaleEngine::start(config(), 0, INITIAL_PRICE, CORE_COUNT)?;
    let mut store = MemoryRegionStore::new();

    // Interlude: the price is observable but nothing can be bought.
    assert_eq!(engine.phase(0), SalePhase::Interlude);
    assert_eq!(engine.price_at(0), INITIAL_PRICE);
    assert!(matches!(
        engine.purchase(5, account(1), Balance::MAX),
        Err(SaleError::WrongPhase { .. })
    ));

    // Leadin: one impatient buyer pays the opening price.
    assert_eq!(engine.phase(10), SalePhase::Leadin);
    let early = engine.purchase(10, account(1), Balance::MAX)?;
    assert_eq!(early.record.paid, Some(2 * INITIAL_PRICE));
    store.insert(early.clone());

    // Regular sale: buyers come in at the target price until the ideal
    // core count is reached and the sellout price latches.
    assert_eq!(engine.phase(20), SalePhase::Regular);
    for buyer in 2..=5u8 {
        let region = engine.purchase(20 + buyer as u32, account(buyer), Balance::MAX)?;
        assert_eq!(region.record.paid, Some(INITIAL_PRICE));
        store.insert(region);
    }
    assert_eq!(engine.sale().cores_sold, 5);
    assert_eq!(engine.sale().sellout_price, Some(INITIAL_PRICE));

    // A buyer splits their core with a partner via interlace.
    let half = CoreMask::from_chunk(0, 40)?;
    let split = engine.purchase_masked(30, account(6), Balance::MAX, half)?;
    assert_eq!(split.record.paid, Some(INITIAL_PRICE / 2));
    store.insert(split);

    // Every purchased region this cycle starts at the committed window
    // and is retrievable by its packed id.
    let this_cycle = store.regions_from(engine.sale().region_begin);
    assert_eq!(this_cycle.len(), store.len());
    for region in &this_cycle {
        assert_eq!(region.region_id.begin, engine.sale().region_begin);
        let packed = region.region_id.to_u128();
        assert_eq!(RegionId::from_u128(packed), region.region_id);
        assert_eq!(store.get(&region.region_id), Some(&region.record));
    }

    // The cycle rolls over once the sold window elapses; the next target
    // price is the sellout price bumped by 10 percent.
    let next_cycle_start = engine.sale().region_end * 80;
    assert!(engine.needs_rollover(next_cycle_start));
    assert!(matches!(
        engine.purchase(next_cycle_start, account(7), Balance::MAX),
        Err(SaleError::SaleEnded)
    ));

    let old_window = (engine.sale().region_begin, engine.sale().region_end);
    engine.rollover(next_cycle_start);
    assert_eq!(engine.sale().region_begin, old_window.0 + 30);
    assert_eq!(engine.sale().region_end, old_window.1 + 30);
    assert_eq!(engine.sale().price, INITIAL_PRICE + INITIAL_PRICE / 10);
    assert_eq!(engine.sale().cores_sold, 0);

    // The early buyer renews during the new interlude at their bumped
    // previous price, staying on the same core.
    assert_eq!(engine.phase(next_cycle_start), SalePhase::Interlude);
    let renewed = engine.renew(next_cycle_start, &early)?;
    assert_eq!(renewed.region_id.core, early.region_id.core);
    assert_eq!(renewed.region_id.begin, engine.sale().region_begin);
    assert_eq!(
        renewed.record.paid,
        Some(2 * INITIAL_PRICE + 2 * INITIAL_PRICE / 10)
    );
    store.insert(renewed);

    // The renewed region sorts after every region of the previous window.
    let next_window = store.regions_from(engine.sale().region_begin);
    assert_eq!(next_window.len(), 1);

    Ok(())
}

#[test]
fn transferred_region_survives_the_store() -> Result<(), Box<dyn Error>> {
    let mut engine = SaleEngine::start(config(), 0, INITIAL_PRICE, CORE_COUNT)?;
    let mut store = MemoryRegionStore::new();

    let mut region = engine.purchase(20, account(1), Balance::MAX)?;
    store.insert(region.clone());

    // Ownership transfer changes the record, never the identity.
    region.transfer(account(2));
    store.insert(region.clone());
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get(&region.region_id).map(|record| record.owner),
        Some(account(2))
    );
    assert_eq!(
        store.get(&region.region_id).map(|record| record.paid),
        Some(Some(INITIAL_PRICE))
    );

    Ok(())
}
