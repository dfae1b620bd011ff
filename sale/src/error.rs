use crate::phase::SalePhase;
use rct_codec::RegionCodecError;
use rct_common::Balance;
use rct_types::{ConfigError, MaskError, RegionError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    // Phase and capacity errors
    #[error("Purchases are not permitted during the {current} phase")]
    WrongPhase { current: SalePhase },
    #[error("The region window of this cycle has already elapsed")]
    SaleEnded,
    #[error("All {cores_offered} offered cores have been sold")]
    SoldOut { cores_offered: u16 },
    #[error("Sale price {price} exceeds the buyer's limit {max_price}")]
    Overpriced { price: Balance, max_price: Balance },
    #[error("A void mask cannot describe a real region")]
    VoidMask,
    #[error("Renewal requires a region with a settled purchase price")]
    RenewalNotAllowed,
    // External errors
    #[error("Mask error: {0}")]
    Mask(#[from] MaskError),
    #[error("Region error: {0}")]
    Region(#[from] RegionError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Codec error: {0}")]
    Codec(#[from] RegionCodecError),
}
