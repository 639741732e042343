//! Price comparison module
//!
//! Unit conversion, price normalization and best-price ranking.

pub mod converter;
pub mod ranking;
pub mod units;

pub use converter::format_unit_price;
pub use ranking::{
    percent_above_best, percent_better_than_next, rank_offers, Offer, PriceComparison, Priced,
    RankedOffer,
};
pub use units::{normalize_unit, ConversionTable, Unit};
