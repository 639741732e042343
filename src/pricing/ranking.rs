//! Best-price ranking
//!
//! Normalizes every offer for one ingredient to its base unit, sorts the
//! offers cheapest first and marks the cheapest ones as best price.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::converter::format_unit_price;
use super::units::ConversionTable;

/// Anything sold as `quantity` `unit`s for `price`
pub trait Priced {
    fn price(&self) -> f64;
    fn quantity(&self) -> f64;
    fn unit(&self) -> &str;
}

/// One vendor's sellable unit for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

impl Offer {
    pub fn new(price: f64, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            price,
            quantity,
            unit: unit.into(),
        }
    }
}

impl Priced for Offer {
    fn price(&self) -> f64 {
        self.price
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}

/// An offer with its normalized price and comparison annotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOffer<T> {
    #[serde(flatten)]
    pub offer: T,
    /// Price per base unit
    pub unit_price: f64,
    /// e.g. "$2.80/dozen"
    pub unit_price_display: String,
    /// True for every offer tied at the minimum unit price
    pub is_best_price: bool,
    /// How much pricier than the best offer, in whole percent (non-best offers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_above_best: Option<i64>,
    /// How much cheaper than the second-ranked offer, in whole percent (best offers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_better_than_next: Option<i64>,
}

/// Rank offers for one ingredient against its base unit
///
/// The result is sorted ascending by unit price. Offers with equal unit
/// prices keep their input order, and all offers at the minimum are marked
/// best. An empty input gives an empty result.
pub fn rank_offers<T>(table: &ConversionTable, offers: &[T], base_unit: &str) -> Vec<RankedOffer<T>>
where
    T: Priced + Clone,
{
    let mut ranked: Vec<RankedOffer<T>> = offers
        .iter()
        .map(|offer| {
            let unit_price =
                table.normalized_price(offer.price(), offer.quantity(), offer.unit(), base_unit);
            RankedOffer {
                offer: offer.clone(),
                unit_price,
                unit_price_display: format_unit_price(unit_price, base_unit),
                is_best_price: false,
                percent_above_best: None,
                percent_better_than_next: None,
            }
        })
        .collect();

    // Vec::sort_by is stable
    ranked.sort_by(|a, b| {
        a.unit_price
            .partial_cmp(&b.unit_price)
            .unwrap_or(Ordering::Equal)
    });

    let Some(min_price) = ranked.first().map(|r| r.unit_price) else {
        return ranked;
    };
    let next_price = ranked.get(1).map(|r| r.unit_price);

    for row in &mut ranked {
        row.is_best_price = row.unit_price == min_price;
        if row.is_best_price {
            row.percent_better_than_next = next_price
                .and_then(|next| percent_better_than_next(row.unit_price, next));
        } else {
            row.percent_above_best = percent_above_best(row.unit_price, min_price);
        }
    }

    ranked
}

/// `round((unit_price - best) / best * 100)`, omitted when either price is not positive
pub fn percent_above_best(unit_price: f64, best_price: f64) -> Option<i64> {
    if unit_price <= 0.0 || best_price <= 0.0 {
        return None;
    }
    Some((((unit_price - best_price) / best_price) * 100.0).round() as i64)
}

/// `round((next - best) / next * 100)`, omitted when either price is not positive
pub fn percent_better_than_next(best_price: f64, next_price: f64) -> Option<i64> {
    if best_price <= 0.0 || next_price <= 0.0 {
        return None;
    }
    Some((((next_price - best_price) / next_price) * 100.0).round() as i64)
}

/// A ranking together with the base unit it was computed against
#[derive(Debug, Clone, Serialize)]
pub struct PriceComparison<T> {
    pub base_unit: String,
    pub best_unit_price: Option<f64>,
    pub offers: Vec<RankedOffer<T>>,
}

impl<T: Priced + Clone> PriceComparison<T> {
    pub fn compute(table: &ConversionTable, offers: &[T], base_unit: &str) -> Self {
        let offers = rank_offers(table, offers, base_unit);
        Self {
            base_unit: base_unit.to_string(),
            best_unit_price: offers.first().map(|r| r.unit_price),
            offers,
        }
    }

    /// The offers marked best price
    pub fn best(&self) -> impl Iterator<Item = &RankedOffer<T>> {
        self.offers.iter().filter(|r| r.is_best_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Offer tagged with its input position, for order assertions
    #[derive(Debug, Clone, PartialEq)]
    struct Tagged(usize, Offer);

    impl Priced for Tagged {
        fn price(&self) -> f64 {
            self.1.price
        }
        fn quantity(&self) -> f64 {
            self.1.quantity
        }
        fn unit(&self) -> &str {
            &self.1.unit
        }
    }

    fn tagged(offers: Vec<Offer>) -> Vec<Tagged> {
        offers.into_iter().enumerate().map(|(i, o)| Tagged(i, o)).collect()
    }

    #[test]
    fn test_empty_input() {
        let table = ConversionTable::standard();
        let ranked = rank_offers::<Offer>(&table, &[], "dozen");
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_egg_offers_ranked() {
        let table = ConversionTable::standard();
        let offers = vec![
            Offer::new(42.0, 15.0, "dozen"),
            Offer::new(3.20, 1.0, "dozen"),
            Offer::new(5.80, 1.0, "dozen"),
        ];

        let ranked = rank_offers(&table, &offers, "dozen");
        let prices: Vec<f64> = ranked.iter().map(|r| r.unit_price).collect();
        assert!((prices[0] - 2.80).abs() < 1e-9);
        assert_eq!(prices[1], 3.20);
        assert_eq!(prices[2], 5.80);

        assert_eq!(ranked[0].offer, offers[0]);
        assert!(ranked[0].is_best_price);
        assert!(!ranked[1].is_best_price);
        assert!(!ranked[2].is_best_price);
        assert_eq!(ranked[0].unit_price_display, "$2.80/dozen");
        assert_eq!(ranked[1].unit_price_display, "$3.20/dozen");
    }

    #[test]
    fn test_percent_annotations() {
        let table = ConversionTable::standard();
        let offers = vec![
            Offer::new(42.0, 15.0, "dozen"),
            Offer::new(3.20, 1.0, "dozen"),
            Offer::new(5.80, 1.0, "dozen"),
        ];

        let ranked = rank_offers(&table, &offers, "dozen");
        // (3.20 - 2.80) / 3.20 = 12.5% -> 13
        assert_eq!(ranked[0].percent_better_than_next, Some(13));
        assert_eq!(ranked[0].percent_above_best, None);
        // (3.20 - 2.80) / 2.80 = 14.3% -> 14
        assert_eq!(ranked[1].percent_above_best, Some(14));
        // (5.80 - 2.80) / 2.80 = 107.1% -> 107
        assert_eq!(ranked[2].percent_above_best, Some(107));
        assert_eq!(ranked[2].percent_better_than_next, None);
    }

    #[test]
    fn test_converted_offer() {
        let table = ConversionTable::standard();
        let offers = vec![Offer::new(3.99, 12.0, "each")];
        let ranked = rank_offers(&table, &offers, "dozen");
        assert!((ranked[0].unit_price - 3.99).abs() < 1e-9);
        assert!(ranked[0].is_best_price);
        assert_eq!(ranked[0].percent_better_than_next, None);
    }

    #[test]
    fn test_zero_quantity_ranks_first_without_percentages() {
        let table = ConversionTable::standard();
        let offers = vec![Offer::new(5.0, 1.0, "dozen"), Offer::new(10.0, 0.0, "dozen")];
        let ranked = rank_offers(&table, &offers, "dozen");

        assert_eq!(ranked[0].unit_price, 0.0);
        assert!(ranked[0].is_best_price);
        assert_eq!(ranked[0].percent_better_than_next, None);
        assert_eq!(ranked[1].percent_above_best, None);
    }

    #[test]
    fn test_unknown_unit_does_not_block_batch() {
        let table = ConversionTable::standard();
        let offers = vec![
            Offer::new(30.0, 3.0, "pallet"),
            Offer::new(9.0, 1.0, ""),
            Offer::new(4.0, 1.0, "dozen"),
        ];
        let ranked = rank_offers(&table, &offers, "dozen");
        let prices: Vec<f64> = ranked.iter().map(|r| r.unit_price).collect();
        assert_eq!(prices, vec![4.0, 9.0, 10.0]);
    }

    #[test]
    fn test_ties_all_best_and_stable() {
        let table = ConversionTable::standard();
        let offers = tagged(vec![
            Offer::new(3.0, 1.0, "dozen"),
            Offer::new(4.0, 2.0, "dozen"),
            Offer::new(2.0, 1.0, "dozen"),
            Offer::new(2.5, 1.0, "dozen"),
        ]);

        let ranked = rank_offers(&table, &offers, "dozen");
        let order: Vec<usize> = ranked.iter().map(|r| r.offer.0).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);

        assert!(ranked[0].is_best_price);
        assert!(ranked[1].is_best_price);
        assert!(!ranked[2].is_best_price);
        assert!(!ranked[3].is_best_price);

        // Second-ranked offer is tied, so the best offers are 0% better
        assert_eq!(ranked[0].percent_better_than_next, Some(0));
        assert_eq!(ranked[1].percent_better_than_next, Some(0));
    }

    #[test]
    fn test_sorted_and_best_marking_invariants() {
        let table = ConversionTable::standard();
        let offers = tagged(vec![
            Offer::new(24.0, 5.0, "lb"),
            Offer::new(5.5, 1.0, "lb"),
            Offer::new(5.9, 16.0, "oz"),
            Offer::new(4.8, 1.0, "lb"),
            Offer::new(0.30, 1.0, "oz"),
            Offer::new(4.8, 1.0, "LB"),
        ]);

        let ranked = rank_offers(&table, &offers, "lb");
        assert_eq!(ranked.len(), offers.len());

        for pair in ranked.windows(2) {
            assert!(pair[0].unit_price <= pair[1].unit_price);
            if pair[0].unit_price == pair[1].unit_price {
                assert!(pair[0].offer.0 < pair[1].offer.0);
            }
        }

        let min = ranked.iter().map(|r| r.unit_price).fold(f64::INFINITY, f64::min);
        assert!(ranked.iter().any(|r| r.is_best_price));
        for row in &ranked {
            assert_eq!(row.is_best_price, row.unit_price == min);
        }
    }

    #[test]
    fn test_ranking_is_repeatable() {
        let table = ConversionTable::standard();
        let offers = vec![
            Offer::new(8.5, 2.5, "dozen"),
            Offer::new(78.0, 30.0, "dozen"),
            Offer::new(3.99, 12.0, "each"),
        ];
        let first = rank_offers(&table, &offers, "dozen");
        let second = rank_offers(&table, &offers, "dozen");
        assert_eq!(first, second);
    }

    #[test]
    fn test_price_comparison_summary() {
        let table = ConversionTable::standard();
        let offers = vec![Offer::new(2.0, 1.0, "dozen"), Offer::new(2.0, 1.0, "dozen")];
        let comparison = PriceComparison::compute(&table, &offers, "dozen");
        assert_eq!(comparison.base_unit, "dozen");
        assert_eq!(comparison.best_unit_price, Some(2.0));
        assert_eq!(comparison.best().count(), 2);

        let empty = PriceComparison::<Offer>::compute(&table, &[], "dozen");
        assert_eq!(empty.best_unit_price, None);
    }

    #[test]
    fn test_serialized_shape() {
        let table = ConversionTable::standard();
        let ranked = rank_offers(&table, &[Offer::new(3.2, 1.0, "dozen")], "dozen");
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["price"], 3.2);
        assert_eq!(json["unit"], "dozen");
        assert_eq!(json["is_best_price"], true);
        assert_eq!(json["unit_price_display"], "$3.20/dozen");
        assert!(json.get("percent_above_best").is_none());
    }
}
