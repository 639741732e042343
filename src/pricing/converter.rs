//! Price normalization
//!
//! Converts a vendor's package price into a price per ingredient base unit.

use super::units::{normalize_unit, ConversionTable};

impl ConversionTable {
    /// Price per one `base_unit` for a package of `quantity` `unit`s sold at `price`
    ///
    /// A zero effective quantity yields 0.0 rather than an infinite price.
    ///
    /// Examples:
    /// - $42.00 for 15 dozen, base "dozen" -> 2.80
    /// - $3.99 for 12 each, base "dozen" -> 3.99
    pub fn normalized_price(&self, price: f64, quantity: f64, unit: &str, base_unit: &str) -> f64 {
        let unit_norm = normalize_unit(unit);
        let base_norm = normalize_unit(base_unit);

        let quantity_in_base = if unit_norm == base_norm {
            quantity
        } else {
            quantity * self.factor(&unit_norm, &base_norm)
        };

        if quantity_in_base == 0.0 {
            return 0.0;
        }

        let unit_price = price / quantity_in_base;
        if unit_price.is_finite() {
            unit_price
        } else {
            0.0
        }
    }
}

/// Format a unit price for display, e.g. "$2.80/dozen"
pub fn format_unit_price(value: f64, base_unit: &str) -> String {
    format!("${:.2}/{}", value, base_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_same_unit_divides_price_by_quantity() {
        let table = ConversionTable::standard();
        assert!(approx(table.normalized_price(42.0, 15.0, "dozen", "dozen"), 2.8));
        assert_eq!(table.normalized_price(3.2, 1.0, "dozen", "dozen"), 3.2);
        assert_eq!(table.normalized_price(7.0, 4.0, "case", "case"), 7.0 / 4.0);
    }

    #[test]
    fn test_unit_matching_ignores_case_and_whitespace() {
        let table = ConversionTable::standard();
        assert_eq!(table.normalized_price(10.0, 4.0, " Dozen", "DOZEN "), 2.5);
    }

    #[test]
    fn test_each_to_dozen() {
        let table = ConversionTable::standard();
        assert!(approx(table.normalized_price(3.99, 12.0, "each", "dozen"), 3.99));
    }

    #[test]
    fn test_inverse_lookup() {
        // No dozen -> carton entry, but carton -> dozen = 1/12
        let table = ConversionTable::standard();
        assert!(approx(table.normalized_price(5.0, 2.0, "dozen", "carton"), 5.0 / 24.0));
    }

    #[test]
    fn test_weight_units() {
        let table = ConversionTable::standard();
        // 5 lb block at $24 = 80 oz
        assert!(approx(table.normalized_price(24.0, 5.0, "lb", "oz"), 0.3));
        // 32 oz at $8 = 2 lb
        assert!(approx(table.normalized_price(8.0, 32.0, "oz", "lb"), 4.0));
    }

    #[test]
    fn test_zero_quantity_is_zero() {
        let table = ConversionTable::standard();
        assert_eq!(table.normalized_price(10.0, 0.0, "dozen", "dozen"), 0.0);
        assert_eq!(table.normalized_price(10.0, 0.0, "each", "dozen"), 0.0);
        assert_eq!(table.normalized_price(10.0, 0.0, "pallet", "dozen"), 0.0);
    }

    #[test]
    fn test_unknown_pair_treated_as_same_unit() {
        let table = ConversionTable::standard();
        assert_eq!(table.normalized_price(30.0, 3.0, "pallet", "dozen"), 10.0);
    }

    #[test]
    fn test_result_always_finite() {
        let table = ConversionTable::standard();
        let units = ["each", "dozen", "lb", "oz", "carton", "case", "pallet", ""];
        for unit in units {
            for base in units {
                for (price, qty) in [(0.0, 0.0), (1.0, 0.0), (0.0, 5.0), (1e308, 1e-308), (3.5, 2.0)] {
                    let p = table.normalized_price(price, qty, unit, base);
                    assert!(p.is_finite(), "{} {} {} {} -> {}", price, qty, unit, base, p);
                    assert!(p >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_format_unit_price() {
        assert_eq!(format_unit_price(2.8, "dozen"), "$2.80/dozen");
        assert_eq!(format_unit_price(0.0, "lb"), "$0.00/lb");
        assert_eq!(format_unit_price(3.999, "each"), "$4.00/each");
    }
}
