//! Unit types and the conversion table
//!
//! Units are free-form strings. Every comparison and lookup goes through
//! [`normalize_unit`] so that "Dozen ", "dozen" and "DOZEN" all agree.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalize a unit string for lookup or comparison (trim, then lower-case)
pub fn normalize_unit(unit: &str) -> String {
    unit.trim().to_lowercase()
}

/// A unit of measure as entered by the user (e.g. "lb", "Dozen", "case")
///
/// Any string is accepted. The original spelling is kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    pub fn new(unit: impl Into<String>) -> Self {
        Self(unit.into())
    }

    /// The unit exactly as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lookup key for this unit
    pub fn normalized(&self) -> String {
        normalize_unit(&self.0)
    }

    /// Whether two units name the same thing after normalization
    pub fn same_as(&self, other: &Unit) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Standard Conversion Factors
// ============================================================================

/// Each per dozen
pub const EACH_PER_DOZEN: f64 = 12.0;
/// Ounces per pound
pub const OZ_PER_LB: f64 = 16.0;

/// Sparse unit-to-unit conversion factors
///
/// An entry `from -> to = f` means `quantity_in_to = quantity_in_from * f`.
/// The table may be asymmetric; [`ConversionTable::factor`] falls back to the
/// inverse entry and then to 1.0.
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    factors: HashMap<String, HashMap<String, f64>>,
}

impl ConversionTable {
    /// A table with no entries (every distinct unit pair falls back to 1:1)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard order-guide table
    pub fn standard() -> Self {
        Self::empty()
            .with_factor("each", "each", 1.0)
            .with_factor("each", "dozen", 1.0 / EACH_PER_DOZEN)
            .with_factor("dozen", "each", EACH_PER_DOZEN)
            .with_factor("dozen", "dozen", 1.0)
            .with_factor("lb", "lb", 1.0)
            .with_factor("lb", "oz", OZ_PER_LB)
            .with_factor("oz", "lb", 1.0 / OZ_PER_LB)
            .with_factor("oz", "oz", 1.0)
            // A carton is assumed to hold one dozen (eggs)
            .with_factor("carton", "each", 1.0)
            .with_factor("carton", "dozen", 1.0 / EACH_PER_DOZEN)
            // Case size is product-specific, so only case -> each is known
            .with_factor("case", "each", 1.0)
    }

    /// Add (or replace) a factor. Non-finite or non-positive factors are skipped.
    pub fn with_factor(mut self, from: &str, to: &str, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::warn!(
                "Ignoring invalid conversion factor {} for '{}' -> '{}'",
                factor,
                from,
                to
            );
            return self;
        }

        self.factors
            .entry(normalize_unit(from))
            .or_default()
            .insert(normalize_unit(to), factor);
        self
    }

    /// Look up the direct entry `from -> to`, if any
    pub fn direct_factor(&self, from: &str, to: &str) -> Option<f64> {
        self.factors
            .get(&normalize_unit(from))
            .and_then(|targets| targets.get(&normalize_unit(to)))
            .copied()
    }

    /// Resolve the factor converting a quantity in `from` into `to`
    ///
    /// Tries the direct entry, then the inverse of `to -> from`, then 1.0.
    pub fn factor(&self, from: &str, to: &str) -> f64 {
        if let Some(f) = self.direct_factor(from, to) {
            return f;
        }

        if let Some(inverse) = self.direct_factor(to, from) {
            return 1.0 / inverse;
        }

        // Unknown pair: compared as if 1:1
        tracing::warn!(
            "No conversion between '{}' and '{}'. Treating as 1:1.",
            from,
            to
        );
        1.0
    }

    /// Whether `from` converts to `to` without the 1:1 fallback
    pub fn has_conversion(&self, from: &Unit, to: &Unit) -> bool {
        from.same_as(to)
            || self.direct_factor(from.as_str(), to.as_str()).is_some()
            || self.direct_factor(to.as_str(), from.as_str()).is_some()
    }

    /// Number of source units with at least one entry
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
