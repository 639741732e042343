//! Order Guide Status Tool
//!
//! Provides runtime status information about the order guide service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Ordering workflow instructions for AI assistants
pub const ORDERING_INSTRUCTIONS: &str = r#"
# Order Guide Instructions

This guide explains how to compare vendor prices and build purchase orders
with the Order Guide tools.

## Overview

- **Vendors** - suppliers (Sysco, US Foods, ...)
- **Ingredients** - what the kitchen buys, each with a **base unit** (e.g. eggs in `dozen`, butter in `lb`)
- **Products** - a vendor's package of an ingredient: quantity, unit and package price
- **Shopping lists** - products and how many packages to buy
- **Purchase orders** - one draft order per vendor, created from a shopping list or directly

---

## Comparing Prices

**Tool:** `compare_ingredient_prices`

Every product of the ingredient is converted to a price per base unit and
ranked cheapest first.

```json
{ "ingredient_id": 1 }
```

Each ranked offer carries:
- `unit_price` and `unit_price_display` (e.g. `$2.60/dozen`)
- `is_best_price` - true for every offer tied at the lowest unit price
- `percent_above_best` - on non-best offers, how much more they cost per unit
- `percent_better_than_next` - on best offers, the saving against the next offer

### Units

Known conversions: `each`, `dozen`, `carton`, `case` (count) and `lb`, `oz` (weight).
Units are matched case-insensitively. A product whose unit has no conversion to
the ingredient's base unit is compared as if one of its units equals one base
unit; `add_product` returns a `unit_warning` when that happens. Prefer
entering products in a unit that converts.

---

## Building Orders

1. `create_shopping_list` with a name
2. `update_shopping_list_items` with `add: [{"product_id": 3, "quantity_requested": 10}]`
   (`quantity_requested` defaults to 1) and/or `remove: [item_id, ...]`
3. `create_purchase_orders_from_shopping_list` - splits the list by vendor into
   draft orders, each line priced at the product's current price
4. `update_purchase_order_status` to `sent` once placed, `confirmed` once the vendor confirms

A single-vendor order can also be made directly with `create_purchase_order`.

---

## Notes

- Prices are package prices in dollars; quantities are package sizes
- Shopping lists with no items cannot be turned into orders
- Order status is one of: `draft`, `sent`, `confirmed`
"#;

/// Runtime status of the order guide service
#[derive(Debug, Clone, Serialize)]
pub struct OrderGuideStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,

    pub as_of: String,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> OrderGuideStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        OrderGuideStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            as_of: chrono::Utc::now().to_rfc3339(),
        }
    }
}
