//! Order Guide Library
//!
//! Vendor price comparison and purchase ordering for a restaurant kitchen.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod pricing;
pub mod tools;
