//! Integration tests module for request-composer
//!
//! This module provides common utilities and test infrastructure
//! for the integration tests.

pub mod credential_cache_test;
pub mod mutation_properties_test;
pub mod request_chaining_test;
#[cfg(feature = "http")]
pub mod token_exchange_test;

use request_composer::models::DataTable;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        // Route `log` output through the test harness
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Builds a table from string rows.
pub fn table(rows: &[&[&str]]) -> DataTable {
    DataTable::from_rows(rows)
}
