//! Integration tests for rs-pricing-cms
//!
//! These tests run the complete pipeline over the pricing page fixtures in
//! `fixtures/` together with the product catalog and region exclusions
//! stored next to them.

mod edge_cases;
mod pricing_pages;

use std::path::PathBuf;

use rs_pricing_cms::{ExtractionCoordinator, ExtractionReport, Options};

/// Test fixture path helper
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/fixtures")
        .join(name)
}

/// Coordinator configured from the fixture catalog and exclusions.
pub fn coordinator() -> ExtractionCoordinator {
    ExtractionCoordinator::from_config_files(
        Options::default(),
        &fixture_path("products.json"),
        &fixture_path("soft-category.json"),
    )
}

/// Extracts a fixture page, panicking with the error result on failure.
pub fn extract_fixture(name: &str) -> ExtractionReport {
    match coordinator().extract_file(&fixture_path(name), None) {
        Ok(report) => report,
        Err(err) => panic!("Extraction of {name} failed: {}", err.error),
    }
}
