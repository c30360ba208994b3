#![allow(dead_code)]

use chrono::NaiveDate;
use rsi_chart::{Price, PricePoint, PriceSeries};
use serde::{Deserialize, de::DeserializeOwned};

/// Daily close parsed from the fixture CSV. Empty cells are missing closes.
#[derive(Debug, Clone, Deserialize)]
pub struct RefClose {
    pub date: NaiveDate,
    pub close: Option<Price>,
}

/// Expected indicator value for a date.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub date: NaiveDate,
    pub expected: f64,
}

const CLOSES_PATH: &str = "tests/fixtures/data/aapl-1d.csv";

/// Load the reference daily closes.
pub fn load_reference_closes() -> Vec<RefClose> {
    load_records(CLOSES_PATH, "invalid close record")
}

/// Load single-value reference data.
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Build a series dated at midnight UTC.
pub fn price_series(closes: &[RefClose]) -> PriceSeries {
    PriceSeries::from_points(
        closes
            .iter()
            .map(|c| PricePoint::new(c.date.and_hms_opt(0, 0, 0).unwrap().and_utc(), c.close)),
    )
}

/// Same series with the missing closes removed.
pub fn without_gaps(closes: &[RefClose]) -> PriceSeries {
    let kept: Vec<_> = closes.iter().filter(|c| c.close.is_some()).cloned().collect();
    price_series(&kept)
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
