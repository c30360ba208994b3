// src/test_util.rs

use crate::{PricePoint, PriceSeries, Timestamp};
use chrono::{Duration, TimeZone, Utc};
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() < e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

/// Midnight UTC on day `n` counted from 2024-01-01.
pub fn day(n: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// Daily series with one close per day starting at [`day(0)`](day).
pub fn daily(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_points(
        closes
            .iter()
            .zip(0..)
            .map(|(&close, n)| PricePoint::new(day(n), Some(close))),
    )
}

/// Closes alternating `+1, -1, +1, ...` from 100.
pub fn alternating(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
        .collect()
}
