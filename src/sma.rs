use std::{fmt::Display, num::NonZero};

use crate::{Indicator, IndicatorConfig, IndicatorConfigBuilder, Price, ring_buffer::RingBuffer};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use rsi_chart::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::new(NonZero::new(20).unwrap());
/// assert_eq!(config.period(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    period: usize,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn period(&self) -> usize {
        self.period
    }
}

impl SmaConfig {
    /// SMA over the last `period` observations.
    #[must_use]
    pub fn new(period: NonZero<usize>) -> Self {
        Self::builder().period(period).build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({})", self.period)
    }
}

/// Builder for [`SmaConfig`].
///
/// Period must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    period: Option<usize>,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self { period: None }
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn period(mut self, period: NonZero<usize>) -> Self {
        self.period.replace(period.get());
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            period: self.period.expect("period is required"),
        }
    }
}

/// Simple Moving Average (SMA).
///
/// Unweighted mean of the last *n* observations, where *n* is the configured
/// period. Returns `None` until the window is full.
///
/// Keeps a ring buffer and a running sum for O(1) updates. The running sum
/// may pick up rounding drift as values enter and leave; a window holding
/// only zeros always reports exactly `0.0`.
///
/// # Example
///
/// ```rust
/// use rsi_chart::{Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let mut sma = Sma::new(SmaConfig::new(NonZero::new(2).unwrap()));
///
/// assert_eq!(sma.compute(0.5), None);
/// assert_eq!(sma.compute(1.5), Some(1.0));
/// assert_eq!(sma.compute(0.0), Some(0.75));
/// assert_eq!(sma.compute(0.0), Some(0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    window: RingBuffer,
    sum: Price,
    /// Non-zero values currently in the window.
    non_zero: usize,
    period_reciprocal: f64,
    current: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: RingBuffer::new(config.period),
            sum: 0.0,
            non_zero: 0,
            #[allow(clippy::cast_precision_loss)]
            period_reciprocal: 1.0 / config.period as f64,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, value: Price) -> Option<Price> {
        if let Some(old) = self.window.push(value) {
            self.sum -= old;
            if old != 0.0 {
                self.non_zero -= 1;
            }
        }

        self.sum += value;
        if value != 0.0 {
            self.non_zero += 1;
        }

        if self.non_zero == 0 {
            self.sum = 0.0;
        }

        self.current = self
            .window
            .is_full()
            .then(|| self.sum * self.period_reciprocal);

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({})", self.config.period)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, nz};

    fn sma(period: usize) -> Sma {
        Sma::new(SmaConfig::new(nz(period)))
    }

    mod filling {
        use super::*;

        #[test]
        fn none_until_window_full() {
            let mut sma = sma(3);
            assert_eq!(sma.compute(10.0), None);
            assert_eq!(sma.compute(20.0), None);
        }

        #[test]
        fn returns_average_when_full() {
            let mut sma = sma(3);
            sma.compute(10.0);
            sma.compute(20.0);
            assert_eq!(sma.compute(30.0), Some(20.0));
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn drops_oldest_on_advance() {
            let mut sma = sma(2);
            sma.compute(10.0);
            sma.compute(20.0);
            // (20 + 30) / 2 = 25
            assert_eq!(sma.compute(30.0), Some(25.0));
        }

        #[test]
        fn slides_across_many_values() {
            let mut sma = sma(3);
            for v in [1.0, 2.0, 4.0, 8.0] {
                sma.compute(v);
            }
            // window holds 4, 8, 16
            let result = sma.compute(16.0).unwrap();
            assert_approx!(result, 28.0 / 3.0);
        }
    }

    mod zeros {
        use super::*;

        #[test]
        fn all_zero_window_is_exactly_zero() {
            let mut sma = sma(3);
            // Values whose running sum does not cancel exactly in f64
            for v in [0.1, 0.2, 0.7] {
                sma.compute(v);
            }
            sma.compute(0.0);
            sma.compute(0.0);
            assert_eq!(sma.compute(0.0), Some(0.0));
        }

        #[test]
        fn zeros_during_filling_stay_none() {
            let mut sma = sma(2);
            assert_eq!(sma.compute(0.0), None);
            assert_eq!(sma.compute(0.0), Some(0.0));
        }

        #[test]
        fn recovers_after_zero_run() {
            let mut sma = sma(2);
            sma.compute(0.0);
            sma.compute(0.0);
            assert_eq!(sma.compute(4.0), Some(2.0));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(sma(14).to_string(), "SMA(14)");
        }
    }

    mod clone {
        use super::*;

        #[test]
        fn produces_independent_state() {
            let mut sma = sma(3);
            sma.compute(10.0);
            sma.compute(20.0);

            let mut cloned = sma.clone();

            assert_eq!(sma.compute(30.0), Some(20.0));
            assert_eq!(cloned.value(), None);
            assert_eq!(cloned.compute(90.0), Some(40.0));
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        #[should_panic(expected = "period is required")]
        fn panics_without_period() {
            let _ = SmaConfig::builder().build();
        }

        #[test]
        fn display_config() {
            assert_eq!(SmaConfig::new(nz(20)).to_string(), "SmaConfig(20)");
        }

        #[test]
        fn eq_and_hash() {
            let a = SmaConfig::new(nz(20));
            let b = SmaConfig::new(nz(20));
            let c = SmaConfig::new(nz(10));

            let mut set = HashSet::new();
            set.insert(a);

            assert!(set.contains(&b));
            assert!(!set.contains(&c));
        }
    }

    mod value_accessor {
        use super::*;

        #[test]
        fn none_before_convergence() {
            assert_eq!(sma(3).value(), None);
        }

        #[test]
        fn matches_last_compute() {
            let mut sma = sma(2);
            sma.compute(10.0);
            let computed = sma.compute(20.0);
            assert_eq!(sma.value(), computed);
        }
    }
}
