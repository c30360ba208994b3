use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    CombinedPoint, CombinedSeries, Indicator, IndicatorConfig, IndicatorConfigBuilder, Price,
    PriceSeries, Sma, SmaConfig,
};

/// Look-back window used when none is configured.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Configuration for the Relative Strength Index ([`Rsi`]) indicator.
///
/// Gains and losses are averaged with a simple moving average over the last
/// `period` price changes, so the first value appears at observation
/// `period + 1`.
///
/// # Example
///
/// ```
/// use rsi_chart::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// assert_eq!(RsiConfig::default().period(), 14);
///
/// let config = RsiConfig::new(NonZero::new(7).unwrap());
/// assert_eq!(config.period(), 7);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    period: usize,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn period(&self) -> usize {
        self.period
    }
}

impl RsiConfig {
    /// RSI over the last `period` price changes.
    #[must_use]
    pub fn new(period: NonZero<usize>) -> Self {
        Self::builder().period(period).build()
    }
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({})", self.period)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: period = [`DEFAULT_RSI_PERIOD`].
pub struct RsiConfigBuilder {
    period: usize,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            period: DEFAULT_RSI_PERIOD,
        }
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn period(mut self, period: NonZero<usize>) -> Self {
        self.period = period.get();
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        RsiConfig {
            period: self.period,
        }
    }
}

/// Relative Strength Index (RSI) with simple-moving-average smoothing.
///
/// Measures the balance of recent gains and losses on a 0–100 scale:
///
/// ```text
/// avg_gain = SMA(max(Δprice, 0), period)
/// avg_loss = SMA(max(−Δprice, 0), period)
/// RS       = avg_gain / avg_loss
/// RSI      = 100 − 100 / (1 + RS)
/// ```
///
/// The value saturates at 100 when the window holds no losses and is 0 when
/// it holds no gains. A window without any price movement has no defined
/// RSI and yields `None`.
///
/// # Example
///
/// ```
/// use rsi_chart::{Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let mut rsi = Rsi::new(RsiConfig::new(NonZero::new(3).unwrap()));
///
/// // Need 3 price changes (4 prices)
/// assert_eq!(rsi.compute(10.0), None);
/// assert_eq!(rsi.compute(12.0), None);
/// assert_eq!(rsi.compute(11.0), None);
///
/// // changes = +2, −1, +2 → avg_gain = 4/3, avg_loss = 1/3 → RSI = 80
/// assert_eq!(rsi.compute(13.0), Some(80.0));
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    prev_price: Option<Price>,
    avg_gain: Sma,
    avg_loss: Sma,
    current: Option<Price>,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        let window = SmaConfig::new(NonZero::new(config.period()).unwrap_or(NonZero::<usize>::MIN));

        Self {
            config,
            prev_price: None,
            avg_gain: Sma::new(window),
            avg_loss: Sma::new(window),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, price: Price) -> Option<Self::Output> {
        self.current = match self.prev_price.replace(price) {
            Some(prev_price) => {
                let (gain, loss) = Self::gain_and_loss(prev_price, price);
                let avg_gain = self.avg_gain.compute(gain);
                let avg_loss = self.avg_loss.compute(loss);

                avg_gain
                    .zip(avg_loss)
                    .and_then(|(avg_gain, avg_loss)| Self::rsi_from_averages(avg_gain, avg_loss))
            }
            None => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Rsi {
    /// Records a period without a price.
    ///
    /// No change is produced for this period or the next one; the averaging
    /// windows keep their contents and resume with the following change.
    #[inline]
    pub fn skip(&mut self) {
        self.prev_price = None;
        self.current = None;
    }

    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_averages(avg_gain: Price, avg_loss: Price) -> Option<Price> {
        if avg_loss == 0.0 {
            // Unbounded relative strength, or 0/0 when nothing moved
            return (avg_gain > 0.0).then_some(100.0);
        }

        let rs = avg_gain / avg_loss;

        Some((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.config.period)
    }
}

/// Computes the RSI over `series` and joins it with the prices on date.
///
/// Only dates where both the adjusted close and the RSI are defined are
/// kept, which drops the warm-up prefix, periods without a price and
/// periods whose window saw no movement.
#[must_use]
pub fn calculate_rsi(series: &PriceSeries, config: RsiConfig) -> CombinedSeries {
    let mut rsi = Rsi::new(config);

    let points: Vec<CombinedPoint> = series
        .iter()
        .filter_map(|point| match point.price {
            Some(adj_close) => rsi.compute(adj_close).map(|value| CombinedPoint {
                date: point.date,
                adj_close,
                rsi: value,
            }),
            None => {
                rsi.skip();
                None
            }
        })
        .collect();

    debug!(
        input = series.len(),
        output = points.len(),
        %rsi,
        "computed RSI"
    );

    CombinedSeries::new(points)
}
