//! Fetch historical prices, compute the Relative Strength Index and chart
//! both in the terminal.
//!
//! The pipeline runs in four stages, each returning a [`Result`](error::Result):
//!
//! 1. [`parse_args`] validates the command line into a [`Request`].
//! 2. A [`QuoteProvider`] fetches the raw quote table.
//! 3. [`normalize`] flattens the table and guarantees an adjusted close, and
//!    [`calculate_rsi`] joins the prices with their RSI.
//! 4. A [`Renderer`] displays the [`CombinedSeries`].
//!
//! [`run`] wires stages 2–4 together. [`Sma`] and [`Rsi`] expose
//! [`new`](Rsi::new), [`compute`](Rsi::compute) and [`value`](Rsi::value)
//! as inherent methods, so [`Indicator`] only needs importing for generic
//! code.

mod args;
pub mod chart;
mod error;
mod field;
mod indicator;
mod normalize;
pub mod provider;
mod ring_buffer;
mod rsi;
mod series;
mod sma;
mod table;

use tracing::info;

pub use crate::args::{Interval, Request, parse_args, parse_end_date, parse_start_date, validate};
pub use crate::chart::{ChartView, Renderer, TerminalChart};
pub use crate::error::{Error, Result};
pub use crate::field::{Field, UnknownField};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::normalize::{LONDON_SUFFIX, derive_adj_close, flatten, normalize};
pub use crate::provider::{ProviderError, QuoteProvider};
pub use crate::rsi::{DEFAULT_RSI_PERIOD, Rsi, RsiConfig, RsiConfigBuilder, calculate_rsi};
pub use crate::series::{CombinedPoint, CombinedSeries, Price, PricePoint, PriceSeries, Timestamp};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};
pub use crate::table::{Column, ColumnKey, Quotes, RawTable};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, value: Price) -> Option<$output> {
                <Self as Indicator>::compute(self, value)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Rsi, RsiConfig, Price);

/// Fetches, normalizes, computes the RSI and renders for a validated
/// `request`.
///
/// Nothing is rendered when any earlier stage fails.
///
/// # Errors
///
/// [`Error::Fetch`] when the provider fails, [`Error::NoData`] or
/// [`Error::NoPriceData`] when the quotes are unusable, or whatever the
/// renderer reports.
pub fn run(
    request: &Request,
    provider: &impl QuoteProvider,
    renderer: &impl Renderer,
) -> Result<()> {
    let raw = provider.fetch(request).map_err(|source| Error::Fetch {
        ticker: request.ticker.clone(),
        source,
    })?;
    info!(rows = raw.len(), ticker = %request.ticker, "fetched quotes");

    let quotes = normalize(raw, &request.ticker)?;
    let combined = calculate_rsi(&quotes.price_series(), RsiConfig::default());
    info!(rows = combined.len(), "combined price and RSI");

    renderer.render(&combined, &request.ticker)
}

#[cfg(test)]
mod test_util;
