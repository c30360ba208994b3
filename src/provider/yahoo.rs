//! Yahoo Finance v8 chart endpoint.

use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ProviderError, QuoteProvider};
use crate::{ColumnKey, Field, RawTable, Request, table::Column};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Connection settings for [`YahooProvider`].
///
/// # Example
///
/// ```
/// use rsi_chart::provider::YahooConfig;
/// use std::time::Duration;
///
/// let config = YahooConfig::builder()
///     .timeout(Duration::from_secs(5))
///     .build();
///
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// assert_eq!(config.base_url(), "https://query1.finance.yahoo.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YahooConfig {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl YahooConfig {
    #[must_use]
    pub fn builder() -> YahooConfigBuilder {
        YahooConfigBuilder::new()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`YahooConfig`].
///
/// Defaults: the public Yahoo Finance host, a 30 second request timeout and
/// a browser user agent.
pub struct YahooConfigBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl YahooConfigBuilder {
    fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn build(self) -> YahooConfig {
        YahooConfig {
            base_url: self.base_url,
            timeout: self.timeout,
            user_agent: self.user_agent,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    /// Absent when the range holds no bars.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    open: Option<Column>,
    high: Option<Column>,
    low: Option<Column>,
    close: Option<Column>,
    volume: Option<Column>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    adjclose: Option<Column>,
}

impl ChartResult {
    /// Columns are labelled `(field, symbol)`.
    fn into_table(self, symbol: &str) -> Result<RawTable, ProviderError> {
        let index = self
            .timestamp
            .iter()
            .map(|&ts| {
                DateTime::from_timestamp(ts, 0)
                    .ok_or_else(|| ProviderError::Decode(format!("timestamp out of range: {ts}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns: Vec<(Field, Option<Column>)> = Vec::new();

        if let Some(quote) = self.indicators.quote.into_iter().next() {
            columns.extend([
                (Field::Open, quote.open),
                (Field::High, quote.high),
                (Field::Low, quote.low),
                (Field::Close, quote.close),
                (Field::Volume, quote.volume),
            ]);
        }

        columns.push((
            Field::AdjClose,
            self.indicators
                .adjclose
                .into_iter()
                .next()
                .and_then(|c| c.adjclose),
        ));

        let columns = columns
            .into_iter()
            .filter_map(|(field, values)| values.map(|values| (field, values)))
            .map(|(field, values)| {
                if values.len() == index.len() {
                    Ok((field, values))
                } else {
                    Err(ProviderError::Decode(format!(
                        "{field} has {} values for {} timestamps",
                        values.len(),
                        index.len()
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns
            .into_iter()
            .fold(RawTable::new(index), |table, (field, values)| {
                table.with_column(ColumnKey::nested([field.name(), symbol]), values)
            }))
    }
}

/// [`QuoteProvider`] backed by the Yahoo Finance chart API.
pub struct YahooProvider {
    config: YahooConfig,
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    /// # Errors
    ///
    /// [`ProviderError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: YahooConfig) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{symbol}", self.config.base_url)
    }
}

impl QuoteProvider for YahooProvider {
    fn fetch(&self, request: &Request) -> Result<RawTable, ProviderError> {
        let url = self.chart_url(&request.ticker);
        info!(
            %url,
            start = %request.start,
            end = %request.end,
            interval = %request.interval,
            "fetching quotes"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", request.start.timestamp().to_string()),
                ("period2", request.end.timestamp().to_string()),
                ("interval", request.interval.as_str().to_string()),
                ("includeAdjustedClose", "true".to_string()),
                ("events", "div,splits".to_string()),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;

        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(ProviderError::Status(status.as_u16())),
            Err(e) => return Err(ProviderError::Decode(e.to_string())),
        };

        if let Some(ApiError { code, description }) = parsed.chart.error {
            return Err(ProviderError::Api { code, description });
        }

        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let result = parsed
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ProviderError::Decode("chart has no result".to_string()))?;

        let table = result.into_table(&request.ticker)?;
        debug!(rows = table.len(), "received quotes");

        Ok(table)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn result(json: &str) -> ChartResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builder_trims_trailing_slash() {
        let config = YahooConfig::builder()
            .base_url("http://127.0.0.1:1234/")
            .build();
        assert_eq!(config.base_url(), "http://127.0.0.1:1234");
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(YahooConfig::default().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn columns_are_nested_under_symbol() {
        let table = result(
            r#"{
                "timestamp": [1704205800, 1704292200],
                "indicators": {
                    "quote": [{
                        "open": [187.15, 184.22],
                        "high": [188.44, 185.88],
                        "low": [183.89, 183.43],
                        "close": [185.64, 184.25],
                        "volume": [82488700, 58414500]
                    }],
                    "adjclose": [{ "adjclose": [184.73, 183.35] }]
                }
            }"#,
        )
        .into_table("AAPL")
        .unwrap();

        let keys: Vec<_> = table.columns().map(|(key, _)| key.clone()).collect();
        assert_eq!(keys.len(), 6);
        assert!(keys.iter().all(|k| k.levels()[1] == "AAPL"));
        assert_eq!(keys[3], ColumnKey::nested(["Close", "AAPL"]));
        assert_eq!(keys[5], ColumnKey::nested(["Adj Close", "AAPL"]));
    }

    #[test]
    fn missing_adjclose_block_yields_no_column() {
        let table = result(
            r#"{
                "timestamp": [1704205800],
                "indicators": { "quote": [{ "close": [101.5] }] }
            }"#,
        )
        .into_table("BARC.L")
        .unwrap();

        let names: Vec<_> = table
            .columns()
            .filter_map(|(key, _)| key.first_level().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["Close"]);
    }

    #[test]
    fn null_values_are_missing() {
        let table = result(
            r#"{
                "timestamp": [1704205800, 1704292200],
                "indicators": { "quote": [{ "close": [null, 99.0] }] }
            }"#,
        )
        .into_table("X")
        .unwrap();

        let (_, values) = table.columns().next().unwrap();
        assert_eq!(values, &vec![None, Some(99.0)]);
    }

    #[test]
    fn short_column_is_rejected() {
        let err = result(
            r#"{
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": { "quote": [{ "close": [10.0] }] }
            }"#,
        )
        .into_table("AAPL")
        .unwrap_err();

        match err {
            ProviderError::Decode(message) => {
                assert_eq!(message, "Close has 1 values for 3 timestamps");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn long_adjclose_column_is_rejected() {
        let err = result(
            r#"{
                "timestamp": [1704205800],
                "indicators": {
                    "quote": [{ "close": [10.0] }],
                    "adjclose": [{ "adjclose": [9.5, 9.6] }]
                }
            }"#,
        )
        .into_table("AAPL")
        .unwrap_err();

        assert!(matches!(err, ProviderError::Decode(_)), "{err:?}");
    }

    #[test]
    fn range_without_bars_is_empty() {
        let table = result(r#"{ "indicators": { "quote": [{}] } }"#)
            .into_table("X")
            .unwrap();
        assert!(table.is_empty());
    }
}
