//! Command-line input validation.
//!
//! `clap` collects the four positional arguments as raw strings; the checks
//! below turn them into a [`Request`] or the matching argument [`Error`].

use std::{ffi::OsString, fmt::Display, str::FromStr};

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, error::ErrorKind};
use tracing::debug;

use crate::{Error, Timestamp, error::Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(
    name = "rsi-chart",
    version,
    about = "Chart a ticker's adjusted close price and its 14-period RSI"
)]
struct Cli {
    /// Ticker symbol, e.g. AAPL or BARC.L
    ticker: String,

    /// First date, YYYY-MM-DD
    start: String,

    /// End date (exclusive), YYYY-MM-DD or `now`
    end: String,

    /// Bar interval: 1d or 1wk
    interval: String,
}

/// Bar granularity supported by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Daily,
    Weekly,
}

impl Interval {
    /// The literal accepted on the command line and sent to the provider.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1d" => Ok(Self::Daily),
            "1wk" => Ok(Self::Weekly),
            _ => Err(Error::InvalidInterval),
        }
    }
}

/// A validated chart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Passed through to the provider untouched.
    pub ticker: String,
    pub start: Timestamp,
    /// Exclusive.
    pub end: Timestamp,
    pub interval: Interval,
}

/// Parses the process arguments (program name first) into a [`Request`].
///
/// # Errors
///
/// [`Error::MissingArguments`] unless exactly four positional arguments are
/// given, [`Error::Help`] for `--help`/`--version`, or any error of
/// [`validate`].
pub fn parse_args<I, T>(args: I) -> Result<Request>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            Error::Help(err.render().to_string())
        }
        _ => Error::MissingArguments,
    })?;

    validate(&cli.ticker, &cli.start, &cli.end, &cli.interval)
}

/// Validates the four raw inputs, checking start date, end date, their
/// order and then the interval.
///
/// # Errors
///
/// The argument [`Error`] for the first failing check.
pub fn validate(ticker: &str, start: &str, end: &str, interval: &str) -> Result<Request> {
    let start = parse_start_date(start)?;
    let end = parse_end_date(end)?;

    if start >= end {
        return Err(Error::StartNotBeforeEnd);
    }

    let interval = interval.parse()?;

    let request = Request {
        ticker: ticker.to_string(),
        start,
        end,
        interval,
    };
    debug!(?request, "validated arguments");

    Ok(request)
}

/// Parses `YYYY-MM-DD` as midnight UTC.
///
/// # Errors
///
/// [`Error::InvalidStartDate`] when `raw` is not a calendar date.
pub fn parse_start_date(raw: &str) -> Result<Timestamp> {
    parse_date(raw).ok_or(Error::InvalidStartDate)
}

/// Parses `now` (any case) as the current time, otherwise `YYYY-MM-DD` as
/// midnight UTC.
///
/// # Errors
///
/// [`Error::InvalidEndDate`] when `raw` is neither.
pub fn parse_end_date(raw: &str) -> Result<Timestamp> {
    if raw.eq_ignore_ascii_case("now") {
        return Ok(Utc::now());
    }

    parse_date(raw).ok_or(Error::InvalidEndDate)
}

fn parse_date(raw: &str) -> Option<Timestamp> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
