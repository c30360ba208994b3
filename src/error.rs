//! Crate error type.
//!
//! Display strings are the single-line messages shown to the user before
//! the process exits.

use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum Error {
    /// `--help` or `--version` was requested; carries the rendered text.
    #[error("{0}")]
    Help(String),

    #[error("Please provide the ticker, start date, end date, and interval.")]
    MissingArguments,

    #[error("Start date must be in the format YYYY-MM-DD.")]
    InvalidStartDate,

    #[error("End date must be in the format YYYY-MM-DD or 'now'.")]
    InvalidEndDate,

    #[error("Start date must be before the end date.")]
    StartNotBeforeEnd,

    #[error("Interval must be '1d' or '1wk'.")]
    InvalidInterval,

    #[error("Could not fetch data for {ticker}: {source}")]
    Fetch {
        ticker: String,
        #[source]
        source: ProviderError,
    },

    #[error("No data was returned.")]
    NoData,

    #[error("No valid 'Adj Close' or 'Close' data available.")]
    NoPriceData,

    #[error("Could not display chart: {0}")]
    Render(#[from] std::io::Error),
}

impl Error {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Help(_) => 0,
            _ => 1,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
