//! Market-data providers.
//!
//! A provider performs the I/O only: it returns the quote table exactly as
//! the remote service shaped it. Flattening and adjusted-close derivation
//! happen in [`normalize`](crate::normalize()).

mod yahoo;

pub use yahoo::{YahooConfig, YahooConfigBuilder, YahooProvider};

use thiserror::Error;

use crate::{RawTable, Request};

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection failure, timeout or unreadable body.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with an error payload, e.g. for an unknown
    /// symbol.
    #[error("{code}: {description}")]
    Api { code: String, description: String },

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Source of historical quotes.
#[cfg_attr(test, mockall::automock)]
pub trait QuoteProvider {
    /// Fetches quotes for `request.ticker` over `[request.start, request.end)`
    /// at `request.interval`.
    ///
    /// # Errors
    ///
    /// [`ProviderError`] when the quotes cannot be retrieved.
    fn fetch(&self, request: &Request) -> Result<RawTable, ProviderError>;
}
