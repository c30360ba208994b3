use std::process::ExitCode;

use rsi_chart::{
    Error, TerminalChart, parse_args,
    provider::{YahooConfig, YahooProvider},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Help(text)) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "exiting with failure");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn try_main() -> rsi_chart::Result<()> {
    let request = parse_args(std::env::args_os())?;

    let provider =
        YahooProvider::new(YahooConfig::default()).map_err(|source| Error::Fetch {
            ticker: request.ticker.clone(),
            source,
        })?;

    rsi_chart::run(&request, &provider, &TerminalChart::new())
}
