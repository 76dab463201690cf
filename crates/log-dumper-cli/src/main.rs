mod cli;
mod logging;
mod request;
mod settings;

use anyhow::Result;
use clap::Parser;
use date_window::{resolve, resolve_now, RawArgument};

use crate::cli::Cli;
use crate::request::SearchRequest;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose)?;
    log::debug!("Received arguments: {:?}", cli);

    let config = settings::load(cli.config.as_deref())?;
    let config = settings::apply_overrides(config, &cli)?;

    let raw = RawArgument::from(cli.date.clone());
    let window = match cli.now {
        Some(now) => resolve(&raw, &config, now)?,
        None => resolve_now(&raw, &config)?,
    };

    let request = SearchRequest::new(&cli, &window);
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
