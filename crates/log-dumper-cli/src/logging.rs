use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "log-dumper.log";

/// Warnings (debug with `verbose`) go to stderr; everything from debug up is
/// written to `<cache_dir>/log-dumper/log-dumper.log`. If the log file cannot
/// be created, only the terminal logger is installed.
pub fn setup_logging(verbose: bool) -> Result<()> {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let file_error = match log_file() {
        Ok(file) => {
            loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
            None
        }
        Err(err) => Some(err),
    };

    CombinedLogger::init(loggers)?;
    if let Some(err) = file_error {
        log::warn!("Logging to terminal only: {err:#}");
    }
    Ok(())
}

fn log_file() -> Result<File> {
    let mut path = get_app_cache_path()?;
    path.push(LOG_FILE);
    Ok(File::create(path)?)
}

fn get_app_cache_path() -> Result<PathBuf> {
    let mut path = dirs::cache_dir().ok_or_else(|| anyhow!("failed to find os cache dir."))?;
    path.push("log-dumper");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}
