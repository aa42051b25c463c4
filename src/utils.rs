use chrono::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading the readings, building the chart, and writing it out.
#[derive(Debug, Error)]
pub enum PondError {
    #[error("could not find csv file {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("could not parse csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column {0}")]
    MissingColumn(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid date {0}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("window of {0} days is out of the supported date range")]
    InvalidWindow(i64),
    #[error("could not serialize figure: {0}")]
    Json(#[from] serde_json::Error),
}

/// Start and end of the default visible window,
/// the last `days` days up to and including `today`.
pub fn default_window(today: NaiveDate, days: i64) -> Result<(NaiveDate, NaiveDate), PondError> {
    let then = chrono::TimeDelta::try_days(days)
        .and_then(|d| today.checked_sub_signed(d))
        .ok_or(PondError::InvalidWindow(days))?;
    Ok((then, today))
}

/// Parse a date given as YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate, PondError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PondError::InvalidDate(s.to_owned()))
}

/// Parse a numeric cell.
/// Empty and unparsable cells become NAN so that they show as gaps in the line.
pub fn parse_cell(cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return f64::NAN;
    }
    match cell.parse::<f64>() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("could not parse value {:?}, set to NAN: {}", cell, e);
            f64::NAN
        }
    }
}

/// Minimal escaping for text placed into the page html.
/// Only the layout strings of the page go through it, never user input or csv cells.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Open the url with the default web browser, best effort.
pub fn open_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    std::process::Command::new("cmd")
        .args(["/C", "start", url])
        .spawn()?;
    #[cfg(target_os = "macos")]
    std::process::Command::new("open").arg(url).spawn()?;
    #[cfg(all(unix, not(target_os = "macos")))]
    std::process::Command::new("xdg-open").arg(url).spawn()?;
    Ok(())
}

/// Logging to stderr, `info` by default or `debug` when verbose.
/// RUST_LOG overrides both.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
