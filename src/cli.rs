use clap::{Args, Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Parser)]
#[command(name = "pdf-split")]
#[command(about = "Split a PDF into page ranges using a remote split service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output directory for split results
    #[arg(short, long, global = true, default_value = "./output")]
    pub output: PathBuf,

    /// Base URL of the split service
    #[arg(
        long,
        global = true,
        env = "PDF_SPLIT_SERVICE_URL",
        default_value = "http://localhost:8000"
    )]
    pub service_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "120")]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a PDF to the split service and save the result
    Split(SplitArgs),

    /// Validate page ranges without contacting the service
    Check(CheckArgs),

    /// Check that the split service is reachable
    Health,
}

#[derive(Args)]
pub struct SplitArgs {
    /// PDF file to split
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Page range: "3-7", "3" (single page), "3-" (start only) or "-7" (start follows the previous range)
    #[arg(
        short,
        long = "range",
        required = true,
        value_name = "RANGE",
        allow_hyphen_values = true,
        value_parser = parse_range_token
    )]
    pub ranges: Vec<RangeToken>,

    /// Merge all ranges into one PDF
    #[arg(long)]
    pub merge: bool,

    /// Write a JSON report next to the result
    #[arg(long)]
    pub report: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// PDF file the ranges apply to
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Page range, same forms as for `split`
    #[arg(
        short,
        long = "range",
        required = true,
        value_name = "RANGE",
        allow_hyphen_values = true,
        value_parser = parse_range_token
    )]
    pub ranges: Vec<RangeToken>,
}

/// Raw start/end strings from one `--range` argument; `None` leaves the
/// field as the range model set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeToken {
    pub start: Option<String>,
    pub end: Option<String>,
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]*)(-([0-9]*))?$").unwrap())
}

pub fn parse_range_token(value: &str) -> Result<RangeToken, String> {
    let value = value.trim();
    let caps = range_pattern()
        .captures(value)
        .filter(|_| !value.is_empty() && value != "-")
        .ok_or_else(|| format!("invalid range '{}', expected START-END", value))?;

    let non_empty = |idx: usize| {
        caps.get(idx)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let start = non_empty(1);
    // a bare page number selects that single page
    let end = match caps.get(2) {
        Some(_) => non_empty(3),
        None => start.clone(),
    };

    Ok(RangeToken { start, end })
}
