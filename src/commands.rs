//! CLI argument definitions
//!
//! Defines the clap arguments for the mock runner.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// List the available collections and exit
    #[arg(long)]
    pub list: bool,

    /// Comma separated collection keys to run, e.g. --collection api,donki
    /// (default: all collections)
    #[arg(long, value_name = "KEYS", num_args = 0..=1, default_missing_value = "")]
    pub collection: Option<String>,

    /// Keep running the remaining collections after one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Fixture server port (overrides MOCK_PORT and the config file)
    #[arg(long)]
    pub port: Option<u16>,

    /// Project root holding postman/ and reports/
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (default: platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only start the fixture server and keep it running until Ctrl+C
    #[arg(long, conflicts_with_all = ["list", "collection", "keep_going"])]
    pub serve: bool,
}
