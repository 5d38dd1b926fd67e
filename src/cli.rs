// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - serve: run the HTTP API (POST /analyze)
// - analyze: analyze one URL and print the report
//
// The analyzer options are global, so they work with both subcommands, and
// every one of them can also come from an environment variable.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use crate::analyzer::{
    AnalyzerConfig, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_PROBE_CONCURRENCY,
    DEFAULT_PROBE_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(
    name = "page-inspector",
    version,
    about = "Analyze a web page: title, headings, HTML version, links and login forms",
    long_about = "page-inspector fetches a single web page, reports its title, heading counts \
                  and HTML version, splits its links into internal and external ones, checks \
                  every link for reachability and guesses whether the page has a login form."
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Timeout in seconds for fetching the analyzed page
    #[arg(
        long,
        global = true,
        env = "PAGE_INSPECTOR_TIMEOUT",
        default_value_t = DEFAULT_FETCH_TIMEOUT_SECS
    )]
    pub timeout: u64,

    /// Timeout in seconds for each link reachability probe
    #[arg(
        long,
        global = true,
        env = "PAGE_INSPECTOR_PROBE_TIMEOUT",
        default_value_t = DEFAULT_PROBE_TIMEOUT_SECS
    )]
    pub probe_timeout: u64,

    /// Maximum number of link probes in flight at once
    #[arg(
        long,
        global = true,
        env = "PAGE_INSPECTOR_CONCURRENCY",
        default_value_t = DEFAULT_PROBE_CONCURRENCY
    )]
    pub concurrency: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    ///
    /// Example: page-inspector serve --listen 127.0.0.1:8080
    Serve {
        /// Address to listen on
        #[arg(long, env = "PAGE_INSPECTOR_LISTEN", default_value = "0.0.0.0:8080")]
        listen: String,

        /// Directory of static files (e.g. a web UI) served for unknown paths
        #[arg(long, env = "PAGE_INSPECTOR_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Analyze one page and print the report
    ///
    /// Example: page-inspector analyze https://example.com --json
    Analyze {
        /// Absolute http(s) URL of the page
        url: String,

        /// Output the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Analyzer settings derived from the global options
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            fetch_timeout: Duration::from_secs(self.timeout),
            probe_timeout: Duration::from_secs(self.probe_timeout),
            probe_concurrency: self.concurrency,
            ..AnalyzerConfig::default()
        }
    }
}
