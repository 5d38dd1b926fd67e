// src/main.rs
// =============================================================================
// This is the entry point of page-inspector.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Install the tracing subscriber
// 3. Build the analyzer from the global options
// 4. Either serve the HTTP API or analyze one URL and print the report
// 5. Exit with a proper code (0 = all links reachable, 1 = inaccessible
//    links found, 2 = error)
// =============================================================================

mod analyzer;
mod cli;
mod logging;
mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use analyzer::{Analyze, AnalysisResult, Analyzer};
use cli::{Cli, Commands};
use server::HttpServer;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let analyzer = Analyzer::new(cli.analyzer_config()).context("Failed to build HTTP client")?;
    let config = analyzer.config();
    info!(
        fetch_timeout = ?config.fetch_timeout,
        probe_timeout = ?config.probe_timeout,
        concurrency = config.probe_concurrency,
        "analyzer configured"
    );

    match cli.command {
        Commands::Serve { listen, static_dir } => {
            HttpServer::new(listen, Arc::new(analyzer))
                .with_static_dir(static_dir)
                .run()
                .await?;
            Ok(0)
        }
        Commands::Analyze { url, json } => handle_analyze(&analyzer, &url, json).await,
    }
}

// Handles the 'analyze' subcommand
async fn handle_analyze(analyzer: &Analyzer, url: &str, json: bool) -> Result<i32> {
    let result = match analyzer.analyze(url).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ Analysis failed ({}): {}", e.status_code(), e);
            return Ok(2);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }

    if result.inaccessible_links.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints the report as a human-readable summary
fn print_report(result: &AnalysisResult) {
    let title = if result.title.is_empty() {
        "(none)"
    } else {
        result.title.as_str()
    };

    println!("📄 Title:        {}", title);
    println!("🏷️  HTML version: {}", result.html_version);
    println!("🔐 Login form:   {}", if result.login_form { "yes" } else { "no" });
    println!();

    println!("{:<8} {:>5}", "HEADING", "COUNT");
    println!("{}", "=".repeat(14));
    for (tag, count) in &result.headings {
        println!("{:<8} {:>5}", tag, count);
    }
    println!();

    print_links("🏠 Internal links", &result.internal_links);
    print_links("🌐 External links", &result.external_links);
    print_links("❌ Inaccessible links", &result.inaccessible_links);

    println!("📊 Summary:");
    println!("   Internal: {}", result.internal_links.len());
    println!("   External: {}", result.external_links.len());
    println!("   Inaccessible: {}", result.inaccessible_links.len());
}

fn print_links(heading: &str, links: &[String]) {
    println!("{} ({})", heading, links.len());
    for link in links {
        // Truncate very long URLs so the list stays readable
        if link.chars().count() > 100 {
            let short: String = link.chars().take(97).collect();
            println!("   {}...", short);
        } else {
            println!("   {}", link);
        }
    }
    println!();
}
