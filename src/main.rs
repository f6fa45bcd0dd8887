//! Company Scout
//!
//! Command line front end: looks up a company through the completion API and
//! prints the answer as cards.

use company_scout::core::logging::init_logging;
use company_scout::core::render::cards;
use company_scout::core::search::SearchSession;
use company_scout::{CompletionClient, Config};
use std::sync::Arc;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Check for --help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return;
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    if config.api_key.is_empty() {
        warn!(
            "{} is not set; requests will be sent with an empty credential",
            config.api.api_key_env
        );
    }

    let client = match CompletionClient::new(&config.api, config.api_key.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Empty input is passed through as-is
    let subject = args.join(" ");
    let session = SearchSession::new(Arc::new(client));

    let Some(outcome) = session.search(subject).await else {
        print_empty_result();
        std::process::exit(1);
    };

    match outcome.result {
        Ok(content) => {
            for card in cards(&content) {
                match card.title {
                    Some(title) => println!("▌ {}\n  {}\n", title, card.body),
                    None => println!("  {}\n", card.body),
                }
            }
        }
        Err(e) => {
            error!(kind = ?e.kind(), "Lookup for {:?} failed: {}", outcome.subject, e);
            print_empty_result();
            std::process::exit(1);
        }
    }
}

fn print_empty_result() {
    println!("No results.");
}

/// Print help message
fn print_help() {
    println!("Company Scout v0.1.0");
    println!();
    println!("Usage: company-scout [OPTIONS] <COMPANY NAME>...");
    println!();
    println!("Options:");
    println!("  -h, --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  PERPLEXITY_API_KEY - Bearer credential (name configurable via api.api_key_env)");
    println!("  CONFIG_PATH - Path to TOML configuration (default: config.toml)");
    println!("  RUST_LOG - Overrides logging.log_level");
    println!();
    println!("Configuration file:");
    println!("  [api] base_url, model, request_timeout (seconds), api_key_env");
    println!("  [logging] log_level");
}
