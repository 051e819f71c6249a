// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! softnav CLI
//!
//! Example usage and demonstration of the softnav library.

use std::env;
use std::process::ExitCode;

use softnav::nav::{NavConfig, NavController};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("softnav=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "open" => {
            if args.len() < 3 {
                eprintln!("Usage: softnav open <url>");
                return ExitCode::from(1);
            }
            open_page(&args[2]).await
        }
        "nav" => {
            if args.len() < 4 {
                eprintln!("Usage: softnav nav <url> <target> [selector...]");
                return ExitCode::from(1);
            }
            soft_navigate(&args[2], &args[3], &args[4..]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("softnav {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

// the quoted selector example contains `"#`, so wider raw delimiters
const USAGE: &str = r##"softnav - Soft Page Navigation over a Headless DOM

USAGE:
    softnav <COMMAND> [OPTIONS]

COMMANDS:
    open <url>                       Open a URL and display page information
    nav <url> <target> [selector..]  Open <url>, then soft-navigate to
                                     <target>, replacing the given selectors
    help                             Show this help message
    version                          Show version information

EXAMPLES:
    softnav open https://example.com
    softnav nav https://example.com https://example.com/about "#content"
"##;

fn print_usage() {
    println!("{}", USAGE);
}

async fn open_page(url: &str) -> ExitCode {
    println!("Opening: {}", url);

    let ctrl = match NavController::open(url, NavConfig::new()).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to open page: {}", e);
            return ExitCode::from(1);
        }
    };

    println!("\n=== Page ===");
    println!("URL: {}", ctrl.url().unwrap_or_default());
    println!("Title: {}", ctrl.title());

    let links = ctrl.document().links();
    if !links.is_empty() {
        println!("\n=== Links ({}) ===", links.len());
        for link in links.iter().take(10) {
            println!("  - {}", link.href().unwrap_or_default());
        }
        if links.len() > 10 {
            println!("  ... and {} more", links.len() - 10);
        }
    }

    ExitCode::SUCCESS
}

async fn soft_navigate(url: &str, target: &str, selectors: &[String]) -> ExitCode {
    println!("Opening: {}", url);

    let mut config = NavConfig::new();
    for selector in selectors {
        config = config.link_id(selector);
    }

    let ctrl = match NavController::open(url, config).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to open page: {}", e);
            return ExitCode::from(1);
        }
    };

    println!("Navigating: {}", target);
    match ctrl.load_page(target, true).await {
        Ok(status) => {
            println!("\n=== Navigation ===");
            println!("Status: {}", status);
            println!("URL: {}", ctrl.url().unwrap_or_default());
            println!("Title: {}", ctrl.title());
            println!("History: {:?}", ctrl.history_entries());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Navigation failed: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::USAGE;

    #[test]
    fn test_usage_keeps_quoted_selector_example() {
        assert!(USAGE.contains("\"#content\""));
        assert!(USAGE.contains("softnav nav"));
    }
}
