//! Reads HTML from stdin, runs the selectors from a JSON file against it and
//! prints the extracted values as JSON. Failed labels go to stderr.
//!
//! Usage: `extract_stdin <selectors.json> < page.html`

use rs_intelliscrape::{extract_bytes, SelectorMap};
use std::io::{self, Read};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("INTELLISCRAPE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: extract_stdin <selectors.json> < page.html");
        std::process::exit(2);
    };

    let selectors = match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| SelectorMap::from_json_str(&json).map_err(|e| e.to_string()))
    {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Failed to load selectors from {path}: {e}");
            std::process::exit(1);
        }
    };

    let mut bytes = Vec::new();
    if io::stdin().read_to_end(&mut bytes).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let extraction = extract_bytes(&bytes, &selectors);
    for failure in &extraction.failures {
        eprintln!(
            "failed: {} ({}): {}",
            failure.label_path.join("."),
            failure.selector,
            failure.reason
        );
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&extraction.result).unwrap_or_default()
    );
}
