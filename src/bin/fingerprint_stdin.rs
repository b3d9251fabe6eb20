//! Reads HTML from stdin and prints its fingerprint as JSON.
//!
//! `--structural` switches to structural-path keys; `--tree` prints the
//! ASCII content-node outline instead. Logging via `INTELLISCRAPE_LOG`.

use rs_intelliscrape::{ascii_tree, fingerprint_bytes, FingerprintMode, Options};
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

    let mut options = Options::default();
    let mut tree = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--structural" => options.mode = FingerprintMode::StructuralPath,
            "--tree" => tree = true,
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Usage: fingerprint_stdin [--structural] [--tree] < page.html");
                std::process::exit(2);
            }
        }
    }

    let mut bytes = Vec::new();
    if io::stdin().read_to_end(&mut bytes).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    if tree {
        let html = rs_intelliscrape::encoding::decode_html(&bytes);
        println!("{}", ascii_tree(&html, &options));
        return;
    }

    let fp = fingerprint_bytes(&bytes, &options);
    for warning in &fp.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&fp).unwrap_or_default());
}
