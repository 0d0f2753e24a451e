//! Reads a pricing page from stdin and prints the flexible document as JSON.
//!
//! An optional first argument is used as the page URL for slug derivation.

use std::io::{self, Read};

use rs_pricing_cms::{extract_bytes, Options};

fn main() {
    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let options = Options {
        url: std::env::args().nth(1),
        ..Options::default()
    };

    let document = match extract_bytes(&html, &options) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("Extraction failed: {err}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&document) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Serialization failed: {err}");
            std::process::exit(1);
        }
    }
}
