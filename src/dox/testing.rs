//! Shared helpers for the crate's tests.
//!
//! Tests parse small annotation snippets all the time; these helpers keep
//! them to one line each. They panic on parse errors, which is exactly the
//! failure report a test wants.

use crate::dox::config::DoxConfig;
use crate::dox::diagnostics::Diagnostics;
use crate::dox::parser::parse_text;
use crate::dox::processor::{DocProcessor, ProcDoc};
use crate::dox::raw::entry::RawDoc;

/// Parse one snippet into a raw document; panics on parse errors.
pub fn parse(source: &str) -> RawDoc {
    match parse_text(source, "<test>") {
        Ok(doc) => doc,
        Err(err) => panic!("test input failed to parse: {}", err),
    }
}

/// Parse and process one snippet with the default configuration.
pub fn process(source: &str) -> (ProcDoc, Diagnostics) {
    process_with_config(source, &DoxConfig::default())
}

/// Parse and process one snippet with a caller-provided configuration.
pub fn process_with_config(source: &str, config: &DoxConfig) -> (ProcDoc, Diagnostics) {
    let raw = parse(source);
    let mut processor = DocProcessor::new(config);
    let doc = processor.run(&raw);
    (doc, processor.diags)
}

/// Format a snippet back to canonical dox text at the given width.
pub fn reformat(source: &str, width: usize) -> String {
    parse(source).get_formatted(width)
}
