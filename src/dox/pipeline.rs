//! Batch driver: many files in, one resolved document out.
//!
//! All files are lexed and parsed first; a failure in one file is recorded
//! and does not stop the others. The processor passes then run once over
//! the merged raw document. The driver never exits the process; callers
//! read the diagnostics and decide.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::dox::config::DoxConfig;
use crate::dox::diagnostics::Diagnostics;
use crate::dox::parser::parse_text;
use crate::dox::processor::{DocProcessor, ProcDoc};
use crate::dox::raw::entry::RawDoc;

/// Everything a run produces.
pub struct RunResult {
    pub raw: RawDoc,
    pub doc: ProcDoc,
    pub diags: Diagnostics,
}

/// Parse every file into one merged [`RawDoc`]; per-file failures are
/// recorded and skipped.
pub fn parse_files(paths: &[PathBuf], diags: &mut Diagnostics) -> RawDoc {
    let mut merged = RawDoc::new();
    for path in paths {
        let name = path.display().to_string();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                diags.error_at(&name, 0, format!("cannot read file: {}", err));
                continue;
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                // Lex-level failure; this file is dropped, the run goes on.
                diags.error_at(&name, 0, format!("file is not valid UTF-8: {}", err));
                continue;
            }
        };
        match parse_text(&text, &name) {
            Ok(doc) => {
                info!(file = %name, entries = doc.entries.len(), "parsed");
                merged.merge(doc);
            }
            Err(err) => diags.parser_error(&err),
        }
    }
    merged
}

/// Parse and process a batch of annotation files.
pub fn run(paths: &[PathBuf], config: &DoxConfig) -> RunResult {
    let mut diags = Diagnostics::new();
    let raw = parse_files(paths, &mut diags);
    let mut processor = DocProcessor::new(config);
    let doc = processor.run(&raw);
    diags.extend(processor.diags);
    RunResult { raw, doc, diags }
}
