//! The raw document model.
//!
//! Raw entries are the direct representation of parsed annotation blocks,
//! before clause interpretation and cross-linking. The model is pure data
//! plus one operation: formatting an entry back to canonical annotation
//! text via [formatter::DoxFormatter]. Formatted output re-parses to a
//! structurally equal document for any wrapping width.

pub mod body;
pub mod entry;
pub mod formatter;
pub mod text;

pub use body::{BodyNode, RawBody};
pub use entry::{
    EntryKind, InOut, RawClass, RawCodeEntry, RawConcept, RawDoc, RawEntry, RawFunction, RawMacro,
    RawMetafunction, RawPage, RawParam, RawReturn, RawTParam, RawTag, RawThrow, RawVariable,
};
pub use formatter::DoxFormatter;
pub use text::RawText;
