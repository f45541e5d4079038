//! Parser for `@signature` bodies.
//!
//! Signatures look like C++ declarations but follow a small declarative
//! grammar of their own: template headers, bare `class`/`struct`/`concept`/
//! `enum` declarations, functions, metafunctions (`Name<T>::Result`), and
//! variables (`Type name;`). The parser is an independent recursive descent
//! over its own token vocabulary; failure is never fatal to the owning
//! entry, the signature is simply left out of the index.

#[allow(clippy::module_inception)]
pub mod parser;
pub mod tokens;

pub use parser::{parse, SigEntry, SigKind, SigParam, SigParser, SigTParam, TParamKind};
pub use tokens::{SigParseError, SigToken, SigTokenKind};
