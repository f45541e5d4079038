//! The dox annotation toolchain.
//!
//! The pipeline runs in stages, leaves first:
//!
//! 1. [lexer] splits annotation text into a flat token stream. Lexing is
//!    total: every byte of well-formed UTF-8 input ends up in some token.
//! 2. [parser] drives a stack-of-states machine over the token stream and
//!    builds a [raw::RawDoc] of typed entries with clause sub-trees.
//! 3. [raw] is the raw document model plus the width-parameterized
//!    formatter that re-emits canonical annotation text.
//! 4. [sig] is the companion mini-parser for `@signature` bodies.
//! 5. [processor] merges and resolves raw entries into a [processor::ProcDoc]:
//!    name registries, link checks, inheritance closures, validation.
//!
//! [pipeline] wires the stages together for batch runs over many files and
//! [config] supplies the project-level settings (include directories,
//! expected HTML tags).

pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod processor;
pub mod raw;
pub mod sig;
pub mod testing;
