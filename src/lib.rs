//! # dox
//!
//! A parser and cross-reference resolver for the dox annotation format.
//!
//! Dox annotations are structured `@command` comments describing the entities
//! of a C++ library (classes, concepts, functions, pages, ...). This crate
//! lexes and parses annotation text into a raw document tree, re-emits it in
//! canonical form, and resolves the tree into a queryable, cross-referenced
//! document model for downstream renderers.
//!
//! ## Testing
//!
//! Most modules carry unit tests next to the code; end-to-end behavior lives
//! in the files under `tests/`, built on the helpers from
//! [the testing module](dox::testing).

pub mod dox;
