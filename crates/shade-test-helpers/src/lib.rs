//! Test utilities for Shade.
//!
//! Provides an AST builder for constructing unit fixtures without a parser,
//! a deterministic sequential scrambler so tests can assert on generated
//! names, and small extractors for navigating rewritten trees.

pub mod build;
pub mod scramble;

pub use build::{fetch_name, return_value, AstBuilder};
pub use scramble::SequentialScrambler;
