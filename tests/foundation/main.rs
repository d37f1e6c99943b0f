//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: key codecs, predicates, result containers, and errors.

mod errors;
mod keys;
mod matching;
