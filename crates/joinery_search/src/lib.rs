//! Free-text search for Joinery.
//!
//! This crate provides:
//! - [`SearchStrategy`] - Word-count indexed query templates and their resolution
//! - [`search`] - Runs a free-text query against a registry and merges results
//! - [`spawn_find`] - One `find` on the tokio blocking pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod background;
pub mod search;
pub mod strategy;

pub use background::spawn_find;
pub use search::{execute, merge, search};
pub use strategy::{Query, SearchStrategy, normalize_word, split_words};
