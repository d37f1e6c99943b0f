//! Core types for Joinery.
//!
//! This crate provides:
//! - [`Dataset`] - A read-only row with a key, and the map-backed [`Record`]
//! - [`Schema`] - Ordered, unique column names
//! - [`QueryPart`] and [`Predicate`] - Wildcard predicates and their matchers
//! - [`QueryResults`] and [`QueryResultsSet`] - Materialized result lists
//! - Key string codecs (escaped pair lists and plain separators)
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dataset;
pub mod error;
pub mod key;
pub mod query;
pub mod results;
pub mod schema;

pub use dataset::{ColumnNotFound, Dataset, DatasetRef, Lookup, Record};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use key::{KEY_SEPARATOR, decode_component, decode_key, encode_component, encode_key, join_key};
pub use query::{MatchMode, Predicate, QueryPart, most_restrictive};
pub use results::{QueryResults, QueryResultsSet, type_and_key};
pub use schema::{Schema, is_identifier};
