//! Configuration, REPL, and CLI for Joinery.
//!
//! This crate provides:
//! - [`Config`] - The YAML configuration document
//! - [`build_registry`] and [`build_registry_lenient`] - Datasource construction
//! - [`Session`] - A loaded registry plus its search strategy
//! - [`Repl`] - Interactive query loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod loader;
pub mod repl;
pub mod session;

pub use config::{Config, SourceConfig};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use loader::{build_registry, build_registry_lenient, build_source};
pub use repl::Repl;
pub use session::Session;
