//! Joinery - Federated queries over composed datasources
//!
//! This crate re-exports all layers of the Joinery system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: joinery_runtime     - YAML configuration, registry loader, REPL + CLI
//! Layer 3: joinery_search      - Search strategies, result merging, background find
//! Layer 2: joinery_compose     - Union, Attach, Overlay, Prefer, Reshape, transforms
//! Layer 1: joinery_sources     - Datasource contract, registry, tables, SQL adapter
//! Layer 0: joinery_foundation  - Core types (Dataset, Schema, QueryPart, keys, Error)
//! ```

pub use joinery_compose as compose;
pub use joinery_foundation as foundation;
pub use joinery_runtime as runtime;
pub use joinery_search as search;
pub use joinery_sources as sources;
