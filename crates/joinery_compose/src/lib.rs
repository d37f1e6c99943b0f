//! Composition operators for Joinery.
//!
//! This crate provides:
//! - [`UnionDatasource`] - Concatenation of two sources with equal schemas
//! - [`AttachDatasource`] - Left join adding one matching row under prefixed columns
//! - [`OverlayDatasource`] - Column-wise merge where one side wins
//! - [`PreferDatasource`] - Key-wise replacement of base rows by preferred rows
//! - [`ReshapeDatasource`] - Drop, add and rename columns of a source
//! - [`ColumnTransformer`] - Computed pseudo-columns, lazily evaluated
//!
//! Every operator is built from a configuration record and a
//! [`DatasourceRegistry`](joinery_sources::DatasourceRegistry) holding the
//! sources it references.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod join;

pub mod attach;
pub mod overlay;
pub mod prefer;
pub mod reshape;
pub mod transform;
pub mod union;

pub use attach::{ATTACH_SEPARATOR, AttachConfig, AttachDatasource, AttachedDataset};
pub use overlay::{OverlaidDataset, OverlayConfig, OverlayDatasource, OverlayMode};
pub use prefer::{PreferConfig, PreferDatasource};
pub use reshape::{ReshapeConfig, ReshapeDatasource, ReshapedDataset};
pub use transform::{
    ColumnFunction, ColumnTransformer, TransformedDataset, TransformedDatasource, Values,
};
pub use union::{UnionConfig, UnionDatasource};
