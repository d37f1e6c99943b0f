//! The YAML configuration document.

use std::fs;
use std::path::{Path, PathBuf};

use joinery_compose::{AttachConfig, OverlayConfig, PreferConfig, ReshapeConfig, UnionConfig};
use joinery_foundation::{Error, ErrorContext, Result};
use joinery_search::SearchStrategy;
use joinery_sources::{SqlConfig, TableConfig};
use serde::Deserialize;

/// A whole configuration file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Datasource definitions, built in this order.
    #[serde(default)]
    pub datasources: Vec<SourceConfig>,
    /// Templates used for free-text searches.
    #[serde(default)]
    pub search: SearchStrategy,
}

impl Config {
    /// Parses a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first syntax or shape
    /// problem.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let context = ErrorContext::new().with_source(path.display().to_string());
        let text = fs::read_to_string(path).map_err(|e| Error::from(e).with_context(context.clone()))?;
        Self::from_yaml(&text).map_err(|e| e.with_context(context))
    }
}

/// One datasource definition, tagged by `type`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Rows listed in the configuration.
    Table(TableConfig),
    /// A table of an SQLite database.
    Sql(SqlSourceConfig),
    /// Two sources with equal schemas, concatenated.
    Union(UnionConfig),
    /// A source with one matching row of another attached.
    Attach(AttachConfig),
    /// Two sources merged column by column.
    Overlay(OverlayConfig),
    /// A base source whose rows are replaced by preferred ones.
    Prefer(PreferConfig),
    /// A source with dropped, added or renamed columns.
    Reshape(ReshapeConfig),
}

impl SourceConfig {
    /// The name the datasource is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Table(c) => &c.name,
            Self::Sql(c) => &c.sql.name,
            Self::Union(c) => &c.name,
            Self::Attach(c) => &c.name,
            Self::Overlay(c) => &c.name,
            Self::Prefer(c) => &c.name,
            Self::Reshape(c) => &c.name,
        }
    }

    /// The `type` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Sql(_) => "sql",
            Self::Union(_) => "union",
            Self::Attach(_) => "attach",
            Self::Overlay(_) => "overlay",
            Self::Prefer(_) => "prefer",
            Self::Reshape(_) => "reshape",
        }
    }
}

/// An SQL datasource together with the database it reads.
#[derive(Clone, Debug, Deserialize)]
pub struct SqlSourceConfig {
    /// SQLite database file, relative to the configuration file.
    pub database: PathBuf,
    /// Table, dialect, schema and key.
    #[serde(flatten)]
    pub sql: SqlConfig,
}
