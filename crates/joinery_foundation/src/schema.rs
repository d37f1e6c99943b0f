//! Ordered column sets owned by datasources.

use std::fmt;

use im::HashSet;

use crate::error::{Error, Result};

/// An ordered sequence of unique column names.
///
/// A schema is fixed when its datasource is constructed. Cloning copies the
/// column list; datasets share their schema through an `Arc`.
#[derive(Clone, Default)]
pub struct Schema {
    columns: Vec<String>,
    index: HashSet<String>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema for `datasource` from `columns`.
    ///
    /// # Errors
    ///
    /// Returns a schema collision error if a column appears twice.
    pub fn from_columns<I, S>(datasource: &str, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::new();
        for column in columns {
            schema.push(datasource, column)?;
        }
        Ok(schema)
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns a schema collision error if the column already exists.
    pub fn push(&mut self, datasource: &str, column: impl Into<String>) -> Result<()> {
        let column = column.into();
        if self.index.insert(column.clone()).is_some() {
            return Err(Error::schema_collision(datasource, column));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Appends a column unless it is already present.
    pub fn push_unique(&mut self, column: impl Into<String>) {
        let column = column.into();
        if self.index.insert(column.clone()).is_none() {
            self.columns.push(column);
        }
    }

    /// Returns true if the column is part of this schema.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.index.contains(column)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the columns in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns an iterator over the columns in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns the position of a column.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        if !self.contains(column) {
            return None;
        }
        self.columns.iter().position(|c| c == column)
    }

    /// Columns of `self` that `other` lacks, in `self`'s order.
    #[must_use]
    pub fn difference(&self, other: &Schema) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !other.contains(c))
            .cloned()
            .collect()
    }

    /// Returns true if both schemas hold the same columns, ignoring order.
    #[must_use]
    pub fn is_set_equal(&self, other: &Schema) -> bool {
        self.index == other.index
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for Schema {}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Returns true if `name` is a plain identifier (`[A-Za-z_][A-Za-z_0-9]*`).
///
/// Static tables and reshaped schemas only accept such column names.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
