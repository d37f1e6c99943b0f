//! Error types for the Joinery system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Errors come in two tiers. Configuration errors are raised once, while a
//! datasource is being constructed, and reject the whole datasource.
//! Operational errors (connection or statement failures) are raised by the
//! backends but are logged and degraded by the datasources that call them;
//! they never escape a query.

use std::fmt;

use thiserror::Error;

/// The main error type for Joinery operations.
///
/// Displays the kind, followed by the context on the next lines when one
/// is attached.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context.as_ref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the configuration file, keeping any context already present.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_source(source));
        self
    }

    /// Creates a missing datasource reference error.
    #[must_use]
    pub fn missing_source(datasource: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingSource {
            datasource: datasource.into(),
            referenced: referenced.into(),
        })
    }

    /// Creates a schema collision error.
    #[must_use]
    pub fn schema_collision(datasource: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaCollision {
            datasource: datasource.into(),
            column: column.into(),
        })
    }

    /// Creates a column-not-in-schema error.
    #[must_use]
    pub fn column_not_in_schema(datasource: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(ErrorKind::ColumnNotInSchema {
            datasource: datasource.into(),
            column: column.into(),
        })
    }

    /// Creates a missing MATCH specification error.
    #[must_use]
    pub fn missing_match(datasource: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingMatch(datasource.into()))
    }

    /// Creates an empty schema error.
    #[must_use]
    pub fn empty_schema(datasource: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptySchema(datasource.into()))
    }

    /// Creates a missing key specification error.
    #[must_use]
    pub fn missing_key(datasource: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingKey(datasource.into()))
    }

    /// Creates a configuration parse error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Creates a connection failure error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection(message.into()))
    }

    /// Creates a statement failure error.
    #[must_use]
    pub fn statement(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Statement(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this error rejects a datasource definition.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::Connection(_)
                | ErrorKind::Statement(_)
                | ErrorKind::Io(_)
                | ErrorKind::Internal(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err.to_string()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A datasource references a source that is missing or failed to build.
    #[error("datasource \"{datasource}\": referenced datasource \"{referenced}\" is missing or defined incorrectly")]
    MissingSource {
        /// The datasource being constructed.
        datasource: String,
        /// The name it referenced.
        referenced: String,
    },

    /// Deriving a schema produced the same column twice.
    #[error("datasource \"{datasource}\": column \"{column}\" collides with an existing column")]
    SchemaCollision {
        /// The datasource being constructed.
        datasource: String,
        /// The colliding column name.
        column: String,
    },

    /// Two sources that must have set-equal schemas do not.
    #[error(
        "datasource \"{datasource}\": columns {missing_in_first:?} are missing in \"{first}\" and columns {missing_in_second:?} are missing in \"{second}\""
    )]
    SchemaMismatch {
        /// The datasource being constructed.
        datasource: String,
        /// Name of the first source.
        first: String,
        /// Name of the second source.
        second: String,
        /// Columns of the second source absent from the first.
        missing_in_first: Vec<String>,
        /// Columns of the first source absent from the second.
        missing_in_second: Vec<String>,
    },

    /// No MATCH column pairs were given.
    #[error("datasource \"{0}\": at least one MATCH specification is required")]
    MissingMatch(String),

    /// A referenced column is not part of a schema.
    #[error("datasource \"{datasource}\": column \"{column}\" is not defined in schema")]
    ColumnNotInSchema {
        /// The datasource being constructed.
        datasource: String,
        /// The unknown column.
        column: String,
    },

    /// A datasource would have no columns.
    #[error("datasource \"{0}\": schema is empty")]
    EmptySchema(String),

    /// No key columns were given or could be discovered.
    #[error("datasource \"{0}\": no key columns defined")]
    MissingKey(String),

    /// The same key column was listed twice.
    #[error("datasource \"{datasource}\": key column \"{column}\" was specified twice")]
    DuplicateKeyColumn {
        /// The datasource being constructed.
        datasource: String,
        /// The repeated column.
        column: String,
    },

    /// A column name does not follow identifier syntax.
    #[error("datasource \"{datasource}\": \"{column}\" is not a valid column name")]
    InvalidColumnName {
        /// The datasource being constructed.
        datasource: String,
        /// The rejected name.
        column: String,
    },

    /// An overlay MODE token is not one of the accepted spellings.
    #[error("datasource \"{datasource}\": MODE \"{mode}\" is not allowed")]
    InvalidMode {
        /// The datasource being constructed.
        datasource: String,
        /// The rejected mode token.
        mode: String,
    },

    /// An SQL dialect name is not supported.
    #[error("SQL dialect \"{0}\" is not supported")]
    UnsupportedDialect(String),

    /// A static row definition is malformed.
    #[error("datasource \"{datasource}\": {message}")]
    InvalidRow {
        /// The datasource being constructed.
        datasource: String,
        /// Description of the problem.
        message: String,
    },

    /// Table or query introspection failed while building a datasource.
    #[error("datasource \"{datasource}\": could not read schema: {message}")]
    Introspection {
        /// The datasource being constructed.
        datasource: String,
        /// Backend error message.
        message: String,
    },

    /// Configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Could not open a connection to a backend.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement failed to execute.
    #[error("statement failed: {0}")]
    Statement(String),

    /// I/O failure.
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Configuration file the definition came from.
    pub source: Option<String>,
    /// Position of the datasource definition within the file.
    pub index: Option<usize>,
    /// Chain of datasource names being built when the error occurred.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the definition index.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, self.index) {
            (Some(source), Some(index)) => write!(f, "in {source} (datasource #{index})")?,
            (Some(source), None) => write!(f, "in {source}")?,
            (None, Some(index)) => write!(f, "in datasource #{index}")?,
            (None, None) => {}
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  building {frame}")?;
            }
        }
        Ok(())
    }
}

fn context_suffix(context: Option<&ErrorContext>) -> String {
    let text = context.map(ToString::to_string).unwrap_or_default();
    let text = text.trim_end();
    if text.is_empty() {
        String::new()
    } else {
        format!("\n{}", text.trim_start_matches('\n'))
    }
}

/// Convenience alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
