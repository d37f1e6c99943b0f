//! SQL text generation for the supported dialects.

use std::fmt;
use std::str::FromStr;

use joinery_foundation::{Error, ErrorKind, QueryPart};

/// Escape character used in generated `LIKE` patterns.
pub const LIKE_ESCAPE: char = '|';

/// The SQL dialects statements can be generated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum SqlDialect {
    /// Plain ANSI SQL.
    #[default]
    Ansi,
    /// Oracle; currently generates the same text as ANSI.
    Oracle,
    /// MySQL, which spells `lower` as `lcase`.
    MySql,
    /// Pervasive SQL: no function calls right of `LIKE` and no
    /// `database.table` qualifiers.
    PervasiveSql,
}

impl SqlDialect {
    /// Name of the lower-casing function.
    #[must_use]
    pub fn lower_function(self) -> &'static str {
        match self {
            Self::MySql => "lcase",
            Self::Ansi | Self::Oracle | Self::PervasiveSql => "lower",
        }
    }

    /// Quotes an identifier, doubling embedded double quotes.
    ///
    /// Pervasive SQL drops everything up to the first `.`.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        let name = match (self, name.split_once('.')) {
            (Self::PervasiveSql, Some((_, rest))) => rest,
            _ => name,
        };
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Quotes a string literal, doubling embedded single quotes.
    #[must_use]
    pub fn quote_literal(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Turns a wildcard pattern into a `LIKE` pattern.
    ///
    /// The escape character, `_` and `%` are escaped; `*` becomes `%`.
    #[must_use]
    pub fn like_pattern(pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 4);
        for c in pattern.chars() {
            match c {
                LIKE_ESCAPE | '_' | '%' => {
                    out.push(LIKE_ESCAPE);
                    out.push(c);
                }
                '*' => out.push('%'),
                c => out.push(c),
            }
        }
        out
    }

    fn condition(self, part: &QueryPart) -> String {
        let lower = self.lower_function();
        let column = self.quote_identifier(part.column());
        let literal = Self::quote_literal(&Self::like_pattern(part.pattern()));
        match self {
            Self::PervasiveSql => format!(
                "({lower}({column}) LIKE {} ESCAPE '{LIKE_ESCAPE}')",
                literal.to_lowercase()
            ),
            Self::Ansi | Self::Oracle | Self::MySql => {
                format!("({lower}({column}) LIKE {lower}({literal}) ESCAPE '{LIKE_ESCAPE}')")
            }
        }
    }

    /// `SELECT` for rows matching every part of `query`.
    ///
    /// Returns `None` for an empty query.
    #[must_use]
    pub fn find_statement(self, table: &str, query: &[QueryPart]) -> Option<String> {
        if query.is_empty() {
            return None;
        }
        let conditions: Vec<String> = query.iter().map(|part| self.condition(part)).collect();
        Some(format!(
            "SELECT * FROM {} WHERE {};",
            self.quote_identifier(table),
            conditions.join(" AND ")
        ))
    }

    /// `SELECT` for rows matching any of the decoded keys.
    ///
    /// Keys without column/value pairs are skipped; returns `None` if none
    /// are left.
    #[must_use]
    pub fn by_key_statement(self, table: &str, keys: &[Vec<(String, String)>]) -> Option<String> {
        let alternatives: Vec<String> = keys
            .iter()
            .filter(|pairs| !pairs.is_empty())
            .map(|pairs| {
                let terms: Vec<String> = pairs
                    .iter()
                    .map(|(column, value)| {
                        format!("{}={}", self.quote_identifier(column), Self::quote_literal(value))
                    })
                    .collect();
                format!("({})", terms.join(" AND "))
            })
            .collect();
        if alternatives.is_empty() {
            return None;
        }
        Some(format!(
            "SELECT * FROM {} WHERE {};",
            self.quote_identifier(table),
            alternatives.join(" OR ")
        ))
    }

    /// `SELECT` for every row.
    #[must_use]
    pub fn contents_statement(self, table: &str) -> String {
        format!("SELECT * FROM {};", self.quote_identifier(table))
    }
}

impl FromStr for SqlDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ansi" => Ok(Self::Ansi),
            "oracle" => Ok(Self::Oracle),
            "mysql" => Ok(Self::MySql),
            "pervasivesql" => Ok(Self::PervasiveSql),
            _ => Err(Error::new(ErrorKind::UnsupportedDialect(s.to_string()))),
        }
    }
}

impl TryFrom<String> for SqlDialect {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ansi => "ansi",
            Self::Oracle => "oracle",
            Self::MySql => "mysql",
            Self::PervasiveSql => "pervasivesql",
        })
    }
}
