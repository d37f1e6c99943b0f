//! Search strategies: query templates indexed by the number of words typed.
//!
//! A template query carries placeholders `${query1}`, `${query2}`, ... in its
//! patterns. Resolving a free-text input picks the template set for its word
//! count, dropping words from the end until a set exists, and substitutes
//! the words into every template.

use std::collections::BTreeMap;

use joinery_foundation::QueryPart;
use tracing::debug;

/// A query against one named datasource.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Query {
    /// Name of the datasource to query.
    pub datasource: String,
    /// Predicates; an empty list asks for the source's contents.
    #[cfg_attr(feature = "serde", serde(default, rename = "query"))]
    pub parts: Vec<QueryPart>,
}

impl Query {
    /// Creates a query.
    #[must_use]
    pub fn new(datasource: impl Into<String>, parts: Vec<QueryPart>) -> Self {
        Self {
            datasource: datasource.into(),
            parts,
        }
    }

    fn substitute(&self, words: &[String]) -> Self {
        let parts = self
            .parts
            .iter()
            .map(|part| QueryPart::new(part.column(), fill_placeholders(part.pattern(), words)))
            .collect();
        Self::new(self.datasource.clone(), parts)
    }
}

/// Replaces each `${queryN}` in `template` with the Nth word in one pass.
///
/// Inserted words are never scanned again. Placeholders without a word are
/// kept as written.
fn fill_placeholders(template: &str, words: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${query") {
        out.push_str(&rest[..start]);
        let after = &rest[start + "${query".len()..];
        let word = after.split_once('}').and_then(|(n, tail)| {
            let index = n.parse::<usize>().ok()?.checked_sub(1)?;
            words.get(index).map(|word| (word, tail))
        });
        match word {
            Some((word, tail)) => {
                out.push_str(word);
                rest = tail;
            }
            None => {
                out.push('$');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Template sets keyed by word count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(transparent))]
pub struct SearchStrategy {
    templates: BTreeMap<usize, Vec<Query>>,
}

impl SearchStrategy {
    /// Creates a strategy without templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template for inputs of `word_count` words.
    #[must_use]
    pub fn with_template(mut self, word_count: usize, template: Query) -> Self {
        self.add(word_count, template);
        self
    }

    /// Adds a template for inputs of `word_count` words.
    pub fn add(&mut self, word_count: usize, template: Query) {
        self.templates.entry(word_count).or_default().push(template);
    }

    /// The templates for exactly `word_count` words.
    #[must_use]
    pub fn templates(&self, word_count: usize) -> Option<&[Query]> {
        self.templates.get(&word_count).map(Vec::as_slice)
    }

    /// Returns true if no templates are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Turns a free-text input into concrete queries.
    ///
    /// Returns nothing if no template set fits any prefix of the words.
    #[must_use]
    pub fn resolve(&self, input: &str) -> Vec<Query> {
        let words = split_words(input);
        let found = (0..=words.len())
            .rev()
            .find_map(|count| self.templates(count).map(|set| (count, set)));
        let Some((count, templates)) = found else {
            debug!(words = words.len(), "no search template fits");
            return Vec::new();
        };
        debug!(words = words.len(), used = count, templates = templates.len(), "resolved search");
        templates
            .iter()
            .map(|template| template.substitute(&words[..count]))
            .collect()
    }
}

/// Splits free text into normalized words.
///
/// Commas count as whitespace and words that normalize to nothing are
/// dropped.
#[must_use]
pub fn split_words(input: &str) -> Vec<String> {
    input
        .replace(',', " ")
        .split_whitespace()
        .map(normalize_word)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Normalizes one word.
///
/// All stars are removed. A word that ended in `*` or `.` gets a single
/// trailing star back; a trailing `.` marks an abbreviation and is dropped.
#[must_use]
pub fn normalize_word(word: &str) -> String {
    let abbreviated = word.ends_with('*') || word.ends_with('.');
    let mut out = word.strip_suffix('.').unwrap_or(word).replace('*', "");
    if abbreviated {
        out.push('*');
    }
    out
}
