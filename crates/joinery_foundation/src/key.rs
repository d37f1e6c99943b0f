//! Key string encodings.
//!
//! Escaped pair-list keys (`col#value#col#value#`) identify rows of SQL
//! backed sources and survive a round trip through [`decode_key`].
//! Plain-separator keys identify rows of static tables; they are not
//! escaped, so a value containing [`KEY_SEPARATOR`] can collide with
//! another row's key.

/// Separator between key-column values of static table rows.
pub const KEY_SEPARATOR: &str = "£#%&|";

/// Escapes `%` as `%%` and `#` as `%r`.
#[must_use]
pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%%"),
            '#' => out.push_str("%r"),
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`encode_component`].
///
/// `%r` becomes `#`; any other `%` is dropped and the character after it is
/// kept literally. Malformed input never fails.
#[must_use]
pub fn decode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('r') => out.push('#'),
            Some(next) => out.push(next),
            None => {}
        }
    }
    out
}

/// Builds an escaped pair-list key from `(column, value)` pairs.
///
/// Pairs with a null value are omitted.
#[must_use]
pub fn encode_key<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut key = String::new();
    for (column, value) in pairs {
        let Some(value) = value else { continue };
        key.push_str(&encode_component(column));
        key.push('#');
        key.push_str(&encode_component(value));
        key.push('#');
    }
    key
}

/// Splits an escaped pair-list key into decoded `(column, value)` pairs.
///
/// A trailing unpaired segment is ignored.
#[must_use]
pub fn decode_key(key: &str) -> Vec<(String, String)> {
    let parts: Vec<&str> = key.split('#').collect();
    parts
        .chunks_exact(2)
        .map(|pair| (decode_component(pair[0]), decode_component(pair[1])))
        .collect()
}

/// Joins key-column values with [`KEY_SEPARATOR`]; null contributes "".
#[must_use]
pub fn join_key<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut key = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            key.push_str(KEY_SEPARATOR);
        }
        key.push_str(value.unwrap_or_default());
    }
    key
}
