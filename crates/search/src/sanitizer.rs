use relevance_dialect::{unwrap_literal, LiteralQuoter};

use crate::error::Result;

/// Characters removed from every search value before it is quoted.
pub const STRIPPED_CHARS: [char; 3] = ['"', '\'', '`'];

/// A search value that is safe to embed between literal delimiters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchValue {
    clean: String,
    escaped: String,
}

impl SearchValue {
    /// The value with quote characters removed, as the database sees it once
    /// the literal is parsed.
    #[must_use]
    pub fn clean(&self) -> &str {
        &self.clean
    }

    /// The literal body, escaped for the dialect and without delimiters.
    #[must_use]
    pub fn escaped(&self) -> &str {
        &self.escaped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clean.is_empty()
    }
}

/// Turns untrusted input into a [`SearchValue`] through a borrowed quoter.
pub struct Sanitizer<'q> {
    quoter: &'q dyn LiteralQuoter,
    delimiter: char,
}

impl<'q> Sanitizer<'q> {
    #[must_use]
    pub fn new(quoter: &'q dyn LiteralQuoter, delimiter: char) -> Self {
        Self { quoter, delimiter }
    }

    /// Strips quote characters, quotes the rest and drops the delimiters the
    /// quoter added. A quoter failure is returned as-is.
    pub fn sanitize(&self, raw: &str) -> Result<SearchValue> {
        let clean = strip_quote_chars(raw);
        let quoted = self.quoter.quote(&clean)?;
        let escaped = unwrap_literal(&quoted, self.delimiter)?.to_string();
        Ok(SearchValue { clean, escaped })
    }
}

#[must_use]
pub fn strip_quote_chars(raw: &str) -> String {
    raw.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}
