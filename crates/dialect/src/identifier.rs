use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::Dialect;
use crate::error::{DialectError, Result};

static IDENTIFIER_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}_$]+$").expect("identifier pattern is valid"));

/// A dotted identifier such as `table.column` or `schema.table.column`.
///
/// Each segment may be wrapped in a matching pair of backticks or double
/// quotes; the pair is removed and the bare segment must consist of letters,
/// digits, `_` or `$`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DialectError::InvalidIdentifier("empty identifier".to_string()));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('.') {
            let bare = unquote_segment(segment.trim());
            if !IDENTIFIER_SEGMENT.is_match(bare) {
                return Err(DialectError::InvalidIdentifier(format!(
                    "segment {segment:?} of {raw:?}"
                )));
            }
            segments.push(bare.to_string());
        }

        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, i.e. the column or table name without qualifiers.
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Segments joined with `_`, e.g. `users_name` for `users.name`.
    #[must_use]
    pub fn flattened(&self) -> String {
        self.segments.join("_")
    }

    #[must_use]
    pub fn render(&self, dialect: &dyn Dialect) -> String {
        self.segments
            .iter()
            .map(|segment| dialect.quote_identifier(segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

fn unquote_segment(segment: &str) -> &str {
    for quote in ['`', '"'] {
        if let Some(inner) = segment
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    segment
}
