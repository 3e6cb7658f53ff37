use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::{DialectError, Result};

/// The facility that turns an arbitrary value into a complete, delimited
/// string literal, e.g. a database connection's quote function.
///
/// Implementations must be safe to call concurrently through a shared
/// reference. Failing to reach the underlying facility is reported as
/// [`DialectError::QuoterUnavailable`].
pub trait LiteralQuoter: Send + Sync {
    fn quote(&self, value: &str) -> Result<String>;
}

impl<F> LiteralQuoter for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn quote(&self, value: &str) -> Result<String> {
        self(value)
    }
}

/// Quotes with the dialect's own escaping rules. Never fails.
#[derive(Clone, Debug)]
pub struct DialectQuoter {
    dialect: Arc<dyn Dialect>,
}

impl DialectQuoter {
    #[must_use]
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self { dialect }
    }
}

impl LiteralQuoter for DialectQuoter {
    fn quote(&self, value: &str) -> Result<String> {
        Ok(self.dialect.literal(&self.dialect.escape_literal(value)))
    }
}

/// Strips one leading and one trailing `delimiter` from a quoted literal.
pub fn unwrap_literal(quoted: &str, delimiter: char) -> Result<&str> {
    quoted
        .strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
        .ok_or_else(|| DialectError::MalformedLiteral {
            literal: quoted.to_string(),
            delimiter,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectKind;

    #[test]
    fn dialect_quoter_wraps_escaped_body() {
        let quoter = DialectQuoter::new(DialectKind::Mysql.dialect());
        assert_eq!(quoter.quote("a\\b").unwrap(), "'a\\\\b'");
    }

    #[test]
    fn closures_act_as_quoters() {
        let offline = |_: &str| -> Result<String> {
            Err(DialectError::QuoterUnavailable("no connection".into()))
        };
        let err = offline.quote("x").unwrap_err();
        assert!(matches!(err, DialectError::QuoterUnavailable(_)));
    }

    #[test]
    fn unwrap_literal_requires_both_delimiters() {
        assert_eq!(unwrap_literal("'abc'", '\'').unwrap(), "abc");
        assert_eq!(unwrap_literal("''", '\'').unwrap(), "");
        assert!(unwrap_literal("'abc", '\'').is_err());
        assert!(unwrap_literal("'", '\'').is_err());
        assert!(unwrap_literal("abc", '\'').is_err());
    }
}
