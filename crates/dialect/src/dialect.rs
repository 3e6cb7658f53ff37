use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;
use crate::mysql::MySql;
use crate::postgres::Postgres;

/// Expression syntax of a target SQL dialect.
///
/// Every method receives already-rendered SQL fragments and returns a new
/// fragment; nothing here inspects or validates the fragments themselves.
pub trait Dialect: Send + Sync + fmt::Debug {
    fn kind(&self) -> DialectKind;

    /// Character used to delimit quoted identifiers.
    fn identifier_quote(&self) -> char;

    /// Character used to delimit string literals.
    fn literal_delimiter(&self) -> char {
        '\''
    }

    /// Escapes `value` so it can sit between two literal delimiters.
    fn escape_literal(&self, value: &str) -> String;

    /// Splits an escaped literal body into units that each stand for one
    /// character of the unescaped value. Escape sequences are never split.
    fn literal_units<'a>(&self, escaped: &'a str) -> Vec<&'a str> {
        escaped
            .char_indices()
            .map(|(idx, ch)| &escaped[idx..idx + ch.len_utf8()])
            .collect()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        let quote = self.identifier_quote();
        format!("{quote}{ident}{quote}")
    }

    /// Wraps an already-escaped body in literal delimiters.
    fn literal(&self, escaped: &str) -> String {
        let delimiter = self.literal_delimiter();
        format!("{delimiter}{escaped}{delimiter}")
    }

    fn conditional(&self, condition: &str, then: &str, otherwise: &str) -> String;

    fn char_length(&self, expr: &str) -> String {
        format!("CHAR_LENGTH({expr})")
    }

    fn byte_length(&self, expr: &str) -> String;

    /// Case-insensitive equality.
    fn equals(&self, left: &str, right: &str) -> String;

    /// Case-insensitive pattern match.
    fn like(&self, expr: &str, pattern: &str) -> String;

    fn like_case_sensitive(&self, expr: &str, pattern: &str) -> String;

    /// Integer division of two integer expressions.
    fn int_div(&self, dividend: &str, divisor: &str) -> String;

    /// Fractional division.
    fn ratio(&self, dividend: &str, divisor: &str) -> String;

    fn coalesce(&self, expr: &str, fallback: &str) -> String {
        format!("COALESCE({expr}, {fallback})")
    }

    fn replace(&self, expr: &str, from: &str, to: &str) -> String {
        format!("REPLACE({expr}, {from}, {to})")
    }

    fn strip_spaces(&self, expr: &str) -> String {
        self.replace(expr, "' '", "''")
    }

    fn trim(&self, expr: &str) -> String {
        format!("TRIM({expr})")
    }

    fn lower(&self, expr: &str) -> String {
        format!("LOWER({expr})")
    }

    fn least(&self, left: &str, right: &str) -> String {
        format!("LEAST({left}, {right})")
    }

    fn null_if(&self, expr: &str, value: &str) -> String {
        format!("NULLIF({expr}, {value})")
    }

    fn call(&self, function: &str, expr: &str) -> String {
        format!("{function}({expr})")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl DialectKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
        }
    }

    #[must_use]
    pub fn dialect(self) -> Arc<dyn Dialect> {
        match self {
            Self::Mysql => Arc::new(MySql),
            Self::Postgres => Arc::new(Postgres),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DialectError::UnknownDialect(other.to_string())),
        }
    }
}
