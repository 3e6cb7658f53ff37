use crate::dialect::{Dialect, DialectKind};

/// PostgreSQL with `standard_conforming_strings` on: `CASE` conditionals,
/// double-quoted identifiers, and doubled apostrophes as the only escape.
#[derive(Clone, Copy, Debug, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn identifier_quote(&self) -> char {
        '"'
    }

    // NUL cannot be stored in a text value at all.
    fn escape_literal(&self, value: &str) -> String {
        value.replace('\0', "").replace('\'', "''")
    }

    fn literal_units<'a>(&self, escaped: &'a str) -> Vec<&'a str> {
        let mut units = Vec::with_capacity(escaped.len());
        let mut chars = escaped.char_indices().peekable();
        while let Some((start, ch)) = chars.next() {
            let mut end = start + ch.len_utf8();
            if ch == '\'' && matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                end += 1;
            }
            units.push(&escaped[start..end]);
        }
        units
    }

    fn conditional(&self, condition: &str, then: &str, otherwise: &str) -> String {
        format!("CASE WHEN {condition} THEN {then} ELSE {otherwise} END")
    }

    fn byte_length(&self, expr: &str) -> String {
        format!("OCTET_LENGTH({expr})")
    }

    fn equals(&self, left: &str, right: &str) -> String {
        format!("LOWER({left}) = LOWER({right})")
    }

    fn like(&self, expr: &str, pattern: &str) -> String {
        format!("{expr} ILIKE {pattern}")
    }

    fn like_case_sensitive(&self, expr: &str, pattern: &str) -> String {
        format!("{expr} LIKE {pattern}")
    }

    fn int_div(&self, dividend: &str, divisor: &str) -> String {
        format!("({dividend}) / ({divisor})")
    }

    fn ratio(&self, dividend: &str, divisor: &str) -> String {
        format!("CAST({dividend} AS DOUBLE PRECISION) / {divisor}")
    }
}
