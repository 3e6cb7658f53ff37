use crate::dialect::{Dialect, DialectKind};

/// MySQL / MariaDB: `IF()` conditionals, backtick identifiers and
/// backslash escapes inside string literals.
#[derive(Clone, Copy, Debug, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn kind(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    // Same character set as mysql_real_escape_string.
    fn escape_literal(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\\' => escaped.push_str("\\\\"),
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                '\x1a' => escaped.push_str("\\Z"),
                other => escaped.push(other),
            }
        }
        escaped
    }

    fn literal_units<'a>(&self, escaped: &'a str) -> Vec<&'a str> {
        let mut units = Vec::with_capacity(escaped.len());
        let mut chars = escaped.char_indices();
        while let Some((start, ch)) = chars.next() {
            let mut end = start + ch.len_utf8();
            if ch == '\\' {
                if let Some((next, escaped_ch)) = chars.next() {
                    end = next + escaped_ch.len_utf8();
                }
            }
            units.push(&escaped[start..end]);
        }
        units
    }

    fn conditional(&self, condition: &str, then: &str, otherwise: &str) -> String {
        format!("IF({condition}, {then}, {otherwise})")
    }

    fn byte_length(&self, expr: &str) -> String {
        format!("LENGTH({expr})")
    }

    fn equals(&self, left: &str, right: &str) -> String {
        format!("{left} = {right}")
    }

    fn like(&self, expr: &str, pattern: &str) -> String {
        format!("{expr} LIKE {pattern}")
    }

    fn like_case_sensitive(&self, expr: &str, pattern: &str) -> String {
        format!("CAST({expr} AS BINARY) LIKE CAST({pattern} AS BINARY)")
    }

    fn int_div(&self, dividend: &str, divisor: &str) -> String {
        format!("({dividend}) DIV ({divisor})")
    }

    fn ratio(&self, dividend: &str, divisor: &str) -> String {
        format!("{dividend} / {divisor}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_like_the_client_library() {
        assert_eq!(MySql.escape_literal("a\\b\nc\0\x1a"), "a\\\\b\\nc\\0\\Z");
        assert_eq!(MySql.escape_literal("o'br\"en"), "o\\'br\\\"en");
        assert_eq!(MySql.escape_literal("plain text"), "plain text");
    }

    #[test]
    fn literal_units_keep_escape_pairs() {
        let escaped = MySql.escape_literal("a\\b\nñ");
        assert_eq!(MySql.literal_units(&escaped), vec!["a", "\\\\", "b", "\\n", "ñ"]);
    }

    #[test]
    fn trailing_backslash_is_its_own_unit() {
        assert_eq!(MySql.literal_units("ab\\"), vec!["a", "b", "\\"]);
    }

    #[test]
    fn renders_function_syntax() {
        assert_eq!(MySql.conditional("a = 'b'", "100", "0"), "IF(a = 'b', 100, 0)");
        assert_eq!(MySql.quote_identifier("users"), "`users`");
        assert_eq!(MySql.strip_spaces("`name`"), "REPLACE(`name`, ' ', '')");
        assert_eq!(MySql.int_div("x", "y"), "(x) DIV (y)");
    }
}
