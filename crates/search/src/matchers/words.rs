use relevance_dialect::Dialect;

use super::{weighted, Matcher, MatcherKind, Operator, Term, NO_MATCH};
use crate::like::like_matches;

/// The initials of the field's words spell the value.
///
/// The value's characters (spaces ignored) become the pattern `A% B% C%`; the
/// field must match it and contain exactly one space fewer than there are
/// characters once trimmed. Together the two conditions pin each character to
/// the start of one word of a single-spaced field.
#[derive(Clone, Copy, Debug)]
pub struct AcronymMatcher {
    weight: u32,
}

impl AcronymMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for AcronymMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::Acronym
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::Like
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        format!("{}%", term.letters().collect::<Vec<_>>().join("% "))
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let pattern = dialect.literal(&self.format_search_term(term));
        let trimmed = dialect.trim(field);
        let spaces = format!(
            "{} - {}",
            dialect.char_length(&trimmed),
            dialect.char_length(&dialect.strip_spaces(&trimmed))
        );
        let condition = format!(
            "{} AND ({spaces}) = {}",
            dialect.like(field, &pattern),
            term.letters().count() - 1
        );
        weighted(dialect, &condition, self.weight)
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        let spaces = field.trim_matches(' ').matches(' ').count();
        if spaces + 1 == term.letters().count()
            && like_matches(field, &self.format_search_term(term), false)
        {
            self.weight
        } else {
            0
        }
    }
}

/// Each word of the value starts a word of the field, in order, the first
/// one at the start of the field: `LIKE 'jo% sm%'`.
#[derive(Clone, Copy, Debug)]
pub struct StartOfWordsMatcher {
    weight: u32,
}

impl StartOfWordsMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for StartOfWordsMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::StartOfWords
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::Like
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        format!("{}%", term.words().collect::<Vec<_>>().join("% "))
    }
}

/// The value's characters, upper-cased, appear in order in a field that is a
/// single StudlyCase word: `fb` matches `FooBar`. Case-sensitive.
#[derive(Clone, Copy, Debug)]
pub struct StudlyCaseMatcher {
    weight: u32,
}

impl StudlyCaseMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for StudlyCaseMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::StudlyCase
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::LikeCaseSensitive
    }

    // Escape sequences are kept verbatim; only plain characters are case-mapped.
    fn format_search_term(&self, term: &Term<'_>) -> String {
        let capitals = term
            .letters()
            .map(|unit| {
                if unit.chars().count() == 1 {
                    unit.to_uppercase()
                } else {
                    unit.to_string()
                }
            })
            .collect::<Vec<_>>();
        format!("{}%", capitals.join("%"))
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let pattern = dialect.literal(&self.format_search_term(term));
        let trimmed = dialect.trim(field);
        let condition = format!(
            "{} = {} AND {}",
            dialect.char_length(&trimmed),
            dialect.char_length(&dialect.strip_spaces(&trimmed)),
            self.operator().render(dialect, field, &pattern)
        );
        weighted(dialect, &condition, self.weight)
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        let single_word = !field.trim_matches(' ').contains(' ');
        if single_word && self.operator().holds(field, &self.format_search_term(term)) {
            self.weight
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relevance_dialect::{MySql, Postgres};

    fn compile(matcher: &dyn Matcher, value: &str) -> String {
        let body = MySql.escape_literal(value);
        matcher.compile("`name`", &Term::escaped(&body, &MySql), &MySql)
    }

    fn eval(matcher: &dyn Matcher, field: &str, value: &str) -> u32 {
        matcher.evaluate(field, &Term::clean(value))
    }

    #[test]
    fn acronym_compiles_pattern_and_word_count() {
        assert_eq!(
            compile(&AcronymMatcher::new(42), "fb"),
            "IF(`name` LIKE 'f% b%' AND (CHAR_LENGTH(TRIM(`name`)) - \
             CHAR_LENGTH(REPLACE(TRIM(`name`), ' ', ''))) = 1, 42, 0)"
        );
    }

    #[test]
    fn acronym_requires_exact_initials() {
        let matcher = AcronymMatcher::new(42);
        assert_eq!(eval(&matcher, "Foo Bar", "fb"), 42);
        assert_eq!(eval(&matcher, "foo bar", "F B"), 42);
        assert_eq!(eval(&matcher, "Foo Bar Baz", "fb"), 0);
        assert_eq!(eval(&matcher, "Foo Bar Baz", "fbb"), 42);
        assert_eq!(eval(&matcher, "Foo", "fb"), 0);
        assert_eq!(eval(&matcher, "Bar Foo", "fb"), 0);
    }

    #[test]
    fn acronym_single_letter_needs_single_word() {
        let matcher = AcronymMatcher::new(42);
        assert_eq!(eval(&matcher, "Foo", "f"), 42);
        assert_eq!(eval(&matcher, "Foo Bar", "f"), 0);
    }

    #[test]
    fn start_of_words_matches_word_prefixes() {
        let matcher = StartOfWordsMatcher::new(35);
        assert_eq!(compile(&matcher, "jo sm"), "IF(`name` LIKE 'jo% sm%', 35, 0)");
        assert_eq!(eval(&matcher, "John Smith", "jo sm"), 35);
        assert_eq!(eval(&matcher, "John Adam Smith", "jo sm"), 35);
        assert_eq!(eval(&matcher, "Smith John", "jo sm"), 0);
    }

    #[test]
    fn studly_case_is_case_sensitive_and_single_word() {
        let matcher = StudlyCaseMatcher::new(32);
        assert_eq!(
            compile(&matcher, "fb"),
            "IF(CHAR_LENGTH(TRIM(`name`)) = CHAR_LENGTH(REPLACE(TRIM(`name`), ' ', '')) \
             AND CAST(`name` AS BINARY) LIKE CAST('F%B%' AS BINARY), 32, 0)"
        );
        assert_eq!(eval(&matcher, "FooBar", "fb"), 32);
        assert_eq!(eval(&matcher, "foobar", "fb"), 0);
        assert_eq!(eval(&matcher, "Foo Bar", "fb"), 0);
    }

    #[test]
    fn studly_case_keeps_escape_sequences() {
        assert!(compile(&StudlyCaseMatcher::new(32), "a\nb").contains("'A%\\n%B%'"));
    }

    #[test]
    fn postgres_studly_case_uses_plain_like() {
        let term = Term::escaped("fb", &Postgres);
        let sql = StudlyCaseMatcher::new(32).compile("\"name\"", &term, &Postgres);
        assert!(sql.contains("\"name\" LIKE 'F%B%'"), "{sql}");
        assert!(sql.starts_with("CASE WHEN "), "{sql}");
    }
}
