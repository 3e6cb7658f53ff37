use std::borrow::Cow;

use relevance_dialect::Dialect;

use super::{weighted, Matcher, MatcherKind, Operator, Term, NO_MATCH};

/// Field without spaces contains the value without spaces.
#[derive(Clone, Copy, Debug)]
pub struct SpacelessMatcher {
    weight: u32,
}

impl SpacelessMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for SpacelessMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::Spaceless
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::Like
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        format!("%{}%", term.without_spaces())
    }

    fn compile_field(&self, field: &str, dialect: &dyn Dialect) -> String {
        dialect.strip_spaces(field)
    }

    fn evaluate_field<'f>(&self, field: &'f str) -> Cow<'f, str> {
        Cow::Owned(field.replace(' ', ""))
    }
}

/// Field and value have the same byte length once spaces are removed.
#[derive(Clone, Copy, Debug)]
pub struct SpacelessLengthMatcher {
    weight: u32,
}

impl SpacelessLengthMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for SpacelessLengthMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::SpacelessLength
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        term.without_spaces()
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let search = dialect.literal(&self.format_search_term(term));
        let condition = format!(
            "{} = {}",
            dialect.byte_length(&dialect.strip_spaces(field)),
            dialect.byte_length(&search)
        );
        weighted(dialect, &condition, self.weight)
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        if field.replace(' ', "").len() == self.format_search_term(term).len() {
            self.weight
        } else {
            0
        }
    }
}

/// Field and value have the same number of characters once spaces are
/// removed.
#[derive(Clone, Copy, Debug)]
pub struct StringLengthMatcher {
    weight: u32,
}

impl StringLengthMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for StringLengthMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::StringLength
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        term.without_spaces()
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let search = dialect.literal(&self.format_search_term(term));
        let condition = format!(
            "{} = {}",
            dialect.char_length(&dialect.strip_spaces(field)),
            dialect.char_length(&search)
        );
        weighted(dialect, &condition, self.weight)
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        let field_chars = field.chars().filter(|c| *c != ' ').count();
        if field_chars == self.format_search_term(term).chars().count() {
            self.weight
        } else {
            0
        }
    }
}
