use relevance_dialect::Dialect;

use super::{weighted, Matcher, MatcherKind, Operator, Term, NO_MATCH};
use crate::like::like_matches;

/// Field equals the value.
#[derive(Clone, Copy, Debug)]
pub struct ExactMatcher {
    weight: u32,
}

impl ExactMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for ExactMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::Exact
    }

    fn weight(&self) -> u32 {
        self.weight
    }
}

/// Field starts with the value: `LIKE 'value%'`.
#[derive(Clone, Copy, Debug)]
pub struct StartOfStringMatcher {
    weight: u32,
}

impl StartOfStringMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for StartOfStringMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::StartOfString
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::Like
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        format!("{}%", term.text())
    }
}

/// Field contains the value as one contiguous run: `LIKE '%value%'`.
#[derive(Clone, Copy, Debug)]
pub struct ConsecutiveCharactersMatcher {
    weight: u32,
}

impl ConsecutiveCharactersMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for ConsecutiveCharactersMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::ConsecutiveCharacters
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::Like
    }

    fn format_search_term(&self, term: &Term<'_>) -> String {
        format!("%{}%", term.text())
    }
}

/// Every word of the value occurs somewhere in the field, in any order.
/// For a single-word value this is the same test as
/// [`ConsecutiveCharactersMatcher`].
#[derive(Clone, Copy, Debug)]
pub struct InStringMatcher {
    weight: u32,
}

impl InStringMatcher {
    #[must_use]
    pub const fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Matcher for InStringMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::InString
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn operator(&self) -> Operator {
        Operator::Like
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let condition = term
            .words()
            .map(|word| dialect.like(field, &dialect.literal(&format!("%{word}%"))))
            .collect::<Vec<_>>()
            .join(" AND ");
        weighted(dialect, &condition, self.weight)
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        let all_present = term
            .words()
            .all(|word| like_matches(field, &format!("%{word}%"), false));
        if all_present {
            self.weight
        } else {
            0
        }
    }
}
