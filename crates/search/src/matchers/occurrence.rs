use relevance_dialect::Dialect;

use super::{Matcher, MatcherKind, Term, NO_MATCH};

/// Scores `weight` per non-overlapping, case-insensitive occurrence of the
/// value inside the field, counting at most `max_occurrences` of them.
///
/// The occurrence count is derived from how much shorter the field gets when
/// every occurrence is removed.
#[derive(Clone, Copy, Debug)]
pub struct TimesInStringMatcher {
    weight: u32,
    max_occurrences: u32,
}

impl TimesInStringMatcher {
    #[must_use]
    pub const fn new(weight: u32, max_occurrences: u32) -> Self {
        Self {
            weight,
            max_occurrences,
        }
    }

    #[must_use]
    pub const fn max_occurrences(&self) -> u32 {
        self.max_occurrences
    }
}

impl Matcher for TimesInStringMatcher {
    fn kind(&self) -> MatcherKind {
        MatcherKind::TimesInString
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let needle = dialect.lower(&dialect.literal(&self.format_search_term(term)));
        let haystack = dialect.lower(field);
        let removed = dialect.char_length(&dialect.replace(&haystack, &needle, "''"));
        let occurrences = dialect.int_div(
            &format!("{} - {removed}", dialect.char_length(&haystack)),
            &dialect.char_length(&needle),
        );
        format!(
            "({} * {})",
            self.weight,
            dialect.least(&occurrences, &self.max_occurrences.to_string())
        )
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        let needle = self.format_search_term(term).to_lowercase();
        let occurrences = field.to_lowercase().matches(needle.as_str()).count();
        let counted = u32::try_from(occurrences)
            .unwrap_or(u32::MAX)
            .min(self.max_occurrences);
        self.weight.saturating_mul(counted)
    }
}
