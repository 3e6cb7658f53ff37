//! Weighted string-similarity strategies.
//!
//! Every matcher compiles one conditional SQL term that yields its weight when
//! the condition holds and `0` otherwise, and can evaluate the same condition
//! in memory. Comparisons are case-insensitive unless a matcher says
//! otherwise, and words are delimited by the space character on both sides.

mod basic;
mod occurrence;
mod spaceless;
mod words;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use relevance_dialect::Dialect;
use serde::{Deserialize, Serialize};

use crate::error::RelevanceError;
use crate::like::like_matches;

pub use basic::{ConsecutiveCharactersMatcher, ExactMatcher, InStringMatcher, StartOfStringMatcher};
pub use occurrence::TimesInStringMatcher;
pub use spaceless::{SpacelessLengthMatcher, SpacelessMatcher, StringLengthMatcher};
pub use words::{AcronymMatcher, StartOfWordsMatcher, StudlyCaseMatcher};

/// Compiled term of a matcher that can never match.
pub const NO_MATCH: &str = "0";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    Exact,
    StartOfString,
    SpacelessLength,
    Acronym,
    ConsecutiveCharacters,
    Spaceless,
    StartOfWords,
    StudlyCase,
    InString,
    TimesInString,
    StringLength,
}

impl MatcherKind {
    pub const ALL: [Self; 11] = [
        Self::Exact,
        Self::StartOfString,
        Self::SpacelessLength,
        Self::Acronym,
        Self::ConsecutiveCharacters,
        Self::Spaceless,
        Self::StartOfWords,
        Self::StudlyCase,
        Self::InString,
        Self::TimesInString,
        Self::StringLength,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::StartOfString => "start_of_string",
            Self::SpacelessLength => "spaceless_length",
            Self::Acronym => "acronym",
            Self::ConsecutiveCharacters => "consecutive_characters",
            Self::Spaceless => "spaceless",
            Self::StartOfWords => "start_of_words",
            Self::StudlyCase => "studly_case",
            Self::InString => "in_string",
            Self::TimesInString => "times_in_string",
            Self::StringLength => "string_length",
        }
    }

    /// Builds a fresh matcher of this kind.
    #[must_use]
    pub fn instantiate(self, weight: u32, params: &MatcherParams) -> Box<dyn Matcher> {
        match self {
            Self::Exact => Box::new(ExactMatcher::new(weight)),
            Self::StartOfString => Box::new(StartOfStringMatcher::new(weight)),
            Self::SpacelessLength => Box::new(SpacelessLengthMatcher::new(weight)),
            Self::Acronym => Box::new(AcronymMatcher::new(weight)),
            Self::ConsecutiveCharacters => Box::new(ConsecutiveCharactersMatcher::new(weight)),
            Self::Spaceless => Box::new(SpacelessMatcher::new(weight)),
            Self::StartOfWords => Box::new(StartOfWordsMatcher::new(weight)),
            Self::StudlyCase => Box::new(StudlyCaseMatcher::new(weight)),
            Self::InString => Box::new(InStringMatcher::new(weight)),
            Self::TimesInString => {
                Box::new(TimesInStringMatcher::new(weight, params.max_occurrences))
            }
            Self::StringLength => Box::new(StringLengthMatcher::new(weight)),
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatcherKind {
    type Err = RelevanceError;

    /// Accepts `start_of_string`, `start-of-string`, `StartOfString` and
    /// `StartOfStringMatcher`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let normalized = normalized.strip_suffix("matcher").unwrap_or(&normalized);

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('_', "") == normalized)
            .ok_or_else(|| RelevanceError::UnknownMatcher(s.to_string()))
    }
}

/// Per-variant parameters shared by every matcher built for one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MatcherParams {
    /// Upper bound on the occurrences counted by [`TimesInStringMatcher`].
    pub max_occurrences: u32,
}

impl Default for MatcherParams {
    fn default() -> Self {
        Self { max_occurrences: 1 }
    }
}

/// How the (transformed) field is compared with the search term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Equals,
    Like,
    LikeCaseSensitive,
}

impl Operator {
    #[must_use]
    pub fn render(self, dialect: &dyn Dialect, left: &str, right: &str) -> String {
        match self {
            Self::Equals => dialect.equals(left, right),
            Self::Like => dialect.like(left, right),
            Self::LikeCaseSensitive => dialect.like_case_sensitive(left, right),
        }
    }

    #[must_use]
    pub fn holds(self, left: &str, right: &str) -> bool {
        match self {
            Self::Equals => left.to_lowercase() == right.to_lowercase(),
            Self::Like => like_matches(left, right, false),
            Self::LikeCaseSensitive => like_matches(left, right, true),
        }
    }
}

/// The search value as a matcher sees it: either the escaped literal body
/// (when compiling) or the clean value (when evaluating in memory), split
/// into units that each stand for one character of the clean value.
#[derive(Clone, Debug)]
pub struct Term<'a> {
    text: &'a str,
    units: Vec<&'a str>,
}

impl<'a> Term<'a> {
    #[must_use]
    pub fn escaped(body: &'a str, dialect: &dyn Dialect) -> Self {
        Self {
            text: body,
            units: dialect.literal_units(body),
        }
    }

    #[must_use]
    pub fn clean(value: &'a str) -> Self {
        Self {
            text: value,
            units: value
                .char_indices()
                .map(|(idx, ch)| &value[idx..idx + ch.len_utf8()])
                .collect(),
        }
    }

    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    #[must_use]
    pub fn units(&self) -> &[&'a str] {
        &self.units
    }

    /// Empty or spaces only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim_matches(' ').is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.text.split(' ').filter(|word| !word.is_empty())
    }

    /// Units other than spaces.
    pub fn letters(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.units.iter().copied().filter(|unit| *unit != " ")
    }

    #[must_use]
    pub fn without_spaces(&self) -> String {
        self.text.replace(' ', "")
    }
}

/// A single weighted similarity strategy.
///
/// The default implementation compiles
/// `<field transform> <operator> '<search term>'` into
/// `IF(condition, weight, 0)` (or the dialect's equivalent) and evaluates the
/// same comparison in memory. A blank search term never matches.
pub trait Matcher: Send + Sync {
    fn kind(&self) -> MatcherKind;

    fn weight(&self) -> u32;

    fn operator(&self) -> Operator {
        Operator::Equals
    }

    /// Comparable search term derived from the value.
    fn format_search_term(&self, term: &Term<'_>) -> String {
        term.text().to_string()
    }

    fn compile_field(&self, field: &str, _dialect: &dyn Dialect) -> String {
        field.to_string()
    }

    fn evaluate_field<'f>(&self, field: &'f str) -> Cow<'f, str> {
        Cow::Borrowed(field)
    }

    fn compile(&self, field: &str, term: &Term<'_>, dialect: &dyn Dialect) -> String {
        if term.is_blank() {
            return NO_MATCH.to_string();
        }
        let search = dialect.literal(&self.format_search_term(term));
        let condition = self
            .operator()
            .render(dialect, &self.compile_field(field, dialect), &search);
        weighted(dialect, &condition, self.weight())
    }

    fn evaluate(&self, field: &str, term: &Term<'_>) -> u32 {
        if term.is_blank() {
            return 0;
        }
        let search = self.format_search_term(term);
        if self.operator().holds(&self.evaluate_field(field), &search) {
            self.weight()
        } else {
            0
        }
    }
}

/// `IF(condition, weight, 0)` in the dialect's syntax.
pub(crate) fn weighted(dialect: &dyn Dialect, condition: &str, weight: u32) -> String {
    dialect.conditional(condition, &weight.to_string(), NO_MATCH)
}
