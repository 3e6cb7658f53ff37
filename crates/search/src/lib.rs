//! # Relevance Search
//!
//! Compiles a fuzzy-match relevance score for one text column into a single
//! SQL expression aliased `fuzzy_relevance_<field>`.
//!
//! ```text
//! raw value ──> Sanitizer ──> SearchValue { clean, escaped }
//!                                  │
//!       MatcherSet (standard | extended | custom) × WeightProfile
//!                                  │
//!            Matcher::compile per (kind, weight), joined with " + "
//!                                  │
//!          + rating boost ──> aggregate ──> RelevanceExpression
//!                                  │
//!                 FuzzyTarget (SELECT column + HAVING filter)
//! ```
//!
//! Every matcher can also evaluate its condition in memory, which is what
//! [`FuzzySearch::explain`] reports.

mod error;
mod expression;
mod like;
pub mod matchers;
mod pipeline;
mod profile;
mod query;
mod sanitizer;
mod sets;

pub use error::{RelevanceError, Result};
pub use expression::{relevance_alias, Aggregate, RatingBoost, RelevanceExpression, ALIAS_PREFIX};
pub use like::like_matches;
pub use matchers::{Matcher, MatcherKind, MatcherParams, Term};
pub use pipeline::{FuzzySearch, MatcherScore, MatcherSelector, ScoreBreakdown, ScoreRequest};
pub use profile::WeightProfile;
pub use query::{Connective, FuzzyScope, FuzzyTarget, SelectQuery, SCORED_SUBQUERY};
pub use relevance_dialect::{Dialect, DialectKind, LiteralQuoter};
pub use sanitizer::{strip_quote_chars, Sanitizer, SearchValue, STRIPPED_CHARS};
pub use sets::{MatcherSet, EXTENDED_WEIGHTS, STANDARD_WEIGHTS};
