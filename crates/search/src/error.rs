use thiserror::Error;

use crate::matchers::MatcherKind;

pub type Result<T> = std::result::Result<T, RelevanceError>;

#[derive(Error, Debug)]
pub enum RelevanceError {
    #[error("Dialect error: {0}")]
    Dialect(#[from] relevance_dialect::DialectError),

    #[error("Invalid field reference {field:?}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Weight for {kind} must be positive")]
    InvalidWeight { kind: MatcherKind },

    #[error("Unknown matcher: {0}")]
    UnknownMatcher(String),

    #[error("Unknown aggregate function: {0}")]
    UnknownAggregate(String),

    #[error("{0}")]
    Other(String),
}
