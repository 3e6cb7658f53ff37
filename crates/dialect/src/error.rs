use thiserror::Error;

pub type Result<T> = std::result::Result<T, DialectError>;

#[derive(Error, Debug)]
pub enum DialectError {
    #[error("Literal quoter unavailable: {0}")]
    QuoterUnavailable(String),

    #[error("Quoted literal is not wrapped in {delimiter}: {literal}")]
    MalformedLiteral { literal: String, delimiter: char },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
}
