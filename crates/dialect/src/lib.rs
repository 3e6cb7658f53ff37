//! # Relevance Dialect
//!
//! The SQL surface that relevance expressions are compiled into.
//!
//! ```text
//! Dialect (trait)
//!     ├─ MySql     IF(c, a, b), `ident`, backslash escapes
//!     └─ Postgres  CASE WHEN c THEN a ELSE b END, "ident", '' escapes
//!
//! LiteralQuoter (trait)       fallible quote facility (connection, closure)
//!     └─ DialectQuoter        infallible, built from a Dialect
//!
//! QualifiedName               validated dotted identifier
//! ```

mod dialect;
mod error;
mod identifier;
mod mysql;
mod postgres;
mod quoter;

pub use dialect::{Dialect, DialectKind};
pub use error::{DialectError, Result};
pub use identifier::QualifiedName;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use quoter::{unwrap_literal, DialectQuoter, LiteralQuoter};
