use std::fmt;
use std::str::FromStr;

use relevance_dialect::{Dialect, QualifiedName};
use serde::{Deserialize, Serialize};

use crate::error::{RelevanceError, Result};

pub const ALIAS_PREFIX: &str = "fuzzy_relevance_";

/// Output column name for a field: `users.name` becomes
/// `fuzzy_relevance_users_name`.
#[must_use]
pub fn relevance_alias(field: &QualifiedName) -> String {
    format!("{ALIAS_PREFIX}{}", field.flattened())
}

/// Thresholds of 0 and 1 both mean "scored at all".
pub(crate) fn minimum_condition(alias: &str, minimum: u32) -> String {
    if minimum <= 1 {
        format!("{alias} > 0")
    } else {
        format!("{alias} >= {minimum}")
    }
}

/// Group-reducing function wrapped around the summed score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Max,
    Min,
    Sum,
    Avg,
}

impl Aggregate {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Aggregate {
    type Err = RelevanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAX" => Ok(Self::Max),
            "MIN" => Ok(Self::Min),
            "SUM" => Ok(Self::Sum),
            "AVG" => Ok(Self::Avg),
            _ => Err(RelevanceError::UnknownAggregate(s.to_string())),
        }
    }
}

/// A numeric column whose value, normalized by its table-wide maximum, is
/// added to the score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RatingBoost {
    table: QualifiedName,
    column: QualifiedName,
}

impl RatingBoost {
    pub fn new(table: &str, column: &str) -> Result<Self> {
        Ok(Self {
            table: QualifiedName::parse(table)?,
            column: QualifiedName::parse(column)?,
        })
    }

    /// `COALESCE((t.c / NULLIF((SELECT MAX(c) FROM t), 0)) * scale, 0)`.
    ///
    /// A table whose maximum rating is 0 or NULL contributes nothing instead
    /// of turning the whole score into NULL.
    #[must_use]
    pub fn compile(&self, dialect: &dyn Dialect, scale: u32) -> String {
        let table = self.table.render(dialect);
        let column = dialect.quote_identifier(self.column.name());
        let maximum = format!(
            "(SELECT {} FROM {table})",
            dialect.call(Aggregate::Max.as_sql(), &column)
        );
        let ratio = dialect.ratio(
            &format!("{table}.{column}"),
            &dialect.null_if(&maximum, "0"),
        );
        dialect.coalesce(&format!("({ratio}) * {scale}"), "0")
    }
}

/// The compiled relevance score of one field, ready to be selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelevanceExpression {
    sql: String,
    alias: String,
}

impl RelevanceExpression {
    #[must_use]
    pub fn new(sql: String, alias: String) -> Self {
        Self { sql, alias }
    }

    /// The score formula without its alias.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// `<alias> > 0`, the filter that keeps rows with any relevance.
    #[must_use]
    pub fn relevance_filter(&self) -> String {
        self.minimum_filter(1)
    }

    #[must_use]
    pub fn minimum_filter(&self, minimum: u32) -> String {
        minimum_condition(&self.alias, minimum)
    }

    /// `<sql> AS <alias>`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        format!("{} AS {}", self.sql, self.alias)
    }
}

impl fmt::Display for RelevanceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS {}", self.sql, self.alias)
    }
}
