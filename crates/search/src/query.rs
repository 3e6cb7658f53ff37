use std::fmt;

use relevance_dialect::{Dialect, DialectKind, QualifiedName};

use crate::error::Result;
use crate::expression::{minimum_condition, relevance_alias, RelevanceExpression};
use crate::pipeline::{parse_field, FuzzySearch, ScoreRequest};
use crate::sets::MatcherSet;

/// How a relevance filter combines with the filters already on a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A query under construction that relevance expressions are merged into.
pub trait FuzzyTarget {
    /// Selects every column when nothing is selected yet, so the added
    /// relevance column does not replace the row itself.
    fn ensure_columns(&mut self);

    fn add_select(&mut self, column: String);

    /// Adds a post-aggregation filter. The connective of the first filter is
    /// ignored.
    fn having(&mut self, connective: Connective, condition: String);

    fn order_by_desc(&mut self, expression: String);
}

impl RelevanceExpression {
    /// Selects the expression on `target` and keeps only rows that scored.
    pub fn apply<T: FuzzyTarget + ?Sized>(&self, target: &mut T, connective: Connective) {
        target.ensure_columns();
        target.add_select(self.to_sql());
        target.having(connective, self.relevance_filter());
    }
}

/// Alias of the derived table PostgreSQL filters relevance columns through.
pub const SCORED_SUBQUERY: &str = "scored";

/// A minimal single-table `SELECT` builder.
///
/// MySQL resolves select aliases in `HAVING` and `ORDER BY`, so filters and
/// orders are rendered in place. PostgreSQL does not, so the selection is
/// wrapped in a derived table and filtered from the outside:
/// `SELECT * FROM (SELECT ...) AS scored WHERE ... ORDER BY ...`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectQuery {
    table: QualifiedName,
    columns: Vec<String>,
    group_by: Vec<String>,
    havings: Vec<(Connective, String)>,
    orders: Vec<String>,
    limit: Option<usize>,
}

impl SelectQuery {
    pub fn new(table: &str) -> Result<Self> {
        Ok(Self {
            table: parse_field(table)?,
            columns: Vec::new(),
            group_by: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
        })
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    #[must_use]
    pub fn group_by(mut self, expression: impl Into<String>) -> Self {
        self.group_by.push(expression.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn havings(&self) -> &[(Connective, String)] {
        &self.havings
    }

    #[must_use]
    pub fn orders(&self) -> &[String] {
        &self.orders
    }

    #[must_use]
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {}", self.table.render(dialect));
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        let filter_keyword = if dialect.kind() == DialectKind::Postgres
            && !(self.havings.is_empty() && self.orders.is_empty())
        {
            sql = format!("SELECT * FROM ({sql}) AS {SCORED_SUBQUERY}");
            "WHERE"
        } else {
            "HAVING"
        };

        for (idx, (connective, condition)) in self.havings.iter().enumerate() {
            if idx == 0 {
                sql.push(' ');
                sql.push_str(filter_keyword);
            } else {
                sql.push(' ');
                sql.push_str(connective.as_sql());
            }
            sql.push(' ');
            sql.push_str(condition);
        }
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orders.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }
}

impl FuzzyTarget for SelectQuery {
    fn ensure_columns(&mut self) {
        if self.columns.is_empty() {
            self.columns.push("*".to_string());
        }
    }

    fn add_select(&mut self, column: String) {
        self.columns.push(column);
    }

    fn having(&mut self, connective: Connective, condition: String) {
        self.havings.push((connective, condition));
    }

    fn order_by_desc(&mut self, expression: String) {
        self.orders.push(format!("{expression} DESC"));
    }
}

impl FuzzySearch {
    /// Scores `request` and merges the result into `target`.
    pub fn apply<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        request: &ScoreRequest,
        connective: Connective,
    ) -> Result<RelevanceExpression> {
        let expression = self.score(request)?;
        expression.apply(target, connective);
        Ok(expression)
    }

    pub fn where_fuzzy<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        value: &str,
    ) -> Result<RelevanceExpression> {
        self.apply(target, &ScoreRequest::new(field, value), Connective::And)
    }

    pub fn or_where_fuzzy<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        value: &str,
    ) -> Result<RelevanceExpression> {
        self.apply(target, &ScoreRequest::new(field, value), Connective::Or)
    }

    pub fn where_fuzzy_extended<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        value: &str,
    ) -> Result<RelevanceExpression> {
        let request = ScoreRequest::new(field, value).extended();
        self.apply(target, &request, Connective::And)
    }

    pub fn or_where_fuzzy_extended<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        value: &str,
    ) -> Result<RelevanceExpression> {
        let request = ScoreRequest::new(field, value).extended();
        self.apply(target, &request, Connective::Or)
    }

    pub fn where_fuzzy_custom<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        value: &str,
        matchers: MatcherSet,
    ) -> Result<RelevanceExpression> {
        let request = ScoreRequest::new(field, value).custom(matchers);
        self.apply(target, &request, Connective::And)
    }

    pub fn or_where_fuzzy_custom<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        value: &str,
        matchers: MatcherSet,
    ) -> Result<RelevanceExpression> {
        let request = ScoreRequest::new(field, value).custom(matchers);
        self.apply(target, &request, Connective::Or)
    }

    /// Runs `build` against `target` itself, so every call made through the
    /// scope lands on the same query.
    pub fn scope<T, F>(&self, target: &mut T, build: F) -> Result<()>
    where
        T: FuzzyTarget + ?Sized,
        F: FnOnce(&mut FuzzyScope<'_, T>) -> Result<()>,
    {
        let mut scope = FuzzyScope {
            search: self,
            target,
        };
        build(&mut scope)
    }

    /// Orders by the summed relevance of `fields`, highest first.
    pub fn order_by_fuzzy<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        fields: &[&str],
    ) -> Result<()> {
        let aliases = fields
            .iter()
            .map(|field| parse_field(field).map(|name| relevance_alias(&name)))
            .collect::<Result<Vec<_>>>()?;
        if aliases.is_empty() {
            log::debug!("order_by_fuzzy called without fields");
            return Ok(());
        }
        target.order_by_desc(aliases.join(" + "));
        Ok(())
    }

    /// Keeps rows whose relevance for `field` reaches `minimum`.
    pub fn with_minimum_relevance<T: FuzzyTarget + ?Sized>(
        &self,
        target: &mut T,
        field: &str,
        minimum: u32,
    ) -> Result<()> {
        let alias = relevance_alias(&parse_field(field)?);
        target.having(Connective::And, minimum_condition(&alias, minimum));
        Ok(())
    }
}

/// Entry points bound to one target for the duration of a
/// [`FuzzySearch::scope`] call.
pub struct FuzzyScope<'a, T: FuzzyTarget + ?Sized> {
    search: &'a FuzzySearch,
    target: &'a mut T,
}

impl<T: FuzzyTarget + ?Sized> FuzzyScope<'_, T> {
    pub fn target(&mut self) -> &mut T {
        &mut *self.target
    }

    pub fn apply(
        &mut self,
        request: &ScoreRequest,
        connective: Connective,
    ) -> Result<RelevanceExpression> {
        self.search.apply(&mut *self.target, request, connective)
    }

    pub fn where_fuzzy(&mut self, field: &str, value: &str) -> Result<RelevanceExpression> {
        self.search.where_fuzzy(&mut *self.target, field, value)
    }

    pub fn or_where_fuzzy(&mut self, field: &str, value: &str) -> Result<RelevanceExpression> {
        self.search.or_where_fuzzy(&mut *self.target, field, value)
    }

    pub fn where_fuzzy_extended(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<RelevanceExpression> {
        self.search.where_fuzzy_extended(&mut *self.target, field, value)
    }

    pub fn or_where_fuzzy_extended(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<RelevanceExpression> {
        self.search.or_where_fuzzy_extended(&mut *self.target, field, value)
    }

    pub fn where_fuzzy_custom(
        &mut self,
        field: &str,
        value: &str,
        matchers: MatcherSet,
    ) -> Result<RelevanceExpression> {
        self.search
            .where_fuzzy_custom(&mut *self.target, field, value, matchers)
    }

    pub fn or_where_fuzzy_custom(
        &mut self,
        field: &str,
        value: &str,
        matchers: MatcherSet,
    ) -> Result<RelevanceExpression> {
        self.search
            .or_where_fuzzy_custom(&mut *self.target, field, value, matchers)
    }
}
