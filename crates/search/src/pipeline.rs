use std::fmt;
use std::sync::Arc;

use relevance_dialect::{Dialect, DialectKind, DialectQuoter, LiteralQuoter, QualifiedName};
use serde::Serialize;

use crate::error::{RelevanceError, Result};
use crate::expression::{relevance_alias, Aggregate, RatingBoost, RelevanceExpression};
use crate::matchers::{MatcherKind, Term, NO_MATCH};
use crate::profile::WeightProfile;
use crate::sanitizer::{Sanitizer, SearchValue};
use crate::sets::MatcherSet;

/// Which matchers score a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MatcherSelector {
    #[default]
    Standard,
    /// Standard matchers plus the extended ones.
    Extended,
    /// Caller-supplied matchers only. The result is always wrapped in `MAX`.
    Custom(MatcherSet),
}

impl MatcherSelector {
    /// Reads `standard`, `extended` or a list of `kind=weight` pairs.
    pub fn parse(extended: bool, custom: &[String]) -> Result<Self> {
        if !custom.is_empty() {
            let entries = custom
                .iter()
                .map(|raw| MatcherSet::parse_entry(raw))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::Custom(MatcherSet::custom(entries)?));
        }
        Ok(if extended {
            Self::Extended
        } else {
            Self::Standard
        })
    }
}

/// One field, one search value and the modifiers applied to their score.
#[derive(Clone, Debug)]
pub struct ScoreRequest {
    field: String,
    value: String,
    selector: MatcherSelector,
    aggregate: Option<Aggregate>,
    rating: Option<RatingBoost>,
}

impl ScoreRequest {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            selector: MatcherSelector::Standard,
            aggregate: None,
            rating: None,
        }
    }

    #[must_use]
    pub fn with_selector(mut self, selector: MatcherSelector) -> Self {
        self.selector = selector;
        self
    }

    #[must_use]
    pub fn extended(self) -> Self {
        self.with_selector(MatcherSelector::Extended)
    }

    #[must_use]
    pub fn custom(self, matchers: MatcherSet) -> Self {
        self.with_selector(MatcherSelector::Custom(matchers))
    }

    #[must_use]
    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: RatingBoost) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn selector(&self) -> &MatcherSelector {
        &self.selector
    }

    #[must_use]
    pub const fn aggregate(&self) -> Option<Aggregate> {
        self.aggregate
    }

    #[must_use]
    pub const fn rating(&self) -> Option<&RatingBoost> {
        self.rating.as_ref()
    }
}

/// Contribution of one matcher to an in-memory score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatcherScore {
    pub kind: MatcherKind,
    pub weight: u32,
    pub score: u32,
}

/// Per-matcher scores of one value against one field text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// The value after quote characters were stripped.
    pub value: String,
    pub matchers: Vec<MatcherScore>,
    pub total: u32,
}

/// Compiles fuzzy relevance expressions for one dialect.
///
/// Cheap to clone and safe to share between threads; every call builds its
/// matchers afresh and nothing is cached between calls.
#[derive(Clone)]
pub struct FuzzySearch {
    dialect: Arc<dyn Dialect>,
    quoter: Arc<dyn LiteralQuoter>,
    profile: WeightProfile,
}

impl FuzzySearch {
    /// Uses the profile's dialect and that dialect's own quoting.
    #[must_use]
    pub fn new(profile: WeightProfile) -> Self {
        let dialect = profile.dialect().dialect();
        let quoter: Arc<dyn LiteralQuoter> = Arc::new(DialectQuoter::new(Arc::clone(&dialect)));
        Self {
            dialect,
            quoter,
            profile,
        }
    }

    /// Switches dialect. Also resets the quoter to the new dialect's own.
    #[must_use]
    pub fn with_dialect(self, kind: DialectKind) -> Self {
        Self::new(self.profile.with_dialect(kind))
    }

    /// Routes value quoting through an external facility such as a
    /// connection. Its output must follow the dialect's escaping rules.
    #[must_use]
    pub fn with_quoter(mut self, quoter: Arc<dyn LiteralQuoter>) -> Self {
        self.quoter = quoter;
        self
    }

    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    #[must_use]
    pub const fn profile(&self) -> &WeightProfile {
        &self.profile
    }

    /// The weighted matchers a selector stands for under the current profile.
    #[must_use]
    pub fn matchers(&self, selector: &MatcherSelector) -> MatcherSet {
        match selector {
            MatcherSelector::Standard => self.profile.standard().clone(),
            MatcherSelector::Extended => self.profile.extended(),
            MatcherSelector::Custom(set) => set.clone(),
        }
    }

    pub fn sanitize(&self, raw: &str) -> Result<SearchValue> {
        Sanitizer::new(self.quoter.as_ref(), self.dialect.literal_delimiter()).sanitize(raw)
    }

    pub fn score(&self, request: &ScoreRequest) -> Result<RelevanceExpression> {
        let field = parse_field(request.field())?;
        let dialect = self.dialect.as_ref();
        let native = dialect.coalesce(&field.render(dialect), "''");

        let value = self.sanitize(request.value())?;
        let term = Term::escaped(value.escaped(), dialect);

        let matchers = self.matchers(request.selector());
        if matchers.is_empty() {
            log::warn!("No matchers for {field}; every row scores 0");
        }

        let params = self.profile.params();
        let mut terms: Vec<String> = matchers
            .iter()
            .map(|(kind, weight)| kind.instantiate(weight, params).compile(&native, &term, dialect))
            .collect();
        if terms.is_empty() {
            terms.push(NO_MATCH.to_string());
        }
        if let Some(rating) = request.rating() {
            terms.push(rating.compile(dialect, self.profile.rating_scale()));
        }

        let aggregate = match request.selector() {
            MatcherSelector::Custom(_) => {
                if let Some(requested) = request.aggregate().filter(|a| *a != Aggregate::Max) {
                    log::debug!("Custom matchers always aggregate with MAX, ignoring {requested}");
                }
                Some(Aggregate::Max)
            }
            _ => request.aggregate(),
        };

        let sum = terms.join(" + ");
        let sql = match aggregate {
            Some(aggregate) => dialect.call(aggregate.as_sql(), &sum),
            None => sum,
        };

        let alias = relevance_alias(&field);
        log::debug!(
            "Compiled {} matchers for {} into {} ({})",
            matchers.len(),
            field,
            alias,
            dialect.kind()
        );
        Ok(RelevanceExpression::new(sql, alias))
    }

    /// Scores `raw_value` against a field value in memory, with the same
    /// matcher semantics as the compiled expression. A missing field value
    /// counts as the empty string. Rating and aggregate modifiers do not apply.
    pub fn explain(
        &self,
        field_text: Option<&str>,
        raw_value: &str,
        selector: &MatcherSelector,
    ) -> Result<ScoreBreakdown> {
        let value = self.sanitize(raw_value)?;
        let term = Term::clean(value.clean());
        let text = field_text.unwrap_or("");
        let params = self.profile.params();

        let matchers: Vec<MatcherScore> = self
            .matchers(selector)
            .iter()
            .map(|(kind, weight)| MatcherScore {
                kind,
                weight,
                score: kind.instantiate(weight, params).evaluate(text, &term),
            })
            .collect();
        let total = matchers
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(m.score));

        Ok(ScoreBreakdown {
            value: value.clean().to_string(),
            matchers,
            total,
        })
    }
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new(WeightProfile::builtin())
    }
}

impl fmt::Debug for FuzzySearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzySearch")
            .field("dialect", &self.dialect.kind())
            .field("profile", &self.profile.name())
            .finish_non_exhaustive()
    }
}

pub(crate) fn parse_field(field: &str) -> Result<QualifiedName> {
    QualifiedName::parse(field).map_err(|err| RelevanceError::InvalidField {
        field: field.to_string(),
        reason: err.to_string(),
    })
}
