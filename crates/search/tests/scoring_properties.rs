use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relevance_search::{
    Dialect, DialectKind, FuzzySearch, MatcherKind, MatcherParams, MatcherSelector, MatcherSet,
    ScoreRequest, SelectQuery, Term, SCORED_SUBQUERY,
};

fn exact_only() -> MatcherSet {
    MatcherSet::custom([(MatcherKind::Exact, 100)]).unwrap()
}

#[test]
fn custom_exact_scores_weight_or_nothing() {
    let search = FuzzySearch::default();
    let selector = MatcherSelector::Custom(exact_only());

    let hit = search.explain(Some("John"), "john", &selector).unwrap();
    assert_eq!(hit.total, 100);
    let miss = search.explain(Some("Jon"), "john", &selector).unwrap();
    assert_eq!(miss.total, 0);
}

#[test]
fn quote_characters_never_reach_the_expression() {
    let search = FuzzySearch::default();
    let expr = search
        .score(&ScoreRequest::new("users.name", "o'br\"en").custom(exact_only()))
        .unwrap();
    assert_eq!(
        expr.sql(),
        "MAX(IF(COALESCE(`users`.`name`, '') = 'obren', 100, 0))"
    );
    assert_eq!(expr.alias(), "fuzzy_relevance_users_name");
}

#[test]
fn empty_value_compiles_to_zero_terms() {
    let search = FuzzySearch::default();
    let expr = search.score(&ScoreRequest::new("name", "")).unwrap();
    assert_eq!(expr.sql(), "0 + 0 + 0 + 0 + 0 + 0");

    let expr = search
        .score(&ScoreRequest::new("name", "  ").extended())
        .unwrap();
    assert_eq!(expr.sql(), vec!["0"; 10].join(" + "));
}

#[test]
fn extended_expression_contains_standard_terms() {
    let search = FuzzySearch::default();
    let standard = search.score(&ScoreRequest::new("name", "jo sm")).unwrap();
    let extended = search
        .score(&ScoreRequest::new("name", "jo sm").extended())
        .unwrap();
    assert!(extended.sql().starts_with(standard.sql()));
    assert_eq!(standard.alias(), extended.alias());
}

#[test]
fn mysql_query_filters_on_the_alias_in_having() {
    let search = FuzzySearch::default();
    let mut query = SelectQuery::new("users").unwrap();
    search.where_fuzzy_extended(&mut query, "users.name", "jo").unwrap();
    search.order_by_fuzzy(&mut query, &["users.name"]).unwrap();

    let sql = query.to_sql(search.dialect());
    assert!(sql.starts_with("SELECT *, "), "{sql}");
    assert!(
        sql.ends_with(
            "AS fuzzy_relevance_users_name FROM `users` \
             HAVING fuzzy_relevance_users_name > 0 \
             ORDER BY fuzzy_relevance_users_name DESC"
        ),
        "{sql}"
    );
}

#[test]
fn postgres_query_filters_the_alias_outside_a_derived_table() {
    let search = FuzzySearch::default().with_dialect(DialectKind::Postgres);
    let mut query = SelectQuery::new("users").unwrap();
    search.where_fuzzy_extended(&mut query, "users.name", "jo").unwrap();
    search
        .with_minimum_relevance(&mut query, "users.name", 40)
        .unwrap();
    search.order_by_fuzzy(&mut query, &["users.name"]).unwrap();

    let sql = query.to_sql(search.dialect());
    assert!(sql.starts_with("SELECT * FROM (SELECT *, "), "{sql}");
    assert!(
        sql.ends_with(&format!(
            "AS fuzzy_relevance_users_name FROM {}) AS {SCORED_SUBQUERY} \
             WHERE fuzzy_relevance_users_name > 0 AND fuzzy_relevance_users_name >= 40 \
             ORDER BY fuzzy_relevance_users_name DESC",
            search.dialect().quote_identifier("users")
        )),
        "{sql}"
    );
    assert!(!sql.contains("HAVING"), "{sql}");
}

fn word_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}( [a-zA-Z0-9]{1,8}){0,3}"
}

proptest! {
    #[test]
    fn matchers_score_their_weight_on_identical_text(value in word_value(), weight in 1u32..500) {
        let params = MatcherParams::default();
        for kind in MatcherKind::ALL {
            if matches!(kind, MatcherKind::Acronym | MatcherKind::StudlyCase) {
                continue;
            }
            let matcher = kind.instantiate(weight, &params);
            prop_assert_eq!(matcher.evaluate(&value, &Term::clean(&value)), weight, "{}", kind);
        }
    }

    #[test]
    fn score_does_not_depend_on_matcher_order(text in "\\PC{0,24}", value in "\\PC{0,12}") {
        let search = FuzzySearch::default();
        let forward: Vec<_> = MatcherSet::extended().iter().collect();
        let backward = MatcherSet::custom(forward.iter().rev().copied()).unwrap();
        let forward = MatcherSet::custom(forward).unwrap();

        let a = search.explain(Some(&text), &value, &MatcherSelector::Custom(forward)).unwrap();
        let b = search.explain(Some(&text), &value, &MatcherSelector::Custom(backward)).unwrap();
        prop_assert_eq!(a.total, b.total);
    }

    #[test]
    fn extended_never_scores_below_standard(text in "[a-zA-Z %_ ]{0,24}", value in "[a-zA-Z ]{0,12}") {
        let search = FuzzySearch::default();
        let standard = search.explain(Some(&text), &value, &MatcherSelector::Standard).unwrap();
        let extended = search.explain(Some(&text), &value, &MatcherSelector::Extended).unwrap();
        prop_assert!(extended.total >= standard.total);
    }

    #[test]
    fn empty_value_scores_zero(text in "\\PC{0,24}") {
        let search = FuzzySearch::default();
        for selector in [MatcherSelector::Standard, MatcherSelector::Extended] {
            prop_assert_eq!(search.explain(Some(&text), "", &selector).unwrap().total, 0);
        }
    }

    #[test]
    fn sanitizing_is_idempotent(raw in "\\PC{0,32}") {
        for kind in [DialectKind::Mysql, DialectKind::Postgres] {
            let search = FuzzySearch::default().with_dialect(kind);
            let once = search.sanitize(&raw).unwrap();
            let twice = search.sanitize(once.clean()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn alias_flattens_dotted_fields(table in "[a-z][a-z0-9_]{0,10}", column in "[a-z][a-z0-9_]{0,10}") {
        let search = FuzzySearch::default();
        let field = format!("{table}.{column}");
        let expr = search.score(&ScoreRequest::new(field.as_str(), "x")).unwrap();
        prop_assert_eq!(expr.alias(), format!("fuzzy_relevance_{table}_{column}"));
    }
}
