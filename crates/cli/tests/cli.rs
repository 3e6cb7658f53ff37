use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn relevance() -> Command {
    let mut cmd = Command::cargo_bin("relevance").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let output = relevance().args(args).arg("--json").output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn compile_prints_aliased_expression() {
    relevance()
        .args(["compile", "--field", "users.name", "--value", "o'br\"en", "--matcher", "exact=100"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "MAX(IF(COALESCE(`users`.`name`, '') = 'obren', 100, 0)) AS fuzzy_relevance_users_name\n",
        ));
}

#[test]
fn compile_json_reports_alias_and_sql() {
    let body = run_json(&[
        "compile",
        "--field",
        "title",
        "--value",
        "lamp",
        "--extended",
        "--aggregate",
        "sum",
        "--rating-table",
        "products",
        "--rating-column",
        "rating",
    ]);
    assert_eq!(body["alias"], "fuzzy_relevance_title");
    let sql = body["sql"].as_str().unwrap();
    assert!(sql.starts_with("SUM(IF("), "{sql}");
    assert!(sql.contains("NULLIF((SELECT MAX(`rating`) FROM `products`), 0)"), "{sql}");
    assert_eq!(
        body["select"].as_str().unwrap(),
        format!("{sql} AS fuzzy_relevance_title")
    );
}

#[test]
fn postgres_dialect_flag_switches_syntax() {
    let body = run_json(&["--dialect", "pg", "compile", "--field", "name", "--value", "jo"]);
    let sql = body["sql"].as_str().unwrap();
    assert!(sql.contains("CASE WHEN"), "{sql}");
    assert!(sql.contains("\"name\""), "{sql}");
    assert!(!sql.contains('`'), "{sql}");
}

#[test]
fn explain_lists_each_matcher() {
    let body = run_json(&["explain", "--text", "John Smith", "--value", "john smith"]);
    let matchers = body["matchers"].as_array().unwrap();
    assert_eq!(matchers.len(), 6);
    assert_eq!(matchers[0]["kind"], "exact");
    assert_eq!(matchers[0]["score"], 100);
    let total: u64 = matchers.iter().map(|m| m["score"].as_u64().unwrap()).sum();
    assert_eq!(body["total"].as_u64().unwrap(), total);
}

#[test]
fn explain_text_output_has_total_line() {
    relevance()
        .args(["explain", "--text", "FooBar", "--value", "fb", "--extended"])
        .assert()
        .success()
        .stdout(predicate::str::contains("studly_case"))
        .stdout(predicate::str::contains("total"));
}

#[test]
fn query_builds_full_select() {
    relevance()
        .args([
            "query", "--table", "users", "--field", "first_name", "--field", "last_name",
            "--value", "jo", "--any", "--limit", "20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SELECT *, "))
        .stdout(predicate::str::contains(
            "HAVING fuzzy_relevance_first_name > 0 OR fuzzy_relevance_last_name > 0",
        ))
        .stdout(predicate::str::contains(
            "ORDER BY fuzzy_relevance_first_name + fuzzy_relevance_last_name DESC LIMIT 20",
        ));
}

#[test]
fn postgres_query_filters_outside_a_derived_table() {
    relevance()
        .args([
            "--dialect", "postgres", "query", "--table", "users", "--field", "name", "--value",
            "jo", "--min-relevance", "30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SELECT * FROM (SELECT *, "))
        .stdout(predicate::str::contains(
            "FROM \"users\") AS scored WHERE fuzzy_relevance_name > 0 AND fuzzy_relevance_name >= 30 \
             ORDER BY fuzzy_relevance_name DESC",
        ))
        .stdout(predicate::str::contains("HAVING").not());
}

#[test]
fn custom_matcher_query_renders_group_by() {
    relevance()
        .args([
            "query", "--table", "orders", "--field", "note", "--value", "gift", "--matcher",
            "exact=100", "--group-by", "customer_id", "--group-by", "status",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "FROM `orders` GROUP BY customer_id, status HAVING fuzzy_relevance_note > 0",
        ));
}

#[test]
fn custom_matcher_query_requires_group_by() {
    relevance()
        .args([
            "query", "--table", "orders", "--field", "note", "--value", "gift", "--matcher",
            "exact=100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--group-by"));
}

#[test]
fn query_min_relevance_conflicts_with_any() {
    relevance()
        .args([
            "query", "--table", "users", "--field", "name", "--value", "jo", "--any",
            "--min-relevance", "50",
        ])
        .assert()
        .failure();
}

#[test]
fn rejects_invalid_field() {
    relevance()
        .args(["compile", "--field", "users.na`me", "--value", "jo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid field reference"));
}

#[test]
fn rejects_zero_weight_matcher() {
    relevance()
        .args(["compile", "--field", "name", "--value", "jo", "--matcher", "exact=0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn profile_file_overrides_weights() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("weights.toml");
    fs::write(&path, "rating_scale = 3\n\n[standard]\nexact = 7\n").unwrap();

    let body = run_json(&[
        "--profile",
        path.to_str().unwrap(),
        "compile",
        "--field",
        "name",
        "--value",
        "jo",
        "--rating-table",
        "t",
        "--rating-column",
        "r",
    ]);
    let sql = body["sql"].as_str().unwrap();
    assert!(sql.starts_with("IF(COALESCE(`name`, '') = 'jo', 7, 0)"), "{sql}");
    assert!(sql.ends_with("* 3, 0)"), "{sql}");
}

#[test]
fn invalid_profile_is_reported() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bad.json");
    fs::write(&path, r#"{ "standard": { "soundex": 5 } }"#).unwrap();

    relevance()
        .args(["--profile", path.to_str().unwrap(), "compile", "--field", "name", "--value", "jo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("standard.soundex"));
}
