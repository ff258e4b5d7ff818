//! Tests for engine module - ordered rule application.

use omni_replace::{ReplaceError, Rule, RuleSet, apply, apply_streaming};

fn rule_set(rules: Vec<Rule>) -> RuleSet {
    RuleSet::new(rules).expect("Compile rules")
}

#[test]
fn test_rules_apply_to_prior_output() {
    let rules = rule_set(vec![Rule::literal("A", "B"), Rule::literal("B", "C")]);
    let result = apply("A", &rules);
    assert_eq!(result.modified, "C");
}

#[test]
fn test_reversed_order_stops_early() {
    let rules = rule_set(vec![Rule::literal("B", "C"), Rule::literal("A", "B")]);
    let result = apply("A", &rules);
    assert_eq!(result.modified, "B");
    assert_eq!(result.count, 1);
}

#[test]
fn test_replacement_count() {
    let rules = rule_set(vec![Rule::literal("x", "y")]);
    let result = apply("xxx", &rules);
    assert_eq!(result.modified, "yyy");
    assert_eq!(result.count, 3);
}

#[test]
fn test_metacharacters_are_literal() {
    let rules = rule_set(vec![Rule::literal("$.get(", "fetch(")]);
    let result = apply("$.get(url); $xget(url)", &rules);
    assert_eq!(result.modified, "fetch(url); $xget(url)");
    assert_eq!(result.count, 1);
}

#[test]
fn test_matches_do_not_overlap() {
    let rules = rule_set(vec![Rule::literal("aa", "b")]);
    let result = apply("aaaaa", &rules);
    assert_eq!(result.modified, "bba");
    assert_eq!(result.count, 2);
}

#[test]
fn test_regex_opt_in() {
    let rules = rule_set(vec![Rule::regex(r"(?m)^import (\w+)$", "use $1;")]);
    let result = apply("import foo\nimport bar\n", &rules);
    assert_eq!(result.modified, "use foo;\nuse bar;\n");
    assert_eq!(result.count, 2);
}

#[test]
fn test_invalid_regex_rejected() {
    let err = RuleSet::new(vec![Rule::regex("[unclosed", "x")]).unwrap_err();
    assert!(matches!(err, ReplaceError::Pattern { index: 0, .. }));
}

#[test]
fn test_unicode_content() {
    let rules = rule_set(vec![Rule::literal("车辆", "vehicle")]);
    let result = apply("车辆管理 / 车辆", &rules);
    assert_eq!(result.modified, "vehicle管理 / vehicle");
    assert_eq!(result.count, 2);
}

#[test]
fn test_streaming_agrees_with_whole_text() {
    let rules = rule_set(vec![
        Rule::literal("jms-web", "yl-jms-wd"),
        Rule::literal("yl-jms-wd-smartdevice", "device"),
    ]);
    let input = "import x from 'jms-web-smartdevice';\nconst y = 1;\n".repeat(500);

    let mut streamed = Vec::new();
    let summary = apply_streaming(input.as_bytes(), &mut streamed, &rules, 1024).expect("Stream");
    let whole = apply(&input, &rules);

    assert_eq!(String::from_utf8(streamed).expect("utf8"), whole.modified);
    assert_eq!(summary.count, whole.count);
    assert!(!summary.binary);
}
