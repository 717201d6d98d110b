use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// parse_literal
// -----------------------------------------------------------------------

#[test]
fn parses_plain_json() {
    let value = parse_literal(r#"{"a": [1, 2.5, "x", true, null]}"#).unwrap();
    assert_eq!(value, json!({"a": [1, 2.5, "x", true, null]}));
}

#[test]
fn parses_unquoted_and_single_quoted_keys() {
    let value = parse_literal("{ familyType: 'iphone-16', 'part-number': \"MYE73\", $id: 1 }").unwrap();
    assert_eq!(
        value,
        json!({"familyType": "iphone-16", "part-number": "MYE73", "$id": 1})
    );
}

#[test]
fn accepts_trailing_commas_and_comments() {
    let source = r"{
        // colors in display order
        variantOrder: ['black', 'white',], /* trailing */
    }";
    let value = parse_literal(source).unwrap();
    assert_eq!(value, json!({"variantOrder": ["black", "white"]}));
}

#[test]
fn array_elision_decodes_as_null() {
    assert_eq!(parse_literal("[1,,2]").unwrap(), json!([1, null, 2]));
}

#[test]
fn undefined_nan_and_infinity_decode_as_null() {
    let value = parse_literal("[undefined, NaN, Infinity, -Infinity]").unwrap();
    assert_eq!(value, json!([null, null, null, null]));
}

#[test]
fn parses_number_forms() {
    let value = parse_literal("[-3, +4, .5, 1e3, 0x1F, 9007199254740993]").unwrap();
    assert_eq!(value[0], json!(-3));
    assert_eq!(value[1], json!(4));
    assert_eq!(value[2], json!(0.5));
    assert_eq!(value[3], json!(1000.0));
    assert_eq!(value[4], json!(31));
    assert_eq!(value[5], json!(9_007_199_254_740_993_i64));
}

#[test]
fn decodes_string_escapes() {
    let value = parse_literal(r#"'it\'s \"quoted\"\n\x41é\u{1F4F1}📱'"#).unwrap();
    assert_eq!(value, json!("it's \"quoted\"\nAé📱📱"));
}

#[test]
fn template_literal_without_substitution_is_a_string() {
    assert_eq!(parse_literal("`line one\nline two`").unwrap(), json!("line one\nline two"));
}

#[test]
fn template_literal_with_substitution_fails() {
    let err = parse_literal("`hello ${name}`").unwrap_err();
    assert!(err.message.contains("template"), "{err}");
}

#[test]
fn function_values_are_skipped() {
    let source = r"{
        onSelect: function (event) { if (event) { return '}'; } },
        render: (a, b) => { return a + b; },
        map: x => x * 2,
        init() { return {}; },
        value: 7
    }";
    let value = parse_literal(source).unwrap();
    assert_eq!(value["onSelect"], Value::Null);
    assert_eq!(value["render"], Value::Null);
    assert_eq!(value["map"], Value::Null);
    assert_eq!(value["init"], Value::Null);
    assert_eq!(value["value"], json!(7));
}

#[test]
fn parenthesized_literal_is_unwrapped() {
    assert_eq!(parse_literal("({a: 1})").unwrap(), json!({"a": 1}));
}

#[test]
fn unterminated_string_reports_its_start() {
    let err = parse_literal("{a: 'open}").unwrap_err();
    assert_eq!(err.offset, 4);
    assert!(err.message.contains("unterminated string"));
}

#[test]
fn rejects_arbitrary_expressions() {
    let err = parse_literal("{a: window.location}").unwrap_err();
    assert!(err.message.contains("unsupported expression"), "{err}");
}

#[test]
fn rejects_excessive_nesting() {
    let source = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
    let err = parse_literal(&source).unwrap_err();
    assert!(err.message.contains("nesting"), "{err}");
}

#[test]
fn accepts_nesting_at_the_limit() {
    let source = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
    assert!(parse_literal(&source).is_ok());
}

// -----------------------------------------------------------------------
// evaluate
// -----------------------------------------------------------------------

#[test]
fn evaluate_binds_last_path_segment() {
    let eval = evaluate("window.BOOT = {a: 1};\nvar other = [2]; const x = 'y'");
    assert!(eval.error.is_none(), "{:?}", eval.error);
    assert_eq!(eval.bindings["BOOT"], json!({"a": 1}));
    assert_eq!(eval.bindings["other"], json!([2]));
    assert_eq!(eval.bindings["x"], json!("y"));
}

#[test]
fn evaluate_supports_bracket_property_targets() {
    let eval = evaluate(r#"window["BOOT"] = {ok: true};"#);
    assert_eq!(eval.bindings["BOOT"], json!({"ok": true}));
}

#[test]
fn evaluate_accepts_newline_terminated_statements() {
    let eval = evaluate("A = 1\nB = 2");
    assert!(eval.error.is_none());
    assert_eq!(eval.bindings.len(), 2);
}

#[test]
fn evaluate_keeps_bindings_made_before_a_failure() {
    let eval = evaluate("BOOT = {a: 1};\ninitPage(BOOT);");
    assert_eq!(eval.bindings["BOOT"], json!({"a": 1}));
    assert!(eval.error.is_some());
}

#[test]
fn evaluate_rejects_comparison() {
    let eval = evaluate("BOOT == 1;");
    assert!(eval.bindings.is_empty());
    assert!(eval.error.is_some());
}

#[test]
fn evaluate_requires_separator_between_statements() {
    let eval = evaluate("A = 1 B = 2");
    assert_eq!(eval.bindings.len(), 0);
    assert!(eval.error.unwrap().message.contains("expected ';'"));
}
