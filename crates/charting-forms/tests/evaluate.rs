use charting_core::condition::Condition;
use charting_forms::evaluate::{LookupFn, any_satisfied, is_satisfied};
use charting_forms::Lookup;
use serde_json::{Value, json};

fn answers(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("answers must be an object"),
    }
}

fn condition(value: Value) -> Condition {
    Condition::from_json(value).expect("condition should parse")
}

#[test]
fn empty_and_is_true_and_empty_or_is_false() {
    let values = answers(json!({}));
    assert!(is_satisfied(&Condition::And { conditions: vec![] }, &values));
    assert!(!is_satisfied(&Condition::Or { conditions: vec![] }, &values));
}

#[test]
fn string_in_tracks_membership() {
    let values = answers(json!({ "main_reason": "diabetes" }));
    let member = condition(json!({
        "type": "stringIn", "key": "main_reason", "values": ["diabetes", "weight_management"]
    }));
    let not_member = condition(json!({
        "type": "stringIn", "key": "main_reason", "values": ["weight_management"]
    }));

    assert!(is_satisfied(&member, &values));
    assert!(!is_satisfied(&not_member, &values));
}

#[test]
fn string_equals_is_strict() {
    let values = answers(json!({ "count": 2, "reason": "diabetes" }));
    assert!(is_satisfied(
        &condition(json!({ "type": "stringEquals", "key": "reason", "value": "diabetes" })),
        &values
    ));
    // A number never equals a string.
    assert!(!is_satisfied(
        &condition(json!({ "type": "stringEquals", "key": "count", "value": "2" })),
        &values
    ));
}

#[test]
fn numeric_in_coerces_strings() {
    let values = answers(json!({ "risk_score": "2" }));
    let c = condition(json!({ "type": "numericIn", "key": "risk_score", "values": [1, 2, 3] }));
    assert!(is_satisfied(&c, &values));
}

#[test]
fn numeric_conditions_fail_closed_on_bad_input() {
    let c = condition(json!({ "type": "numericEquals", "key": "risk_score", "value": 0 }));
    for raw in [json!("abc"), json!(""), json!(null), json!(false), json!(["0"])] {
        let values = answers(json!({ "risk_score": raw }));
        assert!(!is_satisfied(&c, &values), "{raw} should not coerce");
    }
    assert!(!is_satisfied(&c, &answers(json!({}))));
}

#[test]
fn boolean_equals_requires_a_boolean() {
    let c = condition(json!({ "type": "booleanEquals", "key": "pregnancy", "value": true }));
    assert!(is_satisfied(&c, &answers(json!({ "pregnancy": true }))));
    assert!(!is_satisfied(&c, &answers(json!({ "pregnancy": "true" }))));
    assert!(!is_satisfied(&c, &answers(json!({ "pregnancy": false }))));
}

#[test]
fn not_null_follows_truthiness() {
    let c = condition(json!({ "type": "notNull", "key": "field" }));
    assert!(is_satisfied(&c, &answers(json!({ "field": "x" }))));
    assert!(is_satisfied(&c, &answers(json!({ "field": [] }))));
    assert!(!is_satisfied(&c, &answers(json!({ "field": "" }))));
    assert!(!is_satisfied(&c, &answers(json!({ "field": false }))));
    assert!(!is_satisfied(&c, &answers(json!({ "field": null }))));
    assert!(!is_satisfied(&c, &answers(json!({}))));
}

#[test]
fn nested_and_or_recurse() {
    let c = condition(json!({
        "type": "and",
        "conditions": [
            { "type": "notNull", "key": "main_reason" },
            {
                "type": "or",
                "conditions": [
                    { "type": "booleanEquals", "key": "pregnancy", "value": true },
                    { "type": "numericEquals", "key": "risk_score", "value": 3 }
                ]
            }
        ]
    }));

    assert!(is_satisfied(&c, &answers(json!({ "main_reason": "x", "risk_score": 3 }))));
    assert!(!is_satisfied(&c, &answers(json!({ "main_reason": "x", "risk_score": 1 }))));
    assert!(!is_satisfied(&c, &answers(json!({ "pregnancy": true }))));
    assert_eq!(c.keys(), vec!["main_reason", "pregnancy", "risk_score"]);
}

#[test]
fn any_satisfied_is_a_logical_or() {
    let values = answers(json!({ "main_reason": "diabetes" }));
    let conditions = vec![
        condition(json!({ "type": "stringEquals", "key": "main_reason", "value": "weight_management" })),
        condition(json!({ "type": "stringEquals", "key": "main_reason", "value": "diabetes" })),
    ];
    assert!(any_satisfied(&conditions, &values));
    assert!(!any_satisfied(&conditions[..1], &values));
    assert!(!any_satisfied(&[], &values));
}

#[test]
fn closures_can_serve_as_lookups() {
    let lookup = LookupFn(|key: &str| match key {
        "risk_score" => Lookup::Number(2.0),
        _ => Lookup::Null,
    });
    let c = condition(json!({ "type": "numericIn", "key": "risk_score", "values": [2] }));
    assert!(is_satisfied(&c, &lookup));
}

#[test]
fn unknown_condition_type_is_a_configuration_error() {
    let err = Condition::from_json(json!({ "type": "stringStartsWith", "key": "a", "value": "b" }))
        .unwrap_err();
    assert!(matches!(err, charting_core::error::CoreError::Configuration(_)));
}
