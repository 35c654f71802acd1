mod common;

use charting_core::widget::WidgetTree;
use charting_forms::error::FormsError;
use charting_forms::format::{UnknownKeyPolicy, format_submission};
use serde_json::{Value, json};

fn answers(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("answers must be an object"),
    }
}

fn format(value: Value) -> Value {
    let payload = format_submission(&answers(value), &common::chart(), UnknownKeyPolicy::Drop)
        .expect("format should succeed");
    serde_json::to_value(payload).expect("payload serializes")
}

#[test]
fn dates_become_date_only_strings() {
    let out = format(json!({ "visit_date": "2024-02-02T00:00:00.000Z" }));
    assert_eq!(out, json!({ "chartingData": { "visit_date": "2024-02-02" } }));
}

#[test]
fn invalid_dates_are_omitted() {
    let out = format(json!({ "visit_date": "not a date", "weight_date": null }));
    assert_eq!(out, json!({ "chartingData": {} }));
}

#[test]
fn empty_text_is_omitted() {
    let out = format(json!({
        "follow_up": "",
        "assessment_notes": "",
        "current_weight": "",
        "start_time": "",
        "contact_phone": ""
    }));
    assert_eq!(out, json!({ "chartingData": {} }));
}

#[test]
fn tag_labels_are_dropped() {
    let out = format(json!({
        "medications_list": [{ "value": "a", "type": "predefined", "label": "A" }]
    }));
    assert_eq!(
        out["chartingData"]["medications_list"],
        json!([{ "value": "a", "type": "predefined" }])
    );
}

#[test]
fn radio_answers_are_tagged() {
    let basic = format(json!({ "food_allergies": "none" }));
    assert_eq!(
        basic["chartingData"]["food_allergies"],
        json!({ "type": "basic", "value": "none" })
    );

    let with_text = format(json!({ "food_allergies": { "yes": "Shellfish" } }));
    assert_eq!(
        with_text["chartingData"]["food_allergies"],
        json!({ "type": "text-input", "value": "yes", "freeText": "Shellfish" })
    );
}

#[test]
fn table_entries_are_formatted_per_column() {
    let out = format(json!({
        "labs": [
            {
                "key": "a1",
                "value": {
                    "lab_name": "A1C",
                    "lab_value": "5.4",
                    "lab_date": "2024-01-15T00:00:00.000Z"
                }
            },
            { "key": "b2", "value": { "lab_name": "", "lab_value": "" } }
        ]
    }));

    assert_eq!(
        out["chartingData"]["labs"],
        json!([
            { "key": "a1", "value": { "lab_name": "A1C", "lab_value": "5.4", "lab_date": "2024-01-15" } },
            { "key": "b2", "value": {} }
        ])
    );
}

#[test]
fn entry_editor_unwraps_values() {
    let out = format(json!({
        "nutrition_goals": [
            { "key": "0", "value": "increase_fiber" },
            { "key": "1", "value": "" },
            { "key": "2", "value": "hydration" }
        ]
    }));
    assert_eq!(
        out["chartingData"]["nutrition_goals"],
        json!(["increase_fiber", "hydration"])
    );

    let blank = format(json!({ "nutrition_goals": [{ "key": "0", "value": "" }] }));
    assert_eq!(blank, json!({ "chartingData": {} }));
}

#[test]
fn unknown_keys_are_dropped_by_default() {
    let out = format(json!({ "retired_field": "x", "follow_up": "2 weeks" }));
    assert_eq!(out, json!({ "chartingData": { "follow_up": "2 weeks" } }));
}

#[test]
fn unknown_keys_can_be_rejected() {
    let err = format_submission(
        &answers(json!({ "retired_field": "x" })),
        &common::chart(),
        UnknownKeyPolicy::Reject,
    )
    .unwrap_err();
    assert!(matches!(err, FormsError::UnknownKey(key) if key == "retired_field"));
}

#[test]
fn undecodable_values_are_dropped() {
    let out = format(json!({ "food_allergies": 42, "follow_up": "2 weeks" }));
    assert_eq!(out, json!({ "chartingData": { "follow_up": "2 weeks" } }));
}

#[test]
fn other_leaves_pass_through() {
    let out = format(json!({
        "pregnancy": false,
        "main_reason": "diabetes",
        "dietary_patterns": { "vegan": true, "vegetarian": false }
    }));
    assert_eq!(
        out,
        json!({
            "chartingData": {
                "pregnancy": false,
                "main_reason": "diabetes",
                "dietary_patterns": { "vegan": true, "vegetarian": false }
            }
        })
    );
}

#[test]
fn scalar_and_choice_values_keep_their_frontend_shape() {
    let out = format(json!({
        "current_weight": "165",
        "risk_score": 2,
        "main_reason": { "label": "Diabetes", "value": "diabetes" },
        "pregnancy": "yes",
        "follow_up": 42,
        "referral_source": ["self", "physician"]
    }));
    assert_eq!(
        out,
        json!({
            "chartingData": {
                "current_weight": "165",
                "risk_score": 2,
                "main_reason": { "label": "Diabetes", "value": "diabetes" },
                "pregnancy": "yes",
                "follow_up": 42,
                "referral_source": ["self", "physician"]
            }
        })
    );
}

#[test]
fn radio_with_blank_free_text_is_basic() {
    let out = format(json!({ "food_allergies": { "yes": "" } }));
    assert_eq!(
        out["chartingData"]["food_allergies"],
        json!({ "type": "basic", "value": "yes" })
    );
}

#[test]
fn full_general_wellness_chart() {
    let out = format(Value::Object(common::filled_answers()));

    assert_eq!(
        out,
        json!({
            "chartingData": {
                "visit_date": "2024-02-02",
                "start_time": "08:00",
                "end_time": "08:35",
                "main_reason": "general_wellness",
                "referral_source": "self",
                "pregnancy": false,
                "wellness_goals": "Eat more vegetables",
                "current_weight": "165",
                "weight_date": "2024-01-30",
                "food_allergies": { "type": "text-input", "value": "yes", "freeText": "Peanuts" },
                "dietary_patterns": { "vegetarian": true, "vegan": false, "gluten_free": false },
                "labs": [
                    { "key": "a1", "value": { "lab_name": "A1C", "lab_value": "5.4", "lab_date": "2024-01-15" } },
                    { "key": "b2", "value": { "lab_name": "LDL" } }
                ],
                "nutrition_goals": ["increase_fiber"],
                "pes_statement": {
                    "nutrition_diagnosis": "inadequate_energy_intake",
                    "related_to": "food_insecurity",
                    "signs_and_symptoms": "Skipping meals"
                },
                "assessment_notes": "Stable"
            }
        })
    );
    assert!(out["chartingData"].get("pregnancy_due_date").is_none());
    assert!(out["chartingData"].get("medications_list").is_none());
}

#[test]
fn payload_never_holds_empty_strings() {
    let out = format(Value::Object(common::filled_answers()));
    fn has_empty_string(value: &Value) -> bool {
        match value {
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.iter().any(has_empty_string),
            Value::Object(obj) => obj.values().any(has_empty_string),
            _ => false,
        }
    }
    assert!(!has_empty_string(&out));
}

#[test]
fn bare_widget_arrays_parse_as_trees() {
    let tree = WidgetTree::from_json(json!([{ "type": "input:text", "key": "only" }]))
        .expect("tree should parse");
    let payload = format_submission(&answers(json!({ "only": "x" })), &tree, UnknownKeyPolicy::Drop)
        .expect("format");
    assert_eq!(payload.charting_data["only"], json!("x"));
}
