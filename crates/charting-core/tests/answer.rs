use charting_core::answer::{Answer, RadioAnswer, TagSelection};
use charting_core::error::CoreError;
use charting_core::widget::{Widget, WidgetTree};
use jiff::civil::date;
use serde_json::{Value, json};

fn widget(value: Value) -> Widget {
    serde_json::from_value(value).expect("widget should parse")
}

#[test]
fn blank_values_decode_to_empty_for_every_kind() {
    let widgets = [
        json!({ "type": "input:text", "key": "k" }),
        json!({ "type": "input:number", "key": "k" }),
        json!({ "type": "input:date", "key": "k" }),
        json!({ "type": "input:radio", "key": "k" }),
        json!({ "type": "tag-input", "key": "k" }),
        json!({ "type": "table", "key": "k", "columns": [] }),
        json!({ "type": "tiered-inputs", "key": "k", "inputs": [] }),
    ];
    for w in widgets {
        let w = widget(w);
        assert_eq!(Answer::decode(&w, &json!(null)).expect("null"), Answer::Empty);
        assert_eq!(Answer::decode(&w, &json!("")).expect("empty"), Answer::Empty);
    }
}

#[test]
fn dates_accept_timestamps_and_plain_dates() {
    let w = widget(json!({ "type": "input:date", "key": "visit_date" }));
    assert_eq!(
        Answer::decode(&w, &json!("2024-02-02T00:00:00.000Z")).expect("timestamp"),
        Answer::Date(date(2024, 2, 2))
    );
    assert_eq!(
        Answer::decode(&w, &json!("2024-02-02")).expect("date"),
        Answer::Date(date(2024, 2, 2))
    );
    assert_eq!(
        Answer::decode(&w, &json!("02/02/2024")).expect("unparseable"),
        Answer::Empty
    );
}

#[test]
fn scalar_and_choice_kinds_keep_the_frontend_value() {
    let cases = [
        ("input:number", json!("165")),
        ("input:text", json!(42)),
        ("select", json!({ "label": "Self", "value": "self" })),
        ("combobox", json!(["self", "physician"])),
        ("input:checkbox", json!("yes")),
    ];
    for (kind, raw) in cases {
        let w = widget(json!({ "type": kind, "key": "k" }));
        assert_eq!(Answer::decode(&w, &raw).expect("decode"), Answer::Raw(raw.clone()));
    }
}

#[test]
fn malformed_entry_lists_name_their_key() {
    let w = widget(json!({ "type": "entry-editor", "key": "goals" }));
    let err = Answer::decode(&w, &json!("not a list")).unwrap_err();
    assert!(matches!(err, CoreError::Decode { ref key, .. } if key == "goals"));
}

#[test]
fn radio_with_free_text() {
    let w = widget(json!({ "type": "input:radio", "key": "allergies" }));
    assert_eq!(
        Answer::decode(&w, &json!({ "yes": "Peanuts" })).expect("with text"),
        Answer::Radio(RadioAnswer::WithText {
            value: "yes".to_string(),
            free_text: "Peanuts".to_string(),
        })
    );
    assert!(Answer::decode(&w, &json!({ "a": "1", "b": "2" })).is_err());
}

#[test]
fn tag_labels_are_discarded() {
    let w = widget(json!({ "type": "tag-input", "key": "meds" }));
    let answer = Answer::decode(
        &w,
        &json!([{ "value": "metformin", "type": "predefined", "label": "Metformin" }]),
    )
    .expect("tags");
    assert_eq!(
        answer,
        Answer::Tags(vec![TagSelection {
            value: "metformin".to_string(),
            kind: "predefined".to_string(),
        }])
    );
}

#[test]
fn tiered_answers_keep_only_declared_inputs() {
    let w = widget(json!({
        "type": "tiered-inputs",
        "key": "pes",
        "inputs": [
            { "name": "diagnosis", "props": [] },
            { "name": "cause", "props": [] }
        ]
    }));
    let Answer::Tiered(chain) = Answer::decode(
        &w,
        &json!({ "diagnosis": "d1", "cause": "", "stray": "x" }),
    )
    .expect("tiered") else {
        panic!("expected a tiered answer");
    };
    assert_eq!(chain.len(), 1);
    assert_eq!(chain["diagnosis"], "d1");
}

#[test]
fn structural_widgets_cannot_hold_answers() {
    let w = widget(json!({ "type": "group", "widgets": [] }));
    assert!(matches!(
        Answer::decode(&w, &json!("x")),
        Err(CoreError::Configuration(_))
    ));
}

#[test]
fn unknown_widget_type_is_a_configuration_error() {
    let err = WidgetTree::from_json(json!([{ "type": "input:slider", "key": "x" }])).unwrap_err();
    assert!(matches!(err, CoreError::Configuration(_)));
}

#[test]
fn unknown_condition_inside_a_tree_fails_to_parse() {
    let err = WidgetTree::from_json(json!([{
        "type": "conditional",
        "conditions": [{ "type": "regexMatches", "key": "x", "value": ".*" }],
        "widgets": []
    }]))
    .unwrap_err();
    assert!(matches!(err, CoreError::Configuration(_)));
}
