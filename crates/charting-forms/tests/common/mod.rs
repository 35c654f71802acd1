#![allow(dead_code)]

use charting_core::widget::WidgetTree;
use serde_json::{Value, json};

pub fn chart() -> WidgetTree {
    WidgetTree::from_json_str(include_str!("../fixtures/nutrition_chart.json"))
        .expect("fixture should parse")
}

/// A fully charted general-wellness visit.
pub fn filled_answers() -> serde_json::Map<String, Value> {
    let Value::Object(map) = json!({
        "visit_date": "2024-02-02T00:00:00.000Z",
        "start_time": "08:00",
        "end_time": "08:35",
        "main_reason": "general_wellness",
        "referral_source": "self",
        "pregnancy": false,
        "wellness_goals": "Eat more vegetables",
        "current_weight": "165",
        "weight_date": "2024-01-30T17:00:00.000Z",
        "medications_list": null,
        "food_allergies": { "yes": "Peanuts" },
        "dietary_patterns": { "vegetarian": true, "vegan": false, "gluten_free": false },
        "contact_phone": "",
        "labs": [
            {
                "key": "a1",
                "value": { "lab_name": "A1C", "lab_value": "5.4", "lab_date": "2024-01-15T00:00:00.000Z" }
            },
            {
                "key": "b2",
                "value": { "lab_name": "LDL", "lab_value": "" }
            }
        ],
        "nutrition_goals": [
            { "key": "0", "value": "increase_fiber" },
            { "key": "1", "value": "" }
        ],
        "pes_statement": {
            "nutrition_diagnosis": "inadequate_energy_intake",
            "related_to": "food_insecurity",
            "signs_and_symptoms": "Skipping meals"
        },
        "assessment_notes": "Stable",
        "follow_up": ""
    }) else {
        unreachable!()
    };
    map
}
