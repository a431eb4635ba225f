use serde_json::{Map, Value};

/// Alias tables mapping a canonical field name to the alternate names
/// models have been observed to emit, in priority order. New model quirks
/// are added here, never as conditionals in the validator.
const OPTION_FIELD_ALIASES: &[(&str, &[&str])] = &[(
    "text",
    &["text_content", "textContent", "content", "option_text"],
)];

const QUESTION_FIELD_ALIASES: &[(&str, &[&str])] = &[("explanation", &["explination"])];

const METADATA_FIELD_ALIASES: &[(&str, &[&str])] = &[("key_entities", &["key_entites"])];

/// Rewrites known key/format drift into the canonical schema shape before
/// strict validation. Repairs cosmetic deviations only; missing required
/// data is never invented, and unrecognized extra fields are left alone.
/// Idempotent.
pub fn normalize_payload(payload: &mut Value) {
    let Some(root) = payload.as_object_mut() else {
        return;
    };

    if let Some(metadata) = root.get_mut("metadata").and_then(Value::as_object_mut) {
        apply_aliases(metadata, METADATA_FIELD_ALIASES);
    }

    let Some(questions) = root.get_mut("questions").and_then(Value::as_array_mut) else {
        return;
    };

    for question in questions {
        let Some(question) = question.as_object_mut() else {
            continue;
        };
        apply_aliases(question, QUESTION_FIELD_ALIASES);

        let Some(options) = question.get_mut("options").and_then(Value::as_array_mut) else {
            continue;
        };
        for option in options {
            let Some(option) = option.as_object_mut() else {
                continue;
            };
            apply_aliases(option, OPTION_FIELD_ALIASES);
            normalize_label(option);
        }
    }
}

fn apply_aliases(object: &mut Map<String, Value>, aliases: &[(&str, &[&str])]) {
    for (canonical, accepted) in aliases {
        if object.contains_key(*canonical) {
            continue;
        }
        for alias in *accepted {
            if let Some(value) = object.remove(*alias) {
                object.insert((*canonical).to_string(), value);
                break;
            }
        }
    }
}

/// A string label collapses to its first character, uppercased: "a", "b)"
/// and " C. " all become single letters. Non-string labels are left for
/// the validator to reject.
fn normalize_label(option: &mut Map<String, Value>) {
    let Some(label) = option.get_mut("label") else {
        return;
    };
    let Some(text) = label.as_str() else {
        return;
    };
    if let Some(first) = text.trim().chars().next() {
        *label = Value::String(first.to_uppercase().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_with_option(option: Value) -> Value {
        json!({
            "metadata": {"title": "Rust"},
            "questions": [{
                "id": "q1",
                "question": "What?",
                "options": [option],
                "correct_label": "A",
            }],
        })
    }

    fn first_option(payload: &Value) -> &Value {
        &payload["questions"][0]["options"][0]
    }

    #[test]
    fn option_text_alias_is_renamed_to_text() {
        let mut payload =
            payload_with_option(json!({"label": "A", "option_text": "a compiled language"}));

        normalize_payload(&mut payload);

        let option = first_option(&payload);
        assert_eq!(option["text"], "a compiled language");
        assert!(option.get("option_text").is_none());
    }

    #[test]
    fn camel_case_alias_is_renamed_to_text() {
        let mut payload = payload_with_option(json!({"label": "B", "textContent": "an answer"}));

        normalize_payload(&mut payload);

        assert_eq!(first_option(&payload)["text"], "an answer");
    }

    #[test]
    fn canonical_text_wins_over_aliases() {
        let mut payload =
            payload_with_option(json!({"label": "A", "text": "keep me", "content": "not me"}));

        normalize_payload(&mut payload);

        let option = first_option(&payload);
        assert_eq!(option["text"], "keep me");
        assert_eq!(option["content"], "not me");
    }

    #[test]
    fn labels_collapse_to_first_character_uppercased() {
        for (raw, expected) in [("a", "A"), ("b)", "B"), (" C. ", "C"), ("d - option", "D")] {
            let mut payload = payload_with_option(json!({"label": raw, "text": "x"}));

            normalize_payload(&mut payload);

            assert_eq!(first_option(&payload)["label"], expected, "label {raw:?}");
        }
    }

    #[test]
    fn historical_misspellings_are_renamed() {
        let mut payload = json!({
            "metadata": {"title": "Rust", "key_entites": ["a", "b", "c"]},
            "questions": [{
                "id": "q1",
                "question": "What?",
                "options": [],
                "correct_label": "A",
                "explination": "because",
            }],
        });

        normalize_payload(&mut payload);

        assert_eq!(payload["metadata"]["key_entities"], json!(["a", "b", "c"]));
        assert!(payload["metadata"].get("key_entites").is_none());
        assert_eq!(payload["questions"][0]["explanation"], "because");
        assert!(payload["questions"][0].get("explination").is_none());
    }

    #[test]
    fn unrecognized_extra_fields_are_untouched() {
        let mut payload = payload_with_option(json!({
            "label": "A",
            "text": "x",
            "confidence": 0.9,
        }));
        payload["questions"][0]["hint"] = json!("left alone");

        normalize_payload(&mut payload);

        assert_eq!(first_option(&payload)["confidence"], 0.9);
        assert_eq!(payload["questions"][0]["hint"], "left alone");
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut once = payload_with_option(json!({"label": "b)", "option_text": "an answer"}));
        normalize_payload(&mut once);

        let mut twice = once.clone();
        normalize_payload(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn canonical_payload_is_a_no_op() {
        let canonical = payload_with_option(json!({"label": "A", "text": "x"}));
        let mut normalized = canonical.clone();

        normalize_payload(&mut normalized);

        assert_eq!(normalized, canonical);
    }

    #[test]
    fn non_object_shapes_are_ignored() {
        let mut array = json!(["not", "an", "object"]);
        normalize_payload(&mut array);
        assert_eq!(array, json!(["not", "an", "object"]));

        let mut no_questions = json!({"metadata": {"title": "x"}});
        normalize_payload(&mut no_questions);
        assert_eq!(no_questions, json!({"metadata": {"title": "x"}}));
    }
}
