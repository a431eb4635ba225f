use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::quiz::Difficulty;

pub const OPTION_COUNT: usize = 4;
pub const OPTION_LABELS: [&str; OPTION_COUNT] = ["A", "B", "C", "D"];

/// One answer choice. `label` is a single uppercase letter; the four options
/// of a question must cover A-D exactly.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuizOption {
    #[validate(custom(function = validate_option_label))]
    pub label: String,

    #[validate(length(min = 1, message = "option text must not be empty"))]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = validate_question_rules, skip_on_field_errors = false))]
pub struct QuizQuestion {
    #[validate(length(min = 1, message = "question id must not be empty"))]
    pub id: String,

    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub question: String,

    #[validate(length(equal = 4, message = "question must have exactly 4 options"), nested)]
    pub options: Vec<QuizOption>,

    pub correct_label: String,

    /// Per-question difficulty; filled from the quiz-level difficulty when
    /// the model omits it.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    #[validate(length(min = 200, message = "explanation must be at least 200 characters"))]
    pub explanation: String,
}

fn validate_option_label(label: &str) -> Result<(), ValidationError> {
    if OPTION_LABELS.contains(&label) {
        return Ok(());
    }

    let mut error = ValidationError::new("option_label");
    error.message = Some(format!("option label must be one of A, B, C, D; got '{label}'").into());
    Err(error)
}

/// Cross-field invariants: the four labels form the set {A,B,C,D} with no
/// duplicates, and correct_label names one of them.
fn validate_question_rules(question: &QuizQuestion) -> Result<(), ValidationError> {
    let labels: BTreeSet<&str> = question.options.iter().map(|o| o.label.as_str()).collect();
    let expected: BTreeSet<&str> = OPTION_LABELS.iter().copied().collect();

    if question.options.len() == OPTION_COUNT && labels != expected {
        let found: Vec<&str> = question.options.iter().map(|o| o.label.as_str()).collect();
        let mut error = ValidationError::new("option_labels");
        error.message = Some(
            format!(
                "option labels must be exactly A, B, C, D with no duplicates; got [{}]",
                found.join(", ")
            )
            .into(),
        );
        return Err(error);
    }

    if !question
        .options
        .iter()
        .any(|o| o.label == question.correct_label)
    {
        let mut error = ValidationError::new("correct_label");
        error.message = Some(
            format!(
                "correct_label '{}' does not match any option label",
                question.correct_label
            )
            .into(),
        );
        return Err(error);
    }

    Ok(())
}
