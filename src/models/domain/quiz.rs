use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Quiz-level metadata. `source_url` and `difficulty` are overwritten with
/// caller-supplied values after validation; the model is trusted only for
/// the fields it alone can derive.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuizMetadata {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub source_url: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    #[validate(length(min = 3, max = 5, message = "key_entities must contain 3 to 5 entries"))]
    pub key_entities: Vec<String>,

    #[serde(default)]
    #[validate(length(min = 3, max = 5, message = "related_topics must contain 3 to 5 entries"))]
    pub related_topics: Vec<String>,
}

/// The validated, persisted unit of output: metadata plus 8-12 questions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = validate_quiz_rules, skip_on_field_errors = false))]
pub struct Quiz {
    #[validate(nested)]
    pub metadata: QuizMetadata,

    #[validate(
        length(min = 8, max = 12, message = "quiz must contain 8 to 12 questions"),
        nested
    )]
    pub questions: Vec<QuizQuestion>,
}

fn validate_quiz_rules(quiz: &Quiz) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for question in &quiz.questions {
        if !seen.insert(question.id.as_str()) {
            let mut error = ValidationError::new("question_ids");
            error.message =
                Some(format!("question id '{}' is not unique within the quiz", question.id).into());
            return Err(error);
        }
    }
    Ok(())
}
