use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::quiz::{Difficulty, Quiz},
};

/// Persistence row: denormalized columns for listing plus the quiz itself
/// as an opaque serialized blob. The blob is never re-validated on read.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredQuiz {
    pub id: String,
    pub url: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub num_questions: u8,
    pub date_generated: DateTime<Utc>,
    pub quiz_json: String,
}

impl StoredQuiz {
    pub fn new(url: &str, title: &str, difficulty: Difficulty, quiz: &Quiz) -> AppResult<Self> {
        let quiz_json = serde_json::to_string(quiz)
            .map_err(|e| AppError::InternalError(format!("failed to serialize quiz: {e}")))?;

        Ok(StoredQuiz {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            title: title.to_string(),
            difficulty,
            num_questions: quiz.questions.len() as u8,
            date_generated: Utc::now(),
            quiz_json,
        })
    }
}

/// Summary row returned by the list operation; fetched by projection so
/// listing never touches the blob.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
}
