use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Quiz, StoredQuiz};

#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub id: String,
    pub url: String,
    pub title: String,
    pub date_generated: DateTime<Utc>,
    pub quiz: Quiz,
}

impl QuizResponse {
    pub fn from_record(record: StoredQuiz, quiz: Quiz) -> Self {
        QuizResponse {
            id: record.id,
            url: record.url,
            title: record.title,
            date_generated: record.date_generated,
            quiz,
        }
    }
}
