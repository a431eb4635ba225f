use serde::Deserialize;
use validator::Validate;

use crate::models::domain::Difficulty;

pub const DEFAULT_QUESTION_COUNT: u8 = 10;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(url(message = "url must be a well-formed URL"))]
    pub url: String,

    /// Defaults to medium when omitted.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// Defaults to 10 when omitted.
    #[serde(default)]
    #[validate(range(min = 8, max = 12, message = "num_questions must be between 8 and 12"))]
    pub num_questions: Option<u8>,
}

impl GenerateQuizRequest {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    pub fn num_questions(&self) -> u8 {
        self.num_questions.unwrap_or(DEFAULT_QUESTION_COUNT)
    }
}
