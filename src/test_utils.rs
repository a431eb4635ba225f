use crate::models::domain::{Quiz, QuizMetadata, QuizOption, QuizQuestion};
