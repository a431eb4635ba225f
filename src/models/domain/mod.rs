pub mod quiz;
pub mod quiz_question;
pub mod stored_quiz;

pub use quiz::{Difficulty, Quiz, QuizMetadata};
pub use quiz_question::{QuizOption, QuizQuestion};
pub use stored_quiz::{QuizSummary, StoredQuiz};
