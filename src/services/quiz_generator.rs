use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use validator::Validate;

use crate::{
    config::GenerationMode,
    constants::quiz_prompt::{build_quiz_prompt, QUIZ_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::domain::{Difficulty, Quiz},
    services::{
        json_extract::{excerpt, extract_json_object},
        model_client::{resolve_reply_text, CompletionBackend, CompletionRequest},
        normalize::normalize_payload,
    },
};

/// Machine-readable description of the quiz schema, rendered once from the
/// data model and embedded in every prompt.
static QUIZ_SCHEMA_JSON: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(Quiz);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
});

/// Turns one article into one validated quiz: prompt → model call →
/// extraction → normalization → validation → metadata finalization. Data
/// flows strictly forward; the only recovery is the structured-parse →
/// raw-text-extraction fallback in lenient mode.
pub struct QuizGenerator {
    backend: Arc<dyn CompletionBackend>,
    mode: GenerationMode,
}

impl QuizGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, mode: GenerationMode) -> Self {
        Self { backend, mode }
    }

    pub async fn generate(
        &self,
        title: &str,
        article_text: &str,
        source_url: &str,
        difficulty: Difficulty,
        num_questions: u8,
    ) -> AppResult<Quiz> {
        let request = CompletionRequest {
            system: QUIZ_SYSTEM_PROMPT.to_string(),
            user: build_quiz_prompt(
                title,
                article_text,
                num_questions,
                difficulty,
                &QUIZ_SCHEMA_JSON,
            ),
            json_mode: true,
        };

        let reply = self.backend.complete(&request).await?;
        let text = resolve_reply_text(&reply)?;

        let mut payload = match parse_structured(&text) {
            Ok(payload) => payload,
            Err(parse_err) => match self.mode {
                GenerationMode::Strict => return Err(parse_err),
                GenerationMode::Lenient => {
                    log::warn!(
                        "Structured quiz parse failed ({parse_err}); retrying with raw text extraction"
                    );
                    let raw_request = CompletionRequest {
                        json_mode: false,
                        ..request
                    };
                    let raw_reply = self.backend.complete(&raw_request).await?;
                    let raw_text = resolve_reply_text(&raw_reply)?;
                    log::info!("Raw model output (first 500 chars): {}", excerpt(&raw_text));
                    extract_json_object(&raw_text)?
                }
            },
        };

        normalize_payload(&mut payload);

        let mut quiz: Quiz = serde_json::from_value(payload)
            .map_err(|e| AppError::SchemaValidationFailed(e.to_string()))?;
        quiz.validate()
            .map_err(|e| AppError::SchemaValidationFailed(e.to_string()))?;

        finalize_metadata(&mut quiz, source_url, difficulty, title);

        Ok(quiz)
    }
}

fn parse_structured(text: &str) -> AppResult<Value> {
    let trimmed = text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err(AppError::NoJsonFound {
            excerpt: excerpt(trimmed),
        }),
        Err(e) => Err(AppError::InvalidJson {
            detail: e.to_string(),
            excerpt: excerpt(trimmed),
        }),
    }
}

/// Overwrites the fields the caller knows authoritatively. The model is
/// trusted only for values it alone can derive (entities, topics,
/// per-question content). Idempotent.
pub fn finalize_metadata(
    quiz: &mut Quiz,
    source_url: &str,
    difficulty: Difficulty,
    fallback_title: &str,
) {
    quiz.metadata.source_url = source_url.to_string();
    quiz.metadata.difficulty = difficulty;
    if quiz.metadata.title.trim().is_empty() {
        quiz.metadata.title = fallback_title.to_string();
    }
    for question in &mut quiz.questions {
        if question.difficulty.is_none() {
            question.difficulty = Some(difficulty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::model_client::{MockCompletionBackend, ModelReply};
    use crate::test_utils::fixtures;

    const SOURCE_URL: &str = "https://en.wikipedia.org/wiki/Rust_(programming_language)";

    fn generator(backend: MockCompletionBackend, mode: GenerationMode) -> QuizGenerator {
        QuizGenerator::new(Arc::new(backend), mode)
    }

    fn payload_text() -> String {
        fixtures::valid_quiz_payload().to_string()
    }

    #[tokio::test]
    async fn structured_path_produces_finalized_quiz() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|req| req.json_mode)
            .times(1)
            .returning(|_| Ok(ModelReply::Text(payload_text())));

        let quiz = generator(backend, GenerationMode::Strict)
            .generate("Rust", "Rust is a language.", SOURCE_URL, Difficulty::Hard, 10)
            .await
            .expect("generation should succeed");

        assert_eq!(quiz.metadata.source_url, SOURCE_URL);
        assert_eq!(quiz.metadata.difficulty, Difficulty::Hard);
        assert_eq!(quiz.questions.len(), 8);
        assert!(quiz
            .questions
            .iter()
            .all(|q| q.difficulty == Some(Difficulty::Hard)));
    }

    #[tokio::test]
    async fn prompt_carries_count_and_article() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|req| {
                req.json_mode
                    && req.user.contains("exactly 9 questions")
                    && req.user.contains("Article Title: Rust")
                    && req.user.contains("Rust is a language.")
                    && req.system.contains("quiz generation expert")
            })
            .times(1)
            .returning(|_| Ok(ModelReply::Text(payload_text())));

        generator(backend, GenerationMode::Strict)
            .generate("Rust", "Rust is a language.", SOURCE_URL, Difficulty::Easy, 9)
            .await
            .expect("generation should succeed");
    }

    #[tokio::test]
    async fn lenient_mode_recovers_via_raw_text_extraction() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|req| req.json_mode)
            .times(1)
            .returning(|_| Ok(ModelReply::Text("I could not produce JSON, sorry!".into())));
        backend
            .expect_complete()
            .withf(|req| !req.json_mode)
            .times(1)
            .returning(|_| {
                Ok(ModelReply::Text(format!(
                    "Sure! ```json\n{}\n```",
                    payload_text()
                )))
            });

        let quiz = generator(backend, GenerationMode::Lenient)
            .generate("Rust", "Rust is a language.", SOURCE_URL, Difficulty::Medium, 10)
            .await
            .expect("fallback should recover");

        assert_eq!(quiz.metadata.source_url, SOURCE_URL);
    }

    #[tokio::test]
    async fn strict_mode_fails_without_fallback() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|req| req.json_mode)
            .times(1)
            .returning(|_| Ok(ModelReply::Text("not json at all".into())));
        backend.expect_complete().withf(|req| !req.json_mode).times(0);

        let err = generator(backend, GenerationMode::Strict)
            .generate("Rust", "text", SOURCE_URL, Difficulty::Medium, 10)
            .await
            .expect_err("strict mode should fail");

        assert!(matches!(err, AppError::InvalidJson { .. }));
    }

    #[tokio::test]
    async fn empty_reply_fails_before_any_parsing() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|req| req.json_mode)
            .times(1)
            .returning(|_| Ok(ModelReply::Text("   ".into())));
        backend.expect_complete().withf(|req| !req.json_mode).times(0);

        let err = generator(backend, GenerationMode::Lenient)
            .generate("Rust", "text", SOURCE_URL, Difficulty::Medium, 10)
            .await
            .expect_err("empty reply should fail");

        assert!(matches!(err, AppError::ModelResponseEmpty));
    }

    #[tokio::test]
    async fn model_call_failure_surfaces_immediately() {
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .withf(|req| req.json_mode)
            .times(1)
            .returning(|_| Err(AppError::ModelCallFailed("quota exceeded".into())));
        backend.expect_complete().withf(|req| !req.json_mode).times(0);

        let err = generator(backend, GenerationMode::Lenient)
            .generate("Rust", "text", SOURCE_URL, Difficulty::Medium, 10)
            .await
            .expect_err("call failure should surface");

        assert!(matches!(err, AppError::ModelCallFailed(_)));
    }

    #[tokio::test]
    async fn alias_fields_normalize_then_validate() {
        let mut payload = fixtures::valid_quiz_payload();
        let option = &mut payload["questions"][0]["options"][0];
        let text = option["text"].take();
        option.as_object_mut().expect("option is object").remove("text");
        option["option_text"] = text.clone();

        let raw = payload.to_string();
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(ModelReply::Text(raw.clone())));

        let quiz = generator(backend, GenerationMode::Strict)
            .generate("Rust", "text", SOURCE_URL, Difficulty::Medium, 10)
            .await
            .expect("normalized payload should validate");

        assert_eq!(
            serde_json::to_value(&quiz.questions[0].options[0].text).expect("should serialize"),
            text
        );
    }

    #[tokio::test]
    async fn three_option_question_fails_schema_validation() {
        let mut payload = fixtures::valid_quiz_payload();
        payload["questions"][0]["options"]
            .as_array_mut()
            .expect("options is array")
            .pop();

        let raw = payload.to_string();
        let mut backend = MockCompletionBackend::new();
        backend
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(ModelReply::Text(raw.clone())));

        let err = generator(backend, GenerationMode::Strict)
            .generate("Rust", "text", SOURCE_URL, Difficulty::Medium, 10)
            .await
            .expect_err("3 options should fail validation");

        match err {
            AppError::SchemaValidationFailed(detail) => {
                assert!(detail.contains("exactly 4 options"));
            }
            other => panic!("expected SchemaValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn finalize_metadata_is_idempotent_and_fills_empty_title() {
        let mut quiz = fixtures::valid_quiz();
        quiz.metadata.title = "  ".to_string();

        finalize_metadata(&mut quiz, SOURCE_URL, Difficulty::Easy, "Fallback Title");
        let once = quiz.clone();
        finalize_metadata(&mut quiz, SOURCE_URL, Difficulty::Easy, "Fallback Title");

        assert_eq!(quiz, once);
        assert_eq!(quiz.metadata.title, "Fallback Title");
        assert_eq!(quiz.metadata.source_url, SOURCE_URL);
        assert_eq!(quiz.metadata.difficulty, Difficulty::Easy);
    }

    #[test]
    fn finalize_metadata_keeps_model_supplied_title() {
        let mut quiz = fixtures::valid_quiz();

        finalize_metadata(&mut quiz, SOURCE_URL, Difficulty::Medium, "Fallback Title");

        assert_eq!(quiz.metadata.title, "Rust (programming language)");
    }

    #[test]
    fn quiz_schema_json_is_rendered_once_and_mentions_fields() {
        assert!(QUIZ_SCHEMA_JSON.contains("questions"));
        assert!(QUIZ_SCHEMA_JSON.contains("correct_label"));
        assert!(QUIZ_SCHEMA_JSON.contains("key_entities"));
    }
}
