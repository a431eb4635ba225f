use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizSummary, StoredQuiz},
        dto::{GenerateQuizRequest, QuizResponse},
    },
    repositories::QuizRepository,
    services::{quiz_generator::QuizGenerator, scraper::ArticleScraper},
};

/// Articles shorter than this cannot support an 8-question quiz.
const MIN_ARTICLE_CHARS: usize = 300;

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    scraper: Arc<dyn ArticleScraper>,
    generator: QuizGenerator,
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        scraper: Arc<dyn ArticleScraper>,
        generator: QuizGenerator,
    ) -> Self {
        Self {
            repository,
            scraper,
            generator,
        }
    }

    /// Scrape → generate → persist. Returns the stored quiz or the first
    /// fatal error; a partially validated quiz is never surfaced.
    pub async fn generate_and_store(
        &self,
        request: GenerateQuizRequest,
    ) -> AppResult<QuizResponse> {
        let difficulty = request.difficulty();
        let num_questions = request.num_questions();

        let article = self.scraper.fetch_and_clean(&request.url).await?;
        if article.text.chars().count() < MIN_ARTICLE_CHARS {
            return Err(AppError::ValidationError(
                "Article content too short to generate a quiz".to_string(),
            ));
        }

        let quiz = self
            .generator
            .generate(
                &article.title,
                &article.text,
                &request.url,
                difficulty,
                num_questions,
            )
            .await?;

        let record = StoredQuiz::new(&request.url, &article.title, difficulty, &quiz)?;
        let record = self.repository.create(record).await?;

        log::info!(
            "Generated quiz {} ({} questions) for '{}'",
            record.id,
            record.num_questions,
            record.title
        );

        Ok(QuizResponse::from_record(record, quiz))
    }

    pub async fn history(&self) -> AppResult<Vec<QuizSummary>> {
        self.repository.list_recent().await
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<QuizResponse> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{id}' not found")))?;

        let quiz: Quiz = serde_json::from_str(&record.quiz_json)
            .map_err(|_| AppError::InternalError("Stored quiz JSON is invalid".to_string()))?;

        Ok(QuizResponse::from_record(record, quiz))
    }
}
