use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::MongoQuizRepository,
    services::{
        model_client::OpenAiBackend, quiz_service::QuizService, scraper::WikipediaScraper,
        QuizGenerator,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config));
        quiz_repository.ensure_indexes().await?;

        let scraper = Arc::new(WikipediaScraper::new()?);
        let backend = Arc::new(OpenAiBackend::new(&config)?);
        let generator = QuizGenerator::new(backend, config.generation_mode);
        let quiz_service = Arc::new(QuizService::new(quiz_repository, scraper, generator));

        Ok(Self {
            quiz_service,
            config: Arc::new(config),
        })
    }
}
