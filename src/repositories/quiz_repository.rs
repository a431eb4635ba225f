use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    models::domain::{QuizSummary, StoredQuiz},
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, record: StoredQuiz) -> AppResult<StoredQuiz>;
    /// Summary rows for every stored quiz, newest first.
    async fn list_recent(&self) -> AppResult<Vec<QuizSummary>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<StoredQuiz>>;
}

pub struct MongoQuizRepository {
    collection: Collection<StoredQuiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        let collection = db.get_collection(&config.quizzes_collection);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        let date_index = IndexModel::builder()
            .keys(doc! { "date_generated": -1 })
            .options(IndexOptions::builder().name("date_desc".to_string()).build())
            .build();

        self.collection.create_index(date_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, record: StoredQuiz) -> AppResult<StoredQuiz> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn list_recent(&self) -> AppResult<Vec<QuizSummary>> {
        use futures::TryStreamExt;

        // Project the blob away so listing never deserializes it.
        let find_options = FindOptions::builder()
            .sort(doc! { "date_generated": -1 })
            .projection(doc! { "id": 1, "url": 1, "title": 1, "date_generated": 1 })
            .build();

        let cursor = self
            .collection
            .clone_with_type::<QuizSummary>()
            .find(doc! {})
            .with_options(find_options)
            .await?;
        let summaries: Vec<QuizSummary> = cursor.try_collect().await?;

        Ok(summaries)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<StoredQuiz>> {
        let record = self.collection.find_one(doc! { "id": id }).await?;
        Ok(record)
    }
}
