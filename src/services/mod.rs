pub mod json_extract;
pub mod model_client;
pub mod normalize;
pub mod quiz_generator;
pub mod quiz_service;
pub mod scraper;

pub use quiz_generator::QuizGenerator;
pub use quiz_service::QuizService;
