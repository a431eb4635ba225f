pub mod quiz_handler;

use actix_web::{get, HttpResponse, Responder};

pub use quiz_handler::{generate_quiz, get_quiz, list_history};

#[get("/")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
