use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{app_state::AppState, errors::AppError, models::dto::GenerateQuizRequest};

#[post("/generate_quiz")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let response = state.quiz_service.generate_and_store(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/history")]
pub async fn list_history(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summaries = state.quiz_service.history().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/quiz/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}
