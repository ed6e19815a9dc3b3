use crate::api::models::*;
use crate::storage::Question;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub async fn list_questions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = state.store.list_questions().await?;
    Ok(Json(questions))
}

pub async fn create_question_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    // Validate
    request.validate().map_err(AppError::Validation)?;

    let question = state.store.create_question(&request.text).await?;

    info!(id = question.id, "Question created");

    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn get_question_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, AppError> {
    let id = parse_id(&id)?;

    let question = state
        .store
        .find_question_with_answers(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

pub async fn delete_question_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    // Zero rows affected means there was nothing to delete.
    if !state.store.delete_question(id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    info!(id, "Question deleted");

    Ok(StatusCode::NO_CONTENT)
}
