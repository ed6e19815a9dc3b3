use crate::api::models::*;
use crate::storage::Answer;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

pub async fn create_answer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let question_id = parse_id(&id)?;

    // The parent question must exist before anything is persisted.
    if !state.store.question_exists(question_id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    // Validate
    request.validate().map_err(AppError::Validation)?;

    let answer = state
        .store
        .create_answer(question_id, &request.user_id, &request.text)
        .await?;

    info!(id = answer.id, question_id, "Answer created");

    Ok((StatusCode::CREATED, Json(answer)))
}

pub async fn get_answer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Answer>, AppError> {
    let id = parse_id(&id)?;

    let answer = state
        .store
        .find_answer(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Answer not found".to_string()))?;

    Ok(Json(answer))
}

pub async fn delete_answer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    if !state.store.delete_answer(id).await? {
        return Err(AppError::NotFound("Answer not found".to_string()));
    }

    info!(id, "Answer deleted");

    Ok(StatusCode::NO_CONTENT)
}
