use crate::api::models::AppState;
use crate::api::questions::handlers::{
    create_question_handler, delete_question_handler, get_question_handler,
    list_questions_handler,
};
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/questions",
            get(list_questions_handler).post(create_question_handler),
        )
        .route(
            "/questions/{id}",
            get(get_question_handler).delete(delete_question_handler),
        )
}
