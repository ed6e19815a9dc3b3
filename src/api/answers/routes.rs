use crate::api::answers::handlers::{
    create_answer_handler, delete_answer_handler, get_answer_handler,
};
use crate::api::models::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/questions/{id}/answers", post(create_answer_handler))
        .route(
            "/answers/{id}",
            get(get_answer_handler).delete(delete_answer_handler),
        )
}
