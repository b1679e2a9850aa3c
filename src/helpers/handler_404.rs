use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn page_not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No such endpoint here, double-check the path and try again")
}
