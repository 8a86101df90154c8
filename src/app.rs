use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/days/:date", get(handlers::get_day).put(handlers::put_day))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state)
}
