use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/calendar/filter", post(handlers::set_filter))
        .route("/api/occurrences", post(handlers::add_occurrence))
        .route("/api/occurrences/:id", delete(handlers::delete_occurrence))
        .route("/api/habits", get(handlers::list_habits).post(handlers::add_habit))
        .route("/api/habits/:id", delete(handlers::delete_habit))
        .route("/api/traits", get(handlers::list_traits).post(handlers::add_trait))
        .route("/api/notifications", get(handlers::get_notifications))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
