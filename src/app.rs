use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/supplements",
            get(handlers::list_supplements).post(handlers::create_supplement),
        )
        .route(
            "/api/supplements/:id",
            get(handlers::get_supplement)
                .patch(handlers::update_supplement)
                .delete(handlers::delete_supplement),
        )
        .route("/api/supplements/:id/active", put(handlers::set_active))
        .route("/api/supplements/:id/facts", post(handlers::add_fact))
        .route(
            "/api/supplements/:id/facts/:fact_id",
            patch(handlers::update_fact).delete(handlers::delete_fact),
        )
        .route("/api/intake", get(handlers::get_intake))
        .route("/api/daily-values", get(handlers::get_daily_values))
        .with_state(state)
}
