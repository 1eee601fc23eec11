use std::path::Path;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

mod health;
pub mod middleware_auth;
pub mod tasks;
pub mod users;

pub use health::{api_status, health};

use crate::state::AppState;

/// Builds the whole HTTP surface. When `static_dir` is given, unmatched
/// paths are served from it so the frontend bundle ships with the API.
pub fn routes(state: AppState, static_dir: Option<&Path>) -> Router {
    let task_router = Router::new()
        .route("/", post(tasks::routes::create).get(tasks::routes::list))
        .route("/board", get(tasks::routes::board))
        .route("/sync", post(tasks::routes::sync))
        .route(
            "/{id}",
            patch(tasks::routes::update).delete(tasks::routes::delete),
        );

    let protected = Router::new()
        .route("/users/logout", post(users::routes::logout))
        .nest("/tasks", task_router)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middleware_auth::require_auth,
        ));

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-status", get(api_status))
        .route("/users/register", post(users::routes::register))
        .route("/users/login", post(users::routes::login))
        .merge(protected);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Welcome to the task board API"
}
