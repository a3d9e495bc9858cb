use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod content;
mod error;
pub mod system;
mod types;

pub use error::ApiError;
pub use types::ApiResponse;

pub async fn router(state: AppState) -> Router {
    let cors_origins = {
        let config = state.config.read().await;
        config.server.cors_allowed_origins.clone()
    };

    let admin_routes = create_admin_router();

    let api_router = Router::new()
        .merge(admin_routes)
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/courses", get(content::list_courses))
        .route("/courses/{slug}", get(content::get_course))
        .route("/programs", get(content::list_programs))
        .route("/posts", get(content::list_posts))
        .route("/posts/{slug}", get(content::get_post))
        .route("/jobs", get(content::list_jobs))
        .route("/settings", get(content::get_settings))
        .route("/messages", post(content::submit_message))
        .route("/applications", post(content::submit_application))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::identity_middleware,
        ))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/auth/password", put(auth::change_password))
        .route("/accounts", post(auth::create_account))
        .route("/admin/courses", get(admin::list_courses))
        .route("/admin/courses", post(admin::create_course))
        .route("/admin/courses/{id}", put(admin::update_course))
        .route("/admin/courses/{id}", delete(admin::delete_course))
        .route("/admin/programs", get(admin::list_programs))
        .route("/admin/programs", post(admin::create_program))
        .route("/admin/programs/{id}", put(admin::update_program))
        .route("/admin/programs/{id}", delete(admin::delete_program))
        .route("/admin/jobs", get(admin::list_jobs))
        .route("/admin/jobs", post(admin::create_job))
        .route("/admin/jobs/{id}", put(admin::update_job))
        .route("/admin/jobs/{id}", delete(admin::delete_job))
        .route("/admin/posts", get(admin::list_posts))
        .route("/admin/posts", post(admin::create_post))
        .route("/admin/posts/{id}", put(admin::update_post))
        .route("/admin/posts/{id}", delete(admin::delete_post))
        .route("/admin/messages", get(admin::list_messages))
        .route("/admin/messages/{id}/read", put(admin::mark_message_read))
        .route("/admin/messages/{id}", delete(admin::delete_message))
        .route("/admin/applications", get(admin::list_applications))
        .route(
            "/admin/applications/{id}/status",
            put(admin::update_application_status),
        )
        .route("/admin/settings", put(admin::update_settings))
        .route("/admin/uploads", post(admin::upload))
        .route_layer(middleware::from_fn(auth::require_auth))
}
