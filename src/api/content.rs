//! Public site surface: published content reads plus the contact and apply
//! form submissions. No authentication involved.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::collections::HashMap;

use super::{ApiError, ApiResponse};
use crate::db::{ApplicationInput, MessageInput};
use crate::entities::{applications, courses, job_listings, messages, posts, programs};
use crate::state::AppState;

/// GET /courses
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<courses::Model>>>, ApiError> {
    let courses = state
        .store()
        .list_courses(true)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(courses)))
}

/// GET /courses/{slug}
pub async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<courses::Model>>, ApiError> {
    let course = state
        .store()
        .get_course_by_slug(&slug)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .filter(|c| c.published)
        .ok_or_else(|| ApiError::not_found("Course", &slug))?;

    Ok(Json(ApiResponse::success(course)))
}

/// GET /posts
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<posts::Model>>>, ApiError> {
    let posts = state
        .store()
        .list_posts(true)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(posts)))
}

/// GET /posts/{slug}
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<posts::Model>>, ApiError> {
    let post = state
        .store()
        .get_post_by_slug(&slug)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found("Post", &slug))?;

    Ok(Json(ApiResponse::success(post)))
}

#[derive(Deserialize)]
pub struct ProgramsQuery {
    pub category: Option<String>,
}

/// GET /programs — optionally narrowed to one school category.
pub async fn list_programs(
    State(state): State<AppState>,
    Query(query): Query<ProgramsQuery>,
) -> Result<Json<ApiResponse<Vec<programs::Model>>>, ApiError> {
    let programs = state
        .store()
        .list_programs(query.category.as_deref())
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(programs)))
}

/// GET /jobs — open positions only.
pub async fn list_jobs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<job_listings::Model>>>, ApiError> {
    let jobs = state
        .store()
        .list_job_listings(true)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(jobs)))
}

/// GET /settings
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HashMap<String, String>>>, ApiError> {
    let settings = state
        .store()
        .all_settings()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(settings)))
}

/// POST /messages — the contact form.
pub async fn submit_message(
    State(state): State<AppState>,
    Json(input): Json<MessageInput>,
) -> Result<Json<ApiResponse<messages::Model>>, ApiError> {
    if input.name.is_empty() || input.email.is_empty() || input.body.is_empty() {
        return Err(ApiError::validation("Name, email and message are required"));
    }

    let message = state
        .store()
        .add_message(input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(message)))
}

/// POST /applications — the apply form.
pub async fn submit_application(
    State(state): State<AppState>,
    Json(input): Json<ApplicationInput>,
) -> Result<Json<ApiResponse<applications::Model>>, ApiError> {
    if input.name.is_empty() || input.email.is_empty() || input.position.is_empty() {
        return Err(ApiError::validation("Name, email and position are required"));
    }

    let application = state
        .store()
        .add_application(input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(application)))
}
