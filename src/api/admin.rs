//! Admin back-office surface. Every route here sits behind `require_auth`.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use std::collections::HashMap;

use super::{ApiError, ApiResponse};
use crate::db::{CourseInput, JobListingInput, PostInput, ProgramInput};
use crate::entities::{applications, courses, job_listings, messages, posts, programs};
use crate::state::AppState;

// ============================================================================
// Courses
// ============================================================================

/// GET /admin/courses — includes unpublished drafts.
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<courses::Model>>>, ApiError> {
    let courses = state
        .store()
        .list_courses(false)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(courses)))
}

/// POST /admin/courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(input): Json<CourseInput>,
) -> Result<Json<ApiResponse<courses::Model>>, ApiError> {
    if input.title.is_empty() || input.slug.is_empty() {
        return Err(ApiError::validation("Title and slug are required"));
    }

    let course = state
        .store()
        .create_course(input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(course)))
}

/// PUT /admin/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CourseInput>,
) -> Result<Json<ApiResponse<courses::Model>>, ApiError> {
    let course = state
        .store()
        .update_course(id, input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Course", id))?;

    Ok(Json(ApiResponse::success(course)))
}

/// DELETE /admin/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_course(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Course", id));
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Posts
// ============================================================================

/// GET /admin/posts
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<posts::Model>>>, ApiError> {
    let posts = state
        .store()
        .list_posts(false)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(posts)))
}

/// POST /admin/posts
pub async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<PostInput>,
) -> Result<Json<ApiResponse<posts::Model>>, ApiError> {
    if input.title.is_empty() || input.slug.is_empty() {
        return Err(ApiError::validation("Title and slug are required"));
    }

    let post = state
        .store()
        .create_post(input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(post)))
}

/// PUT /admin/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<PostInput>,
) -> Result<Json<ApiResponse<posts::Model>>, ApiError> {
    let post = state
        .store()
        .update_post(id, input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Post", id))?;

    Ok(Json(ApiResponse::success(post)))
}

/// DELETE /admin/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_post(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Post", id));
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Programs
// ============================================================================

/// GET /admin/programs — all categories, no filter.
pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<programs::Model>>>, ApiError> {
    let programs = state
        .store()
        .list_programs(None)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(programs)))
}

/// POST /admin/programs
pub async fn create_program(
    State(state): State<AppState>,
    Json(input): Json<ProgramInput>,
) -> Result<Json<ApiResponse<programs::Model>>, ApiError> {
    if input.title.is_empty() || input.category.is_empty() {
        return Err(ApiError::validation("Title and category are required"));
    }

    let program = state
        .store()
        .create_program(input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(program)))
}

/// PUT /admin/programs/{id}
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ProgramInput>,
) -> Result<Json<ApiResponse<programs::Model>>, ApiError> {
    let program = state
        .store()
        .update_program(id, input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Program", id))?;

    Ok(Json(ApiResponse::success(program)))
}

/// DELETE /admin/programs/{id}
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_program(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Program", id));
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Job listings
// ============================================================================

/// GET /admin/jobs — closed listings included.
pub async fn list_jobs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<job_listings::Model>>>, ApiError> {
    let jobs = state
        .store()
        .list_job_listings(false)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(jobs)))
}

/// POST /admin/jobs
pub async fn create_job(
    State(state): State<AppState>,
    Json(input): Json<JobListingInput>,
) -> Result<Json<ApiResponse<job_listings::Model>>, ApiError> {
    if input.title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }

    let job = state
        .store()
        .create_job_listing(input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(job)))
}

/// PUT /admin/jobs/{id}
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<JobListingInput>,
) -> Result<Json<ApiResponse<job_listings::Model>>, ApiError> {
    let job = state
        .store()
        .update_job_listing(id, input)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Job listing", id))?;

    Ok(Json(ApiResponse::success(job)))
}

/// DELETE /admin/jobs/{id}
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_job_listing(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Job listing", id));
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Inbox
// ============================================================================

#[derive(Deserialize)]
pub struct InboxQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// GET /admin/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> Result<Json<ApiResponse<Vec<messages::Model>>>, ApiError> {
    let messages = state
        .store()
        .list_messages(query.unread_only)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(messages)))
}

/// PUT /admin/messages/{id}/read
pub async fn mark_message_read(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let found = state
        .store()
        .mark_message_read(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !found {
        return Err(ApiError::not_found("Message", id));
    }

    Ok(Json(ApiResponse::success(())))
}

/// DELETE /admin/messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_message(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Message", id));
    }

    Ok(Json(ApiResponse::success(())))
}

/// GET /admin/applications
pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<applications::Model>>>, ApiError> {
    let applications = state
        .store()
        .list_applications()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(applications)))
}

#[derive(Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: String,
}

/// PUT /admin/applications/{id}/status
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ApplicationStatusRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !matches!(payload.status.as_str(), "new" | "reviewed" | "archived") {
        return Err(ApiError::validation(
            "Status must be one of: new, reviewed, archived",
        ));
    }

    let found = state
        .store()
        .update_application_status(id, &payload.status)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !found {
        return Err(ApiError::not_found("Application", id));
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Settings
// ============================================================================

/// PUT /admin/settings — upserts every pair in the payload.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<HashMap<String, String>>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    for (name, value) in &payload {
        state
            .store()
            .set_setting(name, value)
            .await
            .map_err(|e| ApiError::database(e.to_string()))?;
    }

    Ok(Json(ApiResponse::success(())))
}

// ============================================================================
// Uploads
// ============================================================================

#[derive(Deserialize)]
pub struct UploadQuery {
    pub key: String,
}

/// POST /admin/uploads?key=... — raw body upload through the object store.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<crate::storage::StoredObject>>, ApiError> {
    if query.key.is_empty() {
        return Err(ApiError::validation("Upload key is required"));
    }
    if body.is_empty() {
        return Err(ApiError::validation("Upload body is empty"));
    }

    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let stored = state
        .storage()
        .put(&query.key, body.to_vec(), content_type)
        .await?;

    tracing::info!("Uploaded object: {}", stored.key);

    Ok(Json(ApiResponse::success(stored)))
}
