use axum::{
    extract::{Path, State},
    response::Json,
};
use gradcert_registry::{Course, CourseUpdate, Registry, SessionType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::ApiError, extractors::AuthenticatedStaff, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddCourseRequest {
    pub course_name: String,
    pub session_type: SessionType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub course_name: Option<String>,
    pub session_type: Option<SessionType>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub course_id: Uuid,
    pub course_number: u32,
    pub course_name: String,
    pub session_type: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            course_id: course.course_id,
            course_number: course.course_number,
            course_name: course.course_name,
            session_type: course.session_type.to_string(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/courses
pub async fn add_course(
    State(state): State<Arc<AppState>>,
    _staff: AuthenticatedStaff,
    Json(req): Json<AddCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = state
        .registry
        .add_course(&req.course_name, req.session_type)
        .await?;

    Ok(Json(course.into()))
}

/// GET /v1/courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    _staff: AuthenticatedStaff,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = state.registry.list_courses().await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// PATCH /v1/courses/:course_id
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = state
        .registry
        .update_course(
            course_id,
            CourseUpdate {
                course_name: req.course_name,
                session_type: req.session_type,
            },
        )
        .await?;

    Ok(Json(course.into()))
}

/// DELETE /v1/courses/:course_id
///
/// Cascades: enrollment rows referencing the course are removed with it.
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.registry.delete_course(course_id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
