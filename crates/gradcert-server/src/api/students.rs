use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use gradcert_certificates::ObjectStore;
use gradcert_registry::{NewStudent, Registry, RegistryError, Student, StudentUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::ApiError, extractors::AuthenticatedStaff, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterStudentRequest {
    pub student_code: String,
    pub name: String,
    pub entry_session: String,
    pub graduation_date: Option<NaiveDate>,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub student_code: Option<String>,
    pub name: Option<String>,
    pub entry_session: Option<String>,
    pub graduation_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub student_code: String,
    pub name: String,
    pub profile_photo_url: Option<String>,
    pub entry_session: String,
    pub graduation_date: Option<NaiveDate>,
    pub verification_artifact_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Registration response carrying the partial-success flag
///
/// `artifact_pending` is true when the student row was committed but the
/// verification artifact could not be issued; the record is valid and the
/// artifact can be regenerated later.
#[derive(Debug, Serialize)]
pub struct RegisterStudentResponse {
    #[serde(flatten)]
    pub student: StudentResponse,
    pub artifact_pending: bool,
}

#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub verification_artifact_url: String,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub profile_photo_url: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        StudentResponse {
            id: student.id,
            student_code: student.student_code,
            name: student.name,
            profile_photo_url: student.profile_photo_url,
            entry_session: student.entry_session,
            graduation_date: student.graduation_date,
            verification_artifact_url: student.verification_artifact_url,
            created_at: format_timestamp(student.created_at),
            updated_at: format_timestamp(student.updated_at),
        }
    }
}

fn format_timestamp(ts: u64) -> String {
    chrono::DateTime::from_timestamp(ts as i64, 0)
        .map(|d| d.to_rfc3339())
        .unwrap_or_default()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/students
///
/// Two-phase create: the student row is committed first, then the
/// verification artifact is rendered from the now-known id and written back.
/// An artifact failure is reported as partial success, never by rolling the
/// student back.
pub async fn register_student(
    State(state): State<Arc<AppState>>,
    _staff: AuthenticatedStaff,
    Json(req): Json<RegisterStudentRequest>,
) -> Result<Json<RegisterStudentResponse>, ApiError> {
    // Reject unknown course ids before the student row exists.
    for course_id in &req.course_ids {
        if let Err(e) = state.registry.get_course(*course_id).await {
            return Err(match e {
                RegistryError::NotFound(id) => {
                    ApiError::Referential(format!("course {} does not exist", id))
                }
                other => other.into(),
            });
        }
    }

    let student = state
        .registry
        .register_student(NewStudent {
            student_code: req.student_code,
            name: req.name,
            entry_session: req.entry_session,
            graduation_date: req.graduation_date,
        })
        .await?;

    if !req.course_ids.is_empty() {
        state.registry.enroll(student.id, &req.course_ids).await?;
    }

    let artifact_pending = match state.certificates.issue(student.id).await {
        Ok(_) => false,
        Err(e) => {
            tracing::warn!(
                "Artifact issuance failed for student {}; record stays re-issuable: {}",
                student.id,
                e
            );
            true
        }
    };

    // Re-read so the response carries the artifact reference when phase two
    // succeeded.
    let student = state.registry.get_student(student.id).await?;

    Ok(Json(RegisterStudentResponse {
        student: student.into(),
        artifact_pending,
    }))
}

/// GET /v1/students
pub async fn list_students(
    State(state): State<Arc<AppState>>,
    _staff: AuthenticatedStaff,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = state.registry.list_students().await?;

    Ok(Json(students.into_iter().map(Into::into).collect()))
}

/// GET /v1/students/:student_id
pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = state.registry.get_student(student_id).await?;

    Ok(Json(student.into()))
}

/// PATCH /v1/students/:student_id
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = state
        .registry
        .update_student(
            student_id,
            StudentUpdate {
                student_code: req.student_code,
                name: req.name,
                entry_session: req.entry_session,
                graduation_date: req.graduation_date,
            },
        )
        .await?;

    Ok(Json(student.into()))
}

/// DELETE /v1/students/:student_id
///
/// Cascades to the student's enrollment rows. The id is never reused, so a
/// QR code already in circulation goes dark instead of resolving to someone
/// else.
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.registry.delete_student(student_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /v1/students/:student_id/photo
///
/// Raw image body → object store → URL stored on the student row.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
    body: Bytes,
) -> Result<Json<PhotoResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidRequest("photo body is empty".to_string()));
    }

    // Fail before uploading if the student doesn't exist.
    state.registry.get_student(student_id).await?;

    let url = state
        .object_store
        .put_blob(body.to_vec(), &format!("photo-{}", student_id))
        .await?;

    state
        .registry
        .set_profile_photo(student_id, url.clone())
        .await?;

    Ok(Json(PhotoResponse {
        profile_photo_url: url,
    }))
}

/// PUT /v1/students/:student_id/courses
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.registry.enroll(student_id, &req.course_ids).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /v1/students/:student_id/courses/:course_id
pub async fn unenroll(
    State(state): State<Arc<AppState>>,
    Path((student_id, course_id)): Path<(Uuid, Uuid)>,
    _staff: AuthenticatedStaff,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.registry.unenroll(student_id, course_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /v1/students/:student_id/verification
///
/// Re-issues the artifact, overwriting the stored reference; used when the
/// site origin changes or the artifact is lost.
pub async fn regenerate_verification(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<Uuid>,
    _staff: AuthenticatedStaff,
) -> Result<Json<VerificationResponse>, ApiError> {
    let url = state.certificates.regenerate(student_id).await?;

    Ok(Json(VerificationResponse {
        verification_artifact_url: url,
    }))
}
