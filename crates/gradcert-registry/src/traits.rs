//! Registry trait definitions.

use crate::{errors::Result, types::*};
use async_trait::async_trait;
use uuid::Uuid;

/// Registry subsystem trait
///
/// One surface covering the course catalog, student records, and the
/// enrollment ledger. The certificate service is written against this trait
/// so it can be exercised with a mock registry in tests.
#[async_trait]
pub trait Registry: Send + Sync {
    // ========================================================================
    // Course Registry
    // ========================================================================

    /// Create a course, allocating the next course number
    async fn add_course(&self, name: &str, session_type: SessionType) -> Result<Course>;

    /// Partially update a course; the course number never changes
    async fn update_course(&self, course_id: Uuid, update: CourseUpdate) -> Result<Course>;

    /// Delete a course and its enrollment rows
    async fn delete_course(&self, course_id: Uuid) -> Result<()>;

    /// Get a course by id
    async fn get_course(&self, course_id: Uuid) -> Result<Course>;

    /// List all courses ordered by course number ascending
    async fn list_courses(&self) -> Result<Vec<Course>>;

    // ========================================================================
    // Student Registry
    // ========================================================================

    /// Register a student, allocating a fresh public id
    ///
    /// The row is created without a verification artifact; issuance is a
    /// separate second phase.
    async fn register_student(&self, new: NewStudent) -> Result<Student>;

    /// Partially update a student record
    async fn update_student(&self, student_id: Uuid, update: StudentUpdate) -> Result<Student>;

    /// Delete a student and their enrollment rows
    async fn delete_student(&self, student_id: Uuid) -> Result<()>;

    /// Get a student by public id
    async fn get_student(&self, student_id: Uuid) -> Result<Student>;

    /// List all students, most recently registered first
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Store the profile photo URL returned by the object store
    async fn set_profile_photo(&self, student_id: Uuid, url: String) -> Result<Student>;

    /// Store the verification artifact URL returned by the object store
    ///
    /// Overwrites any previous reference; used by both initial issuance and
    /// regeneration.
    async fn set_verification_artifact(&self, student_id: Uuid, url: String) -> Result<Student>;

    // ========================================================================
    // Enrollment Ledger
    // ========================================================================

    /// Enroll a student in a set of courses
    ///
    /// Idempotent as a set operation: already-held courses are skipped, only
    /// course ids that don't exist fail the call.
    async fn enroll(&self, student_id: Uuid, course_ids: &[Uuid]) -> Result<()>;

    /// Remove one enrollment pair; a missing pair is a no-op
    async fn unenroll(&self, student_id: Uuid, course_id: Uuid) -> Result<()>;

    /// Courses a student is enrolled in, ordered by course number ascending
    async fn courses_for(&self, student_id: Uuid) -> Result<Vec<Course>>;
}
