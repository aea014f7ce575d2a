//! Registry service implementation.

mod courses;
mod enrollments;
mod students;

use crate::{errors::Result, traits::Registry, types::*};
use async_trait::async_trait;
use gradcert_storage::Storage;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Registry service backed by a [`Storage`] implementation
///
/// Course-number allocation is serialized behind `allocation_lock` so the
/// compute-max-then-insert sequence is atomic with respect to other
/// allocations in this process; the course-number index column family backs
/// that up with a store-level uniqueness check.
pub struct RegistryService<S: Storage> {
    storage: Arc<S>,
    allocation_lock: Mutex<()>,
}

impl<S: Storage> RegistryService<S> {
    /// Create a new registry service
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            allocation_lock: Mutex::new(()),
        }
    }

    pub(crate) fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

#[async_trait]
impl<S: Storage + 'static> Registry for RegistryService<S> {
    async fn add_course(&self, name: &str, session_type: SessionType) -> Result<Course> {
        self.add_course_internal(name, session_type).await
    }

    async fn update_course(&self, course_id: Uuid, update: CourseUpdate) -> Result<Course> {
        self.update_course_internal(course_id, update).await
    }

    async fn delete_course(&self, course_id: Uuid) -> Result<()> {
        self.delete_course_internal(course_id).await
    }

    async fn get_course(&self, course_id: Uuid) -> Result<Course> {
        self.get_course_internal(course_id).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_courses_internal().await
    }

    async fn register_student(&self, new: NewStudent) -> Result<Student> {
        self.register_student_internal(new).await
    }

    async fn update_student(&self, student_id: Uuid, update: StudentUpdate) -> Result<Student> {
        self.update_student_internal(student_id, update).await
    }

    async fn delete_student(&self, student_id: Uuid) -> Result<()> {
        self.delete_student_internal(student_id).await
    }

    async fn get_student(&self, student_id: Uuid) -> Result<Student> {
        self.get_student_internal(student_id).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.list_students_internal().await
    }

    async fn set_profile_photo(&self, student_id: Uuid, url: String) -> Result<Student> {
        self.set_photo_internal(student_id, url).await
    }

    async fn set_verification_artifact(&self, student_id: Uuid, url: String) -> Result<Student> {
        self.set_artifact_internal(student_id, url).await
    }

    async fn enroll(&self, student_id: Uuid, course_ids: &[Uuid]) -> Result<()> {
        self.enroll_internal(student_id, course_ids).await
    }

    async fn unenroll(&self, student_id: Uuid, course_id: Uuid) -> Result<()> {
        self.unenroll_internal(student_id, course_id).await
    }

    async fn courses_for(&self, student_id: Uuid) -> Result<Vec<Course>> {
        self.courses_for_internal(student_id).await
    }
}
