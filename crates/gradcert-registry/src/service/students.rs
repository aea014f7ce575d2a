//! Student record operations.

use crate::{errors::*, types::*};
use gradcert_storage::{
    traits::BatchExt, Storage, CF_ENROLLMENTS, CF_ENROLLMENTS_BY_COURSE, CF_STUDENTS,
    CF_STUDENT_CODES,
};
use tracing::info;
use uuid::Uuid;

use super::RegistryService;

impl<S: Storage + 'static> RegistryService<S> {
    /// Register a student with a freshly allocated public id
    ///
    /// Phase one of the two-phase create: the row lands with
    /// `verification_artifact_url = None` and the certificate service fills
    /// it in afterwards.
    pub(crate) async fn register_student_internal(&self, new: NewStudent) -> Result<Student> {
        let student_code = new.student_code.trim().to_string();
        let name = new.name.trim().to_string();
        let entry_session = new.entry_session.trim().to_string();

        if student_code.is_empty() {
            return Err(RegistryError::Validation(
                "student code must not be empty".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(RegistryError::Validation(
                "student name must not be empty".to_string(),
            ));
        }
        if entry_session.is_empty() {
            return Err(RegistryError::Validation(
                "entry session must not be empty".to_string(),
            ));
        }

        if self.storage().exists(CF_STUDENT_CODES, &student_code).await? {
            return Err(RegistryError::Duplicate(format!(
                "student code {} is already registered",
                student_code
            )));
        }

        let now = current_timestamp();
        let student = Student {
            id: Uuid::new_v4(),
            student_code,
            name,
            profile_photo_url: None,
            entry_session,
            graduation_date: new.graduation_date,
            verification_artifact_url: None,
            created_at: now,
            updated_at: now,
        };

        let mut batch = self.storage().batch();
        batch.put(CF_STUDENTS, &student.id, &student)?;
        batch.put(CF_STUDENT_CODES, &student.student_code, &student.id)?;
        batch.commit().await?;

        info!("Student registered: {} ({})", student.student_code, student.id);
        Ok(student)
    }

    pub(crate) async fn update_student_internal(
        &self,
        student_id: Uuid,
        update: StudentUpdate,
    ) -> Result<Student> {
        let mut student = self.get_student_internal(student_id).await?;
        let old_code = student.student_code.clone();

        if let Some(code) = update.student_code {
            let code = code.trim().to_string();
            if code.is_empty() {
                return Err(RegistryError::Validation(
                    "student code must not be empty".to_string(),
                ));
            }
            if code != old_code && self.storage().exists(CF_STUDENT_CODES, &code).await? {
                return Err(RegistryError::Duplicate(format!(
                    "student code {} is already registered",
                    code
                )));
            }
            student.student_code = code;
        }
        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RegistryError::Validation(
                    "student name must not be empty".to_string(),
                ));
            }
            student.name = name;
        }
        if let Some(entry_session) = update.entry_session {
            let entry_session = entry_session.trim().to_string();
            if entry_session.is_empty() {
                return Err(RegistryError::Validation(
                    "entry session must not be empty".to_string(),
                ));
            }
            student.entry_session = entry_session;
        }
        if let Some(date) = update.graduation_date {
            student.graduation_date = Some(date);
        }

        student.updated_at = current_timestamp();

        let mut batch = self.storage().batch();
        if student.student_code != old_code {
            batch.delete(CF_STUDENT_CODES, &old_code)?;
            batch.put(CF_STUDENT_CODES, &student.student_code, &student.id)?;
        }
        batch.put(CF_STUDENTS, &student.id, &student)?;
        batch.commit().await?;

        Ok(student)
    }

    /// Delete a student, cascading to their enrollment rows
    ///
    /// The id itself is never recycled: future registrations always draw a
    /// fresh id, so a previously issued artifact can never resolve to a
    /// different student.
    pub(crate) async fn delete_student_internal(&self, student_id: Uuid) -> Result<()> {
        let student = self.get_student_internal(student_id).await?;

        let enrollments: Vec<(Vec<u8>, Enrollment)> = self
            .storage()
            .get_by_prefix(CF_ENROLLMENTS, &student_id)
            .await?;

        let mut batch = self.storage().batch();
        for (_, enrollment) in &enrollments {
            batch.delete(CF_ENROLLMENTS, &(student_id, enrollment.course_id))?;
            batch.delete(CF_ENROLLMENTS_BY_COURSE, &(enrollment.course_id, student_id))?;
        }
        batch.delete(CF_STUDENT_CODES, &student.student_code)?;
        batch.delete(CF_STUDENTS, &student_id)?;
        batch.commit().await?;

        info!(
            "Student {} deleted with {} enrollment(s)",
            student.student_code,
            enrollments.len()
        );
        Ok(())
    }

    pub(crate) async fn get_student_internal(&self, student_id: Uuid) -> Result<Student> {
        self.storage()
            .get(CF_STUDENTS, &student_id)
            .await?
            .ok_or(RegistryError::NotFound(student_id))
    }

    pub(crate) async fn list_students_internal(&self) -> Result<Vec<Student>> {
        let mut students: Vec<Student> = self
            .storage()
            .scan_all::<Student>(CF_STUDENTS)
            .await?
            .into_iter()
            .map(|(_, s)| s)
            .collect();

        students.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(students)
    }

    pub(crate) async fn set_photo_internal(
        &self,
        student_id: Uuid,
        url: String,
    ) -> Result<Student> {
        let mut student = self.get_student_internal(student_id).await?;
        student.profile_photo_url = Some(url);
        student.updated_at = current_timestamp();

        self.storage().put(CF_STUDENTS, &student_id, &student).await?;
        Ok(student)
    }

    pub(crate) async fn set_artifact_internal(
        &self,
        student_id: Uuid,
        url: String,
    ) -> Result<Student> {
        let mut student = self.get_student_internal(student_id).await?;
        student.verification_artifact_url = Some(url);
        student.updated_at = current_timestamp();

        self.storage().put(CF_STUDENTS, &student_id, &student).await?;

        info!("Verification artifact stored for student {}", student_id);
        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use crate::{errors::RegistryError, service::RegistryService, traits::Registry, types::*};
    use gradcert_storage::RocksDbStorage;
    use std::sync::Arc;
    use uuid::Uuid;

    fn test_registry() -> RegistryService<RocksDbStorage> {
        let storage = Arc::new(RocksDbStorage::open_test().unwrap());
        RegistryService::new(storage)
    }

    fn new_student(code: &str) -> NewStudent {
        NewStudent {
            student_code: code.to_string(),
            name: "Ayse Demir".to_string(),
            entry_session: "Fall 2024".to_string(),
            graduation_date: None,
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = test_registry();

        let student = registry.register_student(new_student("ST-1001")).await.unwrap();
        assert_eq!(student.student_code, "ST-1001");
        assert!(student.verification_artifact_url.is_none());

        let fetched = registry.get_student(student.id).await.unwrap();
        assert_eq!(fetched, student);
    }

    #[tokio::test]
    async fn test_duplicate_student_code_rejected() {
        let registry = test_registry();

        registry.register_student(new_student("ST-1001")).await.unwrap();
        let result = registry.register_student(new_student("ST-1001")).await;

        assert!(matches!(result, Err(RegistryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let registry = test_registry();

        let mut blank_code = new_student("  ");
        blank_code.student_code = "  ".to_string();
        assert!(matches!(
            registry.register_student(blank_code).await,
            Err(RegistryError::Validation(_))
        ));

        let mut blank_name = new_student("ST-2001");
        blank_name.name = "".to_string();
        assert!(matches!(
            registry.register_student(blank_name).await,
            Err(RegistryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_student_code_keeps_index_consistent() {
        let registry = test_registry();

        let student = registry.register_student(new_student("ST-1001")).await.unwrap();

        registry
            .update_student(
                student.id,
                StudentUpdate {
                    student_code: Some("ST-1002".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Old code is free again, new code is taken.
        registry.register_student(new_student("ST-1001")).await.unwrap();
        let result = registry.register_student(new_student("ST-1002")).await;
        assert!(matches!(result, Err(RegistryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_list_students_most_recent_first() {
        let registry = test_registry();

        let first = registry.register_student(new_student("ST-1001")).await.unwrap();
        let second = registry.register_student(new_student("ST-1002")).await.unwrap();

        let listed = registry.list_students().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);
        let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
        assert!(ids.contains(&first.id));
        assert!(ids.contains(&second.id));
    }

    #[tokio::test]
    async fn test_delete_student_frees_code_and_enrollments() {
        let registry = test_registry();

        let course = registry.add_course("Skin Care", SessionType::Theory).await.unwrap();
        let student = registry.register_student(new_student("ST-1001")).await.unwrap();
        registry.enroll(student.id, &[course.course_id]).await.unwrap();

        registry.delete_student(student.id).await.unwrap();

        assert!(matches!(
            registry.get_student(student.id).await,
            Err(RegistryError::NotFound(_))
        ));
        // Code can be reused by a new registration.
        registry.register_student(new_student("ST-1001")).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_artifact_overwrites_previous() {
        let registry = test_registry();

        let student = registry.register_student(new_student("ST-1001")).await.unwrap();

        let updated = registry
            .set_verification_artifact(student.id, "https://blobs.example/qr-1.png".to_string())
            .await
            .unwrap();
        assert_eq!(
            updated.verification_artifact_url.as_deref(),
            Some("https://blobs.example/qr-1.png")
        );

        let updated = registry
            .set_verification_artifact(student.id, "https://blobs.example/qr-2.png".to_string())
            .await
            .unwrap();
        assert_eq!(
            updated.verification_artifact_url.as_deref(),
            Some("https://blobs.example/qr-2.png")
        );
    }
}
