//! Enrollment ledger operations.

use crate::{errors::*, types::*};
use gradcert_storage::{
    traits::BatchExt, Storage, CF_COURSES, CF_ENROLLMENTS, CF_ENROLLMENTS_BY_COURSE,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::RegistryService;

impl<S: Storage + 'static> RegistryService<S> {
    /// Enroll a student in a set of courses
    ///
    /// Treated as a set operation: pairs already held are skipped so
    /// re-enrolling is a no-op, and only course ids that don't exist fail
    /// the call. All new rows land in one batch.
    pub(crate) async fn enroll_internal(
        &self,
        student_id: Uuid,
        course_ids: &[Uuid],
    ) -> Result<()> {
        self.get_student_internal(student_id).await?;

        for course_id in course_ids {
            if !self.storage().exists(CF_COURSES, course_id).await? {
                return Err(RegistryError::Referential(format!(
                    "course {} does not exist",
                    course_id
                )));
            }
        }

        let now = current_timestamp();
        let mut batch = self.storage().batch();
        let mut inserted = 0usize;

        for course_id in course_ids {
            let key = (student_id, *course_id);
            if self.storage().exists(CF_ENROLLMENTS, &key).await? {
                continue;
            }

            let enrollment = Enrollment {
                student_id,
                course_id: *course_id,
                enrolled_at: now,
            };
            batch.put(CF_ENROLLMENTS, &key, &enrollment)?;
            batch.put(CF_ENROLLMENTS_BY_COURSE, &(*course_id, student_id), &student_id)?;
            inserted += 1;
        }

        if inserted == 0 {
            batch.rollback();
        } else {
            batch.commit().await?;
            info!("Enrolled student {} in {} course(s)", student_id, inserted);
        }

        Ok(())
    }

    /// Remove one enrollment pair; removing a pair that isn't held is a no-op
    pub(crate) async fn unenroll_internal(&self, student_id: Uuid, course_id: Uuid) -> Result<()> {
        let mut batch = self.storage().batch();
        batch.delete(CF_ENROLLMENTS, &(student_id, course_id))?;
        batch.delete(CF_ENROLLMENTS_BY_COURSE, &(course_id, student_id))?;
        batch.commit().await?;

        Ok(())
    }

    /// Courses a student holds, ordered by course number ascending
    pub(crate) async fn courses_for_internal(&self, student_id: Uuid) -> Result<Vec<Course>> {
        self.get_student_internal(student_id).await?;

        let enrollments: Vec<(Vec<u8>, Enrollment)> = self
            .storage()
            .get_by_prefix(CF_ENROLLMENTS, &student_id)
            .await?;

        let mut courses = Vec::with_capacity(enrollments.len());
        for (_, enrollment) in enrollments {
            match self.storage().get(CF_COURSES, &enrollment.course_id).await? {
                Some(course) => courses.push(course),
                // Cascades keep the ledger consistent; a miss here means a
                // partially applied external mutation.
                None => warn!(
                    "enrollment for student {} references missing course {}",
                    student_id, enrollment.course_id
                ),
            }
        }

        courses.sort_by_key(|c: &Course| c.course_number);
        Ok(courses)
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

    async fn seed_student(registry: &RegistryService<RocksDbStorage>) -> Student {
        registry
            .register_student(NewStudent {
                student_code: "ST-1001".to_string(),
                name: "Ayse Demir".to_string(),
                entry_session: "Fall 2024".to_string(),
                graduation_date: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_enroll_and_list() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let c1 = registry.add_course("First", SessionType::Theory).await.unwrap();
        let c2 = registry
            .add_course("Second", SessionType::TheoryAndPractical)
            .await
            .unwrap();

        registry
            .enroll(student.id, &[c2.course_id, c1.course_id])
            .await
            .unwrap();

        let courses = registry.courses_for(student.id).await.unwrap();
        let numbers: Vec<u32> = courses.iter().map(|c| c.course_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_enroll_is_idempotent() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let course = registry.add_course("Only", SessionType::Theory).await.unwrap();

        registry.enroll(student.id, &[course.course_id]).await.unwrap();
        registry.enroll(student.id, &[course.course_id]).await.unwrap();

        let courses = registry.courses_for(student.id).await.unwrap();
        assert_eq!(courses.len(), 1);
    }

    #[tokio::test]
    async fn test_enroll_mixed_held_and_new() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let c1 = registry.add_course("First", SessionType::Theory).await.unwrap();
        let c2 = registry.add_course("Second", SessionType::Theory).await.unwrap();

        registry.enroll(student.id, &[c1.course_id]).await.unwrap();
        // Already holding c1 must not fail the batch that adds c2.
        registry
            .enroll(student.id, &[c1.course_id, c2.course_id])
            .await
            .unwrap();

        let courses = registry.courses_for(student.id).await.unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[tokio::test]
    async fn test_enroll_unknown_course_fails() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let course = registry.add_course("Real", SessionType::Theory).await.unwrap();

        let result = registry
            .enroll(student.id, &[course.course_id, Uuid::new_v4()])
            .await;
        assert!(matches!(result, Err(RegistryError::Referential(_))));

        // Nothing was inserted for the valid id either.
        let courses = registry.courses_for(student.id).await.unwrap();
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn test_unenroll_leaves_other_courses() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let c1 = registry.add_course("First", SessionType::Theory).await.unwrap();
        let c2 = registry.add_course("Second", SessionType::Theory).await.unwrap();

        registry
            .enroll(student.id, &[c1.course_id, c2.course_id])
            .await
            .unwrap();
        registry.unenroll(student.id, c1.course_id).await.unwrap();

        let courses = registry.courses_for(student.id).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_id, c2.course_id);
    }

    #[tokio::test]
    async fn test_unenroll_missing_pair_is_noop() {
        let registry = test_registry();
        let student = seed_student(&registry).await;

        registry.unenroll(student.id, Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_course_delete_cascades_to_ledger() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let c1 = registry.add_course("First", SessionType::Theory).await.unwrap();
        let c2 = registry.add_course("Second", SessionType::Theory).await.unwrap();

        registry
            .enroll(student.id, &[c1.course_id, c2.course_id])
            .await
            .unwrap();
        registry.delete_course(c1.course_id).await.unwrap();

        let courses = registry.courses_for(student.id).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_id, c2.course_id);
    }
}
