//! Course catalog operations.

use crate::{errors::*, types::*};
use gradcert_storage::{
    traits::BatchExt, Storage, CF_COURSES, CF_COURSE_NUMBERS, CF_ENROLLMENTS,
    CF_ENROLLMENTS_BY_COURSE,
};
use tracing::info;
use uuid::Uuid;

use super::RegistryService;

impl<S: Storage + 'static> RegistryService<S> {
    /// Create a course with the next course number
    ///
    /// Allocation is max(existing) + 1, starting from 1 on an empty catalog.
    /// The whole sequence runs under the allocation lock, and the number
    /// index turns any raced allocation into a `Duplicate` error the caller
    /// can retry.
    pub(crate) async fn add_course_internal(
        &self,
        name: &str,
        session_type: SessionType,
    ) -> Result<Course> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::Validation(
                "course name must not be empty".to_string(),
            ));
        }

        let _guard = self.allocation_lock.lock().await;

        let existing: Vec<(Vec<u8>, Course)> = self.storage().scan_all(CF_COURSES).await?;

        if existing.iter().any(|(_, c)| c.course_name == name) {
            return Err(RegistryError::Duplicate(format!(
                "course {} already exists",
                name
            )));
        }

        let next_number = existing
            .iter()
            .map(|(_, c)| c.course_number)
            .max()
            .unwrap_or(0)
            + 1;

        if self.storage().exists(CF_COURSE_NUMBERS, &next_number).await? {
            return Err(RegistryError::Duplicate(format!(
                "course number {} is already allocated",
                next_number
            )));
        }

        let course = Course {
            course_id: Uuid::new_v4(),
            course_number: next_number,
            course_name: name.to_string(),
            session_type,
        };

        let mut batch = self.storage().batch();
        batch.put(CF_COURSES, &course.course_id, &course)?;
        batch.put(CF_COURSE_NUMBERS, &next_number, &course.course_id)?;
        batch.commit().await?;

        info!("Course {} added: {}", course.course_number, course.course_name);
        Ok(course)
    }

    pub(crate) async fn update_course_internal(
        &self,
        course_id: Uuid,
        update: CourseUpdate,
    ) -> Result<Course> {
        let mut course = self.get_course_internal(course_id).await?;

        if let Some(name) = update.course_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RegistryError::Validation(
                    "course name must not be empty".to_string(),
                ));
            }
            course.course_name = name;
        }
        if let Some(session_type) = update.session_type {
            course.session_type = session_type;
        }

        self.storage().put(CF_COURSES, &course_id, &course).await?;

        Ok(course)
    }

    /// Delete a course, cascading to its enrollment rows
    pub(crate) async fn delete_course_internal(&self, course_id: Uuid) -> Result<()> {
        let course = self.get_course_internal(course_id).await?;

        let enrolled: Vec<(Vec<u8>, Uuid)> = self
            .storage()
            .get_by_prefix(CF_ENROLLMENTS_BY_COURSE, &course_id)
            .await?;

        let mut batch = self.storage().batch();
        for (_, student_id) in &enrolled {
            batch.delete(CF_ENROLLMENTS, &(*student_id, course_id))?;
            batch.delete(CF_ENROLLMENTS_BY_COURSE, &(course_id, *student_id))?;
        }
        batch.delete(CF_COURSE_NUMBERS, &course.course_number)?;
        batch.delete(CF_COURSES, &course_id)?;
        batch.commit().await?;

        info!(
            "Course {} deleted with {} enrollment(s)",
            course.course_number,
            enrolled.len()
        );
        Ok(())
    }

    pub(crate) async fn get_course_internal(&self, course_id: Uuid) -> Result<Course> {
        self.storage()
            .get(CF_COURSES, &course_id)
            .await?
            .ok_or(RegistryError::NotFound(course_id))
    }

    pub(crate) async fn list_courses_internal(&self) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .storage()
            .scan_all::<Course>(CF_COURSES)
            .await?
            .into_iter()
            .map(|(_, c)| c)
            .collect();

        courses.sort_by_key(|c| c.course_number);
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use crate::{errors::RegistryError, service::RegistryService, traits::Registry, types::*};
    use gradcert_storage::RocksDbStorage;
    use std::sync::Arc;

    fn test_registry() -> Arc<RegistryService<RocksDbStorage>> {
        let storage = Arc::new(RocksDbStorage::open_test().unwrap());
        Arc::new(RegistryService::new(storage))
    }

    #[tokio::test]
    async fn test_course_numbers_are_dense_from_one() {
        let registry = test_registry();

        for n in 1..=5u32 {
            let course = registry
                .add_course(&format!("Course {}", n), SessionType::Theory)
                .await
                .unwrap();
            assert_eq!(course.course_number, n);
        }
    }

    #[tokio::test]
    async fn test_concurrent_allocation_yields_unique_numbers() {
        let registry = test_registry();

        let mut handles = Vec::new();
        for n in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .add_course(&format!("Course {}", n), SessionType::TheoryAndPractical)
                    .await
            }));
        }

        let mut numbers = std::collections::HashSet::new();
        for handle in handles {
            let course = handle.await.unwrap().unwrap();
            assert!(
                numbers.insert(course.course_number),
                "duplicate course number {}",
                course.course_number
            );
        }
        assert_eq!(numbers.len(), 16);
        assert_eq!(*numbers.iter().max().unwrap(), 16);
    }

    #[tokio::test]
    async fn test_duplicate_course_name_rejected() {
        let registry = test_registry();

        registry
            .add_course("Skin Care Fundamentals", SessionType::Theory)
            .await
            .unwrap();
        let result = registry
            .add_course("Skin Care Fundamentals", SessionType::TheoryAndPractical)
            .await;

        assert!(matches!(result, Err(RegistryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_empty_course_name_rejected() {
        let registry = test_registry();

        let result = registry.add_course("   ", SessionType::Theory).await;
        assert!(matches!(result, Err(RegistryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_never_changes_course_number() {
        let registry = test_registry();

        let course = registry
            .add_course("Facial Treatments", SessionType::Theory)
            .await
            .unwrap();

        let updated = registry
            .update_course(
                course.course_id,
                CourseUpdate {
                    course_name: Some("Advanced Facial Treatments".to_string()),
                    session_type: Some(SessionType::TheoryAndPractical),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.course_number, course.course_number);
        assert_eq!(updated.course_name, "Advanced Facial Treatments");
        assert_eq!(updated.session_type, SessionType::TheoryAndPractical);
    }

    #[tokio::test]
    async fn test_list_courses_ordered_by_number() {
        let registry = test_registry();

        registry.add_course("First", SessionType::Theory).await.unwrap();
        registry.add_course("Second", SessionType::Theory).await.unwrap();
        registry.add_course("Third", SessionType::Theory).await.unwrap();

        let listed = registry.list_courses().await.unwrap();
        let numbers: Vec<u32> = listed.iter().map(|c| c.course_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_allocation_after_deleting_highest_course() {
        let registry = test_registry();

        let first = registry.add_course("First", SessionType::Theory).await.unwrap();
        let second = registry.add_course("Second", SessionType::Theory).await.unwrap();
        assert_eq!(second.course_number, 2);

        registry.delete_course(second.course_id).await.unwrap();

        // Max over live courses is 1 again, so the next allocation is 2.
        let third = registry.add_course("Third", SessionType::Theory).await.unwrap();
        assert_eq!(third.course_number, 2);
        assert_eq!(first.course_number, 1);
    }

    #[tokio::test]
    async fn test_delete_course_not_found() {
        let registry = test_registry();

        let result = registry.delete_course(uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }
}
