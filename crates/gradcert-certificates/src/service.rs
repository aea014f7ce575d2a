//! Certificate service: artifact issuance and the public resolver.

use crate::errors::*;
use crate::render::RenderOptions;
use crate::traits::{CodeRenderer, ObjectStore};
use crate::types::{CertificateCourse, CertificateView};
use gradcert_registry::{Registry, RegistryError};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Certificate service
///
/// Generic over the registry and the two external capabilities so tests can
/// substitute mocks for the renderer and the object store.
pub struct CertificateService<G, R, O>
where
    G: Registry,
    R: CodeRenderer,
    O: ObjectStore,
{
    registry: Arc<G>,
    renderer: Arc<R>,
    object_store: Arc<O>,
    site_origin: String,
    render_options: RenderOptions,
}

impl<G, R, O> CertificateService<G, R, O>
where
    G: Registry + 'static,
    R: CodeRenderer + 'static,
    O: ObjectStore + 'static,
{
    /// Create a new certificate service
    pub fn new(registry: Arc<G>, renderer: Arc<R>, object_store: Arc<O>, site_origin: String) -> Self {
        Self {
            registry,
            renderer,
            object_store,
            site_origin: site_origin.trim_end_matches('/').to_string(),
            render_options: RenderOptions::default(),
        }
    }

    /// The public certificate URL for a student id
    ///
    /// This is the exact payload encoded in the artifact: the id itself is
    /// the lookup key, there is no separate token.
    pub fn certificate_url(&self, student_id: Uuid) -> String {
        format!("{}/certificate/{}", self.site_origin, student_id)
    }

    /// Issue the verification artifact for a student
    ///
    /// Runs after the student row exists: renders the certificate URL,
    /// stores the image, and writes the returned reference onto the row.
    /// Failures never touch the student record, which stays valid with a
    /// null artifact reference until a later `regenerate` succeeds.
    pub async fn issue(&self, student_id: Uuid) -> Result<String> {
        let student = match self.registry.get_student(student_id).await {
            Ok(student) => student,
            Err(RegistryError::NotFound(id)) => return Err(CertificateError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };

        let url = self.certificate_url(student.id);
        let image = self.renderer.render(&url, &self.render_options).await?;

        let artifact_url = self
            .object_store
            .put_blob(image, &format!("qr-{}.png", student.id))
            .await?;

        self.registry
            .set_verification_artifact(student.id, artifact_url.clone())
            .await
            .map_err(|e| CertificateError::ArtifactIssuance(e.to_string()))?;

        info!("Verification artifact issued for student {}", student.id);
        Ok(artifact_url)
    }

    /// Re-run issuance for an existing student, overwriting the stored
    /// reference (origin change, artifact loss)
    pub async fn regenerate(&self, student_id: Uuid) -> Result<String> {
        info!("Regenerating verification artifact for student {}", student_id);
        self.issue(student_id).await
    }

    /// Resolve a public certificate view
    ///
    /// The only read path reachable without staff credentials. A miss is
    /// `NotFound` with no further detail; the view carries only what the
    /// certificate display needs.
    pub async fn resolve(&self, student_id: Uuid) -> Result<CertificateView> {
        let student = match self.registry.get_student(student_id).await {
            Ok(student) => student,
            Err(RegistryError::NotFound(id)) => return Err(CertificateError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };

        let courses = self
            .registry
            .courses_for(student.id)
            .await?
            .into_iter()
            .map(|c| CertificateCourse {
                course_number: c.course_number,
                course_name: c.course_name,
                session_type: c.session_type.to_string(),
            })
            .collect();

        Ok(CertificateView {
            id: student.id,
            student_code: student.student_code,
            name: student.name,
            profile_photo_url: student.profile_photo_url,
            entry_session: student.entry_session,
            graduation_date: student.graduation_date,
            courses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mocks::{FailingRenderer, MockObjectStore, MockRenderer};
    use gradcert_registry::{NewStudent, RegistryService, SessionType};
    use gradcert_storage::RocksDbStorage;

    const ORIGIN: &str = "https://certificates.example";

    fn test_registry() -> Arc<RegistryService<RocksDbStorage>> {
        let storage = Arc::new(RocksDbStorage::open_test().unwrap());
        Arc::new(RegistryService::new(storage))
    }

    fn service<R: CodeRenderer + 'static>(
        registry: Arc<RegistryService<RocksDbStorage>>,
        renderer: R,
    ) -> CertificateService<RegistryService<RocksDbStorage>, R, MockObjectStore> {
        CertificateService::new(
            registry,
            Arc::new(renderer),
            Arc::new(MockObjectStore::default()),
            ORIGIN.to_string(),
        )
    }

    async fn seed_student(registry: &Arc<RegistryService<RocksDbStorage>>) -> gradcert_registry::Student {
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
    async fn test_issue_encodes_certificate_url_and_stores_reference() {
        let registry = test_registry();
        let student = seed_student(&registry).await;
        let certificates = service(registry.clone(), MockRenderer::default());

        let artifact_url = certificates.issue(student.id).await.unwrap();
        assert_eq!(
            artifact_url,
            format!("https://blobs.example/qr-{}.png", student.id)
        );

        let stored = registry.get_student(student.id).await.unwrap();
        assert_eq!(stored.verification_artifact_url, Some(artifact_url));

        let rendered = certificates.renderer.rendered.lock().unwrap();
        assert_eq!(
            rendered.as_slice(),
            [format!("{}/certificate/{}", ORIGIN, student.id)]
        );
    }

    #[tokio::test]
    async fn test_issue_unknown_student_is_not_found() {
        let registry = test_registry();
        let certificates = service(registry, MockRenderer::default());

        let result = certificates.issue(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CertificateError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_issuance_failure_leaves_student_reissuable() {
        let registry = test_registry();
        let student = seed_student(&registry).await;

        // Phase two fails; the row from phase one must survive untouched.
        let failing = service(registry.clone(), FailingRenderer);
        let result = failing.issue(student.id).await;
        assert!(result.is_err());

        let stored = registry.get_student(student.id).await.unwrap();
        assert!(stored.verification_artifact_url.is_none());

        // A later regenerate succeeds without duplicating the student.
        let working = service(registry.clone(), MockRenderer::default());
        working.regenerate(student.id).await.unwrap();

        let stored = registry.get_student(student.id).await.unwrap();
        assert!(stored.verification_artifact_url.is_some());
        assert_eq!(registry.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_overwrites_reference_on_origin_change() {
        let registry = test_registry();
        let student = seed_student(&registry).await;

        service(registry.clone(), MockRenderer::default())
            .issue(student.id)
            .await
            .unwrap();

        let moved = CertificateService::new(
            registry.clone(),
            Arc::new(MockRenderer::default()),
            Arc::new(MockObjectStore::default()),
            "https://verify.example/".to_string(),
        );
        moved.regenerate(student.id).await.unwrap();

        let rendered = moved.renderer.rendered.lock().unwrap();
        assert_eq!(
            rendered.as_slice(),
            [format!("https://verify.example/certificate/{}", student.id)]
        );
    }

    #[tokio::test]
    async fn test_resolve_orders_courses_by_number() {
        let registry = test_registry();
        let student = seed_student(&registry).await;

        let c1 = registry.add_course("First", SessionType::Theory).await.unwrap();
        let c2 = registry
            .add_course("Second", SessionType::TheoryAndPractical)
            .await
            .unwrap();

        // Enrollment insertion order must not leak into the view.
        registry
            .enroll(student.id, &[c2.course_id, c1.course_id])
            .await
            .unwrap();

        let certificates = service(registry, MockRenderer::default());
        let view = certificates.resolve(student.id).await.unwrap();

        assert_eq!(view.name, "Ayse Demir");
        assert_eq!(view.student_code, "ST-1001");
        let numbers: Vec<u32> = view.courses.iter().map(|c| c.course_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(view.courses[1].session_type, "Theory and Practical");
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_not_found() {
        let registry = test_registry();
        let certificates = service(registry, MockRenderer::default());

        let result = certificates.resolve(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CertificateError::NotFound(_))));
    }
}
