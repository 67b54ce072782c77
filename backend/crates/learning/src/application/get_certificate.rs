//! Get Certificate Use Case
//!
//! Renders the stored certificate. When the enrollment is complete but a
//! previous issuance attempt failed, issuance is retried here first.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{CourseId, UserId};

use crate::application::access;
use crate::application::issue_certificate::CertificateIssuer;
use crate::domain::entity::Certificate;
use crate::domain::event::CourseCompleted;
use crate::domain::renderer::{CertificateRenderer, RenderedDocument};
use crate::domain::repository::{
    CertificateRepository, CourseRepository, EnrollmentRepository, LessonRepository,
    UserRepository,
};
use crate::error::{LearningError, LearningResult};

#[derive(Debug)]
pub struct RenderedCertificate {
    pub certificate: Certificate,
    pub document: RenderedDocument,
}

pub struct GetCertificateUseCase<R>
where
    R: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository,
{
    repo: Arc<R>,
    issuer: CertificateIssuer<R>,
    renderer: Arc<dyn CertificateRenderer>,
}

impl<R> GetCertificateUseCase<R>
where
    R: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository,
{
    pub fn new(
        repo: Arc<R>,
        issuer: CertificateIssuer<R>,
        renderer: Arc<dyn CertificateRenderer>,
    ) -> Self {
        Self {
            repo,
            issuer,
            renderer,
        }
    }

    pub async fn execute(
        &self,
        learner_id: UserId,
        course_id: CourseId,
    ) -> LearningResult<RenderedCertificate> {
        let learner = access::active_user(self.repo.as_ref(), &learner_id).await?;

        let enrollment = self
            .repo
            .find_enrollment(&learner.user_id, &course_id)
            .await?
            .ok_or(LearningError::EnrollmentNotFound)?;

        let certificate = if enrollment.certificate_issued {
            self.repo
                .find_certificate(&learner.user_id, &course_id)
                .await?
                .ok_or(LearningError::CertificateNotFound)?
        } else {
            let snapshot = self.repo.progress_snapshot(&enrollment.enrollment_id).await?;
            if !snapshot.progress().is_complete() {
                return Err(LearningError::InvalidState(
                    "certificate not yet issued".to_string(),
                ));
            }

            tracing::info!(
                learner_id = %learner.user_id,
                course_id = %course_id,
                "Retrying certificate issuance"
            );
            let event = CourseCompleted {
                enrollment_id: enrollment.enrollment_id,
                learner_id: learner.user_id,
                course_id,
                completed_at: Utc::now(),
            };
            self.issuer.handle(&event).await.map_err(|e| {
                tracing::warn!(
                    learner_id = %learner.user_id,
                    course_id = %course_id,
                    error = %e,
                    "Certificate issuance retry failed"
                );
                // Store failures keep their class
                if e.kind().is_server_error() {
                    e
                } else {
                    LearningError::InvalidState("certificate not yet issued".to_string())
                }
            })?
        };

        if !certificate.is_valid {
            return Err(LearningError::InvalidState(
                "certificate has been invalidated".to_string(),
            ));
        }

        let document = self.renderer.render(&certificate.document());

        Ok(RenderedCertificate {
            certificate,
            document,
        })
    }
}
