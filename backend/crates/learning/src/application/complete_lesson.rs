//! Complete Lesson Use Case
//!
//! Adds the lesson to the completed set and recomputes progress in one
//! store operation. Reaching 100% emits [`CourseCompleted`] for the
//! certificate issuer.
//!
//! Issuance failure is recovered here on purpose: it is logged and the
//! completion still succeeds with `certificate_issued == false`. The
//! certificate read path retries issuance.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{CourseId, LessonId, UserId};

use crate::application::access;
use crate::application::issue_certificate::CertificateIssuer;
use crate::domain::event::CourseCompleted;
use crate::domain::repository::{
    CertificateRepository, CourseRepository, EnrollmentRepository, LessonRepository,
    UserRepository,
};
use crate::domain::value_object::Progress;
use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteLessonOutput {
    pub progress: Progress,
    /// Completed lessons that are still active
    pub completed_lessons_count: u64,
    /// Active lessons in the course
    pub total_lessons: u64,
    pub certificate_issued: bool,
}

pub struct CompleteLessonUseCase<R>
where
    R: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository,
{
    repo: Arc<R>,
    issuer: CertificateIssuer<R>,
}

impl<R> CompleteLessonUseCase<R>
where
    R: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository,
{
    pub fn new(repo: Arc<R>, issuer: CertificateIssuer<R>) -> Self {
        Self { repo, issuer }
    }

    pub async fn execute(
        &self,
        learner_id: UserId,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> LearningResult<CompleteLessonOutput> {
        let learner = access::active_user(self.repo.as_ref(), &learner_id).await?;

        let enrollment = self
            .repo
            .find_enrollment(&learner.user_id, &course_id)
            .await?
            .ok_or(LearningError::EnrollmentNotFound)?;

        let lesson = self
            .repo
            .find_lesson(&lesson_id)
            .await?
            .filter(|l| l.belongs_to(&course_id) && l.is_active)
            .ok_or(LearningError::LessonNotFound)?;

        let snapshot = self
            .repo
            .record_completion(&enrollment.enrollment_id, &lesson.lesson_id)
            .await?;
        let progress = snapshot.progress();

        tracing::info!(
            learner_id = %learner.user_id,
            course_id = %course_id,
            lesson_id = %lesson.lesson_id,
            progress = progress.value(),
            "Lesson completed"
        );

        let mut certificate_issued = enrollment.certificate_issued;
        if progress.is_complete() && !certificate_issued {
            let event = CourseCompleted {
                enrollment_id: enrollment.enrollment_id,
                learner_id: learner.user_id,
                course_id,
                completed_at: Utc::now(),
            };

            match self.issuer.handle(&event).await {
                Ok(_) => certificate_issued = true,
                Err(e) => {
                    tracing::warn!(
                        learner_id = %learner.user_id,
                        course_id = %course_id,
                        error = %e,
                        "Certificate issuance failed; completion kept, will retry on fetch"
                    );
                }
            }
        }

        Ok(CompleteLessonOutput {
            progress,
            completed_lessons_count: snapshot.completed_active,
            total_lessons: snapshot.total_active,
            certificate_issued,
        })
    }
}
