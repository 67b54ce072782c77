//! Certificate Issuer
//!
//! Consumes [`CourseCompleted`] events. The (learner, course) unique
//! constraint is the at-most-once guarantee: a caller that loses the
//! issuance race adopts the stored certificate instead of failing.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use kernel::id::{CertificateId, CourseId, UserId};

use crate::application::config::LearningConfig;
use crate::domain::entity::Certificate;
use crate::domain::event::CourseCompleted;
use crate::domain::repository::{
    CertificateRepository, CourseRepository, EnrollmentRepository, LessonRepository,
    UserRepository,
};
use crate::domain::value_object::SerialHash;
use crate::error::{LearningError, LearningResult};

pub struct CertificateIssuer<R>
where
    R: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository,
{
    repo: Arc<R>,
    config: Arc<LearningConfig>,
}

impl<R> CertificateIssuer<R>
where
    R: UserRepository
        + CourseRepository
        + LessonRepository
        + EnrollmentRepository
        + CertificateRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LearningConfig>) -> Self {
        Self { repo, config }
    }

    /// Issue and link the certificate for a completed enrollment
    ///
    /// Idempotent: an existing certificate is reused.
    pub async fn handle(&self, event: &CourseCompleted) -> LearningResult<Certificate> {
        let certificate = match self.issue(&event.learner_id, &event.course_id).await {
            Ok(certificate) => certificate,
            Err(LearningError::CertificateAlreadyIssued) => {
                tracing::info!(
                    learner_id = %event.learner_id,
                    course_id = %event.course_id,
                    "Certificate already issued, reusing it"
                );
                self.repo
                    .find_certificate(&event.learner_id, &event.course_id)
                    .await?
                    .ok_or_else(|| {
                        LearningError::Internal(
                            "certificate conflict reported but none stored".to_string(),
                        )
                    })?
            }
            Err(e) => return Err(e),
        };

        self.repo
            .mark_certificate_issued(&event.enrollment_id, &certificate.serial_hash)
            .await?;

        Ok(certificate)
    }

    /// Create the certificate snapshot
    ///
    /// Fails with `CertificateAlreadyIssued` if one exists. A serial collision
    /// is retried once with a later timestamp.
    pub async fn issue(&self, learner_id: &UserId, course_id: &CourseId) -> LearningResult<Certificate> {
        let learner = self
            .repo
            .find_user(learner_id)
            .await?
            .ok_or(LearningError::UserNotFound)?;
        let course = self
            .repo
            .find_course(course_id)
            .await?
            .ok_or(LearningError::CourseNotFound)?;
        let issued_by_name = self
            .repo
            .find_user(&course.creator_id)
            .await?
            .map(|creator| creator.display_name)
            .ok_or(LearningError::UserNotFound)?;
        let stats = self.repo.active_lesson_stats(&course.course_id).await?;

        let issued_at = issuance_time(None);
        let mut certificate = Certificate {
            certificate_id: CertificateId::new(),
            learner_id: learner.user_id,
            course_id: course.course_id,
            serial_hash: self.serial_for(&learner.user_id, &course.course_id, issued_at),
            learner_name: learner.display_name,
            course_title: course.title,
            total_lessons: i32::try_from(stats.active_count).unwrap_or(i32::MAX),
            course_duration_minutes: i32::try_from(stats.total_duration_minutes)
                .unwrap_or(i32::MAX),
            grade: self.config.certificate_grade.clone(),
            issued_by_name,
            issued_at,
            is_valid: true,
        };

        let mut retried = false;
        loop {
            match self.repo.create_certificate(&certificate).await {
                Ok(()) => break,
                Err(LearningError::SerialHashCollision) if !retried => {
                    tracing::warn!(
                        serial_hash = %certificate.serial_hash,
                        "Certificate serial collision, retrying with a new timestamp"
                    );
                    retried = true;
                    certificate.issued_at = issuance_time(Some(certificate.issued_at));
                    certificate.serial_hash = self.serial_for(
                        &certificate.learner_id,
                        &certificate.course_id,
                        certificate.issued_at,
                    );
                }
                Err(LearningError::SerialHashCollision) => {
                    return Err(LearningError::Internal(
                        "certificate serial collision persisted after retry".to_string(),
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            learner_id = %certificate.learner_id,
            course_id = %certificate.course_id,
            serial_hash = %certificate.serial_hash,
            "Certificate issued"
        );

        Ok(certificate)
    }

    fn serial_for(&self, learner_id: &UserId, course_id: &CourseId, at: DateTime<Utc>) -> SerialHash {
        SerialHash::derive(learner_id, course_id, at, self.config.serial_hash_len)
    }
}

/// Now, at the store's microsecond precision, strictly after `previous`
fn issuance_time(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match previous {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    }
}
