//! Get Progress Use Case
//!
//! Pure read. Progress is recomputed against the current active lessons,
//! so it follows lesson (de)activation after enrollment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LessonId, UserId};

use crate::application::access;
use crate::domain::repository::{EnrollmentRepository, UserRepository};
use crate::domain::value_object::Progress;
use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone)]
pub struct ProgressOutput {
    pub total_lessons: u64,
    pub completed_lessons: Vec<LessonId>,
    pub progress: Progress,
    pub enrolled_at: DateTime<Utc>,
    pub certificate_issued: bool,
}

pub struct GetProgressUseCase<R>
where
    R: UserRepository + EnrollmentRepository,
{
    repo: Arc<R>,
}

impl<R> GetProgressUseCase<R>
where
    R: UserRepository + EnrollmentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, learner_id: UserId, course_id: CourseId) -> LearningResult<ProgressOutput> {
        let learner = access::active_user(self.repo.as_ref(), &learner_id).await?;

        let enrollment = self
            .repo
            .find_enrollment(&learner.user_id, &course_id)
            .await?
            .ok_or(LearningError::EnrollmentNotFound)?;

        let snapshot = self.repo.progress_snapshot(&enrollment.enrollment_id).await?;

        Ok(ProgressOutput {
            total_lessons: snapshot.total_active,
            completed_lessons: enrollment.completed_lessons,
            progress: snapshot.progress(),
            enrolled_at: enrollment.enrolled_at,
            certificate_issued: enrollment.certificate_issued,
        })
    }
}
