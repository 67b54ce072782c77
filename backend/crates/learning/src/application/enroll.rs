//! Enroll Use Case

use std::sync::Arc;

use kernel::id::{CourseId, UserId};

use crate::application::access;
use crate::domain::entity::Enrollment;
use crate::domain::repository::{CourseRepository, EnrollmentRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

pub struct EnrollUseCase<R>
where
    R: UserRepository + CourseRepository + EnrollmentRepository,
{
    repo: Arc<R>,
}

impl<R> EnrollUseCase<R>
where
    R: UserRepository + CourseRepository + EnrollmentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, learner_id: UserId, course_id: CourseId) -> LearningResult<Enrollment> {
        let learner = access::active_user(self.repo.as_ref(), &learner_id).await?;

        let course = self
            .repo
            .find_course(&course_id)
            .await?
            .ok_or(LearningError::CourseNotFound)?;

        if self
            .repo
            .is_learner_restricted(&course.course_id, &learner.user_id)
            .await?
        {
            return Err(LearningError::Forbidden(
                "you are restricted from this course".to_string(),
            ));
        }

        if !course.is_live() {
            return Err(LearningError::InvalidState("course is not published".to_string()));
        }

        let enrollment = Enrollment::new(learner.user_id, course.course_id);
        self.repo.create_enrollment(&enrollment).await?;

        // Enrollment is committed; a failed recount only leaves the counter stale
        let enrollment_count = match self.repo.recount_enrollments(&course.course_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    course_id = %course.course_id,
                    error = %e,
                    "Enrollment count not refreshed"
                );
                course.enrollment_count
            }
        };

        tracing::info!(
            course_id = %course.course_id,
            learner_id = %learner.user_id,
            enrollment_count,
            "Learner enrolled"
        );

        Ok(enrollment)
    }
}
