//! Restrict Learner Use Case
//!
//! A restricted learner cannot enroll in the course. Existing enrollments
//! are left alone.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};

use crate::application::access;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

pub struct RestrictLearnerUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    repo: Arc<R>,
}

impl<R> RestrictLearnerUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns `true` if the restriction is new
    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        learner_id: UserId,
    ) -> LearningResult<bool> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;

        if course.is_owned_by(&learner_id) {
            return Err(LearningError::Validation(
                "the course creator cannot be restricted".to_string(),
            ));
        }
        self.repo
            .find_user(&learner_id)
            .await?
            .ok_or(LearningError::UserNotFound)?;

        let created = self.repo.restrict_learner(&course.course_id, &learner_id).await?;

        if created {
            tracing::info!(
                course_id = %course.course_id,
                learner_id = %learner_id,
                actor_id = %actor.user_id,
                "Learner restricted from course"
            );
        }

        Ok(created)
    }
}
