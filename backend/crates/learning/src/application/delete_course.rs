//! Delete Course Use Case
//!
//! Creators cannot delete a live course that has learners; admins can.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};
use platform::blob::BlobStore;

use crate::application::access;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

pub struct DeleteCourseUseCase<R, B>
where
    R: UserRepository + CourseRepository,
    B: BlobStore,
{
    repo: Arc<R>,
    blobs: Arc<B>,
}

impl<R, B> DeleteCourseUseCase<R, B>
where
    R: UserRepository + CourseRepository,
    B: BlobStore,
{
    pub fn new(repo: Arc<R>, blobs: Arc<B>) -> Self {
        Self { repo, blobs }
    }

    pub async fn execute(&self, actor_id: UserId, course_id: CourseId) -> LearningResult<()> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;

        if course.has_active_learners() {
            if !actor.is_admin() {
                return Err(LearningError::Forbidden(
                    "cannot delete a published course with enrolled learners".to_string(),
                ));
            }
            tracing::warn!(
                course_id = %course.course_id,
                admin_id = %actor.user_id,
                enrollment_count = course.enrollment_count,
                "Admin deleting a live course with enrolled learners"
            );
        }

        self.repo.delete_course(&course.course_id).await?;

        if let Some(key) = &course.thumbnail_key {
            if let Err(e) = self.blobs.delete(key).await {
                tracing::warn!(key = %key, error = %e, "Course thumbnail not deleted");
            }
        }

        tracing::info!(
            course_id = %course.course_id,
            actor_id = %actor.user_id,
            "Course deleted"
        );

        Ok(())
    }
}
