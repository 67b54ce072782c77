//! Review Course Use Case
//!
//! Admin decision on a `submitted` or `pending_review` course. This is the
//! only review path; approve and reject share the transition table.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::access;
use crate::application::config::LearningConfig;
use crate::domain::entity::Course;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

pub struct ReviewCourseUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    repo: Arc<R>,
    config: Arc<LearningConfig>,
}

impl<R> ReviewCourseUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LearningConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        admin_id: UserId,
        course_id: CourseId,
        decision: ReviewDecision,
        reason: Option<&str>,
    ) -> LearningResult<Course> {
        let admin = access::active_admin(self.repo.as_ref(), &admin_id).await?;

        let mut course = self
            .repo
            .find_course(&course_id)
            .await?
            .ok_or(LearningError::CourseNotFound)?;
        let previous = course.status;

        match decision {
            ReviewDecision::Approve => course.approve()?,
            ReviewDecision::Reject => {
                let reason = self.config.check_reason(reason)?;
                course.reject(reason)?;
            }
        }

        self.repo.update_course(&course).await?;

        tracing::info!(
            course_id = %course.course_id,
            admin_id = %admin.user_id,
            decision = ?decision,
            from = %previous,
            to = %course.status,
            "Course reviewed"
        );

        Ok(course)
    }
}
