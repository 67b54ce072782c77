//! Submit Course Use Case
//!
//! `draft | rejected` → `submitted`. Requires at least one active lesson
//! and a thumbnail.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};

use crate::application::access;
use crate::domain::entity::Course;
use crate::domain::repository::{CourseRepository, LessonRepository, UserRepository};
use crate::error::LearningResult;

pub struct SubmitCourseUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    repo: Arc<R>,
}

impl<R> SubmitCourseUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor_id: UserId, course_id: CourseId) -> LearningResult<Course> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let mut course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;

        let stats = self.repo.active_lesson_stats(&course.course_id).await?;
        course.submit(stats.active_count)?;
        self.repo.update_course(&course).await?;

        tracing::info!(
            course_id = %course.course_id,
            actor_id = %actor.user_id,
            active_lessons = stats.active_count,
            "Course submitted for review"
        );

        Ok(course)
    }
}
