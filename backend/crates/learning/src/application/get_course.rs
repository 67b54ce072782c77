//! Get Course Use Case
//!
//! Owners and admins see the real moderation state and every lesson.
//! Everyone else sees live courses only, through the learner-facing view:
//! `pending_review` reads as `published` and inactive lessons are hidden.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};

use crate::domain::entity::{Course, Lesson};
use crate::domain::repository::{CourseRepository, LessonRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

#[derive(Debug)]
pub struct CourseView {
    pub course: Course,
    pub lessons: Vec<Lesson>,
    /// Viewer manages the course
    pub privileged: bool,
}

pub struct GetCourseUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    repo: Arc<R>,
}

impl<R> GetCourseUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        viewer_id: Option<UserId>,
        course_id: CourseId,
    ) -> LearningResult<CourseView> {
        let mut course = self
            .repo
            .find_course(&course_id)
            .await?
            .ok_or(LearningError::CourseNotFound)?;

        let viewer = match viewer_id {
            Some(id) => self.repo.find_user(&id).await?,
            None => None,
        };
        let privileged = viewer.as_ref().is_some_and(|v| course.can_be_managed_by(v));

        let mut lessons = self.repo.list_lessons(&course.course_id).await?;

        if !privileged {
            if !course.is_live() {
                return Err(LearningError::CourseNotFound);
            }
            course.status = course.status.learner_facing();
            course.requires_reapproval = false;
            course.modification_reason = None;
            course.rejection_reason = None;
            lessons.retain(|l| l.is_active);
        }

        Ok(CourseView {
            course,
            lessons,
            privileged,
        })
    }
}
