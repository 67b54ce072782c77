//! Edit Course Use Case
//!
//! Core field edits. A live course moves to `pending_review`, a rejected
//! one back to `draft`.

use std::sync::Arc;

use kernel::id::{CourseId, UserId};

use crate::application::access;
use crate::application::config::LearningConfig;
use crate::domain::entity::Course;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::CourseLevel;
use crate::error::{LearningError, LearningResult};

#[derive(Default)]
pub struct EditCourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
}

pub struct EditCourseUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    repo: Arc<R>,
    config: Arc<LearningConfig>,
}

impl<R> EditCourseUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LearningConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        input: EditCourseInput,
    ) -> LearningResult<Course> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let mut course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;

        let mut changed: Vec<&'static str> = Vec::new();

        if let Some(title) = input.title {
            let title = self.config.check_title(&title)?;
            if title != course.title {
                course.title = title;
                changed.push("title");
            }
        }
        if let Some(description) = input.description {
            let description = description.trim().to_string();
            if description != course.description {
                course.description = description;
                changed.push("description");
            }
        }
        if let Some(category) = input.category {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(LearningError::Validation("category must not be empty".to_string()));
            }
            if category != course.category {
                course.category = category;
                changed.push("category");
            }
        }
        if let Some(level) = input.level.filter(|level| *level != course.level) {
            course.level = level;
            changed.push("level");
        }

        if changed.is_empty() {
            return Ok(course);
        }

        let previous = course.status;
        course.record_content_edit(format!("updated {}", changed.join(", ")))?;
        self.repo.update_course(&course).await?;

        tracing::info!(
            course_id = %course.course_id,
            actor_id = %actor.user_id,
            from = %previous,
            to = %course.status,
            fields = ?changed,
            "Course edited"
        );

        Ok(course)
    }
}
