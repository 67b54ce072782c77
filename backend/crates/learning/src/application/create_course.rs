//! Create Course Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::access;
use crate::application::config::LearningConfig;
use crate::domain::entity::Course;
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::domain::value_object::CourseLevel;
use crate::error::{LearningError, LearningResult};

pub struct CreateCourseInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
}

pub struct CreateCourseUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    repo: Arc<R>,
    config: Arc<LearningConfig>,
}

impl<R> CreateCourseUseCase<R>
where
    R: UserRepository + CourseRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LearningConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, creator_id: UserId, input: CreateCourseInput) -> LearningResult<Course> {
        let creator = access::active_user(self.repo.as_ref(), &creator_id).await?;
        if !creator.user_role.can_author() {
            return Err(LearningError::Forbidden(
                "only creators and admins may create courses".to_string(),
            ));
        }

        let title = self.config.check_title(&input.title)?;
        let category = input.category.trim().to_string();
        if category.is_empty() {
            return Err(LearningError::Validation("category must not be empty".to_string()));
        }

        let course = Course::new(
            creator.user_id,
            title,
            input.description.trim().to_string(),
            category,
            input.level,
        );
        self.repo.create_course(&course).await?;

        tracing::info!(
            course_id = %course.course_id,
            creator_id = %course.creator_id,
            "Course created"
        );

        Ok(course)
    }
}
