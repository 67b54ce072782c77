//! Lesson Use Cases
//!
//! Adding, editing and reactivating a lesson are content edits and go
//! through the moderation table. Deleting and deactivating are structural:
//! creators cannot do them once the course is live.

use std::sync::Arc;

use kernel::id::{CourseId, LessonId, UserId};

use crate::application::access;
use crate::application::config::LearningConfig;
use crate::domain::entity::{Course, Lesson, User};
use crate::domain::repository::{CourseRepository, LessonRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

pub struct AddLessonInput {
    pub title: String,
    pub content: String,
    pub duration_minutes: i32,
}

#[derive(Default)]
pub struct EditLessonInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub duration_minutes: Option<i32>,
}

fn check_duration(minutes: i32) -> LearningResult<i32> {
    if minutes < 0 {
        return Err(LearningError::Validation(
            "duration must not be negative".to_string(),
        ));
    }
    Ok(minutes)
}

fn ensure_structural_change_allowed(actor: &User, course: &Course) -> LearningResult<()> {
    if course.is_live() && !actor.is_admin() {
        return Err(LearningError::Forbidden(
            "lessons of a published course cannot be removed".to_string(),
        ));
    }
    Ok(())
}

async fn lesson_of<R>(repo: &R, course: &Course, lesson_id: &LessonId) -> LearningResult<Lesson>
where
    R: LessonRepository,
{
    repo.find_lesson(lesson_id)
        .await?
        .filter(|l| l.belongs_to(&course.course_id))
        .ok_or(LearningError::LessonNotFound)
}

/// Apply `EditContent` to the owning course and persist it
async fn record_edit<R>(repo: &R, course: &mut Course, reason: String) -> LearningResult<()>
where
    R: CourseRepository,
{
    let previous = course.status;
    course.record_content_edit(reason)?;
    repo.update_course(course).await?;

    if previous != course.status {
        tracing::info!(
            course_id = %course.course_id,
            from = %previous,
            to = %course.status,
            "Course status changed by content edit"
        );
    }
    Ok(())
}

// ============================================================================
// Add Lesson
// ============================================================================

pub struct AddLessonUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    repo: Arc<R>,
    config: Arc<LearningConfig>,
}

impl<R> AddLessonUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LearningConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        input: AddLessonInput,
    ) -> LearningResult<Lesson> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let mut course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;

        let title = self.config.check_title(&input.title)?;
        let duration = check_duration(input.duration_minutes)?;

        let lesson = Lesson::new(course.course_id, title, input.content, duration);
        let lesson = self.repo.append_lesson(&lesson).await?;

        record_edit(
            self.repo.as_ref(),
            &mut course,
            format!("lesson added: {}", lesson.title),
        )
        .await?;

        tracing::info!(
            course_id = %course.course_id,
            lesson_id = %lesson.lesson_id,
            order = lesson.order,
            "Lesson added"
        );

        Ok(lesson)
    }
}

// ============================================================================
// Edit Lesson
// ============================================================================

pub struct EditLessonUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    repo: Arc<R>,
    config: Arc<LearningConfig>,
}

impl<R> EditLessonUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LearningConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        lesson_id: LessonId,
        input: EditLessonInput,
    ) -> LearningResult<Lesson> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let mut course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;
        let mut lesson = lesson_of(self.repo.as_ref(), &course, &lesson_id).await?;

        let mut changed = false;
        if let Some(title) = input.title {
            let title = self.config.check_title(&title)?;
            changed |= title != lesson.title;
            lesson.title = title;
        }
        if let Some(content) = input.content {
            changed |= content != lesson.content;
            lesson.content = content;
        }
        if let Some(duration) = input.duration_minutes {
            let duration = check_duration(duration)?;
            changed |= duration != lesson.duration_minutes;
            lesson.duration_minutes = duration;
        }

        if !changed {
            return Ok(lesson);
        }

        lesson.updated_at = chrono::Utc::now();
        self.repo.update_lesson(&lesson).await?;
        record_edit(
            self.repo.as_ref(),
            &mut course,
            format!("lesson edited: {}", lesson.title),
        )
        .await?;

        tracing::info!(
            course_id = %course.course_id,
            lesson_id = %lesson.lesson_id,
            "Lesson edited"
        );

        Ok(lesson)
    }
}

// ============================================================================
// Delete Lesson
// ============================================================================

pub struct DeleteLessonUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteLessonUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> LearningResult<()> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;
        let lesson = lesson_of(self.repo.as_ref(), &course, &lesson_id).await?;

        ensure_structural_change_allowed(&actor, &course)?;

        self.repo.delete_lesson_compacting(&lesson).await?;

        tracing::info!(
            course_id = %course.course_id,
            lesson_id = %lesson.lesson_id,
            order = lesson.order,
            actor_id = %actor.user_id,
            "Lesson deleted"
        );

        Ok(())
    }
}

// ============================================================================
// Activate / Deactivate Lesson
// ============================================================================

pub struct SetLessonActiveUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    repo: Arc<R>,
}

impl<R> SetLessonActiveUseCase<R>
where
    R: UserRepository + CourseRepository + LessonRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        actor_id: UserId,
        course_id: CourseId,
        lesson_id: LessonId,
        is_active: bool,
    ) -> LearningResult<Lesson> {
        let actor = access::active_user(self.repo.as_ref(), &actor_id).await?;
        let mut course = access::managed_course(self.repo.as_ref(), &actor, &course_id).await?;
        let mut lesson = lesson_of(self.repo.as_ref(), &course, &lesson_id).await?;

        if lesson.is_active == is_active {
            return Ok(lesson);
        }

        if !is_active {
            ensure_structural_change_allowed(&actor, &course)?;
        }

        lesson.set_active(is_active);
        self.repo.update_lesson(&lesson).await?;

        if is_active {
            record_edit(
                self.repo.as_ref(),
                &mut course,
                format!("lesson reactivated: {}", lesson.title),
            )
            .await?;
        }

        tracing::info!(
            course_id = %course.course_id,
            lesson_id = %lesson.lesson_id,
            is_active,
            "Lesson active flag changed"
        );

        Ok(lesson)
    }
}
