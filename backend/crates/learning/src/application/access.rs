//! Actor and ownership checks shared by the use cases

use kernel::id::{CourseId, UserId};

use crate::domain::entity::{Course, User};
use crate::domain::repository::{CourseRepository, UserRepository};
use crate::error::{LearningError, LearningResult};

/// Load the acting user and require an active account
pub(crate) async fn active_user<R>(repo: &R, user_id: &UserId) -> LearningResult<User>
where
    R: UserRepository,
{
    let user = repo
        .find_user(user_id)
        .await?
        .ok_or(LearningError::UserNotFound)?;
    user.ensure_active()?;
    Ok(user)
}

/// Load the acting user and require an active admin
pub(crate) async fn active_admin<R>(repo: &R, user_id: &UserId) -> LearningResult<User>
where
    R: UserRepository,
{
    let user = active_user(repo, user_id).await?;
    if !user.is_admin() {
        return Err(LearningError::Forbidden("admin role required".to_string()));
    }
    Ok(user)
}

/// Load a course the actor may manage (owner or admin)
pub(crate) async fn managed_course<R>(
    repo: &R,
    actor: &User,
    course_id: &CourseId,
) -> LearningResult<Course>
where
    R: CourseRepository,
{
    let course = repo
        .find_course(course_id)
        .await?
        .ok_or(LearningError::CourseNotFound)?;

    if !course.can_be_managed_by(actor) {
        return Err(LearningError::Forbidden(
            "only the course creator or an admin may do this".to_string(),
        ));
    }

    Ok(course)
}
