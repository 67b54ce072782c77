//! Register Profile Use Case
//!
//! Creates the learning profile of an authenticated subject.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::LearningConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserRole;
use crate::error::{LearningError, LearningResult};

pub struct RegisterProfileInput {
    pub display_name: String,
    pub email: Option<String>,
    pub role: UserRole,
}

pub struct RegisterProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<LearningConfig>,
}

impl<U> RegisterProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<LearningConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, subject: UserId, input: RegisterProfileInput) -> LearningResult<User> {
        if !input.role.is_self_assignable() {
            return Err(LearningError::Forbidden(format!(
                "role `{}` cannot be self-assigned",
                input.role
            )));
        }

        let display_name = self
            .config
            .check_title(&input.display_name)
            .map_err(|_| LearningError::Validation("display name is required".to_string()))?;

        let email = input
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err(LearningError::Validation("email is malformed".to_string()));
        }

        let user = User::new(subject, display_name, email, input.role);
        self.user_repo.create_user(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_role = %user.user_role,
            "Profile registered"
        );

        Ok(user)
    }
}
