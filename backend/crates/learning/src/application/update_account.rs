//! Update Account Use Case
//!
//! Admin-only change of another account's status and/or role.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::access;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{AccountStatus, UserRole};
use crate::error::{LearningError, LearningResult};

pub struct UpdateAccountInput {
    pub status: Option<AccountStatus>,
    pub role: Option<UserRole>,
}

pub struct UpdateAccountUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateAccountUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        admin_id: UserId,
        user_id: UserId,
        input: UpdateAccountInput,
    ) -> LearningResult<User> {
        if input.status.is_none() && input.role.is_none() {
            return Err(LearningError::Validation(
                "nothing to update: provide status and/or role".to_string(),
            ));
        }

        access::active_admin(self.user_repo.as_ref(), &admin_id).await?;

        if admin_id == user_id {
            return Err(LearningError::Forbidden(
                "admins cannot change their own account".to_string(),
            ));
        }

        let mut user = self
            .user_repo
            .find_user(&user_id)
            .await?
            .ok_or(LearningError::UserNotFound)?;

        if let Some(status) = input.status {
            user.set_status(status);
        }
        if let Some(role) = input.role {
            user.set_role(role);
        }

        self.user_repo.update_user(&user).await?;

        tracing::info!(
            admin_id = %admin_id,
            user_id = %user.user_id,
            account_status = %user.account_status,
            user_role = %user.user_role,
            "Account updated"
        );

        Ok(user)
    }
}
