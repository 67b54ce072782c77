//! User Entity
//!
//! Learning profile of an authenticated subject. The id is the token
//! subject; role and account status are authoritative here, never in the token.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{AccountStatus, UserRole};
use crate::error::{LearningError, LearningResult};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub display_name: String,
    pub email: Option<String>,
    pub user_role: UserRole,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_id: UserId,
        display_name: String,
        email: Option<String>,
        user_role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            display_name,
            email,
            user_role,
            account_status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails with `AccountInactive` unless the account may act
    pub fn ensure_active(&self) -> LearningResult<()> {
        if self.account_status.can_act() {
            Ok(())
        } else {
            Err(LearningError::AccountInactive(self.account_status))
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: AccountStatus) {
        self.account_status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new(UserId::new(), "Ada".into(), None, UserRole::Learner);
        assert!(user.ensure_active().is_ok());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_inactive_user_rejected() {
        let mut user = User::new(UserId::new(), "Ada".into(), None, UserRole::Creator);
        user.set_status(AccountStatus::Suspended);
        assert!(matches!(
            user.ensure_active(),
            Err(LearningError::AccountInactive(AccountStatus::Suspended))
        ));
    }
}
