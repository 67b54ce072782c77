//! Account Status Value Object
//!
//! Only `Active` accounts may act. Blocked and suspended accounts are
//! reversible by an admin; `Deleted` is kept as a tombstone so that
//! certificates and enrollments keep their learner reference.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AccountStatus {
    #[default]
    Active = 0,
    Blocked = 1,
    Suspended = 2,
    Deleted = 3,
}

impl AccountStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    #[inline]
    pub const fn can_act(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Message shown to an account that may not act
    #[inline]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Active => "Account is active.",
            Self::Blocked => "Your account has been blocked. Please contact support.",
            Self::Suspended => "Your account is suspended. Please contact support for details.",
            Self::Deleted => "This account has been deleted.",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Active),
            1 => Some(Self::Blocked),
            2 => Some(Self::Suspended),
            3 => Some(Self::Deleted),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(Self::Active),
            "blocked" => Some(Self::Blocked),
            "suspended" => Some(Self::Suspended),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
