use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum CourseLevel {
    #[default]
    Beginner = 0,
    Intermediate = 1,
    Advanced = 2,
}

impl CourseLevel {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(CourseLevel::Beginner),
            1 => Some(CourseLevel::Intermediate),
            2 => Some(CourseLevel::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
