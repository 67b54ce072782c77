//! Value Objects

pub mod account_status;
pub mod course_level;
pub mod course_status;
pub mod progress;
pub mod serial_hash;
pub mod user_role;

pub use account_status::AccountStatus;
pub use course_level::CourseLevel;
pub use course_status::{CourseStatus, ModerationAction};
pub use progress::{Progress, ProgressSnapshot};
pub use serial_hash::SerialHash;
pub use user_role::UserRole;
