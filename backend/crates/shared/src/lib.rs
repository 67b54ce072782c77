//! Kernel - vocabulary shared by every backend crate
//!
//! - Typed entity IDs (`UserId`, `CourseId`, ...)
//! - [`AppError`](error::app_error::AppError) with its stable taxonomy codes
//!   and problem-document rendering
//!
//! Nothing here knows about courses or certificates beyond their IDs.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
