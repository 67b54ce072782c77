//! Certificate Rendering Contract
//!
//! Rendering is a pure function of the certificate snapshot. It has no side
//! effects and must produce the same document for the same input.

use chrono::NaiveDate;

/// Snapshot fields every rendered certificate contains verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDocument {
    pub learner_name: String,
    pub course_title: String,
    pub course_duration_minutes: i32,
    pub total_lessons: i32,
    pub completion_date: NaiveDate,
    pub serial_hash: String,
    pub grade: String,
    pub issued_by_name: String,
}

/// Rendered artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a certificate snapshot into a presentable document
pub trait CertificateRenderer: Send + Sync {
    fn render(&self, document: &CertificateDocument) -> RenderedDocument;
}
