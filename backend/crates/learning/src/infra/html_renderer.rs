//! HTML Certificate Renderer

use std::fmt::Write;

use crate::domain::renderer::{CertificateDocument, CertificateRenderer, RenderedDocument};

const CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Renders a certificate as a standalone HTML page
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCertificateRenderer;

impl HtmlCertificateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl CertificateRenderer for HtmlCertificateRenderer {
    fn render(&self, document: &CertificateDocument) -> RenderedDocument {
        let mut html = String::with_capacity(1024);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(
            html,
            "<title>Certificate of Completion - {}</title>",
            escape(&document.course_title)
        );
        html.push_str("</head>\n<body>\n<main class=\"certificate\">\n");
        html.push_str("<h1>Certificate of Completion</h1>\n");
        let _ = writeln!(
            html,
            "<p class=\"learner\">{}</p>",
            escape(&document.learner_name)
        );
        let _ = writeln!(
            html,
            "<p class=\"course\">has completed <strong>{}</strong></p>",
            escape(&document.course_title)
        );
        html.push_str("<dl>\n");
        field(&mut html, "Lessons", &document.total_lessons.to_string());
        field(
            &mut html,
            "Duration",
            &format!("{} minutes", document.course_duration_minutes),
        );
        field(
            &mut html,
            "Completed on",
            &document.completion_date.format("%Y-%m-%d").to_string(),
        );
        field(&mut html, "Grade", &document.grade);
        field(&mut html, "Issued by", &document.issued_by_name);
        field(&mut html, "Serial", &document.serial_hash);
        html.push_str("</dl>\n</main>\n</body>\n</html>\n");

        RenderedDocument {
            content_type: CONTENT_TYPE,
            bytes: html.into_bytes(),
        }
    }
}

fn field(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(html, "<dt>{}</dt><dd>{}</dd>", label, escape(value));
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
