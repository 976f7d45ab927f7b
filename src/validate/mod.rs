//! Regex checks applied to generated content before it is returned. Failures
//! are reported, never fatal: the response still goes out, the issues go to
//! the log.

use crate::prompt::ContentType;
use regex::Regex;

pub struct OutputValidator {
    leftover_placeholder: Regex,
    markdown_heading: Regex,
    subject_line: Regex,
}

impl OutputValidator {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            leftover_placeholder: Regex::new(r"\{\{\s*[\w.]+\s*\}\}|\{%[^%]*%\}")?,
            markdown_heading: Regex::new(r"(?m)^#{1,6}\s+\S")?,
            subject_line: Regex::new(r"(?im)^subject\s*:")?,
        })
    }

    /// Issue descriptions for `text` given the content family it was
    /// generated for. Empty when the content passes every check.
    pub fn check(&self, content_type: ContentType, text: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if self.leftover_placeholder.is_match(text) {
            issues.push("generated content contains an unrendered template placeholder".into());
        }
        match content_type {
            ContentType::Blog if !self.markdown_heading.is_match(text) => {
                issues.push("blog post is missing a title heading".into());
            }
            ContentType::Email if !self.subject_line.is_match(text) => {
                issues.push("email is missing a subject line".into());
            }
            _ => {}
        }
        issues
    }
}
