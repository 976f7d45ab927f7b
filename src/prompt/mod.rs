mod builder;
mod engine;

pub use builder::{ContentType, PromptBuilder, detect_content_type};
pub use engine::TeraEngine;
