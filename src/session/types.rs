use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Optional brand metadata injected into generation prompts. All fields are
/// independent; a merge takes the partial's populated fields and keeps the
/// rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl BrandContext {
    pub fn is_empty(&self) -> bool {
        self.brand_name.is_none()
            && self.brand_voice.is_none()
            && self.target_audience.is_none()
            && self.industry.is_none()
    }

    /// Field-by-field shallow merge; `None` fields in `partial` keep the
    /// existing value.
    pub fn merge(&mut self, partial: &BrandContext) {
        if partial.brand_name.is_some() {
            self.brand_name.clone_from(&partial.brand_name);
        }
        if partial.brand_voice.is_some() {
            self.brand_voice.clone_from(&partial.brand_voice);
        }
        if partial.target_audience.is_some() {
            self.target_audience.clone_from(&partial.target_audience);
        }
        if partial.industry.is_some() {
            self.industry.clone_from(&partial.industry);
        }
    }
}

const SESSION_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SESSION_SUFFIX_LEN: usize = 9;

/// Server-generated session identifier: `session_<epoch-ms>_<9-char base36>`.
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SESSION_SUFFIX_LEN)
        .map(|_| SESSION_SUFFIX_ALPHABET[rng.random_range(0..SESSION_SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("session_{}_{suffix}", Utc::now().timestamp_millis())
}
