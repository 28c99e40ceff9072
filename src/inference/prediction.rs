//! Prediction result returned to callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a speech clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Human,
    AiGenerated,
    Unknown,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Human => "HUMAN",
            Label::AiGenerated => "AI_GENERATED",
            Label::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub classification: Label,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(classification: Label, confidence: f32) -> Self {
        Self {
            classification,
            confidence,
        }
    }

    /// No usable input: nothing is known about the clip
    pub fn unknown() -> Self {
        Self::new(Label::Unknown, 0.0)
    }

    /// Audio decoded but could not be scored: lean human, no conviction
    pub fn uncertain() -> Self {
        Self::new(Label::Human, 0.5)
    }
}
