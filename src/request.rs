//! Host-side request and response bodies
//!
//! Clients spell the payload field several ways. This module accepts all of
//! them so the pipeline only ever sees a single optional string.

use crate::inference::{Label, Prediction};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Incoming request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioRequest {
    #[serde(
        default,
        alias = "audioBase64",
        alias = "audio_data",
        alias = "audioData",
        alias = "audio"
    )]
    pub audio_base64: Option<String>,
}

impl AudioRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("Failed to parse request body")
    }

    /// The payload, if present
    pub fn payload(&self) -> Option<&str> {
        self.audio_base64.as_deref()
    }
}

/// Outgoing response line
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub classification: Label,
    pub confidence: f32,
}

impl PredictionResponse {
    pub fn new(prediction: Prediction, source: Option<String>) -> Self {
        Self {
            source,
            classification: prediction.classification,
            confidence: prediction.confidence,
        }
    }
}
