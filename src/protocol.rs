//! Public request/response DTOs for the HTTP API (serde ready).

use serde::{Deserialize, Serialize};

use crate::domain::{Question, Topic};

/// Body of `POST /api/generate-questions`. Fields are optional so that missing
/// values surface as a 400 with a JSON error instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    #[serde(default)]
    pub topic: Option<TopicIn>,
}

#[derive(Debug, Deserialize)]
pub struct TopicIn {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TopicIn {
    /// `None` when the title is missing or blank.
    pub fn into_topic(self) -> Option<Topic> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(Topic { title, description: self.description.unwrap_or_default() })
    }
}

#[derive(Serialize)]
pub struct GenerateOut {
    pub questions: Vec<Question>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOut {
    pub ok: bool,
    pub ai_configured: bool,
}
