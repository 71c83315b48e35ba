//! Application state: the question generator with its upstream client and history store.
//!
//! Built once at startup from env + optional TOML config and shared via `Arc`.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::{load_quiz_config_from_env, QuizConfig};
use crate::generator::QuestionGenerator;
use crate::history::{InMemoryHistory, QuestionHistory};
use crate::segmind::{Segmind, TextGenerator};

#[derive(Clone)]
pub struct AppState {
    pub generator: QuestionGenerator,
}

impl AppState {
    /// Build state from env: load config, init the upstream client and the history store.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, reqwest::Error> {
        let config = load_quiz_config_from_env().unwrap_or_default();

        let segmind = Segmind::from_env()?;
        if segmind.is_configured() {
            info!(target: "celo_quiz_backend", api_url = %segmind.api_url, "Segmind enabled.");
        } else {
            warn!(target: "celo_quiz_backend", "SEGMIND_API_KEY not set; generation requests will fail.");
        }

        let history = Arc::new(InMemoryHistory::new(config.history.capacity));
        info!(
            target: "celo_quiz_backend",
            question_count = config.generation.question_count,
            history_capacity = config.history.capacity,
            "Question generator configured"
        );

        Ok(Self::new(Arc::new(segmind), history, config))
    }

    pub fn new(ai: Arc<dyn TextGenerator>, history: Arc<dyn QuestionHistory>, config: QuizConfig) -> Self {
        Self { generator: QuestionGenerator::new(ai, history, config) }
    }
}
