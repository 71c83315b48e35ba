//! Service configuration: optional TOML overrides (prompts, generation knobs,
//! history sizing) loaded from `QUIZ_CONFIG_PATH`, plus env-only upstream settings.
//!
//! Expected TOML schema (every table and key optional):
//!
//! ```toml
//! [prompts]
//! system = "..."
//!
//! [generation]
//! temperature = 0.9
//! max_tokens = 4000
//! question_count = 10
//!
//! [history]
//! capacity = 100
//! recent_limit = 10
//! ```

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationParams,
  #[serde(default)]
  pub history: HistoryConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  /// System instruction sent alongside every generation prompt.
  pub system: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "You are an expert on the Celo blockchain ecosystem who writes accurate, engaging multiple-choice quiz questions. Respond ONLY with a valid JSON array of question objects, no prose and no markdown.".into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
  /// Kept high so repeated calls for one topic produce different questions.
  pub temperature: f32,
  pub max_tokens: u32,
  /// Expected size of a question set. A mismatch is only logged.
  pub question_count: usize,
}

impl Default for GenerationParams {
  fn default() -> Self {
    Self { temperature: 0.9, max_tokens: 4000, question_count: 10 }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
  /// Max remembered questions per topic; oldest are evicted first.
  pub capacity: usize,
  /// How many recent questions are handed to the prompt builder.
  pub recent_limit: usize,
}

impl Default for HistoryConfig {
  fn default() -> Self {
    Self { capacity: 100, recent_limit: 10 }
  }
}

/// Parse a config document. Exposed separately from the env loader for tests.
pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "celo_quiz_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "celo_quiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "celo_quiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
