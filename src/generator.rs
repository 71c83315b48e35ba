//! The question-generation pipeline shared by the HTTP handlers.
//!
//! validate topic → build prompt → call upstream → parse → validate items →
//! rebalance answers → record history → return.

use std::sync::Arc;

use tracing::{error, info, instrument, Span};
use uuid::Uuid;

use crate::balance::{balance, distribution};
use crate::config::QuizConfig;
use crate::domain::{Question, Topic};
use crate::error::{QuizError, QuizResult};
use crate::history::QuestionHistory;
use crate::parse::parse_candidates;
use crate::prompt::build_prompt;
use crate::segmind::{GenerationRequest, TextGenerator};
use crate::util::trunc_for_log;
use crate::validate::validate_all;

#[derive(Clone)]
pub struct QuestionGenerator {
  pub ai: Arc<dyn TextGenerator>,
  pub history: Arc<dyn QuestionHistory>,
  pub config: QuizConfig,
}

impl QuestionGenerator {
  pub fn new(ai: Arc<dyn TextGenerator>, history: Arc<dyn QuestionHistory>, config: QuizConfig) -> Self {
    Self { ai, history, config }
  }

  /// Generate a balanced question set for `topic` and remember it.
  #[instrument(level = "info", skip(self, topic), fields(title = %topic.title, generation_id = tracing::field::Empty))]
  pub async fn generate(&self, topic: &Topic) -> QuizResult<Vec<Question>> {
    let generation_id = Uuid::new_v4();
    Span::current().record("generation_id", tracing::field::display(generation_id));

    if topic.title.trim().is_empty() {
      return Err(QuizError::input("Topic title is required"));
    }

    let key = topic.history_key();
    let gen_cfg = &self.config.generation;
    let prior = self.history.recent(&key, self.config.history.recent_limit).await;
    let prompt = build_prompt(topic, &prior, gen_cfg.question_count);
    info!(target: "quiz", prior = prior.len(), prompt_len = prompt.len(), "Prompt built");

    let req = GenerationRequest {
      system: &self.config.prompts.system,
      prompt: &prompt,
      temperature: gen_cfg.temperature,
      max_tokens: gen_cfg.max_tokens,
    };
    let raw = self.ai.generate(&req).await.map_err(|e| {
      error!(target: "quiz", kind = e.kind(), error = %e, "Generation call failed");
      e
    })?;

    let candidates = parse_candidates(&raw).map_err(|e| {
      error!(target: "quiz", error = %e, preview = %trunc_for_log(&raw, 300), "Could not parse model output");
      e
    })?;
    let questions = validate_all(&candidates, gen_cfg.question_count)?;

    let before = distribution(&questions);
    let questions = balance(questions);
    info!(target: "quiz", count = questions.len(), ?before, after = ?distribution(&questions), "Question set ready");

    let texts: Vec<String> = questions.iter().map(|q| q.question.clone()).collect();
    self.history.record(&key, &texts).await;

    Ok(questions)
  }
}
