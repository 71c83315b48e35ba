//! Structural validation of candidate questions.
//!
//! A candidate passes only if every field has the expected shape. The whole
//! batch is rejected if any candidate fails; failing positions are 1-based.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Question, OPTION_COUNT};
use crate::error::{QuizError, QuizResult};

/// Convert one candidate into a `Question`, or `None` if any field is malformed.
pub fn validate_candidate(v: &Value) -> Option<Question> {
  let question = non_blank(v.get("question")?)?;

  let raw_options = v.get("options")?.as_array()?;
  if raw_options.len() != OPTION_COUNT {
    return None;
  }
  let mut options: [String; OPTION_COUNT] = Default::default();
  for (slot, raw) in options.iter_mut().zip(raw_options) {
    *slot = non_blank(raw)?;
  }

  let correct_answer = integral_index(v.get("correctAnswer")?)?;
  let explanation = non_blank(v.get("explanation")?)?;

  Some(Question { question, options, correct_answer, explanation })
}

/// Validate every candidate; fails with all offending positions if any is malformed.
pub fn validate_all(candidates: &[Value], expected_count: usize) -> QuizResult<Vec<Question>> {
  if candidates.len() != expected_count {
    warn!(target: "quiz", expected = expected_count, got = candidates.len(), "Unexpected question count");
  }

  let mut accepted = Vec::with_capacity(candidates.len());
  let mut invalid = Vec::new();
  for (i, c) in candidates.iter().enumerate() {
    match validate_candidate(c) {
      Some(q) => accepted.push(q),
      None => invalid.push(i + 1),
    }
  }

  if !invalid.is_empty() {
    debug!(target: "quiz", positions = ?invalid, "Rejecting batch with malformed questions");
    return Err(QuizError::Validation { positions: invalid });
  }
  Ok(accepted)
}

fn non_blank(v: &Value) -> Option<String> {
  let s = v.as_str()?;
  if s.trim().is_empty() { None } else { Some(s.to_string()) }
}

/// Integer in `0..OPTION_COUNT`. `2.0` counts as an integer, `2.5` does not.
fn integral_index(v: &Value) -> Option<usize> {
  let n = if let Some(u) = v.as_u64() {
    u
  } else {
    let f = v.as_f64()?;
    if f.fract() != 0.0 || f < 0.0 {
      return None;
    }
    f as u64
  };
  let n = usize::try_from(n).ok()?;
  (n < OPTION_COUNT).then_some(n)
}
