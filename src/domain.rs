//! Domain models: the quiz topic supplied by the caller and the generated question.

use serde::{Deserialize, Serialize};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Count of correct answers per option index (0..=3).
pub type Distribution = [usize; OPTION_COUNT];

/// Subject area used to scope generated questions. Not persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
  pub title: String,
  #[serde(default)]
  pub description: String,
}

impl Topic {
  /// Key used by the per-topic question history (case-folded title).
  pub fn history_key(&self) -> String {
    self.title.trim().to_lowercase()
  }
}

/// A validated multiple-choice question. `correct_answer` always indexes into `options`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub question: String,
  pub options: [String; OPTION_COUNT],
  pub correct_answer: usize,
  pub explanation: String,
}

impl Question {
  /// Literal text of the correct option.
  pub fn correct_text(&self) -> &str {
    &self.options[self.correct_answer]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn history_key_is_case_folded() {
    let t = Topic { title: "  StableCoins ".into(), description: String::new() };
    assert_eq!(t.history_key(), "stablecoins");
  }

  #[test]
  fn question_serializes_camel_case() {
    let q = Question {
      question: "What is cUSD?".into(),
      options: ["A".into(), "B".into(), "C".into(), "D".into()],
      correct_answer: 2,
      explanation: "Because.".into(),
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["correctAnswer"], 2);
    assert_eq!(q.correct_text(), "C");
  }
}
