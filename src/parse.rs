//! Recover a JSON array of candidate questions from noisy model output.
//!
//! Stage 1 strips Markdown code fences and parses what remains. Stage 2 looks
//! for the first `[` and the shortest `[...]` span from there that parses as an
//! array. Items are left untyped; validation happens in `validate`.

use serde_json::Value;
use tracing::debug;

use crate::error::{QuizError, QuizResult};

pub const NO_ARRAY_MESSAGE: &str = "No valid JSON array found in AI response";
pub const PARSE_FAILED_MESSAGE: &str = "Failed to parse AI response";

/// Parse raw model text into candidate question objects.
pub fn parse_candidates(raw: &str) -> QuizResult<Vec<Value>> {
  let cleaned = strip_code_fences(raw);
  match serde_json::from_str::<Value>(&cleaned) {
    Ok(v) => {
      if let Some(items) = into_array(v) {
        return Ok(items);
      }
      debug!(target: "quiz", "Fence-stripped text is JSON but not an array; scanning for brackets");
    }
    Err(e) => debug!(target: "quiz", error = %e, "Direct parse failed; scanning for brackets"),
  }
  find_bracketed_array(raw)
}

/// Remove ```json / ``` markers wherever they appear and trim.
pub fn strip_code_fences(raw: &str) -> String {
  raw.replace("```json", "").replace("```JSON", "").replace("```", "").trim().to_string()
}

fn into_array(v: Value) -> Option<Vec<Value>> {
  match v {
    Value::Array(items) => Some(items),
    Value::Object(mut map) => match map.remove("questions") {
      Some(Value::Array(items)) => Some(items),
      _ => None,
    },
    _ => None,
  }
}

/// Non-greedy `[...]` search starting at the first `[`, widened one `]` at a
/// time until the span parses as an array.
fn find_bracketed_array(raw: &str) -> QuizResult<Vec<Value>> {
  let start = raw.find('[').ok_or_else(|| QuizError::parse(NO_ARRAY_MESSAGE))?;
  let tail = &raw[start..];
  let mut closes = tail.match_indices(']').map(|(i, _)| i).peekable();
  if closes.peek().is_none() {
    return Err(QuizError::parse(NO_ARRAY_MESSAGE));
  }
  for end in closes {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&tail[..=end]) {
      return Ok(items);
    }
  }
  Err(QuizError::parse(PARSE_FAILED_MESSAGE))
}

#[cfg(test)]
mod tests {
  use super::*;

  const INNER: &str = r#"[{"question":"What is cUSD?","options":["A stablecoin","A validator","A wallet","A bridge"],"correctAnswer":0,"explanation":"cUSD tracks the US dollar."}]"#;

  #[test]
  fn fenced_json_matches_inner_parse() {
    let raw = format!("```json\n{}\n```", INNER);
    let expected: Vec<Value> = serde_json::from_str(INNER).unwrap();
    assert_eq!(parse_candidates(&raw).unwrap(), expected);
  }

  #[test]
  fn bare_fence_is_stripped_too() {
    let raw = format!("```\n{}\n```", INNER);
    assert_eq!(parse_candidates(&raw).unwrap().len(), 1);
  }

  #[test]
  fn prose_around_array_is_ignored() {
    let raw = format!("Sure! Here are your questions:\n\n{}\n\nLet me know if you need more.", INNER);
    let items = parse_candidates(&raw).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["options"][1], "A validator");
  }

  #[test]
  fn questions_object_is_accepted() {
    let raw = format!(r#"{{"questions": {}}}"#, INNER);
    assert_eq!(parse_candidates(&raw).unwrap().len(), 1);
  }

  #[test]
  fn missing_brackets_is_no_array() {
    let err = parse_candidates("I cannot help with that.").unwrap_err();
    assert!(matches!(err, QuizError::Parse(ref m) if m == NO_ARRAY_MESSAGE));
  }

  #[test]
  fn unparseable_span_is_parse_failure() {
    let err = parse_candidates("here: [ {question: oops} ] done").unwrap_err();
    assert!(matches!(err, QuizError::Parse(ref m) if m == PARSE_FAILED_MESSAGE));
  }
}
