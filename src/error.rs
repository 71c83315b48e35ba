//! Error taxonomy for question generation and its HTTP mapping.
//!
//! Every failure is reported to the caller as JSON with an `error` field.
//! Input problems map to 400, everything else to 500.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Error, Debug)]
pub enum QuizError {
  /// Missing or malformed request body.
  #[error("{0}")]
  Input(String),

  /// The upstream credential is absent.
  #[error("{0}")]
  Configuration(String),

  /// Non-success upstream response, transport failure or unknown payload shape.
  #[error("{message}")]
  Upstream { status: Option<u16>, message: String },

  /// No JSON array could be recovered from the model output.
  #[error("{0}")]
  Parse(String),

  /// One or more generated items failed structural validation (1-based positions).
  #[error("Invalid question format at positions: {}", join_positions(.positions))]
  Validation { positions: Vec<usize> },
}

impl QuizError {
  pub fn input<S: Into<String>>(msg: S) -> Self {
    Self::Input(msg.into())
  }

  pub fn upstream<S: Into<String>>(status: Option<u16>, msg: S) -> Self {
    Self::Upstream { status, message: msg.into() }
  }

  pub fn parse<S: Into<String>>(msg: S) -> Self {
    Self::Parse(msg.into())
  }

  pub fn status_code(&self) -> StatusCode {
    match self {
      QuizError::Input(_) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Short label used in logs.
  pub fn kind(&self) -> &'static str {
    match self {
      QuizError::Input(_) => "input",
      QuizError::Configuration(_) => "configuration",
      QuizError::Upstream { .. } => "upstream",
      QuizError::Parse(_) => "parse",
      QuizError::Validation { .. } => "validation",
    }
  }
}

fn join_positions(positions: &[usize]) -> String {
  positions.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
}

impl IntoResponse for QuizError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    let body = match &self {
      QuizError::Upstream { status: Some(code), .. } => json!({ "error": self.to_string(), "status": code }),
      QuizError::Validation { positions } => json!({ "error": self.to_string(), "invalidQuestions": positions }),
      _ => json!({ "error": self.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_message_lists_positions() {
    let e = QuizError::Validation { positions: vec![1, 4, 7] };
    assert_eq!(e.to_string(), "Invalid question format at positions: 1, 4, 7");
    assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn input_errors_are_bad_requests() {
    assert_eq!(QuizError::input("Topic is required").status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(QuizError::upstream(Some(429), "slow down").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
