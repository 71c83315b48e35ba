//! Tracing setup.
//!
//! `LOG_LEVEL` takes `EnvFilter` directives; `LOG_FORMAT=json` switches to one
//! flattened JSON object per event, anything else gives compact text.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,quiz=debug,celo_quiz_backend=debug,tower_http=info";

fn wants_json(format: Option<&str>) -> bool {
  format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}

pub fn init_tracing() {
  let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

  if wants_json(std::env::var("LOG_FORMAT").ok().as_deref()) {
    builder.json().flatten_event(true).init();
  } else {
    builder.compact().init();
  }
}
