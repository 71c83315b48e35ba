//! Deterministic construction of the generation prompt.
//!
//! The prompt is assembled from a fixed Celo context block, the task for the
//! requested topic, the answer-spreading instruction, an optional "do not
//! repeat" list and an output-format example.

use crate::domain::Topic;
use crate::util::fill_template;

/// Only this many prior questions are echoed back into the prompt.
pub const MAX_ECHOED_PRIOR: usize = 5;

const CELO_CONTEXT: &str = r#"
Background on the Celo ecosystem (use it to keep questions accurate):
- Celo is a mobile-first, EVM-compatible blockchain focused on real-world payments and financial inclusion.
- Accounts can be mapped to phone numbers, which makes sending value as easy as sending a text message.
- CELO is the native asset, used for staking, governance and gas. Gas can also be paid in supported stablecoins.
- Mento stablecoins such as cUSD, cEUR and cREAL track fiat currencies and are backed by a diversified reserve.
- MiniPay is a lightweight stablecoin wallet built into the Opera Mini browser and available as a standalone app.
- Celo runs on-chain governance: CELO holders vote on proposals that upgrade the protocol.
- Celo transitioned from an independent layer 1 to an Ethereum layer 2 built on the OP Stack.
- Developers build with familiar Ethereum tooling (Solidity, Hardhat, Foundry, viem, wagmi).
"#;

const TASK_TEMPLATE: &str = r#"
Create exactly {count} multiple-choice quiz questions about "{title}".
Topic description: {description}

Requirements:
- Each question has exactly 4 answer options.
- Exactly one option is correct; "correctAnswer" is its 0-based index (0, 1, 2 or 3).
- Every question includes a short explanation of why the correct answer is right.
- Mix easy, medium and hard questions and keep them factually accurate.
"#;

const DISTRIBUTION_RULE: &str = r#"
IMPORTANT: Distribute the correct answers evenly across the four positions.
Each of the positions 0, 1, 2 and 3 should hold the correct answer roughly 2-3 times.
Do NOT put most correct answers in the same position.
"#;

const FORMAT_EXAMPLE: &str = r#"
Return ONLY a JSON array in exactly this format:
[
  {
    "question": "What is the primary focus of the Celo blockchain?",
    "options": ["Gaming", "Mobile-first payments", "Data storage", "Private transactions"],
    "correctAnswer": 1,
    "explanation": "Celo is designed around mobile-first payments and financial inclusion."
  }
]
"#;

/// Build the user prompt for `topic`.
///
/// `prior` holds previously generated questions for the topic; the first
/// [`MAX_ECHOED_PRIOR`] are listed as questions the model must not repeat.
pub fn build_prompt(topic: &Topic, prior: &[String], question_count: usize) -> String {
  let description = if topic.description.trim().is_empty() { topic.title.as_str() } else { topic.description.as_str() };
  let count = question_count.to_string();

  let mut out = String::new();
  out.push_str(CELO_CONTEXT.trim_start());
  out.push_str(&fill_template(
    TASK_TEMPLATE,
    &[("count", count.as_str()), ("title", topic.title.as_str()), ("description", description)],
  ));
  out.push_str(DISTRIBUTION_RULE);

  if !prior.is_empty() {
    out.push_str("\nDo NOT repeat or closely paraphrase these previously asked questions:\n");
    for q in prior.iter().take(MAX_ECHOED_PRIOR) {
      out.push_str("- ");
      out.push_str(q);
      out.push('\n');
    }
  }

  out.push_str(FORMAT_EXAMPLE);
  out
}
