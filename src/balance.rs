//! Correct-answer distribution: detection of skew and best-effort rebalancing.
//!
//! Rebalancing never invents or drops text. It only swaps options within a
//! single question and moves `correct_answer` along with the correct text.

use tracing::{debug, info, trace, warn};

use crate::domain::{Distribution, Question, OPTION_COUNT};

/// Order in which leftover allocations are handed out (n = 10 gives `[2, 3, 2, 3]`).
const REMAINDER_ORDER: [usize; OPTION_COUNT] = [1, 3, 0, 2];

/// Count correct answers per option index.
pub fn distribution(questions: &[Question]) -> Distribution {
  let mut counts = [0usize; OPTION_COUNT];
  for q in questions {
    counts[q.correct_answer] += 1;
  }
  counts
}

/// Most correct answers a single position may hold: `ceil(0.4 * n)`.
pub fn max_per_position(n: usize) -> usize {
  (2 * n).div_ceil(5)
}

pub fn is_acceptable(counts: &Distribution, n: usize) -> bool {
  let cap = max_per_position(n);
  counts.iter().all(|&c| c <= cap)
}

/// Floor/ceil split of `n` correct answers across the four positions.
pub fn target_distribution(n: usize) -> Distribution {
  let mut target = [n / OPTION_COUNT; OPTION_COUNT];
  for &pos in REMAINDER_ORDER.iter().take(n % OPTION_COUNT) {
    target[pos] += 1;
  }
  target
}

/// Redistribute correct answers towards `target`.
///
/// Returns the input untouched when every position is already within one of
/// its target. Otherwise walks the questions with a slot pointer over the
/// remaining allocations and moves over-represented answers into the slot.
pub fn rebalance(mut questions: Vec<Question>, target: Distribution) -> Vec<Question> {
  let mut counts = distribution(&questions);
  let near_target = counts.iter().zip(target.iter()).all(|(&c, &t)| c.abs_diff(t) <= 1);
  if near_target {
    debug!(target: "quiz", ?counts, ?target, "Distribution already near target");
    return questions;
  }

  let mut remaining = target;
  let mut slot = 0usize;

  for q in questions.iter_mut() {
    if remaining.iter().all(|&r| r == 0) {
      break;
    }
    while remaining[slot] == 0 {
      slot = (slot + 1) % OPTION_COUNT;
    }

    let from = q.correct_answer;
    if counts[from] > remaining[from] {
      q.options.swap(from, slot);
      q.correct_answer = slot;
      counts[from] -= 1;
      counts[slot] += 1;
      trace!(target: "quiz", from, to = slot, correct = %q.correct_text(), "Moved correct answer");

      remaining[slot] -= 1;
      if remaining[slot] == 0 {
        slot = (slot + 1) % OPTION_COUNT;
      }
    }
  }

  debug_assert_eq!(counts.iter().sum::<usize>(), questions.len());
  debug!(target: "quiz", ?counts, "Rebalanced distribution");
  questions
}

/// Detect skew and, if present, rebalance towards `target_distribution(n)`.
///
/// Best effort: some inputs are still above `max_per_position` afterwards.
/// Those are returned as-is and logged.
pub fn balance(questions: Vec<Question>) -> Vec<Question> {
  let n = questions.len();
  let counts = distribution(&questions);
  if is_acceptable(&counts, n) {
    return questions;
  }
  info!(target: "quiz", ?counts, n, "Skewed answer distribution; rebalancing");
  let out = rebalance(questions, target_distribution(n));
  let after = distribution(&out);
  if !is_acceptable(&after, n) {
    warn!(target: "quiz", before = ?counts, ?after, cap = max_per_position(n), "Answer distribution still skewed after rebalancing");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  fn question(i: usize, correct: usize) -> Question {
    Question {
      question: format!("Question {i}?"),
      options: [0, 1, 2, 3].map(|o| format!("q{i}-opt{o}")),
      correct_answer: correct,
      explanation: format!("Explanation {i}."),
    }
  }

  fn set(corrects: &[usize]) -> Vec<Question> {
    corrects.iter().enumerate().map(|(i, &c)| question(i, c)).collect()
  }

  fn sorted_options(q: &Question) -> Vec<String> {
    let mut v = q.options.to_vec();
    v.sort();
    v
  }

  fn assert_text_preserved(before: &[Question], after: &[Question]) {
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after) {
      assert_eq!(b.question, a.question);
      assert_eq!(b.explanation, a.explanation);
      assert_eq!(sorted_options(b), sorted_options(a));
      assert_eq!(b.correct_text(), a.correct_text());
    }
  }

  #[test]
  fn ceil_forty_percent() {
    assert_eq!(max_per_position(10), 4);
    assert_eq!(max_per_position(5), 2);
    assert_eq!(max_per_position(1), 1);
    assert_eq!(max_per_position(0), 0);
  }

  #[test]
  fn targets_split_floor_ceil() {
    assert_eq!(target_distribution(10), [2, 3, 2, 3]);
    assert_eq!(target_distribution(8), [2, 2, 2, 2]);
    assert_eq!(target_distribution(9), [2, 3, 2, 2]);
    assert_eq!(target_distribution(11), [3, 3, 2, 3]);
    for n in 0..40 {
      assert_eq!(target_distribution(n).iter().sum::<usize>(), n);
    }
  }

  #[test]
  fn near_target_is_left_untouched() {
    let input = set(&[0, 0, 0, 1, 1, 2, 2, 2, 3, 3]);
    assert_eq!(distribution(&input), [3, 2, 3, 2]);
    let out = rebalance(input.clone(), target_distribution(10));
    assert_eq!(out, input);
    assert_eq!(balance(input.clone()), input);
  }

  #[test]
  fn all_zero_skew_is_spread_out() {
    let input = set(&[0; 10]);
    let out = balance(input.clone());
    let counts = distribution(&out);
    assert_eq!(counts, [2, 3, 2, 3]);
    assert!(counts.iter().all(|&c| c <= 4));
    assert_text_preserved(&input, &out);
  }

  #[test]
  fn two_heavy_positions_are_spread_out() {
    let input = set(&[0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    let out = balance(input.clone());
    assert_eq!(distribution(&out), [2, 3, 2, 3]);
    assert_text_preserved(&input, &out);
  }

  #[test]
  fn counts_always_sum_to_question_count() {
    let cases: [&[usize]; 5] = [
      &[3; 10],
      &[2, 2, 2, 2, 2, 2, 0, 1, 3, 3],
      &[1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
      &[0, 0, 0, 0, 0, 0, 0],
      &[3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
    ];
    for corrects in cases {
      let input = set(corrects);
      let out = rebalance(input.clone(), target_distribution(input.len()));
      assert_eq!(distribution(&out).iter().sum::<usize>(), input.len());
      assert_text_preserved(&input, &out);
    }
  }

  #[test]
  fn acceptable_skew_short_circuits_in_balance() {
    let input = set(&[0, 0, 0, 0, 1, 1, 2, 2, 3, 3]);
    assert!(is_acceptable(&distribution(&input), 10));
    assert_eq!(balance(input.clone()), input);
  }

  #[test]
  fn leading_minority_answers_leave_residual_skew() {
    let input = set(&[1, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    let out = balance(input.clone());
    let counts = distribution(&out);
    assert_eq!(counts, [2, 5, 2, 1]);
    assert!(!is_acceptable(&counts, 10));
    assert_text_preserved(&input, &out);
  }

  proptest! {
    #[test]
    fn balancing_ten_questions_only_moves_existing_text(corrects in proptest::collection::vec(0usize..4, 10)) {
      let input = set(&corrects);
      for out in [balance(input.clone()), rebalance(input.clone(), target_distribution(10))] {
        prop_assert_eq!(distribution(&out).iter().sum::<usize>(), 10);
        prop_assert_eq!(out.len(), input.len());
        for (b, a) in input.iter().zip(&out) {
          prop_assert_eq!(&b.question, &a.question);
          prop_assert_eq!(&b.explanation, &a.explanation);
          prop_assert_eq!(sorted_options(b), sorted_options(a));
          prop_assert_eq!(b.correct_text(), a.correct_text());
        }
      }
    }
  }
}
