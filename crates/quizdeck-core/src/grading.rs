//! Answer matching and grading.
//!
//! Matching is deliberately strict: both sides are trimmed, then compared
//! byte for byte. There is no case folding and no numeric coercion, so `"03"`
//! does not match `"3"`.

use std::collections::HashMap;

use chrono::Utc;

use crate::code::normalize_code;
use crate::model::{AnswerKey, QuestionItem};
use crate::report::{GradeReport, WrongAnswer};
use crate::session::QuizSession;
use crate::statistics::tally_by_round;

/// Whether a user answer matches the canonical answer.
///
/// An empty user answer is never correct, even against an empty key.
pub fn is_correct(user_answer: &str, canonical: &str) -> bool {
    let user_answer = user_answer.trim();
    !user_answer.is_empty() && user_answer == canonical.trim()
}

/// The graded result for one session item.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub item: QuestionItem,
    /// Trimmed user answer; empty when unanswered.
    pub user_answer: String,
    /// Trimmed canonical answer; empty when the key has no entry.
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub correct: bool,
}

/// Grade items against a key. `answers` is keyed by question code.
pub fn grade_items(
    items: &[QuestionItem],
    answers: &HashMap<String, String>,
    key: &AnswerKey,
) -> Vec<ItemOutcome> {
    items
        .iter()
        .map(|item| {
            let code = normalize_code(&item.code);
            let user_answer = answers
                .get(&code)
                .map(|a| a.trim().to_string())
                .unwrap_or_default();
            let entry = key.get(&code);
            let correct_answer = entry.map(|e| e.answer.trim().to_string()).unwrap_or_default();
            let correct = is_correct(&user_answer, &correct_answer);

            ItemOutcome {
                item: item.clone(),
                user_answer,
                correct_answer,
                explanation: entry.and_then(|e| e.explanation.clone()),
                correct,
            }
        })
        .collect()
}

/// Grade a whole session and assemble its wrong-answer report.
pub fn grade(session: &QuizSession, key: &AnswerKey) -> GradeReport {
    let outcomes = grade_items(session.items(), session.answers(), key);
    let correct = outcomes.iter().filter(|o| o.correct).count();
    let per_round = tally_by_round(&outcomes);

    tracing::debug!(
        session = %session.id(),
        correct,
        total = outcomes.len(),
        "graded session"
    );

    let wrong = outcomes
        .into_iter()
        .filter(|o| !o.correct)
        .enumerate()
        .map(|(i, o)| WrongAnswer {
            ordinal: i + 1,
            user_answer: Some(o.user_answer).filter(|a| !a.is_empty()),
            correct_answer: Some(o.correct_answer).filter(|a| !a.is_empty()),
            explanation: o.explanation,
            item: o.item,
        })
        .collect();

    GradeReport {
        id: session.id(),
        created_at: Utc::now(),
        subject: session.subject().to_string(),
        scope: session.scope().clone(),
        round_label: session.round_label().to_string(),
        total: session.len(),
        correct,
        wrong,
        per_round,
    }
}
