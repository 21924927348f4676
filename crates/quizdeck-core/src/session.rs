//! Quiz session state.
//!
//! A session is built fresh on every start and owns everything the quiz needs
//! until it is graded: the sampled questions, the cursor and the answers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::builder::build_quiz_with_rng;
use crate::catalog::Scope;
use crate::code::normalize_code;
use crate::grading;
use crate::loader::Pool;
use crate::model::{AnswerKey, QuestionItem};
use crate::report::GradeReport;

/// One quiz run over a sampled set of questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    subject: String,
    scope: Scope,
    round_label: String,
    items: Vec<QuestionItem>,
    answers: HashMap<String, String>,
    cursor: usize,
}

impl QuizSession {
    /// Create a session over an already sampled list of items.
    pub fn new(
        subject: impl Into<String>,
        scope: Scope,
        round_label: impl Into<String>,
        items: Vec<QuestionItem>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            subject: subject.into(),
            scope,
            round_label: round_label.into(),
            items,
            answers: HashMap::new(),
            cursor: 0,
        }
    }

    /// Sample `count` questions from a pool and start a session over them.
    pub fn start(pool: &Pool, count: usize) -> Self {
        Self::start_with_rng(pool, count, &mut rand::thread_rng())
    }

    /// [`QuizSession::start`] with an explicit random source.
    pub fn start_with_rng<R: Rng + ?Sized>(pool: &Pool, count: usize, rng: &mut R) -> Self {
        let items = build_quiz_with_rng(&pool.items, count, rng);
        tracing::info!(
            subject = %pool.subject,
            scope = %pool.scope,
            pool = pool.items.len(),
            sampled = items.len(),
            "quiz session started"
        );
        Self::new(
            pool.subject.clone(),
            pool.scope.clone(),
            pool.round_label.clone(),
            items,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn round_label(&self) -> &str {
        &self.round_label
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The question under the cursor.
    pub fn current(&self) -> Option<&QuestionItem> {
        self.items.get(self.cursor)
    }

    /// 0-based cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether the cursor is on the final question.
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.items.len()
    }

    /// Move to the next question. Returns `false` when already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Record (or replace) the answer for a question code.
    pub fn record_answer(&mut self, code: &str, answer: impl Into<String>) {
        self.answers.insert(normalize_code(code), answer.into());
    }

    /// The recorded answer for a code, if any.
    pub fn answer(&self, code: &str) -> Option<&str> {
        self.answers.get(&normalize_code(code)).map(String::as_str)
    }

    /// All recorded answers, keyed by normalized code.
    pub fn answers(&self) -> &HashMap<String, String> {
        &self.answers
    }

    /// Number of session items with a non-blank answer.
    pub fn answered_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| self.answer(&item.code).is_some_and(|a| !a.trim().is_empty()))
            .count()
    }

    /// Grade the session against an answer key.
    pub fn grade(&self, key: &AnswerKey) -> GradeReport {
        grading::grade(self, key)
    }
}
