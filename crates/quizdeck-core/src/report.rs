//! Grade report types with JSON persistence and the wrong-answer note.
//!
//! The wrong-answer note (오답노트) is the canonical output of a session: a
//! plain-text document listing every missed question with the user's answer,
//! the key and the full question content for review.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Scope;
use crate::model::{Choice, QuestionItem};
use crate::statistics::{accuracy, RoundTally};

/// Shown in place of an empty user answer.
pub const NO_ANSWER: &str = "(미입력)";
/// Shown in place of a missing key entry.
pub const KEY_MISSING: &str = "(정답 미등록)";

const HEAVY_RULE: &str = "==============================";
const LIGHT_RULE: &str = "------------------------------";

/// A graded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Identifier of the graded session.
    pub id: Uuid,
    /// When the session was graded.
    pub created_at: DateTime<Utc>,
    pub subject: String,
    pub scope: Scope,
    /// Display label of the scope (`"12회"`, `"10~21회(전체)"`).
    pub round_label: String,
    /// Number of questions in the session.
    pub total: usize,
    /// Number of correct answers.
    pub correct: usize,
    /// Missed questions, in session order.
    pub wrong: Vec<WrongAnswer>,
    /// Correct / total per round.
    #[serde(default)]
    pub per_round: Vec<RoundTally>,
}

/// One missed question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrongAnswer {
    /// 1-based position in the wrong-answer list.
    pub ordinal: usize,
    pub item: QuestionItem,
    /// `None` when the question was left unanswered.
    pub user_answer: Option<String>,
    /// `None` when the key has no entry for the code.
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

impl WrongAnswer {
    pub fn user_answer_or_marker(&self) -> &str {
        self.user_answer.as_deref().unwrap_or(NO_ANSWER)
    }

    pub fn correct_answer_or_marker(&self) -> &str {
        self.correct_answer.as_deref().unwrap_or(KEY_MISSING)
    }

    /// Numbered choices of the question, if any.
    pub fn choices(&self) -> Vec<Choice> {
        self.item.choices()
    }
}

impl GradeReport {
    /// Fraction of correct answers.
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }

    /// `"정답 <correct> / <total>"`.
    pub fn score_line(&self) -> String {
        format!("정답 {} / {}", self.correct, self.total)
    }

    /// File name for the downloadable note: `오답노트_<round label>_<subject>.txt`.
    pub fn note_file_name(&self) -> String {
        format!(
            "오답노트_{}_{}.txt",
            file_name_safe(&self.round_label),
            file_name_safe(&self.subject)
        )
    }

    /// Render the plain-text wrong-answer note.
    pub fn to_wrong_note(&self) -> String {
        let mut t = String::new();

        t.push_str("[오답노트]\n");
        t.push_str(&format!("과목: {}\n", self.subject));
        t.push_str(&format!("회차: {}\n", self.round_label));
        t.push_str(&format!("문항수: {}\n", self.total));
        t.push_str(&format!("정답: {} / {}\n\n", self.correct, self.total));

        for w in &self.wrong {
            let item = &w.item;

            t.push_str(&format!("{HEAVY_RULE}\n"));
            t.push_str(&format!("{}. {}\n", w.ordinal, item.display_code()));
            t.push_str(&format!("내 답: {}\n", w.user_answer_or_marker()));
            t.push_str(&format!("정답: {}\n", w.correct_answer_or_marker()));
            if let Some(expl) = w.explanation.as_deref().filter(|e| !e.is_empty()) {
                t.push_str(&format!("해설: {expl}\n"));
            }
            t.push_str(&format!("{LIGHT_RULE}\n"));

            push_section(&mut t, "[문제]", Some(&item.question));
            push_section(&mut t, "[예제/자료]", item.example.as_deref());
            push_section(&mut t, "[표]", item.table.as_deref());

            let choices = w.choices();
            if !choices.is_empty() {
                t.push_str("[보기]\n");
                let lines: Vec<String> = choices
                    .iter()
                    .map(|c| format!("{}) {}", c.number, c.text))
                    .collect();
                t.push_str(&lines.join("\n"));
                t.push_str("\n\n");
            }

            t.push('\n');
        }

        t
    }

    /// Write the wrong-answer note into `dir` and return its path.
    pub fn save_wrong_note(&self, dir: &Path) -> Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
        let path = dir.join(self.note_file_name());
        std::fs::write(&path, self.to_wrong_note())
            .with_context(|| format!("failed to write wrong-answer note to {}", path.display()))?;
        Ok(path)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

fn push_section(t: &mut String, title: &str, body: Option<&str>) {
    if let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) {
        t.push_str(title);
        t.push('\n');
        t.push_str(body);
        t.push_str("\n\n");
    }
}

fn file_name_safe(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionKind, Round};

    fn item(code: &str) -> QuestionItem {
        QuestionItem {
            code: code.into(),
            raw_code: code.replace("_1번", "_01번"),
            round: Round::new("12"),
            subject: "회계".into(),
            no: 1,
            kind: QuestionKind::MultipleChoice,
            point: Some(2.0),
            question: "  다음 중 옳은 것은?  ".into(),
            example: Some("자료 A".into()),
            table: None,
            choices_raw: Some("1) 가\n2) 나\n잡음\n3) 다\n4) 라".into()),
        }
    }

    fn make_report() -> GradeReport {
        GradeReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            subject: "회계".into(),
            scope: Scope::Round(Round::new("12")),
            round_label: "12회".into(),
            total: 3,
            correct: 1,
            wrong: vec![
                WrongAnswer {
                    ordinal: 1,
                    item: item("A_1번"),
                    user_answer: Some("3".into()),
                    correct_answer: Some("4".into()),
                    explanation: Some("라가 맞다".into()),
                },
                WrongAnswer {
                    ordinal: 2,
                    item: QuestionItem {
                        choices_raw: None,
                        example: None,
                        kind: QuestionKind::FreeText,
                        ..item("B_2번")
                    },
                    user_answer: None,
                    correct_answer: None,
                    explanation: None,
                },
            ],
            per_round: vec![RoundTally {
                round: Round::new("12"),
                total: 3,
                correct: 1,
            }],
        }
    }

    #[test]
    fn wrong_note_header() {
        let note = make_report().to_wrong_note();
        assert!(note.starts_with("[오답노트]\n과목: 회계\n회차: 12회\n문항수: 3\n정답: 1 / 3\n\n"));
    }

    #[test]
    fn wrong_note_items() {
        let note = make_report().to_wrong_note();

        assert!(note.contains("1. A_01번\n내 답: 3\n정답: 4\n해설: 라가 맞다\n"));
        assert!(note.contains("[문제]\n다음 중 옳은 것은?\n\n"));
        assert!(note.contains("[예제/자료]\n자료 A\n\n"));
        assert!(note.contains("[보기]\n1) 가\n2) 나\n3) 다\n4) 라\n\n"));
        assert!(!note.contains("[표]"));

        assert!(note.contains(&format!("2. B_2번\n내 답: {NO_ANSWER}\n정답: {KEY_MISSING}\n{LIGHT_RULE}\n")));
        assert_eq!(note.matches(HEAVY_RULE).count(), 2);
        assert_eq!(note.matches("[보기]").count(), 1);
    }

    #[test]
    fn file_name_uses_label_and_subject() {
        let mut report = make_report();
        assert_eq!(report.note_file_name(), "오답노트_12회_회계.txt");
        report.subject = "재무/회계".into();
        assert_eq!(report.note_file_name(), "오답노트_12회_재무_회계.txt");
    }

    #[test]
    fn score_and_accuracy() {
        let report = make_report();
        assert_eq!(report.score_line(), "정답 1 / 3");
        assert!((report.accuracy() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");

        report.save_json(&path).unwrap();
        let loaded = GradeReport::load_json(&path).unwrap();

        assert_eq!(loaded.round_label, "12회");
        assert_eq!(loaded.wrong.len(), 2);
        assert_eq!(loaded.scope, Scope::Round(Round::new("12")));
        assert_eq!(loaded.to_wrong_note(), report.to_wrong_note());
    }

    #[test]
    fn save_wrong_note_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = make_report().save_wrong_note(dir.path()).unwrap();
        assert!(path.ends_with("오답노트_12회_회계.txt"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("[오답노트]"));
    }
}
