//! Manifest and catalog resolution.
//!
//! The manifest lists subjects, rounds and one question/answer file pair per
//! (round, subject). Resolution always goes through [`Manifest::select`], a
//! single pooling operation parameterized by a file predicate, so single-round
//! and all-rounds loading share the same ordering contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::Round;

/// A question/answer file pair registered for one (round, subject).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(default)]
    pub round: Round,
    #[serde(default)]
    pub subject: String,
    /// Reference to the question text resource.
    #[serde(default)]
    pub q: String,
    /// Reference to the answer text resource.
    #[serde(default)]
    pub a: String,
}

/// The data manifest (`data/manifest.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Which files of a subject make up the question pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "round", rename_all = "snake_case")]
pub enum Scope {
    /// One round.
    Round(Round),
    /// Every registered round of the subject, pooled together.
    AllRounds,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Round(round) => write!(f, "round {round}"),
            Scope::AllRounds => write!(f, "all rounds"),
        }
    }
}

/// A manifest round and whether the chosen subject has a file for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundAvailability {
    pub round: Round,
    pub available: bool,
}

fn same_subject(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

impl Manifest {
    /// Parse a manifest from JSON text. `reference` is only used in errors.
    pub fn from_json(text: &str, reference: &str) -> Result<Self, QuizError> {
        serde_json::from_str(text).map_err(|e| QuizError::ManifestInvalid {
            reference: reference.to_string(),
            message: e.to_string(),
        })
    }

    /// Files of `subject` accepted by `predicate`, in catalog order: numeric
    /// rounds ascending, then label rounds lexically, manifest order on ties.
    pub fn select<P>(&self, subject: &str, predicate: P) -> Vec<&FileEntry>
    where
        P: Fn(&FileEntry) -> bool,
    {
        let mut files: Vec<&FileEntry> = self
            .files
            .iter()
            .filter(|f| same_subject(&f.subject, subject) && predicate(f))
            .collect();
        files.sort_by(|a, b| a.round.order(&b.round));
        files
    }

    /// The file registered for (round, subject), or `None` when the combination
    /// is not in the catalog.
    pub fn find_file(&self, round: &Round, subject: &str) -> Option<&FileEntry> {
        self.select(subject, |f| f.round == *round).into_iter().next()
    }

    /// Every file of a subject, across all rounds. Empty when none are registered.
    pub fn files_for_subject(&self, subject: &str) -> Vec<&FileEntry> {
        self.select(subject, |_| true)
    }

    /// Pre-flight resolution of a scope: fails before anything is fetched when
    /// the selection has no files.
    pub fn files_for(&self, scope: &Scope, subject: &str) -> Result<Vec<&FileEntry>, QuizError> {
        match scope {
            Scope::Round(round) => self
                .find_file(round, subject)
                .map(|file| vec![file])
                .ok_or_else(|| QuizError::SelectionNotFound {
                    round: round.to_string(),
                    subject: subject.trim().to_string(),
                }),
            Scope::AllRounds => {
                let files = self.files_for_subject(subject);
                if files.is_empty() {
                    Err(QuizError::NoFilesForSubject(subject.trim().to_string()))
                } else {
                    Ok(files)
                }
            }
        }
    }

    /// Every manifest round with a flag telling whether `subject` has a file for it.
    pub fn round_availability(&self, subject: &str) -> Vec<RoundAvailability> {
        self.rounds
            .iter()
            .map(|round| RoundAvailability {
                round: round.clone(),
                available: self.find_file(round, subject).is_some(),
            })
            .collect()
    }

    /// Whether `subject` is listed in the manifest.
    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| same_subject(s, subject))
    }

    /// Display label of a scope, e.g. `"12회"` or `"10~21회(전체)"`.
    pub fn scope_label(&self, scope: &Scope, subject: &str) -> String {
        match scope {
            Scope::Round(round) => round.label(),
            Scope::AllRounds => all_rounds_label(&self.files_for_subject(subject)),
        }
    }
}

/// Label for a pooled session: the numeric round span, or `"전체"` when the
/// subject only has label rounds.
pub fn all_rounds_label(files: &[&FileEntry]) -> String {
    let numbers: Vec<u64> = files.iter().filter_map(|f| f.round.number()).collect();
    match (numbers.iter().min(), numbers.iter().max()) {
        (Some(min), Some(max)) if min == max => format!("{min}회(전체)"),
        (Some(min), Some(max)) => format!("{min}~{max}회(전체)"),
        _ => "전체".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "subjects": ["회계", "세법"],
        "rounds": [10, 2, "주관식모음", 11],
        "files": [
            {"round": "주관식모음", "subject": "회계", "q": "data/회계_모음_q.txt", "a": "data/회계_모음_a.txt"},
            {"round": 10, "subject": "회계", "q": "data/회계_10_q.txt", "a": "data/회계_10_a.txt"},
            {"round": "2", "subject": " 회계 ", "q": "data/회계_2_q.txt", "a": "data/회계_2_a.txt"},
            {"round": 11, "subject": "세법", "q": "data/세법_11_q.txt", "a": "data/세법_11_a.txt"}
        ]
    }"#;

    fn manifest() -> Manifest {
        Manifest::from_json(MANIFEST, "manifest.json").unwrap()
    }

    #[test]
    fn number_and_string_rounds_resolve_the_same() {
        let m = manifest();
        let by_string = m.find_file(&Round::new("10"), "회계").unwrap();
        let by_number = m.find_file(&Round::from(10u32), "회계").unwrap();
        assert_eq!(by_string, by_number);
        assert_eq!(by_string.q, "data/회계_10_q.txt");
        assert!(m.find_file(&Round::new(" 2 "), "회계").is_some());
    }

    #[test]
    fn missing_combination_is_not_found() {
        let m = manifest();
        assert!(m.find_file(&Round::new("11"), "회계").is_none());
        let err = m
            .files_for(&Scope::Round(Round::new("11")), "회계")
            .unwrap_err();
        assert!(matches!(err, QuizError::SelectionNotFound { .. }));
    }

    #[test]
    fn aggregate_order_is_numeric_then_labels() {
        let m = manifest();
        let rounds: Vec<&str> = m
            .files_for_subject("회계")
            .iter()
            .map(|f| f.round.as_str())
            .collect();
        assert_eq!(rounds, vec!["2", "10", "주관식모음"]);
    }

    #[test]
    fn subject_without_files_is_empty_not_error() {
        let m = manifest();
        assert!(m.files_for_subject("경영").is_empty());
        let err = m.files_for(&Scope::AllRounds, "경영").unwrap_err();
        assert!(matches!(err, QuizError::NoFilesForSubject(_)));
        assert!(err.is_no_data());
    }

    #[test]
    fn availability_flags() {
        let m = manifest();
        let avail = m.round_availability("세법");
        let flags: Vec<(&str, bool)> = avail
            .iter()
            .map(|a| (a.round.as_str(), a.available))
            .collect();
        assert_eq!(
            flags,
            vec![("10", false), ("2", false), ("주관식모음", false), ("11", true)]
        );
    }

    #[test]
    fn scope_labels() {
        let m = manifest();
        assert_eq!(m.scope_label(&Scope::Round(Round::new("10")), "회계"), "10회");
        assert_eq!(m.scope_label(&Scope::AllRounds, "회계"), "2~10회(전체)");
        assert_eq!(m.scope_label(&Scope::AllRounds, "세법"), "11회(전체)");
        assert_eq!(m.scope_label(&Scope::AllRounds, "경영"), "전체");
    }

    #[test]
    fn invalid_manifest() {
        let err = Manifest::from_json("{ not json", "data/manifest.json").unwrap_err();
        assert!(matches!(err, QuizError::ManifestInvalid { .. }));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let m = Manifest::from_json("{}", "manifest.json").unwrap();
        assert!(m.subjects.is_empty());
        assert!(m.files.is_empty());
    }
}
