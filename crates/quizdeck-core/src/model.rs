//! Core data model types for quizdeck.
//!
//! These are the types the rest of the system passes around: parsed records,
//! question items, answer keys and round identifiers.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Field names that open a multi-line block when they appear alone on a line.
pub const BLOCK_FIELDS: [&str; 5] = ["Q", "EX", "TABLE", "CHOICES", "EXPL"];

/// One parsed record from the `@@@`-delimited text format.
///
/// Known fields are named; any other uppercase `KEY: value` line lands in
/// `extra`, and lines that are not fields at all land in `raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub code: Option<String>,
    pub round: Option<String>,
    pub subject: Option<String>,
    pub no: Option<String>,
    pub question_type: Option<String>,
    pub point: Option<String>,
    pub q: Option<String>,
    pub question: Option<String>,
    pub ex: Option<String>,
    pub table: Option<String>,
    pub choices: Option<String>,
    pub ans: Option<String>,
    pub expl: Option<String>,
    /// Unrecognized uppercase scalar fields.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    /// Lines outside any field, newline-joined.
    #[serde(default)]
    pub raw: Option<String>,
}

impl Record {
    /// Assign a field by its marker name. Later assignments overwrite earlier ones.
    pub fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "CODE" => &mut self.code,
            "ROUND" => &mut self.round,
            "SUBJECT" => &mut self.subject,
            "NO" => &mut self.no,
            "TYPE" => &mut self.question_type,
            "POINT" => &mut self.point,
            "Q" => &mut self.q,
            "QUESTION" => &mut self.question,
            "EX" => &mut self.ex,
            "TABLE" => &mut self.table,
            "CHOICES" => &mut self.choices,
            "ANS" => &mut self.ans,
            "EXPL" => &mut self.expl,
            "RAW" => &mut self.raw,
            other => {
                self.extra.insert(other.to_string(), value);
                return;
            }
        };
        *slot = Some(value);
    }

    /// Look up a field by its marker name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let slot = match key {
            "CODE" => &self.code,
            "ROUND" => &self.round,
            "SUBJECT" => &self.subject,
            "NO" => &self.no,
            "TYPE" => &self.question_type,
            "POINT" => &self.point,
            "Q" => &self.q,
            "QUESTION" => &self.question,
            "EX" => &self.ex,
            "TABLE" => &self.table,
            "CHOICES" => &self.choices,
            "ANS" => &self.ans,
            "EXPL" => &self.expl,
            "RAW" => &self.raw,
            other => return self.extra.get(other).map(String::as_str),
        };
        slot.as_deref()
    }

    /// Append a line to the fallback bucket.
    pub(crate) fn push_raw(&mut self, line: &str) {
        match &mut self.raw {
            Some(raw) if !raw.is_empty() => {
                raw.push('\n');
                raw.push_str(line);
            }
            _ => self.raw = Some(line.to_string()),
        }
    }

    /// The trimmed `CODE` field, or an empty string.
    pub fn code_str(&self) -> &str {
        self.code.as_deref().map(str::trim).unwrap_or("")
    }
}

/// An exam round: either a number (`"10"`) or a free label (`"주관식모음"`).
///
/// Manifests may write rounds as JSON numbers or strings; both normalize to
/// the same trimmed string, so `10` and `"10"` compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Round(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RoundRepr {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl<'de> Deserialize<'de> for Round {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RoundRepr::deserialize(deserializer)? {
            RoundRepr::Int(n) => Round(n.to_string()),
            RoundRepr::Float(f) => Round(f.to_string()),
            RoundRepr::Text(s) => Round::new(&s),
            RoundRepr::Null => Round::default(),
        })
    }
}

impl Round {
    pub fn new(value: &str) -> Self {
        Round(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the round is a plain decimal number.
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Numeric value of the round, if it is numeric and fits in a `u64`.
    pub fn number(&self) -> Option<u64> {
        if self.is_numeric() {
            self.0.parse().ok()
        } else {
            None
        }
    }

    /// Catalog ordering: numeric rounds ascending by value, then labels lexically.
    ///
    /// Numerically equal rounds (`"02"`, `"2"`) compare `Equal`, so a stable
    /// sort keeps their input order.
    pub fn order(&self, other: &Round) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => {
                let a = self.0.trim_start_matches('0');
                let b = other.0.trim_start_matches('0');
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }

    /// Human-facing label: numeric rounds render as `"<n>회"`, labels as-is.
    pub fn label(&self) -> String {
        if self.is_numeric() {
            format!("{}회", self.0)
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Round {
    fn from(s: &str) -> Self {
        Round::new(s)
    }
}

impl From<u32> for Round {
    fn from(n: u32) -> Self {
        Round(n.to_string())
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one numbered option; answers are `"1"`..`"4"`.
    MultipleChoice,
    /// Type the answer literally.
    FreeText,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "MCQ"),
            QuestionKind::FreeText => write!(f, "free text"),
        }
    }
}

/// A numbered option parsed from a `CHOICES` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub number: u8,
    pub text: String,
}

impl Choice {
    /// The answer string a user submits to pick this option.
    pub fn answer(&self) -> String {
        self.number.to_string()
    }
}

/// A question derived from a question record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// Normalized code; the join key against the answer key.
    pub code: String,
    /// Code as written in the source file.
    pub raw_code: String,
    pub round: Round,
    pub subject: String,
    /// Ordinal number within the round (0 when absent or unparseable).
    pub no: i64,
    pub kind: QuestionKind,
    #[serde(default)]
    pub point: Option<f64>,
    pub question: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub choices_raw: Option<String>,
}

impl QuestionItem {
    /// The raw code when present, otherwise the normalized one.
    pub fn display_code(&self) -> &str {
        if self.raw_code.is_empty() {
            &self.code
        } else {
            &self.raw_code
        }
    }

    /// Numbered options of the choice block.
    pub fn choices(&self) -> Vec<Choice> {
        self.choices_raw
            .as_deref()
            .map(crate::parser::parse_choices)
            .unwrap_or_default()
    }
}

/// The canonical answer for one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub code: String,
    /// Trimmed answer string; empty when the record had no `ANS`.
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Answer entries keyed by normalized code.
#[derive(Debug, Clone, Default)]
pub struct AnswerKey {
    entries: HashMap<String, AnswerEntry>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry for the same code.
    pub fn insert(&mut self, entry: AnswerEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    /// Look up by code. The code is normalized first.
    pub fn get(&self, code: &str) -> Option<&AnswerEntry> {
        self.entries.get(&crate::code::normalize_code(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Merge another key into this one; entries of `other` win.
    pub fn merge(&mut self, other: AnswerKey) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerEntry> {
        self.entries.values()
    }
}

impl FromIterator<AnswerEntry> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = AnswerEntry>>(iter: I) -> Self {
        let mut key = AnswerKey::new();
        for entry in iter {
            key.insert(entry);
        }
        key
    }
}
