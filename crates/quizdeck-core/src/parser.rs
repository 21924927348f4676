//! `@@@`-delimited record parser.
//!
//! Turns question and answer text files into records, question items and
//! answer keys, and validates a loaded pool for common authoring mistakes.
//!
//! The format, one record per section:
//!
//! ```text
//! CODE: 회계_12_08번
//! NO: 8
//! TYPE: MCQ
//! Q:
//! 다음 중 옳은 것은?
//! CHOICES:
//! 1) ...
//! 2) ...
//! ---
//! @@@
//! CODE: ...
//! ```

use std::collections::HashSet;

use crate::code::normalize_code;
use crate::model::{
    AnswerEntry, AnswerKey, Choice, QuestionItem, QuestionKind, Record, Round, BLOCK_FIELDS,
};

/// Separator between records.
pub const RECORD_SEPARATOR: &str = "\n@@@\n";

/// Optional terminator line at the end of a record.
const RECORD_TERMINATOR: &str = "\n---";

/// Split a text blob into records.
///
/// Never fails: lines that are not field markers land in [`Record::raw`].
pub fn parse_records(text: &str) -> Vec<Record> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    text.split(RECORD_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(strip_terminator)
        .filter(|body| !body.is_empty())
        .map(parse_record)
        .collect()
}

/// Parse a whole question or answer file: the body is trimmed and treated as
/// a sequence of records even when it does not start with a separator.
pub fn parse_file(text: &str) -> Vec<Record> {
    parse_records(&format!("{RECORD_SEPARATOR}{}\n", text.trim()))
}

/// Remove a trailing `---` line. A record that is only `---` becomes empty
/// and is dropped rather than kept as a RAW-only record.
fn strip_terminator(part: &str) -> &str {
    if part == "---" {
        return "";
    }
    match part.rfind(RECORD_TERMINATOR) {
        Some(at) if part[at + RECORD_TERMINATOR.len()..].trim().is_empty() => part[..at].trim(),
        _ => part,
    }
}

fn parse_record(body: &str) -> Record {
    let mut record = Record::default();
    let mut open: Option<&'static str> = None;
    let mut buf: Vec<&str> = Vec::new();

    for line in body.split('\n') {
        if let Some(marker) = block_marker(line) {
            flush_block(&mut record, open.take(), &mut buf);
            open = Some(marker);
            continue;
        }

        if open.is_some() {
            buf.push(line);
        } else if let Some((key, value)) = scalar_field(line) {
            record.set(key, value.to_string());
        } else {
            record.push_raw(line);
        }
    }
    flush_block(&mut record, open, &mut buf);

    record
}

fn flush_block(record: &mut Record, key: Option<&'static str>, buf: &mut Vec<&str>) {
    if let Some(key) = key {
        record.set(key, buf.join("\n").trim_end().to_string());
    }
    buf.clear();
}

/// A line consisting only of a block field name, a colon and whitespace.
fn block_marker(line: &str) -> Option<&'static str> {
    let (key, rest) = line.split_once(':')?;
    if !rest.trim().is_empty() {
        return None;
    }
    BLOCK_FIELDS.iter().copied().find(|field| *field == key)
}

/// A `KEY: value` line where `KEY` is uppercase letters and underscores.
fn scalar_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_uppercase() || b == b'_') {
        return None;
    }
    Some((key, value.trim()))
}

/// Parse a question file into question items.
///
/// `round` and `subject` fill in items whose record omits `ROUND` / `SUBJECT`.
pub fn parse_question_text(text: &str, round: &Round, subject: &str) -> Vec<QuestionItem> {
    parse_file(text)
        .iter()
        .map(|record| question_from_record(record, round, subject))
        .collect()
}

/// Build a question item from one record.
pub fn question_from_record(record: &Record, round: &Round, subject: &str) -> QuestionItem {
    let raw_code = record.code_str().to_string();

    let question = [&record.q, &record.question, &record.raw]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .cloned()
        .unwrap_or_default();

    let item_round = record
        .round
        .as_deref()
        .map(Round::new)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| round.clone());

    let choices_raw = non_blank(&record.choices);
    let declared_mcq = record
        .question_type
        .as_deref()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("MCQ"));
    let kind = if declared_mcq || choices_raw.as_deref().is_some_and(has_choices) {
        QuestionKind::MultipleChoice
    } else {
        QuestionKind::FreeText
    };

    QuestionItem {
        code: normalize_code(&raw_code),
        raw_code,
        round: item_round,
        subject: record
            .subject
            .clone()
            .unwrap_or_else(|| subject.to_string()),
        no: record.no.as_deref().and_then(parse_leading_int).unwrap_or(0),
        kind,
        point: record
            .point
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok()),
        question,
        example: non_blank(&record.ex),
        table: non_blank(&record.table),
        choices_raw,
    }
}

/// Parse an answer file into an answer key. Records without a code are skipped;
/// a repeated code keeps the last entry.
pub fn parse_answer_text(text: &str) -> AnswerKey {
    parse_file(text)
        .iter()
        .filter_map(answer_from_record)
        .collect()
}

/// Build an answer entry from one record, if it carries a code.
pub fn answer_from_record(record: &Record) -> Option<AnswerEntry> {
    let raw_code = record.code_str();
    if raw_code.is_empty() {
        return None;
    }
    Some(AnswerEntry {
        code: normalize_code(raw_code),
        answer: record.ans.as_deref().unwrap_or("").trim().to_string(),
        explanation: record
            .expl
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string),
    })
}

/// Numbered options (`1)` .. `4)`) of a choice block, one per line.
pub fn parse_choices(raw: &str) -> Vec<Choice> {
    let raw = raw.replace("\r\n", "\n").replace('\r', "\n");

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut chars = line.chars();
            let number = chars.next()?.to_digit(10)?;
            if !(1..=4).contains(&number) || chars.next()? != ')' {
                return None;
            }
            Some(Choice {
                number: number as u8,
                text: chars.as_str().trim_start().to_string(),
            })
        })
        .collect()
}

/// True when the block contains `1)` at a word boundary.
pub fn has_choices(raw: &str) -> bool {
    raw.match_indices("1)").any(|(at, _)| {
        raw[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

/// Leading integer of a string (`" 12번"` → 12), like a lenient `atoi`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn non_blank(field: &Option<String>) -> Option<String> {
    field.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

/// A warning from pool validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question code (if applicable).
    pub code: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question pool against its answer key for common issues.
pub fn validate_pool(items: &[QuestionItem], key: &AnswerKey) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Missing codes cannot be graded at all
    for item in items.iter().filter(|i| i.code.is_empty()) {
        warnings.push(ValidationWarning {
            code: None,
            message: format!(
                "question without CODE (round {}, no {})",
                item.round, item.no
            ),
        });
    }

    // Duplicate normalized codes
    let mut seen = HashSet::new();
    for item in items.iter().filter(|i| !i.code.is_empty()) {
        if !seen.insert(item.code.as_str()) {
            warnings.push(ValidationWarning {
                code: Some(item.code.clone()),
                message: format!("duplicate code after normalization: {}", item.raw_code),
            });
        }
    }

    // Questions the key cannot grade
    for item in items.iter().filter(|i| !i.code.is_empty()) {
        match key.get(&item.code) {
            None => warnings.push(ValidationWarning {
                code: Some(item.code.clone()),
                message: "no answer key entry".into(),
            }),
            Some(entry) if entry.answer.is_empty() => warnings.push(ValidationWarning {
                code: Some(item.code.clone()),
                message: "answer key entry has an empty ANS".into(),
            }),
            Some(entry) if item.kind == QuestionKind::MultipleChoice => {
                if !matches!(entry.answer.as_str(), "1" | "2" | "3" | "4") {
                    warnings.push(ValidationWarning {
                        code: Some(item.code.clone()),
                        message: format!(
                            "multiple-choice answer '{}' is not an option number 1-4",
                            entry.answer
                        ),
                    });
                }
            }
            Some(_) => {}
        }
    }

    // Keys without a question
    let question_codes: HashSet<&str> = items.iter().map(|i| i.code.as_str()).collect();
    let mut orphans: Vec<&str> = key
        .iter()
        .map(|e| e.code.as_str())
        .filter(|code| !question_codes.contains(code))
        .collect();
    orphans.sort_unstable();
    for code in orphans {
        warnings.push(ValidationWarning {
            code: Some(code.to_string()),
            message: "answer key entry without a question".into(),
        });
    }

    warnings
}
