//! The `quizdeck play` command.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizdeck_core::catalog::Scope;
use quizdeck_core::loader::load_pool;
use quizdeck_core::model::{QuestionItem, Round};
use quizdeck_core::report::GradeReport;
use quizdeck_core::session::QuizSession;
use quizdeck_report::html::write_html_report;

use crate::SourceArgs;

pub struct PlayOptions {
    pub subject: String,
    /// `None` pools every round of the subject.
    pub round: Option<String>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub answers: Option<PathBuf>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub source: SourceArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn parse_formats(format: &str) -> Result<Vec<OutputFormat>> {
    if format.trim() == "all" {
        return Ok(vec![OutputFormat::Text, OutputFormat::Json, OutputFormat::Html]);
    }
    let mut formats = Vec::new();
    for f in format.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        let parsed = match f {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            "html" => OutputFormat::Html,
            other => anyhow::bail!("unknown output format '{other}' (expected text, json, html or all)"),
        };
        if !formats.contains(&parsed) {
            formats.push(parsed);
        }
    }
    Ok(formats)
}

pub async fn execute(opts: PlayOptions) -> Result<()> {
    let formats = parse_formats(&opts.format)?;
    if let Some(0) = opts.count {
        eprintln!("Warning: --count 0 is raised to 1.");
    }

    let workspace = super::open(&opts.source).await?;
    let scope = match &opts.round {
        Some(round) => Scope::Round(Round::new(round)),
        None => Scope::AllRounds,
    };

    let pool = load_pool(
        workspace.source.as_ref(),
        &workspace.manifest,
        &opts.subject,
        &scope,
    )
    .await?;

    let count = opts.count.unwrap_or(workspace.config.default_count);
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = QuizSession::start_with_rng(&pool, count, &mut rng);

    eprintln!(
        "quizdeck: {} {}, {} of {} questions",
        pool.subject,
        pool.round_label,
        session.len(),
        pool.items.len()
    );

    match &opts.answers {
        Some(path) => {
            let answers = load_answer_file(path)?;
            apply_answers(&mut session, &answers);
        }
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_interactive(&mut session, stdin.lock(), stdout.lock())?;
        }
    }

    let report = session.grade(&pool.key);
    print_summary(&report);

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| workspace.config.output_dir.clone());
    write_outputs(&report, &formats, &output)?;

    Ok(())
}

/// Read a TOML table of `code = answer`. Numbers are accepted as answers.
fn load_answer_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    parse_answer_table(&content)
        .with_context(|| format!("failed to parse answers: {}", path.display()))
}

fn parse_answer_table(content: &str) -> Result<BTreeMap<String, String>> {
    let table: toml::Table = content.parse()?;
    table
        .into_iter()
        .map(|(code, value)| {
            let answer = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(n) => n.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => anyhow::bail!(
                    "answer for '{code}' must be a string or number, got {}",
                    other.type_str()
                ),
            };
            Ok((code, answer))
        })
        .collect()
}

fn apply_answers(session: &mut QuizSession, answers: &BTreeMap<String, String>) {
    for (code, answer) in answers {
        session.record_answer(code, answer.as_str());
    }
    let unknown: Vec<&str> = answers
        .keys()
        .map(String::as_str)
        .filter(|code| {
            let code = quizdeck_core::code::normalize_code(code);
            !session.items().iter().any(|i| i.code == code)
        })
        .collect();
    if !unknown.is_empty() {
        tracing::debug!(?unknown, "answers for questions outside this session");
    }
}

/// Ask every question in order. An empty line leaves the question unanswered;
/// end of input stops the session early.
fn run_interactive<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    mut out: W,
) -> Result<()> {
    let total = session.len();
    loop {
        let Some(item) = session.current().cloned() else {
            break;
        };
        writeln!(out)?;
        write_question(&mut out, session.position() + 1, total, &item)?;
        write!(out, "답> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let answer = line.trim();
        if !answer.is_empty() {
            session.record_answer(&item.code, answer);
        }

        if !session.advance() {
            break;
        }
    }
    writeln!(
        out,
        "\n{} / {} answered.",
        session.answered_count(),
        session.len()
    )?;
    Ok(())
}

fn write_question<W: Write>(
    out: &mut W,
    position: usize,
    total: usize,
    item: &QuestionItem,
) -> Result<()> {
    let point = item
        .point
        .map(|p| format!(" · {p}점"))
        .unwrap_or_default();
    writeln!(
        out,
        "[{position}/{total}] {} · {}{point} ({})",
        item.display_code(),
        item.round.label(),
        item.kind
    )?;
    writeln!(out, "{}", item.question.trim())?;

    for (title, body) in [("[예제/자료]", &item.example), ("[표]", &item.table)] {
        if let Some(body) = body.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            writeln!(out, "{title}\n{body}")?;
        }
    }
    for choice in item.choices() {
        writeln!(out, "  {}) {}", choice.number, choice.text)?;
    }
    Ok(())
}

fn print_summary(report: &GradeReport) {
    println!(
        "\n{} ({:.1}%)",
        report.score_line(),
        report.accuracy() * 100.0
    );

    if report.per_round.len() > 1 {
        let mut table = Table::new();
        table.set_header(vec!["Round", "Correct", "Total", "Accuracy"]);
        for tally in &report.per_round {
            table.add_row(vec![
                Cell::new(tally.round.label()),
                Cell::new(tally.correct),
                Cell::new(tally.total),
                Cell::new(format!("{:.1}%", tally.accuracy() * 100.0)),
            ]);
        }
        println!("{table}");
    }

    for w in &report.wrong {
        println!(
            "  {}. {} | 내 답: {} | 정답: {}",
            w.ordinal,
            w.item.display_code(),
            w.user_answer_or_marker(),
            w.correct_answer_or_marker()
        );
    }
}

fn write_outputs(report: &GradeReport, formats: &[OutputFormat], dir: &Path) -> Result<()> {
    let stem = format!(
        "{}-{}",
        report.created_at.format("%Y-%m-%dT%H%M%S"),
        report.id.simple()
    );

    for format in formats {
        match format {
            OutputFormat::Text => {
                let path = report.save_wrong_note(dir)?;
                eprintln!("Wrong-answer note: {}", path.display());
            }
            OutputFormat::Json => {
                let path = dir.join(format!("report-{stem}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            OutputFormat::Html => {
                let path = dir.join(format!("review-{stem}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML review: {}", path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdeck_core::model::QuestionKind;

    fn item(code: &str) -> QuestionItem {
        QuestionItem {
            code: code.into(),
            raw_code: code.into(),
            round: Round::new("3"),
            subject: "회계".into(),
            no: 1,
            kind: QuestionKind::MultipleChoice,
            point: Some(2.0),
            question: format!("질문 {code}"),
            example: None,
            table: None,
            choices_raw: Some("1) 가\n2) 나".into()),
        }
    }

    fn session() -> QuizSession {
        QuizSession::new(
            "회계",
            Scope::Round(Round::new("3")),
            "3회",
            vec![item("A_1번"), item("A_2번"), item("A_3번")],
        )
    }

    #[test]
    fn formats() {
        assert_eq!(parse_formats("text").unwrap(), vec![OutputFormat::Text]);
        assert_eq!(
            parse_formats("json, html,json").unwrap(),
            vec![OutputFormat::Json, OutputFormat::Html]
        );
        assert_eq!(parse_formats("all").unwrap().len(), 3);
        assert!(parse_formats("sarif").is_err());
    }

    #[test]
    fn answer_table_accepts_strings_and_numbers() {
        let answers = parse_answer_table("\"A_01번\" = 2\n\"B_1번\" = \"Paris\"\n").unwrap();
        assert_eq!(answers.get("A_01번").map(String::as_str), Some("2"));
        assert_eq!(answers.get("B_1번").map(String::as_str), Some("Paris"));

        assert!(parse_answer_table("\"A_1번\" = [1, 2]").is_err());
    }

    #[test]
    fn interactive_loop_records_answers() {
        let mut session = session();
        let mut out = Vec::new();
        run_interactive(&mut session, "2\n\n 1 \n".as_bytes(), &mut out).unwrap();

        assert_eq!(session.answer("A_1번"), Some("2"));
        assert_eq!(session.answer("A_2번"), None);
        assert_eq!(session.answer("A_3번"), Some("1"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("[1/3] A_1번 · 3회 · 2점 (MCQ)"));
        assert!(printed.contains("  2) 나"));
        assert!(printed.contains("2 / 3 answered."));
    }

    #[test]
    fn interactive_loop_stops_at_end_of_input() {
        let mut session = session();
        let mut out = Vec::new();
        run_interactive(&mut session, "1\n".as_bytes(), &mut out).unwrap();
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn outputs_are_written() {
        let mut s = session();
        s.record_answer("A_1번", "2");
        let report = s.grade(&quizdeck_core::model::AnswerKey::new());
        let dir = tempfile::tempdir().unwrap();

        write_outputs(&report, &parse_formats("all").unwrap(), dir.path()).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"오답노트_3회_회계.txt".to_string()));
        assert!(names.iter().any(|n| n.starts_with("report-") && n.ends_with(".json")));
        assert!(names.iter().any(|n| n.starts_with("review-") && n.ends_with(".html")));
    }

    #[test]
    fn reports_from_the_same_second_do_not_collide() {
        let first = session().grade(&quizdeck_core::model::AnswerKey::new());
        let mut second = session().grade(&quizdeck_core::model::AnswerKey::new());
        second.created_at = first.created_at;
        let dir = tempfile::tempdir().unwrap();
        let formats = parse_formats("json,html").unwrap();

        write_outputs(&first, &formats, dir.path()).unwrap();
        write_outputs(&second, &formats, dir.path()).unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
        assert!(dir
            .path()
            .join(format!(
                "report-{}-{}.json",
                first.created_at.format("%Y-%m-%dT%H%M%S"),
                first.id.simple()
            ))
            .exists());
    }
}
