//! The `quizdeck validate` command.

use anyhow::Result;
use futures::future::join_all;

use quizdeck_core::catalog::FileEntry;
use quizdeck_core::loader::fetch_pair;
use quizdeck_core::parser::{parse_answer_text, parse_question_text, validate_pool};

use crate::SourceArgs;

pub async fn execute(subject: Option<String>, args: SourceArgs) -> Result<()> {
    let workspace = super::open(&args).await?;
    let manifest = &workspace.manifest;

    let mut total_warnings = 0;

    for s in &manifest.subjects {
        if subject.as_deref().is_some_and(|wanted| wanted.trim() != s.trim()) {
            continue;
        }
        if manifest.files_for_subject(s).is_empty() {
            println!("Subject {s}: WARNING: no files registered");
            total_warnings += 1;
        }
    }

    let files: Vec<&FileEntry> = match &subject {
        Some(wanted) => manifest.files_for_subject(wanted),
        None => manifest.files.iter().collect(),
    };

    if files.is_empty() {
        anyhow::bail!("no files to validate");
    }

    let fetched = join_all(
        files
            .iter()
            .map(|file| fetch_pair(workspace.source.as_ref(), file)),
    )
    .await;

    for (file, result) in files.into_iter().zip(fetched) {
        let (questions, answers) = match result {
            Ok(pair) => pair,
            Err(err) => {
                println!("{} {}:", file.subject.trim(), file.round.label());
                println!("  ERROR: {err}");
                total_warnings += 1;
                continue;
            }
        };

        let items = parse_question_text(&questions, &file.round, &file.subject);
        let key = parse_answer_text(&answers);
        println!(
            "{} {}: {} questions, {} answers",
            file.subject.trim(),
            file.round.label(),
            items.len(),
            key.len()
        );

        let warnings = validate_pool(&items, &key);
        for w in &warnings {
            let prefix = w
                .code
                .as_ref()
                .map(|code| format!("  [{code}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
