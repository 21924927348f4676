//! The `quizdeck catalog` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdeck_core::catalog::{all_rounds_label, Manifest};

use crate::SourceArgs;

pub async fn execute(subject: Option<String>, args: SourceArgs) -> Result<()> {
    let workspace = super::open(&args).await?;
    let manifest = &workspace.manifest;

    let subjects: Vec<&str> = match &subject {
        Some(s) => {
            if !manifest.has_subject(s) {
                anyhow::bail!(
                    "unknown subject '{s}'. Available: {}",
                    manifest.subjects.join(", ")
                );
            }
            vec![s.as_str()]
        }
        None => manifest.subjects.iter().map(String::as_str).collect(),
    };

    if subjects.is_empty() {
        println!("No subjects registered in the manifest.");
        return Ok(());
    }

    for s in subjects {
        print_subject(manifest, s);
    }

    Ok(())
}

fn print_subject(manifest: &Manifest, subject: &str) {
    let mut table = Table::new();
    table.set_header(vec!["Round", "Available", "Questions", "Answers"]);

    for availability in manifest.round_availability(subject) {
        let file = manifest.find_file(&availability.round, subject);
        table.add_row(vec![
            Cell::new(availability.round.label()),
            Cell::new(if availability.available { "yes" } else { "-" }),
            Cell::new(file.map(|f| f.q.as_str()).unwrap_or("")),
            Cell::new(file.map(|f| f.a.as_str()).unwrap_or("")),
        ]);
    }

    let files = manifest.files_for_subject(subject);
    let all = if files.is_empty() {
        "not available".to_string()
    } else {
        format!("{} ({} files)", all_rounds_label(&files), files.len())
    };

    println!("Subject: {}", subject.trim());
    println!("{table}");
    println!("All rounds: {all}\n");
}
