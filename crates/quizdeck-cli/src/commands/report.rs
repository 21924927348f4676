//! The `quizdeck report` command.

use std::path::PathBuf;

use anyhow::Result;

use quizdeck_core::report::GradeReport;
use quizdeck_report::html::generate_html;

pub fn execute(input: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = GradeReport::load_json(&input)?;

    let rendered = match format.as_str() {
        "text" => report.to_wrong_note(),
        "html" => generate_html(&report),
        other => anyhow::bail!("unknown report format '{other}' (expected text or html)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
