//! The `quizdeck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizdeck.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data")?;
    write_if_missing(Path::new("data/manifest.json"), SAMPLE_MANIFEST)?;
    write_if_missing(Path::new("data/sample_1_q.txt"), SAMPLE_QUESTIONS)?;
    write_if_missing(Path::new("data/sample_1_a.txt"), SAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Add your question files under data/ and register them in data/manifest.json");
    println!("  2. Run: quizdeck validate");
    println!("  3. Run: quizdeck play --subject sample --round 1");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdeck configuration

default_source = "local"
manifest = "data/manifest.json"
default_count = 20
output_dir = "./wrong-notes"

[sources.local]
type = "dir"
root = "."

# [sources.web]
# type = "http"
# base_url = "${QUIZDECK_BASE_URL}"
# timeout_secs = 30
"#;

const SAMPLE_MANIFEST: &str = r#"{
  "subjects": ["sample"],
  "rounds": [1],
  "files": [
    { "round": 1, "subject": "sample", "q": "data/sample_1_q.txt", "a": "data/sample_1_a.txt" }
  ]
}
"#;

const SAMPLE_QUESTIONS: &str = r#"CODE: S_01번
ROUND: 1
SUBJECT: sample
NO: 1
TYPE: MCQ
POINT: 2
Q:
Which of these is a prime number?
CHOICES:
1) 4
2) 6
3) 7
4) 9
---
@@@
CODE: S_02번
ROUND: 1
SUBJECT: sample
NO: 2
TYPE: SHORT
POINT: 3
Q:
What is the capital of France?
---
"#;

const SAMPLE_ANSWERS: &str = r#"CODE: S_1번
ANS: 3
EXPL:
7 has no divisors other than 1 and itself.
@@@
CODE: S_2번
ANS: Paris
"#;
