//! Pool loading.
//!
//! Resolves a scope against the manifest, fetches every question/answer file
//! pair through a [`TextSource`] and merges the results into one [`Pool`].
//! Single-round and all-rounds loading are the same operation; only the file
//! selection and the failure policy differ.

use futures::future::{join, join_all};

use crate::catalog::{FileEntry, Manifest, Scope};
use crate::error::QuizError;
use crate::model::{AnswerKey, QuestionItem};
use crate::parser::{parse_answer_text, parse_question_text};
use crate::traits::TextSource;

/// Default manifest reference, relative to the source root.
pub const DEFAULT_MANIFEST: &str = "data/manifest.json";

/// Questions and answer key for one subject and scope.
#[derive(Debug, Clone)]
pub struct Pool {
    pub subject: String,
    pub scope: Scope,
    /// Display label of the scope.
    pub round_label: String,
    /// Questions in catalog file order.
    pub items: Vec<QuestionItem>,
    pub key: AnswerKey,
}

/// Fetch and parse the manifest.
pub async fn load_manifest(
    source: &dyn TextSource,
    reference: &str,
) -> Result<Manifest, QuizError> {
    let text = source
        .fetch_text(reference)
        .await
        .map_err(|source| QuizError::ManifestUnavailable {
            reference: reference.to_string(),
            source,
        })?;
    let manifest = Manifest::from_json(&text, reference)?;
    tracing::debug!(
        reference,
        subjects = manifest.subjects.len(),
        files = manifest.files.len(),
        "manifest loaded"
    );
    Ok(manifest)
}

/// Fetch one file pair. Question and answer text are read concurrently.
pub async fn fetch_pair(
    source: &dyn TextSource,
    file: &FileEntry,
) -> Result<(String, String), QuizError> {
    let (questions, answers) = join(source.fetch_text(&file.q), source.fetch_text(&file.a)).await;

    let questions = questions.map_err(|source| QuizError::QuestionText {
        reference: file.q.clone(),
        source,
    })?;
    let answers = answers.map_err(|source| QuizError::AnswerText {
        reference: file.a.clone(),
        source,
    })?;
    Ok((questions, answers))
}

/// Load the question pool and answer key for a subject and scope.
///
/// A single round aborts on the first fetch failure. All-rounds mode skips
/// files that fail to load and only errors when nothing usable is left. All
/// files are fetched concurrently but merged in catalog order, so a code that
/// appears in several answer files resolves to the last one in that order.
pub async fn load_pool(
    source: &dyn TextSource,
    manifest: &Manifest,
    subject: &str,
    scope: &Scope,
) -> Result<Pool, QuizError> {
    let files = manifest.files_for(scope, subject)?;
    let strict = matches!(scope, Scope::Round(_));

    let fetched = join_all(files.iter().map(|file| fetch_pair(source, file))).await;

    let mut items = Vec::new();
    let mut key = AnswerKey::new();
    for (file, result) in files.iter().zip(fetched) {
        match result {
            Ok((questions, answers)) => {
                let parsed = parse_question_text(&questions, &file.round, subject);
                let file_key = parse_answer_text(&answers);
                tracing::debug!(
                    round = %file.round,
                    questions = parsed.len(),
                    answers = file_key.len(),
                    "parsed {}",
                    file.q
                );
                items.extend(parsed);
                key.merge(file_key);
            }
            Err(e) if strict => return Err(e),
            Err(e) => {
                tracing::warn!("skipping round {}: {e}", file.round);
            }
        }
    }

    if items.is_empty() {
        return Err(QuizError::EmptyPool {
            subject: subject.trim().to_string(),
            scope: scope.to_string(),
        });
    }

    let round_label = manifest.scope_label(scope, subject);
    tracing::info!(
        subject,
        scope = %scope,
        questions = items.len(),
        answers = key.len(),
        "pool loaded"
    );

    Ok(Pool {
        subject: subject.trim().to_string(),
        scope: scope.clone(),
        round_label,
        items,
        key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::SourceError;
    use crate::model::Round;
    use crate::session::QuizSession;

    /// In-memory source that counts reads.
    struct MapSource {
        files: HashMap<String, String>,
        reads: AtomicU32,
    }

    impl MapSource {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                reads: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TextSource for MapSource {
        fn name(&self) -> &str {
            "map"
        }

        async fn fetch_text(&self, reference: &str) -> Result<String, SourceError> {
            self.reads.fetch_add(1, Ordering::Relaxed);
            self.files
                .get(reference)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(reference.to_string()))
        }
    }

    const MANIFEST: &str = r#"{
        "subjects": ["회계"],
        "rounds": [1, 10, "주관식모음", 2],
        "files": [
            {"round": 10, "subject": "회계", "q": "q10.txt", "a": "a10.txt"},
            {"round": "주관식모음", "subject": "회계", "q": "qm.txt", "a": "am.txt"},
            {"round": "1", "subject": "회계", "q": "q1.txt", "a": "a1.txt"},
            {"round": 2, "subject": "회계", "q": "q2.txt", "a": "missing.txt"}
        ]
    }"#;

    fn source() -> MapSource {
        MapSource::new(&[
            ("data/manifest.json", MANIFEST),
            (
                "q1.txt",
                "CODE: A_08번\nNO: 8\nTYPE: MCQ\nQ:\n첫 문제\nCHOICES:\n1) a\n2) b\n3) c\n4) d\n---\n@@@\nCODE: B_1번\nNO: 1\nQ:\n둘째 문제\n---\n",
            ),
            ("a1.txt", "CODE: A_8번\nANS: 2\n@@@\nCODE: B_1번\nANS: 4\nEXPL:\n사번이 정답"),
            ("q10.txt", "CODE: C_1번\nNO: 1\nQ:\n십회 문제"),
            ("a10.txt", "CODE: C_1번\nANS: 1\n@@@\nCODE: B_1번\nANS: 3"),
            ("qm.txt", "CODE: M_1번\nQ:\n모음 문제"),
            ("am.txt", "CODE: M_1번\nANS: 정답"),
            ("q2.txt", "CODE: D_1번\nQ:\n이회 문제"),
        ])
    }

    #[tokio::test]
    async fn fetch_pair_names_the_failing_file() {
        let src = source();
        let manifest = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap();

        let round2 = manifest.find_file(&Round::new("2"), "회계").unwrap();
        let err = fetch_pair(&src, round2).await.unwrap_err();
        assert!(matches!(err, QuizError::AnswerText { ref reference, .. } if reference == "missing.txt"));

        let round1 = manifest.find_file(&Round::new("1"), "회계").unwrap();
        let (questions, answers) = fetch_pair(&src, round1).await.unwrap();
        assert!(questions.contains("첫 문제"));
        assert!(answers.contains("사번이 정답"));
    }

    #[tokio::test]
    async fn single_round_scenario() {
        let src = source();
        let manifest = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap();
        let pool = load_pool(&src, &manifest, "회계", &Scope::Round(Round::new("1")))
            .await
            .unwrap();

        assert_eq!(pool.items.len(), 2);
        assert_eq!(pool.round_label, "1회");
        assert_eq!(pool.items[0].code, "A_8번");
        assert_eq!(pool.items[0].raw_code, "A_08번");

        let mut session = QuizSession::start_with_rng(&pool, 10, &mut StdRng::seed_from_u64(9));
        session.record_answer("A_8번", "2");
        session.record_answer("B_1번", "3");
        let report = session.grade(&pool.key);

        assert_eq!((report.correct, report.total), (1, 2));
        assert_eq!(report.wrong.len(), 1);
        assert_eq!(report.wrong[0].item.code, "B_1번");
        assert_eq!(report.wrong[0].correct_answer.as_deref(), Some("4"));
        assert_eq!(report.wrong[0].explanation.as_deref(), Some("사번이 정답"));
    }

    #[tokio::test]
    async fn unknown_selection_fails_before_fetching() {
        let src = source();
        let manifest = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap();
        let reads_before = src.reads.load(Ordering::Relaxed);

        let err = load_pool(&src, &manifest, "회계", &Scope::Round(Round::new("99")))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::SelectionNotFound { .. }));
        assert_eq!(src.reads.load(Ordering::Relaxed), reads_before);
    }

    #[tokio::test]
    async fn single_round_aborts_on_fetch_failure() {
        let src = source();
        let manifest = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap();
        let err = load_pool(&src, &manifest, "회계", &Scope::Round(Round::from(2u32)))
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::AnswerText { ref reference, .. } if reference == "missing.txt"));
        assert!(!err.is_no_data());
    }

    #[tokio::test]
    async fn all_rounds_pools_in_catalog_order_and_skips_failures() {
        let src = source();
        let manifest = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap();
        let pool = load_pool(&src, &manifest, "회계", &Scope::AllRounds)
            .await
            .unwrap();

        let codes: Vec<&str> = pool.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["A_8번", "B_1번", "C_1번", "M_1번"]);
        assert_eq!(pool.items[2].round.as_str(), "10");
        assert_eq!(pool.round_label, "1~10회(전체)");

        // round 10 comes after round 1, so its key for B_1번 wins
        assert_eq!(pool.key.get("B_1번").unwrap().answer, "3");
        assert_eq!(pool.key.get("M_1번").unwrap().answer, "정답");
    }

    #[tokio::test]
    async fn all_rounds_without_files_is_no_data() {
        let src = source();
        let manifest = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap();
        let err = load_pool(&src, &manifest, "세법", &Scope::AllRounds)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::NoFilesForSubject(_)));
    }

    #[tokio::test]
    async fn all_rounds_with_nothing_loadable_is_empty_pool() {
        let src = MapSource::new(&[(
            "m.json",
            r#"{"subjects":["회계"],"rounds":[1],"files":[{"round":1,"subject":"회계","q":"gone.txt","a":"gone_a.txt"}]}"#,
        )]);
        let manifest = load_manifest(&src, "m.json").await.unwrap();
        let err = load_pool(&src, &manifest, "회계", &Scope::AllRounds)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::EmptyPool { .. }));
        assert!(err.is_no_data());
    }

    #[tokio::test]
    async fn missing_manifest() {
        let src = MapSource::new(&[]);
        let err = load_manifest(&src, DEFAULT_MANIFEST).await.unwrap_err();
        assert!(matches!(err, QuizError::ManifestUnavailable { .. }));
    }
}
