//! Source and quiz error types.
//!
//! `SourceError` describes a failed resource read. It is defined here rather
//! than in `quizdeck-sources` so the pool loader can tell which resource failed
//! and whether a failure should abort the load or only skip one file.

use thiserror::Error;

/// Errors that can occur when reading a text resource.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The referenced resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {reference}")]
    Http { status: u16, reference: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// A local I/O error occurred.
    #[error("I/O error reading {reference}: {message}")]
    Io { reference: String, message: String },
}

impl SourceError {
    /// Returns `true` if the resource is simply absent (as opposed to unreachable).
    pub fn is_missing(&self) -> bool {
        match self {
            SourceError::NotFound(_) => true,
            SourceError::Http { status, .. } => *status == 404,
            _ => false,
        }
    }
}

/// Errors surfaced to the user while preparing or running a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The manifest could not be read.
    #[error("failed to load manifest {reference}: {source}")]
    ManifestUnavailable {
        reference: String,
        #[source]
        source: SourceError,
    },

    /// The manifest was read but is not valid JSON of the expected shape.
    #[error("invalid manifest {reference}: {message}")]
    ManifestInvalid { reference: String, message: String },

    /// No file is registered for the selected round and subject.
    #[error("no file registered for round '{round}' / subject '{subject}'")]
    SelectionNotFound { round: String, subject: String },

    /// A question text resource could not be read.
    #[error("failed to load question text {reference}: {source}")]
    QuestionText {
        reference: String,
        #[source]
        source: SourceError,
    },

    /// An answer text resource could not be read.
    #[error("failed to load answer text {reference}: {source}")]
    AnswerText {
        reference: String,
        #[source]
        source: SourceError,
    },

    /// All-rounds mode found no registered files for the subject.
    #[error("no files registered for subject '{0}'")]
    NoFilesForSubject(String),

    /// Loading finished but produced no questions.
    #[error("no question data for subject '{subject}' ({scope})")]
    EmptyPool { subject: String, scope: String },
}

impl QuizError {
    /// Returns `true` for the "no data" family of errors, which are distinct
    /// from fetch failures.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            QuizError::NoFilesForSubject(_) | QuizError::EmptyPool { .. }
        )
    }
}
