//! quizdeck-report: review page rendering for graded sessions.
//!
//! The plain-text wrong-answer note lives in `quizdeck_core::report`; this
//! crate renders the same report as a self-contained HTML page.

pub mod html;

pub use html::{generate_html, write_html_report};
