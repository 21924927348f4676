//! quizdeck-core: record parser, catalog, quiz builder and grading.
//!
//! This crate defines the question/answer data model, the record text format,
//! pool loading over a [`traits::TextSource`], and the session and grading
//! logic the rest of quizdeck builds on.

pub mod builder;
pub mod catalog;
pub mod code;
pub mod error;
pub mod grading;
pub mod loader;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod statistics;
pub mod traits;
