//! answerkey-core: Answer-key compiler and grading engine.
//!
//! This crate defines the answer-key data model, the shorthand compiler,
//! answer normalization, and the grading logic that the rest of answerkey
//! builds on.

pub mod batch;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod problems;
pub mod report;
pub mod submission;
pub mod traits;
