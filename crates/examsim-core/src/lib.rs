//! examsim-core — Question model, extraction, and exam session engine.
//!
//! This crate defines the question data model, the loaders that turn JSON
//! uploads and text documents into questions, and the session state machine
//! that drives practice and timed exam runs.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod sample;
pub mod session;
pub mod statistics;
pub mod storage;
pub mod timer;
