//! # Domain Models
//!
//! This crate contains pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, no storage, no cryptography. Data, validation and simple helpers.

pub mod analysis;
pub mod config;
pub mod constants;

pub use analysis::{
    AnalysisRecord, AuthenticityScores, Dimension, DimensionScore, Score, ScoreError,
    normalize_subject,
};
