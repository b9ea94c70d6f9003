//! Symptom matching for the vehicle diagnostic assistant.
//!
//! This crate provides:
//! - Accent and case folding of free text
//! - Ratcliff/Obershelp similarity ratio
//! - Multi-signal scoring of a diagnostic record against a query
//! - Ranking with relevance floor and ambiguity detection
//! - Loading of the JSON diagnostic store

mod error;
mod normalize;
mod ranker;
mod record;
mod scorer;
mod similarity;

pub use error::{Result, SearchError, SearchErrorCode};
pub use normalize::{normalize, tokens};
pub use ranker::{
    detect_ambiguity, diagnose, DiagnosisOutcome, RankedMatch, AMBIGUITY_GAP, AMBIGUITY_MIN_TOP,
    RELEVANCE_FLOOR,
};
pub use record::{Record, RecordStore, StoreMetadata, Urgency};
pub use scorer::{
    score, MatchResult, EXACT_WEIGHT, FUZZY_MATCH_MIN, FUZZY_WEIGHT, OVERLAP_WEIGHT,
    PARTIAL_WEIGHT, URGENCY_WEIGHT,
};
pub use similarity::similarity_ratio;
