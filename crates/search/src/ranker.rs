//! Ranking of a whole store against a query, with ambiguity detection.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::normalize::normalize;
use crate::record::{Record, RecordStore, Urgency};
use crate::scorer::{millis, score_normalized, MatchResult};

/// Minimum score (exclusive) for a record to count as a match.
pub const RELEVANCE_FLOOR: f64 = 0.1;
/// Score gap (exclusive) under which the two best matches are ambiguous.
pub const AMBIGUITY_GAP: f64 = 0.15;
/// Minimum best score (exclusive) for ambiguity to be reported.
pub const AMBIGUITY_MIN_TOP: f64 = 0.4;

/// A record that cleared the relevance floor, with its scoring details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    /// Record id
    pub id: String,
    /// Record title
    pub title: String,
    /// Composite score
    pub score: f64,
    /// Urgency level
    pub urgency: Urgency,
    /// Numeric urgency, used as tie-break
    pub urgency_weight: u8,
    /// Keyword that explains the match
    pub matched_keyword: Option<String>,
    /// Likely causes
    pub causes: Vec<String>,
    /// Suggested fixes
    pub solutions: Vec<String>,
    /// Estimated repair cost
    pub estimated_cost: Option<String>,
    /// Contributor tag
    pub contributor: Option<String>,
    /// Per-signal breakdown
    pub details: MatchResult,
}

impl RankedMatch {
    /// Pairs a record with its match result.
    pub fn new(record: &Record, details: MatchResult) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            score: details.score,
            urgency: record.urgency.clone(),
            urgency_weight: record.urgency.weight(),
            matched_keyword: details.matched_keyword.clone(),
            causes: record.causes.clone(),
            solutions: record.solutions.clone(),
            estimated_cost: record.estimated_cost.clone(),
            contributor: record.contributor.clone(),
            details,
        }
    }
}

/// Result of one diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisOutcome {
    /// Query as given
    pub input: String,
    /// Matches above the relevance floor, before truncation
    pub total_matches: usize,
    /// Best matches, at most the requested count
    pub top_matches: Vec<RankedMatch>,
    /// Question to ask when the two best matches are too close
    pub clarification: Option<String>,
    /// Score of the best match, 0 when nothing matched
    pub confidence: f64,
    /// Version of the store that answered
    pub database_version: String,
}

impl DiagnosisOutcome {
    /// True when nothing cleared the relevance floor.
    pub fn is_empty(&self) -> bool {
        self.top_matches.is_empty()
    }

    /// Best match, if any.
    pub fn best(&self) -> Option<&RankedMatch> {
        self.top_matches.first()
    }
}

/// Ranks every record of `store` against `query` and keeps the `top_n` best.
///
/// # Errors
/// Returns [`SearchError::EmptyStore`] when the store holds no record.
///
/// # Example
/// ```
/// use autodiag_search::{diagnose, Record, RecordStore, Urgency};
///
/// let store = RecordStore::from_records(
///     Some("1.0".into()),
///     vec![Record::new("freins", "Freins qui grincent", Urgency::High)
///         .with_keywords(["freins grincent", "bruit freinage"])],
/// );
///
/// let outcome = diagnose("mes freins grincent", &store, 3).unwrap();
/// assert_eq!(outcome.top_matches[0].id, "freins");
/// assert_eq!(outcome.total_matches, 1);
/// ```
pub fn diagnose(query: &str, store: &RecordStore, top_n: usize) -> Result<DiagnosisOutcome> {
    if store.is_empty() {
        return Err(SearchError::EmptyStore);
    }

    let query_norm = normalize(query);
    let floor = millis(RELEVANCE_FLOOR);

    let mut matches = score_all(&query_norm, store.as_slice(), floor);

    // Stable: records tied on both keys keep store order.
    matches.sort_by(|a, b| {
        millis(b.score)
            .cmp(&millis(a.score))
            .then(b.urgency_weight.cmp(&a.urgency_weight))
    });

    let total_matches = matches.len();
    let clarification = detect_ambiguity(&matches);
    let confidence = matches.first().map_or(0.0, |m| m.score);
    matches.truncate(top_n);

    tracing::debug!(
        query_len = query.len(),
        total_matches,
        confidence,
        ambiguous = clarification.is_some(),
        "Diagnosis completed"
    );

    Ok(DiagnosisOutcome {
        input: query.to_string(),
        total_matches,
        top_matches: matches,
        clarification,
        confidence,
        database_version: store.version().to_string(),
    })
}

/// Scores every record and keeps those strictly above `floor` (in thousandths),
/// in input order.
fn score_all(query_norm: &str, records: &[Record], floor: i64) -> Vec<RankedMatch> {
    records
        .iter()
        .filter_map(|record| {
            let details = score_normalized(query_norm, record);
            (millis(details.score) > floor).then(|| RankedMatch::new(record, details))
        })
        .collect()
}

/// Builds a clarification question when the two best of `ranked` are too close.
///
/// `ranked` must already be sorted best first. Ambiguous means: at least two
/// matches, a gap strictly under [`AMBIGUITY_GAP`] and a best score strictly
/// over [`AMBIGUITY_MIN_TOP`].
pub fn detect_ambiguity(ranked: &[RankedMatch]) -> Option<String> {
    let [first, second, ..] = ranked else {
        return None;
    };

    let gap = millis(first.score) - millis(second.score);
    if gap < millis(AMBIGUITY_GAP) && millis(first.score) > millis(AMBIGUITY_MIN_TOP) {
        Some(format!(
            "Ambiguous symptoms between '{}' and '{}'. Could you clarify: is it rather {} or {}?",
            first.title,
            second.title,
            first.title.to_lowercase(),
            second.title.to_lowercase(),
        ))
    } else {
        None
    }
}
