//! Multi-signal relevance scoring of one record against a query.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, tokens};
use crate::record::Record;
use crate::similarity::similarity_ratio;

/// Weight of the exact keyword signal.
pub const EXACT_WEIGHT: f64 = 0.4;
/// Weight of the partial keyword ratio.
pub const PARTIAL_WEIGHT: f64 = 0.2;
/// Weight of the best token-set overlap.
pub const OVERLAP_WEIGHT: f64 = 0.2;
/// Weight of the urgency boost.
pub const URGENCY_WEIGHT: f64 = 0.1;
/// Weight of the best fuzzy similarity.
pub const FUZZY_WEIGHT: f64 = 0.1;
/// Fuzzy ratio above which a keyword counts as a provisional match.
pub const FUZZY_MATCH_MIN: f64 = 0.6;

/// Relevance data for one (query, record) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Composite score in `[0, 1]`, rounded to 3 decimals
    pub score: f64,
    /// Keyword (as stored) that best explains the match
    pub matched_keyword: Option<String>,
    /// Whether a whole keyword phrase appeared in the query
    pub exact_match: bool,
    /// Keywords with at least one token found in the query
    pub partial_matches: usize,
    /// Best Jaccard overlap between token sets, rounded to 3 decimals
    pub token_overlap: f64,
    /// Best fuzzy similarity, rounded to 3 decimals
    pub fuzzy: f64,
}

/// Scores a record against a raw query.
///
/// # Example
/// ```
/// use autodiag_search::{score, Record, Urgency};
///
/// let record = Record::new("voyant", "Voyant moteur allumé", Urgency::Medium)
///     .with_keywords(["témoin moteur", "voyant moteur"]);
///
/// let result = score("Voyant moteur allumé", &record);
/// assert!(result.exact_match);
/// assert_eq!(result.matched_keyword.as_deref(), Some("voyant moteur"));
/// ```
pub fn score(query: &str, record: &Record) -> MatchResult {
    score_normalized(&normalize(query), record)
}

/// Scores a record against a query that has already been normalized.
pub(crate) fn score_normalized(query: &str, record: &Record) -> MatchResult {
    let query_tokens = tokens(query);

    let mut matched_keyword: Option<&str> = None;
    let mut exact = 0.0;
    let mut partial_matches = 0usize;
    let mut token_overlap = 0.0f64;
    let mut fuzzy_best = 0.0f64;

    for keyword in &record.keywords {
        let kw_norm = normalize(keyword);
        let kw_tokens = tokens(&kw_norm);

        // First whole-phrase hit wins and ends the scan.
        if query.contains(kw_norm.as_str()) {
            exact = 1.0;
            matched_keyword = Some(keyword);
            break;
        }

        if kw_tokens.iter().any(|token| query.contains(token)) {
            partial_matches += 1;
            matched_keyword.get_or_insert(keyword);
        }

        let union = query_tokens.union(&kw_tokens).count();
        if union > 0 {
            let shared = query_tokens.intersection(&kw_tokens).count();
            token_overlap = token_overlap.max(shared as f64 / union as f64);
        }

        let fuzzy = similarity_ratio(query, &kw_norm);
        if fuzzy > fuzzy_best {
            fuzzy_best = fuzzy;
            if matched_keyword.is_none() && fuzzy > FUZZY_MATCH_MIN {
                matched_keyword = Some(keyword);
            }
        }
    }

    let partial_ratio = match record.keywords.len() {
        0 => 0.0,
        n => (partial_matches as f64 / n as f64).min(1.0),
    };
    let urgency = f64::from(record.urgency.weight()) / 10.0;

    let composite = EXACT_WEIGHT * exact
        + PARTIAL_WEIGHT * partial_ratio
        + OVERLAP_WEIGHT * token_overlap
        + URGENCY_WEIGHT * urgency
        + FUZZY_WEIGHT * fuzzy_best;

    MatchResult {
        score: round3(composite),
        matched_keyword: matched_keyword.map(str::to_string),
        exact_match: exact > 0.0,
        partial_matches,
        token_overlap: round3(token_overlap),
        fuzzy: round3(fuzzy_best),
    }
}

/// Rounds to 3 decimals.
///
/// Works on the exact binary value with ties to even, so `0.3075` (stored
/// just under the half) gives `0.307`. Scaling by 1000 first would round the
/// product up to `307.5` and then away from zero.
#[inline]
pub(crate) fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

/// A 3-decimal score as integer thousandths, for exact threshold checks.
#[inline]
pub(crate) fn millis(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}
