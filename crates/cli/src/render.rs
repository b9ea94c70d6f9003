//! Text rendering of a diagnosis outcome

use autodiag_search::{DiagnosisOutcome, RankedMatch, Urgency};

use crate::output::format_percent;

/// Causes and solutions shown per match.
pub const MAX_LISTED: usize = 3;

/// Solution wording that gets an alarm marker.
const URGENT_MARKERS: [&str; 3] = ["arrêt", "immédiat", "urgence"];

const NOT_AVAILABLE: &str = "N/A";

/// Icon shown next to a match title.
pub fn urgency_icon(urgency: &Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "🚨",
        Urgency::High => "⚠️",
        Urgency::Medium => "🔧",
        Urgency::Low => "ℹ️",
        Urgency::Unrecognized(_) => "🔧",
    }
}

/// Whether a solution calls for stopping the vehicle or acting now.
pub fn is_urgent_solution(solution: &str) -> bool {
    let lowered = solution.to_lowercase();
    URGENT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Renders an outcome as markdown-flavoured text.
pub fn render(outcome: &DiagnosisOutcome) -> String {
    let Some(best) = outcome.best() else {
        return format!(
            "❓ Sorry, no diagnosis found for: '{}'\n💡 Try other keywords or be more specific.",
            outcome.input
        );
    };

    let mut lines = vec![
        format!("🤖 **Diagnosis for:** '{}'", outcome.input),
        format!(
            "📊 **Confidence:** {} | **Matches:** {}",
            format_percent(outcome.confidence),
            outcome.total_matches
        ),
        String::new(),
    ];

    for (rank, entry) in outcome.top_matches.iter().enumerate() {
        render_match(&mut lines, rank + 1, entry);
        lines.push(String::new());
    }

    if let Some(question) = &outcome.clarification {
        lines.push("💬 **Clarification needed:**".to_string());
        lines.push(format!("   {question}"));
        lines.push(String::new());
    }

    let details = &best.details;
    lines.push(format!(
        "🔍 **Match details:** Exact={}, Partials={}, Tokens={}, Fuzzy={}",
        details.exact_match, details.partial_matches, details.token_overlap, details.fuzzy
    ));

    lines.join("\n")
}

fn render_match(lines: &mut Vec<String>, rank: usize, entry: &RankedMatch) {
    lines.push(format!("**{rank}. {} {}**", urgency_icon(&entry.urgency), entry.title));
    lines.push(format!(
        "   📈 Score: {:.3} | 🚨 Urgency: {} | 🔍 Keyword: '{}'",
        entry.score,
        entry.urgency.display_name(),
        entry.matched_keyword.as_deref().unwrap_or(NOT_AVAILABLE)
    ));
    lines.push(format!(
        "   💰 Estimated cost: {}",
        entry.estimated_cost.as_deref().unwrap_or(NOT_AVAILABLE)
    ));

    if !entry.causes.is_empty() {
        lines.push("   🧩 **Possible causes:**".to_string());
        for cause in entry.causes.iter().take(MAX_LISTED) {
            lines.push(format!("      • {cause}"));
        }
    }

    if !entry.solutions.is_empty() {
        lines.push("   🔧 **Recommended solutions:**".to_string());
        for solution in entry.solutions.iter().take(MAX_LISTED) {
            let marker = if is_urgent_solution(solution) { "🚨" } else { "•" };
            lines.push(format!("      {marker} {solution}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodiag_search::{diagnose, Record, RecordStore};

    fn store() -> RecordStore {
        let mut surchauffe = Record::new("surchauffe", "Surchauffe moteur", Urgency::Critical)
            .with_keywords(["surchauffe", "température moteur"]);
        surchauffe.causes = vec![
            "Manque de liquide".into(),
            "Thermostat bloqué".into(),
            "Pompe à eau HS".into(),
            "Radiateur bouché".into(),
        ];
        surchauffe.solutions = vec![
            "Arrêt immédiat du véhicule".into(),
            "Vérifier le niveau de liquide".into(),
        ];
        surchauffe.estimated_cost = Some("50-800€".into());

        let pneu = Record::new("pneu", "Pneu crevé", Urgency::Unrecognized("variable".into()))
            .with_keywords(["pneu crevé"]);

        RecordStore::from_records(Some("3.0".into()), vec![surchauffe, pneu])
    }

    #[test]
    fn test_icons() {
        assert_eq!(urgency_icon(&Urgency::Critical), "🚨");
        assert_eq!(urgency_icon(&Urgency::High), "⚠️");
        assert_eq!(urgency_icon(&Urgency::Low), "ℹ️");
        assert_eq!(urgency_icon(&Urgency::Unrecognized("x".into())), "🔧");
    }

    #[test]
    fn test_urgent_solution() {
        assert!(is_urgent_solution("ARRÊT du moteur"));
        assert!(is_urgent_solution("Contrôle immédiat"));
        assert!(is_urgent_solution("Appeler le service d'urgence"));
        assert!(!is_urgent_solution("Vérifier la pression"));
    }

    #[test]
    fn test_render_no_match() {
        let outcome = diagnose("xyzzy123", &store(), 3).unwrap();
        let text = render(&outcome);
        assert!(text.starts_with("❓ Sorry, no diagnosis found for: 'xyzzy123'"));
        assert!(!text.contains("Match details"));
    }

    #[test]
    fn test_render_match() {
        let outcome = diagnose("surchauffe sur autoroute", &store(), 3).unwrap();
        let text = render(&outcome);

        assert!(text.contains("🤖 **Diagnosis for:** 'surchauffe sur autoroute'"));
        assert!(text.contains("**Matches:** 1"));
        assert!(text.contains("**1. 🚨 Surchauffe moteur**"));
        assert!(text.contains("Urgency: critical"));
        assert!(text.contains("Keyword: 'surchauffe'"));
        assert!(text.contains("💰 Estimated cost: 50-800€"));
        assert!(text.contains("      🚨 Arrêt immédiat du véhicule"));
        assert!(text.contains("      • Vérifier le niveau de liquide"));
        assert!(text.contains("Pompe à eau HS"));
        assert!(!text.contains("Radiateur bouché"));
        assert!(text.contains("Exact=true"));
    }

    #[test]
    fn test_render_score_and_confidence_format() {
        let outcome = diagnose("surchauffe", &store(), 3).unwrap();
        let best = outcome.best().unwrap();
        let text = render(&outcome);

        assert!(text.contains(&format!("Score: {:.3}", best.score)));
        assert!(text.contains(&format_percent(outcome.confidence)));
    }

    #[test]
    fn test_render_missing_cost_and_unknown_urgency() {
        // The critical record trails on fuzzy and urgency alone; keep only the best.
        let outcome = diagnose("pneu crevé", &store(), 1).unwrap();
        let text = render(&outcome);

        assert!(text.contains("**Matches:** 2"));
        assert!(text.contains("**1. 🔧 Pneu crevé**"));
        assert!(text.contains("Urgency: variable"));
        assert!(text.contains("Estimated cost: N/A"));
        assert!(!text.contains("Possible causes"));
    }

    #[test]
    fn test_render_clarification_block() {
        let mut outcome = diagnose("surchauffe", &store(), 3).unwrap();
        outcome.clarification = Some("Is it A or B?".into());
        let text = render(&outcome);

        assert!(text.contains("💬 **Clarification needed:**\n   Is it A or B?"));
    }
}
