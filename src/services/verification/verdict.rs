// Verdict Engine
// State-free conversion of aggregated evidence into a labeled verdict
// with a clamped confidence score, up to 3 citations, a templated
// explanation, and independent quality warnings.

use crate::models::{AggregatedEvidence, Citation, Claim, Evidence, Verdict, VerdictLabel};
use chrono::{Duration, Utc};
use std::collections::HashSet;
use tracing::info;

/// Fewer total sources than this always yields INSUFFICIENT_EVIDENCE.
const MIN_SOURCES: usize = 2;
/// No verdict is ever reported at full certainty.
const CONFIDENCE_CEILING: f64 = 0.9;
const CONFIDENCE_FLOOR: f64 = 0.1;
const MAX_CITATIONS: usize = 3;
const HIGH_AUTHORITY: f64 = 0.8;

fn determine_label(agg: &AggregatedEvidence) -> VerdictLabel {
    if agg.total_sources < MIN_SOURCES {
        return VerdictLabel::InsufficientEvidence;
    }
    if agg.supporting.is_empty() && agg.contradicting.is_empty() {
        return VerdictLabel::InsufficientEvidence;
    }
    if agg.consensus_score >= 0.6 && agg.supporting.len() >= 2 {
        return VerdictLabel::Supported;
    }
    if agg.consensus_score <= -0.6 && agg.contradicting.len() >= 2 {
        return VerdictLabel::False;
    }
    if (-0.6..=0.3).contains(&agg.consensus_score)
        && !agg.supporting.is_empty()
        && !agg.contradicting.is_empty()
    {
        return VerdictLabel::Misleading;
    }
    VerdictLabel::InsufficientEvidence
}

/// Evidence set whose polarity matches the label. FALSE draws from the
/// contradicting set, everything else from the supporting set.
fn polarity_set<'a>(label: VerdictLabel, agg: &'a AggregatedEvidence) -> &'a [Evidence] {
    match label {
        VerdictLabel::False => &agg.contradicting,
        _ => &agg.supporting,
    }
}

fn compute_confidence(label: VerdictLabel, agg: &AggregatedEvidence) -> (f64, String) {
    if label == VerdictLabel::InsufficientEvidence {
        return (
            CONFIDENCE_FLOOR,
            "Fixed floor confidence: not enough polarized evidence to score.".to_string(),
        );
    }

    let base = agg.consensus_score.abs();
    let volume_bonus = f64::min(0.2, agg.total_sources as f64 * 0.03);
    let high_authority_count = polarity_set(label, agg)
        .iter()
        .filter(|e| e.authority >= HIGH_AUTHORITY)
        .count();
    let authority_bonus = f64::min(0.15, high_authority_count as f64 * 0.05);

    let mut confidence = base + volume_bonus + authority_bonus;
    if label == VerdictLabel::Misleading {
        confidence *= 0.7;
    }
    confidence = confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
    confidence = (confidence * 100.0).round() / 100.0;

    let explanation = format!(
        "Confidence from consensus strength {:.2}, {} total sources (+{:.2}), {} high-authority aligned sources (+{:.2}){}. Capped at {:.1}.",
        base,
        agg.total_sources,
        volume_bonus,
        high_authority_count,
        authority_bonus,
        if label == VerdictLabel::Misleading {
            ", reduced for mixed evidence"
        } else {
            ""
        },
        CONFIDENCE_CEILING
    );

    (confidence, explanation)
}

fn select_citations(label: VerdictLabel, agg: &AggregatedEvidence) -> Vec<Citation> {
    let mut pool: Vec<&Evidence> = match label {
        VerdictLabel::Supported => agg.supporting.iter().collect(),
        VerdictLabel::False => agg.contradicting.iter().collect(),
        VerdictLabel::Misleading => agg.supporting.iter().chain(agg.contradicting.iter()).collect(),
        VerdictLabel::InsufficientEvidence => agg.all().collect(),
    };
    pool.sort_by(|a, b| {
        b.authority
            .partial_cmp(&a.authority)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.into_iter()
        .take(MAX_CITATIONS)
        .map(|e| Citation {
            source: e.source.clone(),
            url: e.url.clone(),
            snippet: e.snippet.clone(),
        })
        .collect()
}

fn confidence_adverb(confidence: f64) -> &'static str {
    if confidence >= 0.8 {
        "very likely"
    } else if confidence >= 0.6 {
        "likely"
    } else if confidence >= 0.4 {
        "possibly"
    } else {
        "tentatively"
    }
}

/// Top 1-2 source names by authority from the given set, comma-joined.
fn top_source_names(evidence: &[Evidence]) -> String {
    let mut sorted: Vec<&Evidence> = evidence.iter().collect();
    sorted.sort_by(|a, b| {
        b.authority
            .partial_cmp(&a.authority)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
        .iter()
        .take(2)
        .map(|e| e.source.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_explanation(label: VerdictLabel, confidence: f64, agg: &AggregatedEvidence) -> String {
    let adverb = confidence_adverb(confidence);
    match label {
        VerdictLabel::Supported => format!(
            "This claim is {} accurate. {} of {} sources support it, including {}.",
            adverb,
            agg.supporting.len(),
            agg.total_sources,
            top_source_names(&agg.supporting)
        ),
        VerdictLabel::False => format!(
            "This claim is {} false. {} of {} sources contradict it, including {}.",
            adverb,
            agg.contradicting.len(),
            agg.total_sources,
            top_source_names(&agg.contradicting)
        ),
        VerdictLabel::Misleading => format!(
            "This claim is {} misleading or lacks context. Sources are split: {} supporting versus {} contradicting, including {}.",
            adverb,
            agg.supporting.len(),
            agg.contradicting.len(),
            top_source_names(&agg.supporting)
        ),
        VerdictLabel::InsufficientEvidence => format!(
            "There is not enough evidence to verify this claim. Only {} relevant sources were found.",
            agg.total_sources
        ),
    }
}

/// Independent quality warnings; all that apply are emitted.
fn build_warnings(agg: &AggregatedEvidence) -> Vec<String> {
    let all: Vec<&Evidence> = agg.all().collect();
    let mut warnings = Vec::new();

    if all.len() >= 3 {
        let hostnames: HashSet<&str> = all.iter().map(|e| e.source.as_str()).collect();
        if hostnames.len() < 3 {
            warnings.push("Limited source diversity: evidence comes from fewer than 3 distinct sites.".to_string());
        }
    }

    if all.len() >= 2 && !all.iter().any(|e| e.authority >= HIGH_AUTHORITY) {
        warnings.push("No high-authority sources were found for this claim.".to_string());
    }

    if !all.is_empty() {
        let mean = all.iter().map(|e| e.authority).sum::<f64>() / all.len() as f64;
        if mean < 0.4 {
            warnings.push("Below-average source quality across the evidence set.".to_string());
        }
    }

    if all.len() >= 2 {
        let cutoff = Utc::now() - Duration::days(365);
        let has_recent = all
            .iter()
            .any(|e| e.published_date.map(|d| d > cutoff).unwrap_or(false));
        if !has_recent {
            warnings.push("No sources published within the last 12 months.".to_string());
        }
    }

    warnings
}

/// Produce the terminal verdict for one claim from its aggregated evidence.
pub fn generate_verdict(claim: &Claim, agg: &AggregatedEvidence) -> Verdict {
    let label = determine_label(agg);
    let (confidence, confidence_explanation) = compute_confidence(label, agg);
    let citations = select_citations(label, agg);
    let explanation = build_explanation(label, confidence, agg);
    let warnings = build_warnings(agg);

    info!(
        "[verdict] claim {} -> {} (confidence {:.2}, {} citations, {} warnings)",
        claim.id,
        label.as_str(),
        confidence,
        citations.len(),
        warnings.len()
    );

    Verdict {
        claim_id: claim.id,
        verdict: label,
        confidence,
        explanation,
        citations,
        warnings,
        confidence_explanation: Some(confidence_explanation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaimType, Stance};
    use crate::services::verification::aggregation::aggregate_evidence;
    use uuid::Uuid;

    fn claim(text: &str) -> Claim {
        Claim {
            id: Uuid::new_v4(),
            text: text.to_string(),
            original_text: text.to_string(),
            classification: ClaimType::Factual,
        }
    }

    fn evidence(source: &str, stance: Stance, authority: f64) -> Evidence {
        Evidence {
            source: source.to_string(),
            url: format!("https://{}/article", source),
            snippet: "snippet text".to_string(),
            raw_content: None,
            stance,
            authority,
            published_date: Some(Utc::now()),
        }
    }

    #[test]
    fn test_unanimous_support_is_supported_with_capped_confidence() {
        let agg = aggregate_evidence(vec![
            evidence("cdc.gov", Stance::Supports, 0.95),
            evidence("bbc.com", Stance::Supports, 0.85),
            evidence("cnn.com", Stance::Supports, 0.75),
        ]);
        assert_eq!(agg.consensus_score, 1.0);

        let verdict = generate_verdict(&claim("Water freezes at 0 degrees Celsius."), &agg);
        assert_eq!(verdict.verdict, VerdictLabel::Supported);
        assert!(verdict.confidence <= 0.9);
        assert_eq!(verdict.confidence, 0.9);
        assert!(verdict.explanation.contains("very likely"));
    }

    #[test]
    fn test_single_source_is_insufficient_despite_unanimity() {
        let agg = aggregate_evidence(vec![evidence("nature.com", Stance::Supports, 0.95)]);
        let verdict = generate_verdict(&claim("Some well-sourced claim."), &agg);
        assert_eq!(verdict.verdict, VerdictLabel::InsufficientEvidence);
        assert_eq!(verdict.confidence, 0.1);
    }

    #[test]
    fn test_split_evidence_is_misleading_with_dampened_confidence() {
        let agg = aggregate_evidence(vec![
            evidence("site-a.com", Stance::Supports, 0.5),
            evidence("site-b.com", Stance::Supports, 0.5),
            evidence("site-c.com", Stance::Contradicts, 0.5),
            evidence("site-d.com", Stance::Contradicts, 0.5),
        ]);
        assert_eq!(agg.consensus_score, 0.0);

        let verdict = generate_verdict(&claim("A contested claim."), &agg);
        assert_eq!(verdict.verdict, VerdictLabel::Misleading);
        // (0.0 + 0.12 + 0.0) * 0.7 = 0.084, clamped to the floor.
        assert_eq!(verdict.confidence, 0.1);
    }

    #[test]
    fn test_strong_contradiction_is_false() {
        let agg = aggregate_evidence(vec![
            evidence("snopes.com", Stance::Contradicts, 0.95),
            evidence("reuters.com", Stance::Contradicts, 0.95),
            evidence("randomblog.com", Stance::Supports, 0.25),
        ]);
        let verdict = generate_verdict(&claim("A debunked claim."), &agg);
        assert_eq!(verdict.verdict, VerdictLabel::False);
        assert!(verdict.citations.iter().all(|c| c.source != "randomblog.com"));
    }

    #[test]
    fn test_citations_capped_and_sorted_by_authority() {
        let agg = aggregate_evidence(vec![
            evidence("cdc.gov", Stance::Supports, 0.95),
            evidence("bbc.com", Stance::Supports, 0.85),
            evidence("cnn.com", Stance::Supports, 0.75),
            evidence("wikipedia.org", Stance::Supports, 0.70),
        ]);
        let verdict = generate_verdict(&claim("A well-covered claim."), &agg);
        assert_eq!(verdict.citations.len(), 3);
        assert_eq!(verdict.citations[0].source, "cdc.gov");
        assert_eq!(verdict.citations[1].source, "bbc.com");
        assert_eq!(verdict.citations[2].source, "cnn.com");
    }

    #[test]
    fn test_warning_for_limited_diversity() {
        let agg = aggregate_evidence(vec![
            evidence("samesite.com", Stance::Supports, 0.85),
            evidence("samesite.com", Stance::Supports, 0.85),
            evidence("samesite.com", Stance::Supports, 0.85),
        ]);
        let verdict = generate_verdict(&claim("Echo chamber claim."), &agg);
        assert!(verdict
            .warnings
            .iter()
            .any(|w| w.contains("source diversity")));
    }

    #[test]
    fn test_warnings_for_low_quality_and_stale_sources() {
        let mut stale_a = evidence("weak-a.xyz", Stance::Supports, 0.3);
        stale_a.published_date = Some(Utc::now() - Duration::days(800));
        let mut stale_b = evidence("weak-b.xyz", Stance::Supports, 0.3);
        stale_b.published_date = None;

        let agg = aggregate_evidence(vec![stale_a, stale_b]);
        let verdict = generate_verdict(&claim("A poorly sourced claim."), &agg);
        assert!(verdict.warnings.iter().any(|w| w.contains("high-authority")));
        assert!(verdict.warnings.iter().any(|w| w.contains("source quality")));
        assert!(verdict.warnings.iter().any(|w| w.contains("12 months")));
    }

    #[test]
    fn test_confidence_bounds_hold() {
        let agg = aggregate_evidence(vec![
            evidence("cdc.gov", Stance::Supports, 0.95),
            evidence("who.int", Stance::Supports, 0.95),
            evidence("nature.com", Stance::Supports, 0.95),
            evidence("reuters.com", Stance::Supports, 0.95),
            evidence("apnews.com", Stance::Supports, 0.95),
        ]);
        let verdict = generate_verdict(&claim("An overwhelmingly supported claim."), &agg);
        assert!(verdict.confidence >= 0.1 && verdict.confidence <= 0.9);
    }
}
