// Evidence Aggregation
// Partitions scored evidence by stance, computes the authority-weighted
// consensus score, and ranks each partition for presentation.

use crate::models::{AggregatedEvidence, Evidence, Stance};
use tracing::info;

/// Two authority scores within this distance are considered equal when
/// ranking, letting recency break the tie.
const AUTHORITY_TIE_BAND: f64 = 0.1;

/// Sort evidence by authority descending; inside a tie band, fresher
/// publish dates come first and undated items last. Done in two passes
/// so each comparator is a total order: a single band-aware comparator
/// is intransitive when a chain of near ties spans more than the band.
pub fn rank_evidence(evidence: &mut [Evidence]) {
    evidence.sort_by(|a, b| {
        b.authority
            .partial_cmp(&a.authority)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Reorder each run of items within the band of its highest authority
    // by recency; the stable sort keeps authority order among equal dates.
    let mut start = 0;
    while start < evidence.len() {
        let head = evidence[start].authority;
        let mut end = start + 1;
        while end < evidence.len() && head - evidence[end].authority <= AUTHORITY_TIE_BAND {
            end += 1;
        }
        evidence[start..end].sort_by(|a, b| match (&a.published_date, &b.published_date) {
            (Some(da), Some(db)) => db.cmp(da),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        start = end;
    }
}

/// Combine all evidence for one claim into an aggregate. Consensus is the
/// authority-weighted balance of supporting vs contradicting sources,
/// normalized to [-1, 1]; inconclusive sources carry no weight.
pub fn aggregate_evidence(evidence: Vec<Evidence>) -> AggregatedEvidence {
    let total_sources = evidence.len();

    let mut supporting = Vec::new();
    let mut contradicting = Vec::new();
    let mut inconclusive = Vec::new();
    for item in evidence {
        match item.stance {
            Stance::Supports => supporting.push(item),
            Stance::Contradicts => contradicting.push(item),
            Stance::Inconclusive => inconclusive.push(item),
        }
    }

    let support_weight: f64 = supporting.iter().map(|e| e.authority).sum();
    let contradict_weight: f64 = contradicting.iter().map(|e| e.authority).sum();
    let total_weight = support_weight + contradict_weight;
    let consensus_score = if total_weight > 0.0 {
        (support_weight - contradict_weight) / total_weight
    } else {
        0.0
    };

    rank_evidence(&mut supporting);
    rank_evidence(&mut contradicting);
    rank_evidence(&mut inconclusive);

    info!(
        "[aggregation] {} sources: {} supporting, {} contradicting, {} inconclusive, consensus {:.2}",
        total_sources,
        supporting.len(),
        contradicting.len(),
        inconclusive.len(),
        consensus_score
    );

    AggregatedEvidence {
        supporting,
        contradicting,
        inconclusive,
        consensus_score,
        total_sources,
    }
}
