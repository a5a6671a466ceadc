// Search Query Synthesizer
// Produces up to 3 query variants per claim (neutral, fact-check-framed,
// negated) to reduce confirmation bias in retrieved evidence.

use regex::Regex;
use std::sync::OnceLock;

const MAX_QUERIES: usize = 3;

fn negatable_verb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(is|are|was|were|has|have|had|does|do|did|can|could|will|would)\b").unwrap()
    })
}

/// Insert a negation adjacent to the first copula or auxiliary verb.
/// Returns None when the claim has no negatable verb.
pub fn negate_claim(claim: &str) -> Option<String> {
    let m = negatable_verb_re().find(claim)?;
    let mut negated = String::with_capacity(claim.len() + 4);
    negated.push_str(&claim[..m.end()]);
    negated.push_str(" not");
    negated.push_str(&claim[m.end()..]);
    Some(negated)
}

/// Build the search query variants for one neutralized claim.
pub fn build_queries(claim: &str) -> Vec<String> {
    let claim = claim.trim();
    if claim.is_empty() {
        return vec![];
    }

    let mut queries = vec![
        claim.to_string(),
        format!("fact check: {}", claim),
    ];

    match negate_claim(claim) {
        Some(negated) => queries.push(negated),
        None => queries.push(format!("debunked: {}", claim)),
    }

    queries.truncate(MAX_QUERIES);
    queries
}
