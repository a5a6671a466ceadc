// Stance Detector
// Decides SUPPORTS / CONTRADICTS / INCONCLUSIVE for one (claim, content)
// pair via an ordered cascade: relevance gate, numeric contradiction,
// semantic pattern match, keyword signal scoring. Each step short-circuits
// on a definitive result.

use crate::models::Stance;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

use super::{numeric, semantic};

/// Content sharing fewer than this fraction of claim keywords cannot
/// support or contradict the claim.
const RELEVANCE_THRESHOLD: f64 = 0.2;

const STOP_WORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "from", "for", "was", "were", "are",
    "has", "have", "had", "his", "her", "its", "their", "who", "which", "what",
    "when", "where", "been", "being", "will", "would", "could", "should", "not",
    "about", "into", "over", "under", "after", "before", "than", "then", "them",
    "they", "there", "these", "those", "but", "can", "all", "any", "our", "out",
    "also", "more", "most", "some", "such", "only", "other", "very",
];

const SUPPORT_PATTERNS: &[&str] = &[
    r"\bconfirmed\b",
    r"\bverified\b",
    r"\bis\s+true\b",
    r"\baccurate\b",
    r"\bcorrect\b",
    r"evidence\s+(?:shows|suggests|supports)",
    r"studies\s+(?:show|confirm|indicate)",
    r"research\s+(?:shows|confirms|indicates)",
    r"\bproven\b",
    r"\bfactual\b",
    r"experts\s+agree",
    r"\bvalidated\b",
    r"\bsubstantiated\b",
];

const CONTRADICT_PATTERNS: &[&str] = &[
    r"\bfalse\b",
    r"\bdebunked\b",
    r"\bhoax\b",
    r"\bmyth\b",
    r"no\s+evidence",
    r"\bincorrect\b",
    r"\bmisleading\b",
    r"\buntrue\b",
    r"\bfabricated\b",
    r"\bdisproven\b",
    r"\bbaseless\b",
    r"not\s+true",
    r"\bconspiracy\s+theory\b",
    r"\bunfounded\b",
];

fn support_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| SUPPORT_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect())
}

fn contradict_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| CONTRADICT_PATTERNS.iter().map(|p| Regex::new(p).unwrap()).collect())
}

fn explicit_verdict_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:rating|verdict|ruling|rated|ruled)\s*[:\-]?\s*(?:mostly\s+|partly\s+|half\s+)?(true|correct|accurate|false|fake|incorrect|pants\s+on\s+fire)",
        )
        .unwrap()
    })
}

/// Claim keywords: lower-cased tokens longer than 2 chars, stop words
/// removed.
fn claim_keywords(claim: &str) -> Vec<String> {
    claim
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(|t| t.to_lowercase())
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

/// Fraction of claim keywords present in the content.
pub fn relevance_score(claim: &str, content: &str) -> f64 {
    let keywords = claim_keywords(claim);
    if keywords.is_empty() {
        return 0.0;
    }
    let present = keywords.iter().filter(|k| content.contains(k.as_str())).count();
    present as f64 / keywords.len() as f64
}

/// Explicit fact-checker verdict phrasing ("rating: false") outranks raw
/// keyword counts; check it before using the signal difference.
fn explicit_verdict(content: &str) -> Option<Stance> {
    let caps = explicit_verdict_re().captures(content)?;
    let word = caps.get(1)?.as_str();
    match word {
        "true" | "correct" | "accurate" => Some(Stance::Supports),
        _ => Some(Stance::Contradicts),
    }
}

fn keyword_signal(content: &str) -> Stance {
    if let Some(stance) = explicit_verdict(content) {
        return stance;
    }

    let support_count = support_res().iter().filter(|re| re.is_match(content)).count() as i64;
    let contradict_count = contradict_res().iter().filter(|re| re.is_match(content)).count() as i64;
    let difference = support_count - contradict_count;

    if difference >= 2 {
        Stance::Supports
    } else if difference <= -2 {
        Stance::Contradicts
    } else if support_count > 0 && contradict_count == 0 {
        Stance::Supports
    } else if contradict_count > 0 && support_count == 0 {
        Stance::Contradicts
    } else {
        // Conservative default under ambiguity.
        Stance::Inconclusive
    }
}

/// Detect the stance of one piece of source content toward a claim.
/// Expects the caller to prefer full raw content over a short snippet when
/// available. Pure and deterministic.
pub fn detect_stance(claim: &str, content: &str) -> Stance {
    let claim = claim.to_lowercase();
    let content = content.to_lowercase();

    let relevance = relevance_score(&claim, &content);
    if relevance < RELEVANCE_THRESHOLD {
        return Stance::Inconclusive;
    }

    if numeric::has_numeric_contradiction(&claim, &content) {
        debug!("[stance] numeric contradiction");
        return Stance::Contradicts;
    }

    if let Some((template, stance)) = semantic::match_semantic(&claim, &content) {
        debug!("[stance] semantic template {} -> {:?}", template, stance);
        return stance;
    }

    keyword_signal(&content)
}
