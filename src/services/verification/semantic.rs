// Semantic Pattern Match
// Ordered relation templates that extract a subject and optional entity
// from the claim and test whether the content entails the relation. An
// entailed relation on a linguistically negated claim flips to a
// contradiction.

use crate::models::Stance;
use regex::Regex;
use std::sync::OnceLock;

struct RelationTemplate {
    name: &'static str,
    /// Capture 1: subject. Capture 2 (optional): object/entity.
    pattern: Regex,
    /// At least one of these must appear in the content.
    indicators: &'static [&'static str],
    /// The generic identity template is weak; it only fires when the
    /// content carries no contradiction keywords of its own.
    requires_clean_content: bool,
}

const NEGATION_TOKENS: &[&str] = &["not", "never", "cannot", "nobody", "none"];

/// Contradiction keywords used for the clean-content requirement of the
/// generic identity template. Mirrors the contradict signal set.
const CONTRADICTION_KEYWORDS: &[&str] = &[
    "false", "debunked", "hoax", "myth", "no evidence", "incorrect", "untrue",
    "misleading", "disproven", "fabricated", "not true",
];

fn templates() -> &'static Vec<RelationTemplate> {
    static TEMPLATES: OnceLock<Vec<RelationTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        let t = |name, pattern: &str, indicators, requires_clean_content| RelationTemplate {
            name,
            pattern: Regex::new(pattern).unwrap(),
            indicators,
            requires_clean_content,
        };
        vec![
            t(
                "founder_ceo",
                r"^(.{2,60}?)\s+(?:founded|co-founded|established|is\s+the\s+(?:founder|co-founder|ceo|chief\s+executive)\s+of)\s+(.{2,80})",
                &["found", "establish", "ceo", "chief executive", "creat"][..],
                false,
            ),
            t(
                "authorship",
                r"^(.{2,60}?)\s+(?:wrote|authored|penned|is\s+the\s+author\s+of)\s+(.{2,80})",
                &["wrote", "author", "written", "penned"][..],
                false,
            ),
            t(
                "invention",
                r"^(.{2,60}?)\s+(?:invented|discovered|patented)\s+(.{2,80})",
                &["invent", "discover", "patent"][..],
                false,
            ),
            t(
                "ownership",
                r"^(.{2,60}?)\s+(?:owns|acquired|bought|purchased|is\s+owned\s+by)\s+(.{2,80})",
                &["own", "acquir", "bought", "purchas"][..],
                false,
            ),
            t(
                "awards",
                r"^(.{2,60}?)\s+(?:won|received|was\s+awarded)\s+(.{2,80})",
                &["won", "award", "prize", "received", "laureate"][..],
                false,
            ),
            t(
                "employment",
                r"^(.{2,60}?)\s+(?:works\s+(?:at|for)|worked\s+(?:at|for)|is\s+employed\s+by|joined)\s+(.{2,80})",
                &["works", "worked", "employ", "joined", "hired"][..],
                false,
            ),
            t(
                "relationship",
                r"^(.{2,60}?)\s+(?:is\s+married\s+to|married|is\s+dating|divorced)\s+(.{2,80})",
                &["marri", "dating", "divorce", "wife", "husband", "spouse"][..],
                false,
            ),
            t(
                "birth_death",
                r"^(.{2,60}?)\s+(?:was\s+born\s+(?:in|on)|died\s+(?:in|on)|passed\s+away\s+(?:in|on))\s+(.{2,80})",
                &["born", "birth", "died", "death", "passed away"][..],
                false,
            ),
            t(
                "location",
                r"^(.{2,60}?)\s+(?:is\s+located\s+in|is\s+situated\s+in|is\s+the\s+capital\s+of|is\s+in|lies\s+in)\s+(.{2,80})",
                &["located", "situated", "capital", "lies", "in"][..],
                false,
            ),
            t(
                "quantity",
                r"^(.{2,60}?)\s+(?:has|contains|comprises)\s+(\d.{0,60})",
                &["has", "contain", "comprise", "total"][..],
                false,
            ),
            t(
                "identity",
                r"^(.{2,60}?)\s+(?:is|are|was|were)\s+(?:a|an|the)?\s*(.{2,80})",
                &["is", "are", "was", "were"][..],
                true,
            ),
        ]
    })
}

/// Meaningful tokens (> 2 chars) with negation words removed, so a negated
/// claim can still be matched against entailing content.
fn key_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(|t| t.to_lowercase())
        .filter(|t| !NEGATION_TOKENS.contains(&t.as_str()))
        .collect()
}

/// True when the claim contains a linguistic negation.
pub fn is_negated(claim: &str) -> bool {
    let lower = claim.to_lowercase();
    if lower.contains("n't") || lower.contains("no longer") {
        return true;
    }
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|t| NEGATION_TOKENS.contains(&t))
}

fn content_entails(subject: &str, object: Option<&str>, indicators: &[&str], content: &str) -> bool {
    let subject_tokens = key_tokens(subject);
    if subject_tokens.is_empty() {
        return false;
    }
    if !subject_tokens.iter().all(|t| content.contains(t.as_str())) {
        return false;
    }

    if !indicators.iter().any(|ind| content.contains(ind)) {
        return false;
    }

    if let Some(object) = object {
        let object_tokens = key_tokens(object);
        if !object_tokens.iter().all(|t| content.contains(t.as_str())) {
            return false;
        }
    }

    true
}

/// Try each relation template against the claim in order. Both claim and
/// content are expected lower-cased by the caller.
pub fn match_semantic(claim: &str, content: &str) -> Option<(&'static str, Stance)> {
    for template in templates() {
        let Some(caps) = template.pattern.captures(claim) else {
            continue;
        };
        let subject = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let object = caps.get(2).map(|m| m.as_str());

        if !content_entails(subject, object, template.indicators, content) {
            continue;
        }

        if template.requires_clean_content
            && CONTRADICTION_KEYWORDS.iter().any(|k| content.contains(k))
        {
            // Content both entails and disputes; let the keyword signal
            // scoring stage sort it out.
            return None;
        }

        let stance = if is_negated(claim) {
            Stance::Contradicts
        } else {
            Stance::Supports
        };
        return Some((template.name, stance));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founder_template_supports() {
        let claim = "elon musk founded spacex in 2002.";
        let content = "spacex was founded in 2002 by elon musk to reduce launch costs.";
        let (name, stance) = match_semantic(claim, content).unwrap();
        assert_eq!(name, "founder_ceo");
        assert_eq!(stance, Stance::Supports);
    }

    #[test]
    fn test_negated_claim_flips_to_contradicts() {
        let claim = "elon musk never founded spacex.";
        let content = "spacex was founded in 2002 by elon musk to reduce launch costs.";
        let (_, stance) = match_semantic(claim, content).unwrap();
        assert_eq!(stance, Stance::Contradicts);
    }

    #[test]
    fn test_location_template() {
        let claim = "the eiffel tower is located in paris.";
        let content = "the eiffel tower, located in paris, attracts millions of visitors.";
        let (name, stance) = match_semantic(claim, content).unwrap();
        assert_eq!(name, "location");
        assert_eq!(stance, Stance::Supports);
    }

    #[test]
    fn test_identity_template_requires_clean_content() {
        let claim = "the earth is flat.";
        let content = "the idea that the earth is flat was debunked centuries ago; it is false.";
        // Entailing tokens are present but so are contradiction keywords, so
        // the weak identity template must abstain.
        assert!(match_semantic(claim, content).is_none());
    }

    #[test]
    fn test_no_match_when_subject_missing_from_content() {
        let claim = "marie curie discovered radium.";
        let content = "the laboratory published several papers on chemistry that year.";
        assert!(match_semantic(claim, content).is_none());
    }

    #[test]
    fn test_is_negated() {
        assert!(is_negated("The tower is not in London."));
        assert!(is_negated("He never won the award."));
        assert!(is_negated("It isn't true."));
        assert!(!is_negated("The tower is in Paris."));
    }
}
