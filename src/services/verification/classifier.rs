// Claim Classifier
// Ordered, first-match-wins rule cascade over lower-cased claim text.
// Rules are a flat tagged list so they can be reordered or tested
// independently, and later swapped for a learned model behind classify().

use crate::models::ClaimType;
use regex::Regex;
use std::sync::OnceLock;

/// One tagged rule in the cascade. `unless` is an override guard: when it
/// fires, the rule is skipped and evaluation continues down the list.
pub struct ClassificationRule {
    pub name: &'static str,
    pub outcome: ClaimType,
    patterns: Vec<Regex>,
    unless: Option<fn(&str) -> bool>,
}

impl ClassificationRule {
    fn matches(&self, text: &str) -> bool {
        if !self.patterns.iter().any(|re| re.is_match(text)) {
            return false;
        }
        match self.unless {
            Some(guard) => !guard(text),
            None => true,
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

const OPINION_PATTERNS: &[&str] = &[
    r"\bi\s+(?:think|believe|feel|guess|suspect|prefer)\b",
    r"\bwe\s+(?:think|believe|feel)\b",
    r"\bin\s+my\s+(?:opinion|view|experience)\b",
    r"\b(?:best|worst|greatest|finest|most\s+(?:beautiful|amazing|important))\b",
    r"\b(?:amazing|terrible|awful|wonderful|horrible|fantastic|disgusting|overrated|underrated)\b",
    r"\b(?:should|must|ought\s+to|deserves?\s+to)\b",
];

const PREDICTION_PATTERNS: &[&str] = &[
    r"\bwill\s+(?:be|have|become|reach|rise|fall|grow|happen|win|lose)\b",
    r"\b(?:is|are)\s+going\s+to\b",
    r"\b(?:predicts?|forecasts?|expects?|anticipates?|projected\s+to|likely\s+to|expected\s+to)\b",
    r"\b(?:next\s+(?:year|month|decade)|by\s+20\d{2}|in\s+the\s+(?:future|coming\s+years)|tomorrow|soon)\b",
];

const BARE_PRONOUN_PATTERNS: &[&str] = &[r"^(?:it|this|that|they|he|she)\b"];

const AMBIGUOUS_PATTERNS: &[&str] = &[
    r"\b(?:some\s+people|many\s+people|a\s+few|several\s+\w+\s+say|things|stuff|somehow|somewhat)\b",
    r"^(?:and|but|or|because|so|which|although)\b",
];

const FACTUAL_PATTERNS: &[&str] = &[
    r"\b(?:is|are|was|were|has|have|had|contains?|consists?|measures?|weighs?|equals?)\b",
    r"\b(?:1[6-9]\d{2}|20\d{2})\b",
    r"\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\b",
    r"\b(?:located\s+in|founded|established|invented|discovered|born\s+in|died\s+in|capital\s+of)\b",
    r"\d+(?:\.\d+)?\s*(?:percent|%|million|billion|trillion|km|kilometers|miles|meters|feet|degrees|years)\b",
    r"\b(?:according\s+to|research\s+shows|studies\s+show|data\s+shows|scientists\s+say)\b",
];

/// True when the text carries a factual indicator strong enough to override
/// an ambiguity signal (date, statistic, state-of-being verb, citation).
pub fn has_factual_indicator(text: &str) -> bool {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| compile(FACTUAL_PATTERNS))
        .iter()
        .any(|re| re.is_match(text))
}

/// A leading pronoun with a copula right after it still reads like a
/// checkable assertion ("It is the tallest building"), not an ambiguity.
fn has_nearby_copula(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:it|this|that|they|he|she)\s+(?:is|are|was|were|has|have|had)\b").unwrap()
    })
    .is_match(text)
}

fn bare_pronoun_guard(text: &str) -> bool {
    has_nearby_copula(text) || has_factual_indicator(text)
}

fn rules() -> &'static Vec<ClassificationRule> {
    static RULES: OnceLock<Vec<ClassificationRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            ClassificationRule {
                name: "opinion_markers",
                outcome: ClaimType::Opinion,
                patterns: compile(OPINION_PATTERNS),
                unless: None,
            },
            ClassificationRule {
                name: "prediction_markers",
                outcome: ClaimType::Prediction,
                patterns: compile(PREDICTION_PATTERNS),
                unless: None,
            },
            ClassificationRule {
                name: "bare_pronoun",
                outcome: ClaimType::Ambiguous,
                patterns: compile(BARE_PRONOUN_PATTERNS),
                unless: Some(bare_pronoun_guard),
            },
            ClassificationRule {
                name: "ambiguity_markers",
                outcome: ClaimType::Ambiguous,
                patterns: compile(AMBIGUOUS_PATTERNS),
                unless: Some(has_factual_indicator),
            },
            ClassificationRule {
                name: "factual_indicators",
                outcome: ClaimType::Factual,
                patterns: compile(FACTUAL_PATTERNS),
                unless: None,
            },
        ]
    })
}

fn imperative_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:do|don't|go|make|take|consider|remember|note|look|stop|please|let's)\b")
            .unwrap()
    })
}

/// Classify one atomic claim. Pure function of the text: same input always
/// yields the same output.
pub fn classify(text: &str) -> ClaimType {
    let lower = text.trim().to_lowercase();

    for rule in rules() {
        if rule.matches(&lower) {
            return rule.outcome;
        }
    }

    // Fallback: declarative sentences default to factual, everything else
    // stays ambiguous.
    if lower.ends_with('?') || imperative_re().is_match(&lower) {
        ClaimType::Ambiguous
    } else {
        ClaimType::Factual
    }
}

/// Name of the first matching rule, for diagnostics.
pub fn matched_rule(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    rules().iter().find(|r| r.matches(&lower)).map(|r| r.name)
}
