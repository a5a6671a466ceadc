// Numeric Contradiction Check
// Extracts (value, context) pairs from claim and content and flags
// same-context values that disagree. Numeric facts are unambiguous, so
// this check outranks every keyword heuristic.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericContext {
    Age,
    Year,
    Height,
    Percentage,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericMention {
    pub value: f64,
    pub context: NumericContext,
}

/// Values in the same context may differ by at most this much before the
/// pair counts as a contradiction.
const TOLERANCE: f64 = 1.0;

struct ContextPattern {
    context: NumericContext,
    re: Regex,
}

fn patterns() -> &'static Vec<ContextPattern> {
    static PATTERNS: OnceLock<Vec<ContextPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let build = |context, pattern: &str| ContextPattern {
            context,
            re: Regex::new(pattern).unwrap(),
        };
        vec![
            build(
                NumericContext::Age,
                r"(\d{1,3})[\s-]*(?:years?[\s-]*old|years?\s+of\s+age)\b",
            ),
            build(NumericContext::Age, r"\b(?:is|was|turned|aged?)\s+(\d{1,3})\b"),
            build(NumericContext::Year, r"\b(1[6-9]\d{2}|20\d{2})\b"),
            build(
                NumericContext::Height,
                r"(\d+(?:\.\d+)?)\s*(?:cm\b|centimet\w+|met(?:er|re)s?\s+(?:tall|high)|m\s+tall|feet\b|ft\b|inch(?:es)?\b)",
            ),
            build(NumericContext::Percentage, r"(\d+(?:\.\d+)?)\s*(?:%|percent\b)"),
            build(
                NumericContext::Amount,
                r"(\d+(?:\.\d+)?)\s*(?:million|billion|trillion|thousand)\b",
            ),
        ]
    })
}

/// Extract all numeric mentions with a recognizable context. A number can
/// legitimately appear under more than one context (e.g. "is 2020" reads
/// both as a year and an age pattern); the year range filter below keeps
/// the age channel from flooding with years.
pub fn extract_numeric_mentions(text: &str) -> Vec<NumericMention> {
    let mut mentions = Vec::new();

    for cp in patterns() {
        for caps in cp.re.captures_iter(text) {
            let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
                continue;
            };

            // Plausibility filter for the loose age pattern.
            if cp.context == NumericContext::Age && !(1.0..=125.0).contains(&value) {
                continue;
            }

            mentions.push(NumericMention {
                value,
                context: cp.context,
            });
        }
    }

    mentions
}

/// True when any claim number and any content number share a context and
/// differ by more than the tolerance.
pub fn has_numeric_contradiction(claim: &str, content: &str) -> bool {
    let claim_mentions = extract_numeric_mentions(claim);
    if claim_mentions.is_empty() {
        return false;
    }
    let content_mentions = extract_numeric_mentions(content);

    for cm in &claim_mentions {
        for sm in &content_mentions {
            if cm.context == sm.context && (cm.value - sm.value).abs() > TOLERANCE {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_mismatch_detected() {
        // Explicit "years old" on one side, bare "is N" on the other.
        assert!(has_numeric_contradiction(
            "trump is 30 years old.",
            "donald trump is 78 and was born in 1946."
        ));
    }

    #[test]
    fn test_matching_age_within_tolerance() {
        assert!(!has_numeric_contradiction(
            "she is 45 years old.",
            "the minister, aged 45, spoke on friday."
        ));
    }

    #[test]
    fn test_year_mismatch_detected() {
        assert!(has_numeric_contradiction(
            "the eiffel tower was completed in 1899.",
            "the tower was completed in 1889 for the world's fair."
        ));
    }

    #[test]
    fn test_percentage_mismatch_detected() {
        assert!(has_numeric_contradiction(
            "unemployment is at 20 percent.",
            "the rate fell to 4.1% last quarter."
        ));
    }

    #[test]
    fn test_different_contexts_do_not_conflict() {
        // A year on one side and a percentage on the other never collide.
        assert!(!has_numeric_contradiction(
            "the company was founded in 1998.",
            "revenue grew 35 percent."
        ));
    }

    #[test]
    fn test_no_numbers_in_claim() {
        assert!(!has_numeric_contradiction(
            "water is a liquid at room temperature.",
            "in 1900 scientists measured 40 percent humidity."
        ));
    }
}
