// Claim Neutralizer
// Rewrites a claim into bias-neutral declarative form so search queries do
// not inherit the speaker's framing. Purely textual; classification is
// never altered here.

use regex::Regex;
use std::sync::OnceLock;

const LEADING_WRAPPERS: &[&str] = &[
    r"(?i)^it\s+is\s+(?:said|claimed|reported|believed|alleged|rumored)\s+that\s+",
    r"(?i)^it'?s\s+(?:obvious|clear|well\s+known|common\s+knowledge)\s+that\s+",
    r"(?i)^(?:everyone|everybody)\s+knows\s+that\s+",
    r"(?i)^some\s+people\s+(?:say|claim|believe|think)\s+(?:that\s+)?",
    r"(?i)^they\s+say\s+(?:that\s+)?",
    r"(?i)^according\s+to\s+[^,]+,\s*",
    r"(?i)^(?:reportedly|allegedly|supposedly|apparently),?\s+",
];

const TRAILING_WRAPPERS: &[&str] = &[
    r"(?i),?\s*according\s+to\s+[^.!?]+([.!?]?)$",
    r"(?i),?\s*(?:or\s+so\s+)?(?:they|people|some)\s+say([.!?]?)$",
];

fn leading_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| LEADING_WRAPPERS.iter().map(|p| Regex::new(p).unwrap()).collect())
}

fn trailing_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| TRAILING_WRAPPERS.iter().map(|p| Regex::new(p).unwrap()).collect())
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Strip attribution wrappers and normalize the claim into a plain
/// declarative sentence with terminal punctuation.
pub fn neutralize(text: &str) -> String {
    let mut result = text.trim().to_string();
    let mut stripped_prefix = false;

    // Repeat until stable: wrappers can nest ("They say it is claimed that...").
    loop {
        let before = result.len();
        for re in leading_res() {
            if let Some(m) = re.find(&result) {
                if m.start() == 0 {
                    result = result[m.end()..].trim_start().to_string();
                    stripped_prefix = true;
                }
            }
        }
        if result.len() == before {
            break;
        }
    }

    for re in trailing_res() {
        result = re.replace(&result, "$1").trim_end().to_string();
    }

    if stripped_prefix {
        result = capitalize_first(&result);
    }

    let ends_terminal = result
        .chars()
        .last()
        .map(|c| matches!(c, '.' | '!' | '?'))
        .unwrap_or(false);
    if !result.is_empty() && !ends_terminal {
        result.push('.');
    }

    result
}
