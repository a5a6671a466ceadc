// Claim Segmentation Service
// Splits raw text into sentences and compound sentences into atomic claims

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Sentences longer than this are candidates for clause splitting.
const CLAUSE_SPLIT_MIN_CHARS: usize = 80;

/// Fragments shorter than this are never kept as standalone claims.
const MIN_CLAIM_CHARS: usize = 20;

/// Abbreviation tails whose trailing period must not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "gen.", "rep.",
    "sen.", "gov.", "e.g.", "i.e.", "etc.", "vs.", "approx.", "dept.", "est.",
    "fig.", "inc.", "ltd.", "vol.", "u.s.", "u.k.",
];

fn conjunction_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r";\s+|,\s+(?:and|but|or|yet|so)\s+").unwrap())
}

fn subject_verb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:is|are|was|were|has|have|had|does|do|did|can|could|will|would|became|becomes|remains?|contains?|consists?|includes?|\w{3,}(?:ed|es))\b",
        )
        .unwrap()
    })
}

fn rhetorical_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"(?i)^(?:why|how|what|who|where|when)\b.*\?\s*$",
            r"(?i)^(?:isn't|aren't|don't|doesn't|wouldn't|couldn't|shouldn't)\s+(?:it|that|you|we|they)\b",
            r"(?i)^who\s+knows\b",
            r"(?i)^(?:can|could)\s+you\s+(?:believe|imagine)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// Check whether the text ending at `chars[idx]` (a '.') ends a known
/// abbreviation rather than a sentence. The abbreviation must start a
/// word: a suffix match alone would also swallow ordinary words like
/// "oxygen." or "first.".
fn ends_abbreviation(chars: &[char], idx: usize) -> bool {
    let start = idx.saturating_sub(8);
    let tail: String = chars[start..=idx].iter().collect::<String>().to_lowercase();
    ABBREVIATIONS.iter().any(|abbr| {
        if !tail.ends_with(abbr) {
            return false;
        }
        match idx.checked_sub(abbr.chars().count()) {
            // Abbreviation starts at the beginning of the text.
            None => true,
            Some(before) => !chars[before].is_alphabetic(),
        }
    })
}

/// Split text into sentences on terminal punctuation, protecting
/// abbreviation periods and decimal points from false splits.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        let mut is_sentence_end = false;
        if matches!(ch, '.' | '!' | '?') {
            // Decimal number: 3.14
            if ch == '.'
                && i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit()
            {
                i += 1;
                continue;
            }

            if ch == '.' && ends_abbreviation(&chars, i) {
                i += 1;
                continue;
            }

            // Single-letter initials: "J. Smith", "U.S."
            if ch == '.'
                && i >= 1
                && chars[i - 1].is_ascii_uppercase()
                && (i < 2 || !chars[i - 2].is_alphabetic())
            {
                i += 1;
                continue;
            }

            // Ellipsis: wait for the last dot.
            if ch == '.' && i + 1 < chars.len() && chars[i + 1] == '.' {
                i += 1;
                continue;
            }

            is_sentence_end = true;
        } else if ch == '\n' {
            is_sentence_end = !buffer.trim().is_empty();
        }

        if is_sentence_end {
            // Absorb closing quotes and trailing whitespace.
            while i + 1 < chars.len() && matches!(chars[i + 1], '"' | '\'' | ')' | ' ' | '\t') {
                i += 1;
                buffer.push(chars[i]);
            }

            let sentence = buffer.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            buffer.clear();
        }

        i += 1;
    }

    let remaining = buffer.trim().to_string();
    if !remaining.is_empty() {
        sentences.push(remaining);
    }

    sentences
}

/// Minimal subject+verb shape check. A fragment without it is not an
/// independent clause and must not become a claim on its own.
pub fn has_subject_verb(fragment: &str) -> bool {
    let token_count = fragment.split_whitespace().count();
    token_count >= 3 && subject_verb_re().is_match(fragment)
}

/// Only rhetorical questions are dropped here; a genuine question is kept
/// and left to the classifier.
fn is_rhetorical_question(sentence: &str) -> bool {
    let trimmed = sentence.trim();
    rhetorical_res().iter().any(|re| re.is_match(trimmed))
}

/// Split a compound sentence into independent clauses. The split is only
/// committed if every resulting fragment still reads as a standalone claim;
/// otherwise the original sentence is kept whole.
pub fn split_compound_sentence(sentence: &str) -> Vec<String> {
    if sentence.chars().count() <= CLAUSE_SPLIT_MIN_CHARS {
        return vec![sentence.to_string()];
    }

    let fragments: Vec<String> = conjunction_split_re()
        .split(sentence)
        .map(|f| f.trim().trim_end_matches(',').to_string())
        .filter(|f| !f.is_empty())
        .collect();

    if fragments.len() < 2 {
        return vec![sentence.to_string()];
    }

    let all_valid = fragments
        .iter()
        .all(|f| f.chars().count() >= MIN_CLAIM_CHARS && has_subject_verb(f));

    if all_valid {
        fragments
    } else {
        vec![sentence.to_string()]
    }
}

/// Extract atomic claim texts from raw input. Fragments that are too short,
/// lack subject+verb structure, or read as rhetorical questions are dropped.
pub fn extract_claims(text: &str) -> Vec<String> {
    let mut claims = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for sentence in split_sentences(text) {
        if is_rhetorical_question(&sentence) {
            continue;
        }

        for fragment in split_compound_sentence(&sentence) {
            if fragment.chars().count() < MIN_CLAIM_CHARS {
                continue;
            }
            if !has_subject_verb(&fragment) {
                continue;
            }
            if is_rhetorical_question(&fragment) {
                continue;
            }
            let key = fragment.to_lowercase();
            if seen.insert(key) {
                claims.push(fragment);
            }
        }
    }

    claims
}
