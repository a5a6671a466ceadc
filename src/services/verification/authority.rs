// Source Authority Scorer
// Maps a source URL to a credibility weight in [0, 1] via tiered domain
// lists. First matching tier wins, so list order encodes priority.

use reqwest::Url;

/// Known low-authority sources: social media, UGC platforms, forums,
/// tabloids, content farms. Checked before the credibility tiers.
const LOW_AUTHORITY_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "youtube.com",
    "reddit.com",
    "quora.com",
    "medium.com",
    "blogspot.",
    "wordpress.",
    "tumblr.com",
    "pinterest.com",
    "4chan.org",
    "dailymail.co.uk",
    "thesun.co.uk",
    "nypost.com",
    "infowars.com",
    "breitbart.com",
    "naturalnews.com",
    "buzzfeed.com",
];

/// Credibility tiers in priority order. Government/academic/fact-checker and
/// wire services outrank major editorial news, which outrank established
/// news, which outrank general references.
const CREDIBILITY_TIERS: &[(&[&str], f64)] = &[
    (
        &[
            ".gov",
            ".edu",
            "who.int",
            "un.org",
            "nature.com",
            "science.org",
            "nejm.org",
            "thelancet.com",
            "snopes.com",
            "factcheck.org",
            "politifact.com",
            "fullfact.org",
            "apnews.com",
            "reuters.com",
            "afp.com",
        ],
        0.95,
    ),
    (
        &[
            "bbc.com",
            "bbc.co.uk",
            "nytimes.com",
            "washingtonpost.com",
            "wsj.com",
            "economist.com",
            "theguardian.com",
            "ft.com",
            "npr.org",
            "pbs.org",
        ],
        0.85,
    ),
    (
        &[
            "cnn.com",
            "nbcnews.com",
            "abcnews.go.com",
            "cbsnews.com",
            "time.com",
            "usatoday.com",
            "bloomberg.com",
            "forbes.com",
            "axios.com",
            "politico.com",
        ],
        0.75,
    ),
    (
        &[
            "wikipedia.org",
            "britannica.com",
            "merriam-webster.com",
            "dictionary.com",
            "history.com",
            "nationalgeographic.com",
        ],
        0.70,
    ),
];

const LOW_AUTHORITY_SCORE: f64 = 0.25;
const GENERIC_TLD_SCORE: f64 = 0.50;
const UNKNOWN_DOMAIN_SCORE: f64 = 0.40;
const MALFORMED_URL_SCORE: f64 = 0.30;

/// Extract the lower-cased hostname from a URL, if it parses.
pub fn hostname_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_lowercase())
}

/// Entries starting with '.' are TLD suffixes, entries ending with '.' are
/// platform prefixes that appear mid-hostname; everything else matches the
/// registered domain or any subdomain of it.
fn domain_matches(host: &str, entry: &str) -> bool {
    if entry.starts_with('.') {
        return host.ends_with(entry);
    }
    if entry.ends_with('.') {
        return host.contains(entry);
    }
    host == entry || host.ends_with(&format!(".{}", entry))
}

/// Score one source URL. Malformed URLs get a fixed below-average score
/// rather than an error; scoring must stay total.
pub fn score_url(url: &str) -> f64 {
    let Some(host) = hostname_of(url) else {
        return MALFORMED_URL_SCORE;
    };

    if LOW_AUTHORITY_DOMAINS.iter().any(|d| domain_matches(&host, d)) {
        return LOW_AUTHORITY_SCORE;
    }

    for (domains, score) in CREDIBILITY_TIERS {
        if domains.iter().any(|d| domain_matches(&host, d)) {
            return *score;
        }
    }

    if [".com", ".org", ".net", ".io"].iter().any(|tld| host.ends_with(tld)) {
        return GENERIC_TLD_SCORE;
    }

    UNKNOWN_DOMAIN_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_government_and_academic_top_tier() {
        assert_eq!(score_url("https://www.cdc.gov/flu/facts"), 0.95);
        assert_eq!(score_url("https://news.mit.edu/2024/story"), 0.95);
        assert_eq!(score_url("https://www.reuters.com/world/article"), 0.95);
    }

    #[test]
    fn test_fact_checkers_top_tier() {
        assert_eq!(score_url("https://www.snopes.com/fact-check/example"), 0.95);
        assert_eq!(score_url("https://www.politifact.com/article"), 0.95);
    }

    #[test]
    fn test_editorial_and_established_tiers() {
        assert_eq!(score_url("https://www.bbc.com/news/article"), 0.85);
        assert_eq!(score_url("https://edition.cnn.com/2024/article"), 0.75);
        assert_eq!(score_url("https://en.wikipedia.org/wiki/Topic"), 0.70);
    }

    #[test]
    fn test_deny_list_beats_tiers() {
        assert_eq!(score_url("https://www.reddit.com/r/science/post"), 0.25);
        assert_eq!(score_url("https://someblog.blogspot.com/2020/01/post"), 0.25);
    }

    #[test]
    fn test_generic_and_unknown_domains() {
        assert_eq!(score_url("https://randomsite.com/page"), 0.50);
        // "x.com" on the deny list must not swallow every *x.com domain.
        assert_eq!(score_url("https://www.netflix.com/title"), 0.50);
        assert_eq!(score_url("https://example.xyz/page"), 0.40);
    }

    #[test]
    fn test_malformed_url() {
        assert_eq!(score_url("not a url at all"), 0.30);
        assert_eq!(score_url(""), 0.30);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(score_url("https://WWW.BBC.COM/news"), 0.85);
    }
}
