// Verdict Cache Service
// File-backed cache of prior verdicts keyed by normalized claim text.
// Entries expire after 24 hours; the store is capped at 100 entries,
// newest first, deduplicated by normalized key.

use crate::models::Verdict;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const MAX_ENTRIES: usize = 100;
const TTL_HOURS: i64 = 24;

/// Case-folded, punctuation-stripped, whitespace-collapsed cache key.
pub fn normalize_claim(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub normalized_claim: String,
    pub verdict: Verdict,
    pub queries: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CacheFile {
    #[serde(default)]
    entries: Vec<CacheEntry>,
}

pub struct VerdictCache {
    cache_dir: PathBuf,
    cache_file: PathBuf,
}

impl VerdictCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        let cache_file = cache_dir.join("verdict_cache.json");
        Self { cache_dir, cache_file }
    }

    /// Get default cache directory
    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("claimlens"))
    }

    /// Ensure cache directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| format!("Failed to create cache dir: {}", e))
    }

    fn load(&self) -> Result<CacheFile, String> {
        if !self.cache_file.exists() {
            return Ok(CacheFile::default());
        }

        let content = fs::read_to_string(&self.cache_file)
            .map_err(|e| format!("Failed to read cache: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse cache: {}", e))
    }

    fn save(&self, cache: &CacheFile) -> Result<(), String> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(cache)
            .map_err(|e| format!("Failed to serialize cache: {}", e))?;

        fs::write(&self.cache_file, content).map_err(|e| format!("Failed to write cache: {}", e))
    }

    /// Look up a fresh cached entry for a claim. Expired entries are
    /// ignored but left on disk until the next store pass.
    pub fn lookup(&self, claim_text: &str) -> Result<Option<CacheEntry>, String> {
        let key = normalize_claim(claim_text);
        let cache = self.load()?;
        let cutoff = Utc::now() - Duration::hours(TTL_HOURS);

        Ok(cache
            .entries
            .into_iter()
            .find(|e| e.normalized_claim == key && e.timestamp > cutoff))
    }

    /// Store a verdict, replacing any prior entry for the same normalized
    /// claim. Expired entries are dropped and the store is capped, newest
    /// first.
    pub fn store(&self, claim_text: &str, verdict: &Verdict, queries: &[String]) -> Result<(), String> {
        let key = normalize_claim(claim_text);
        let mut cache = self.load()?;
        let cutoff = Utc::now() - Duration::hours(TTL_HOURS);

        cache
            .entries
            .retain(|e| e.normalized_claim != key && e.timestamp > cutoff);
        cache.entries.insert(
            0,
            CacheEntry {
                normalized_claim: key,
                verdict: verdict.clone(),
                queries: queries.to_vec(),
                timestamp: Utc::now(),
            },
        );
        cache.entries.truncate(MAX_ENTRIES);

        self.save(&cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerdictLabel;
    use uuid::Uuid;

    fn temp_cache() -> VerdictCache {
        let dir = std::env::temp_dir().join(format!("claimlens-test-{}", Uuid::new_v4()));
        VerdictCache::new(dir)
    }

    fn sample_verdict() -> Verdict {
        Verdict {
            claim_id: Uuid::new_v4(),
            verdict: VerdictLabel::Supported,
            confidence: 0.85,
            explanation: "well supported".to_string(),
            citations: vec![],
            warnings: vec![],
            confidence_explanation: None,
        }
    }

    #[test]
    fn test_normalize_claim() {
        assert_eq!(
            normalize_claim("  The Earth,  is ROUND!  "),
            "the earth is round"
        );
        assert_eq!(normalize_claim("Water boils at 100C."), "water boils at 100c");
    }

    #[test]
    fn test_store_and_lookup() {
        let cache = temp_cache();
        let verdict = sample_verdict();
        let queries = vec!["the earth is round".to_string()];

        cache.store("The Earth is round.", &verdict, &queries).unwrap();

        let hit = cache.lookup("the earth is ROUND").unwrap().unwrap();
        assert_eq!(hit.verdict.verdict, VerdictLabel::Supported);
        assert_eq!(hit.queries, queries);
    }

    #[test]
    fn test_miss_for_unknown_claim() {
        let cache = temp_cache();
        assert!(cache.lookup("never stored").unwrap().is_none());
    }

    #[test]
    fn test_store_deduplicates_by_normalized_key() {
        let cache = temp_cache();
        let verdict = sample_verdict();

        cache.store("Cats are mammals.", &verdict, &[]).unwrap();
        let mut updated = sample_verdict();
        updated.verdict = VerdictLabel::Misleading;
        cache.store("cats are MAMMALS!", &updated, &[]).unwrap();

        let hit = cache.lookup("cats are mammals").unwrap().unwrap();
        assert_eq!(hit.verdict.verdict, VerdictLabel::Misleading);
    }

    #[test]
    fn test_cap_keeps_newest_entries() {
        let cache = temp_cache();
        let verdict = sample_verdict();

        for i in 0..(MAX_ENTRIES + 5) {
            cache
                .store(&format!("distinct claim number {}", i), &verdict, &[])
                .unwrap();
        }

        // Oldest entries fell off; the newest survive.
        assert!(cache.lookup("distinct claim number 0").unwrap().is_none());
        assert!(cache
            .lookup(&format!("distinct claim number {}", MAX_ENTRIES + 4))
            .unwrap()
            .is_some());
    }
}
