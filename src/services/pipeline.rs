// Verification Pipeline
// Orchestrates the full run: segment, classify, neutralize, search,
// score, aggregate, and verdict. Owns the throttle and cache so
// independent verifier instances never share state.

use crate::models::{
    Claim, ClaimType, Evidence, RunNotice, SearchResult, Verdict, VerdictLabel,
    VerificationReport,
};
use crate::services::rate_limiter::RateLimiter;
use crate::services::search::{SearchDepth, SearchError, SearchProvider};
use crate::services::segmenter;
use crate::services::verdict_cache::VerdictCache;
use crate::services::verification::{
    aggregate_evidence, authority, build_queries, classify, detect_stance, generate_verdict,
    neutralize,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

const RESULTS_PER_QUERY: usize = 5;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("search provider rejected the credentials")]
    ProviderAuth,
}

pub struct ClaimVerifier<S: SearchProvider> {
    provider: S,
    limiter: RateLimiter,
    cache: Option<VerdictCache>,
}

impl<S: SearchProvider> ClaimVerifier<S> {
    pub fn new(provider: S) -> Self {
        Self {
            provider,
            limiter: RateLimiter::default(),
            cache: VerdictCache::default_cache_dir().map(VerdictCache::new),
        }
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_cache(mut self, cache: Option<VerdictCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Verify free-form text. Claims of every type are returned for
    /// display; verdicts are produced only for factual claims.
    pub async fn verify(&self, text: &str) -> Result<VerificationReport, VerifyError> {
        let raw_claims = segmenter::extract_claims(text);
        if raw_claims.is_empty() {
            info!("[pipeline] no claims found in input");
            return Ok(VerificationReport {
                claims: vec![],
                verdicts: vec![],
                notice: Some(RunNotice::NoClaimsFound),
            });
        }

        let claims: Vec<Claim> = raw_claims
            .into_iter()
            .map(|original| {
                let classification = classify(&original);
                let text = if classification == ClaimType::Factual {
                    neutralize(&original)
                } else {
                    original.clone()
                };
                Claim {
                    id: Uuid::new_v4(),
                    text,
                    original_text: original,
                    classification,
                }
            })
            .collect();

        let factual: Vec<&Claim> = claims
            .iter()
            .filter(|c| c.classification == ClaimType::Factual)
            .collect();
        info!(
            "[pipeline] {} claims extracted, {} factual",
            claims.len(),
            factual.len()
        );

        if factual.is_empty() {
            return Ok(VerificationReport {
                claims,
                verdicts: vec![],
                notice: Some(RunNotice::NoFactualClaims),
            });
        }

        let mut verdicts = Vec::with_capacity(factual.len());
        let mut throttled = false;

        for (index, claim) in factual.iter().enumerate() {
            if throttled {
                verdicts.push(self.throttled_verdict(claim));
                continue;
            }

            if let Some(hit) = self.cache_lookup(claim) {
                info!("[pipeline] cache hit for claim {}", claim.id);
                verdicts.push(hit);
                continue;
            }

            let queries = build_queries(&claim.text);
            match self.gather_evidence(claim, &queries).await? {
                Some(evidence) => {
                    let aggregated = aggregate_evidence(evidence);
                    let verdict = generate_verdict(claim, &aggregated);
                    self.cache_store(claim, &verdict, &queries);
                    verdicts.push(verdict);
                }
                None => {
                    // Window exhausted before any search for this claim.
                    warn!(
                        "[pipeline] throttled at claim {} of {}",
                        index + 1,
                        factual.len()
                    );
                    throttled = true;
                    verdicts.push(self.throttled_verdict(claim));
                }
            }
        }

        Ok(VerificationReport {
            claims,
            verdicts,
            notice: None,
        })
    }

    /// Run the query variants for one claim, deduplicating results by URL.
    /// Returns None when the throttle blocked the claim before any search
    /// completed. Per-query provider failures are logged and skipped;
    /// credential rejection aborts the whole run.
    async fn gather_evidence(
        &self,
        claim: &Claim,
        queries: &[String],
    ) -> Result<Option<Vec<Evidence>>, VerifyError> {
        let mut seen_urls = std::collections::HashSet::new();
        let mut results: Vec<SearchResult> = Vec::new();
        let mut any_call_made = false;

        for query in queries {
            if !self.limiter.try_acquire() {
                if any_call_made {
                    break;
                }
                return Ok(None);
            }

            match self
                .provider
                .search(query, SearchDepth::Advanced, true, RESULTS_PER_QUERY)
                .await
            {
                Ok(batch) => {
                    any_call_made = true;
                    for result in batch {
                        if seen_urls.insert(result.url.clone()) {
                            results.push(result);
                        }
                    }
                }
                Err(SearchError::AuthFailed) | Err(SearchError::MissingApiKey) => {
                    return Err(VerifyError::ProviderAuth);
                }
                Err(e) => {
                    any_call_made = true;
                    warn!("[pipeline] search failed for query {:?}: {}", query, e);
                }
            }
        }

        let evidence = results
            .into_iter()
            .map(|result| {
                let content = result
                    .raw_content
                    .as_deref()
                    .filter(|raw| raw.len() > result.content.len())
                    .unwrap_or(&result.content)
                    .to_string();
                let stance = detect_stance(&claim.text, &content);
                let source = authority::hostname_of(&result.url)
                    .unwrap_or_else(|| result.url.clone());
                Evidence {
                    source,
                    url: result.url.clone(),
                    snippet: result.content,
                    raw_content: result.raw_content,
                    stance,
                    authority: authority::score_url(&result.url),
                    published_date: result.published_date,
                }
            })
            .collect();

        Ok(Some(evidence))
    }

    fn throttled_verdict(&self, claim: &Claim) -> Verdict {
        let wait = self.limiter.time_until_next_slot();
        Verdict {
            claim_id: claim.id,
            verdict: VerdictLabel::InsufficientEvidence,
            confidence: 0.1,
            explanation: format!(
                "Verification was rate limited before this claim could be searched. Retry in about {} seconds.",
                wait.as_secs().max(1)
            ),
            citations: vec![],
            warnings: vec!["Rate limit reached; no evidence was gathered.".to_string()],
            confidence_explanation: None,
        }
    }

    fn cache_lookup(&self, claim: &Claim) -> Option<Verdict> {
        let cache = self.cache.as_ref()?;
        match cache.lookup(&claim.text) {
            Ok(Some(entry)) => {
                let mut verdict = entry.verdict;
                verdict.claim_id = claim.id;
                Some(verdict)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("[pipeline] cache lookup failed: {}", e);
                None
            }
        }
    }

    fn cache_store(&self, claim: &Claim, verdict: &Verdict, queries: &[String]) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(&claim.text, verdict, queries) {
                warn!("[pipeline] cache store failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted provider: returns canned results for every query and
    /// records the queries it saw.
    struct MockProvider {
        results: Vec<SearchResult>,
        fail_queries_containing: Option<&'static str>,
        auth_fail: bool,
        queries_seen: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn with_results(results: Vec<SearchResult>) -> Self {
            Self {
                results,
                fail_queries_containing: None,
                auth_fail: false,
                queries_seen: Mutex::new(vec![]),
            }
        }
    }

    impl SearchProvider for MockProvider {
        async fn search(
            &self,
            query: &str,
            _depth: SearchDepth,
            _include_raw_content: bool,
            _max_results: usize,
        ) -> Result<Vec<SearchResult>, SearchError> {
            self.queries_seen.lock().unwrap().push(query.to_string());
            if self.auth_fail {
                return Err(SearchError::AuthFailed);
            }
            if let Some(marker) = self.fail_queries_containing {
                if query.contains(marker) {
                    return Err(SearchError::ApiError {
                        status: 500,
                        message: "boom".to_string(),
                    });
                }
            }
            Ok(self.results.clone())
        }
    }

    fn supporting_result(url: &str, content: &str) -> SearchResult {
        SearchResult {
            title: "title".to_string(),
            url: url.to_string(),
            content: content.to_string(),
            raw_content: None,
            published_date: Some(chrono::Utc::now()),
        }
    }

    fn verifier(provider: MockProvider) -> ClaimVerifier<MockProvider> {
        ClaimVerifier::new(provider).with_cache(None)
    }

    #[tokio::test]
    async fn test_empty_input_reports_no_claims() {
        let v = verifier(MockProvider::with_results(vec![]));
        let report = v.verify("   ").await.unwrap();
        assert!(report.claims.is_empty());
        assert!(report.verdicts.is_empty());
        assert_eq!(report.notice, Some(RunNotice::NoClaimsFound));
    }

    #[tokio::test]
    async fn test_opinion_only_input_skips_search() {
        let v = verifier(MockProvider::with_results(vec![]));
        let report = v
            .verify("I think pizza is the best food in the entire world.")
            .await
            .unwrap();

        assert_eq!(report.claims.len(), 1);
        assert_eq!(report.claims[0].classification, ClaimType::Opinion);
        assert!(report.verdicts.is_empty());
        assert_eq!(report.notice, Some(RunNotice::NoFactualClaims));
        assert!(v.provider.queries_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_factual_claim_gets_supported_verdict() {
        let content = "scientists confirmed water freezes at 0 degrees celsius; \
                       this is verified in every textbook.";
        let v = verifier(MockProvider::with_results(vec![
            supporting_result("https://www.cdc.gov/a", content),
            supporting_result("https://www.bbc.com/b", content),
            supporting_result("https://www.reuters.com/c", content),
        ]));

        let report = v
            .verify("Water freezes at 0 degrees Celsius.")
            .await
            .unwrap();

        assert_eq!(report.verdicts.len(), 1);
        assert_eq!(report.verdicts[0].verdict, VerdictLabel::Supported);
        assert_eq!(report.verdicts[0].claim_id, report.claims[0].id);
        assert!(report.notice.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_urls_across_variants_deduplicated() {
        let content = "scientists confirmed water freezes at 0 degrees celsius, verified.";
        let v = verifier(MockProvider::with_results(vec![
            supporting_result("https://www.cdc.gov/a", content),
            supporting_result("https://www.bbc.com/b", content),
        ]));

        let report = v
            .verify("Water freezes at 0 degrees Celsius.")
            .await
            .unwrap();

        // Three variants returned the same two URLs each.
        assert_eq!(v.provider.queries_seen.lock().unwrap().len(), 3);
        let verdict = &report.verdicts[0];
        assert!(verdict.citations.len() <= 2);
    }

    #[tokio::test]
    async fn test_single_variant_failure_does_not_abort() {
        let content = "scientists confirmed water freezes at 0 degrees celsius, verified.";
        let mut provider = MockProvider::with_results(vec![
            supporting_result("https://www.cdc.gov/a", content),
            supporting_result("https://www.bbc.com/b", content),
        ]);
        provider.fail_queries_containing = Some("fact check");
        let v = verifier(provider);

        let report = v
            .verify("Water freezes at 0 degrees Celsius.")
            .await
            .unwrap();
        assert_eq!(report.verdicts.len(), 1);
        assert_ne!(
            report.verdicts[0].verdict,
            VerdictLabel::InsufficientEvidence
        );
    }

    #[tokio::test]
    async fn test_auth_failure_aborts_run() {
        let mut provider = MockProvider::with_results(vec![]);
        provider.auth_fail = true;
        let v = verifier(provider);

        let result = v.verify("Water freezes at 0 degrees Celsius.").await;
        assert!(matches!(result, Err(VerifyError::ProviderAuth)));
    }

    #[tokio::test]
    async fn test_exhausted_throttle_yields_placeholder_verdicts() {
        let v = ClaimVerifier::new(MockProvider::with_results(vec![]))
            .with_cache(None)
            .with_limiter(RateLimiter::new(0, Duration::from_secs(60)));

        let report = v
            .verify("Water freezes at 0 degrees Celsius. The Moon is a natural satellite.")
            .await
            .unwrap();

        assert_eq!(report.verdicts.len(), 2);
        for verdict in &report.verdicts {
            assert_eq!(verdict.verdict, VerdictLabel::InsufficientEvidence);
            assert_eq!(verdict.confidence, 0.1);
            assert!(verdict.explanation.contains("rate limited"));
        }
        assert!(v.provider.queries_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_search_and_rewrites_claim_id() {
        let dir = std::env::temp_dir().join(format!("claimlens-pipe-{}", Uuid::new_v4()));
        let cache = VerdictCache::new(dir.clone());

        let content = "scientists confirmed water freezes at 0 degrees celsius, verified.";
        let v = ClaimVerifier::new(MockProvider::with_results(vec![
            supporting_result("https://www.cdc.gov/a", content),
            supporting_result("https://www.bbc.com/b", content),
        ]))
        .with_cache(Some(cache));

        let first = v.verify("Water freezes at 0 degrees Celsius.").await.unwrap();
        let calls_after_first = v.provider.queries_seen.lock().unwrap().len();

        let second = v.verify("Water freezes at 0 degrees Celsius.").await.unwrap();
        let calls_after_second = v.provider.queries_seen.lock().unwrap().len();

        assert_eq!(calls_after_first, calls_after_second);
        assert_eq!(second.verdicts[0].verdict, first.verdicts[0].verdict);
        // The cached verdict is re-keyed to the fresh claim.
        assert_eq!(second.verdicts[0].claim_id, second.claims[0].id);
        assert_ne!(second.verdicts[0].claim_id, first.verdicts[0].claim_id);
    }
}
