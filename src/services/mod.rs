// ClaimLens Core Services

pub mod segmenter;
pub mod verification;
pub mod search;
pub mod rate_limiter;
pub mod verdict_cache;
pub mod pipeline;

pub use segmenter::*;
pub use rate_limiter::*;
pub use verdict_cache::{normalize_claim, CacheEntry, VerdictCache};
pub use search::{SearchDepth, SearchError, SearchProvider, TavilyClient};
pub use pipeline::{ClaimVerifier, VerifyError};

// Re-export verification module functions
pub use verification::{
    aggregate_evidence,
    build_queries,
    classify,
    detect_stance,
    generate_verdict,
    negate_claim,
    neutralize,
    rank_evidence,
    score_url,
};
