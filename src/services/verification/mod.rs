// Verification Module
// Claim verification core logic organized into specialized submodules:
// - classifier: Ordered rule cascade assigning a claim type to each claim
// - neutralizer: Strips attribution wrappers for bias-neutral searching
// - query_builder: Builds search query variants per claim
// - authority: Maps source URLs to credibility weights
// - numeric: Numeric contradiction extraction and comparison
// - semantic: Relation-template entailment matching
// - stance: Ordered stance cascade over (claim, content) pairs
// - aggregation: Combines stances and weights into a consensus
// - verdict: Turns aggregated evidence into a labeled verdict

pub mod classifier;
pub mod neutralizer;
pub mod query_builder;
pub mod authority;
pub mod numeric;
pub mod semantic;
pub mod stance;
pub mod aggregation;
pub mod verdict;

// Re-export commonly used functions
pub use classifier::{classify, matched_rule};
pub use neutralizer::neutralize;
pub use query_builder::{build_queries, negate_claim};
pub use authority::score_url;
pub use stance::detect_stance;
pub use aggregation::{aggregate_evidence, rank_evidence};
pub use verdict::generate_verdict;
