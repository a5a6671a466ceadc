// claimlens Data Models
// Shared types flowing through the verification pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Claims ============

/// Categorical claim type assigned by the classifier rule cascade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Factual,
    Opinion,
    Prediction,
    Ambiguous,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Factual => "factual",
            ClaimType::Opinion => "opinion",
            ClaimType::Prediction => "prediction",
            ClaimType::Ambiguous => "ambiguous",
        }
    }
}

/// One atomic, non-compound assertion extracted from the input text.
/// Immutable once created; `id` is the join key for downstream entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: Uuid,
    /// Neutralized declarative text used for searching.
    pub text: String,
    /// The sentence exactly as it appeared in the input.
    pub original_text: String,
    pub classification: ClaimType,
}

// ============ Evidence ============

/// Relationship of one evidence item to a claim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Supports,
    Contradicts,
    Inconclusive,
}

/// One ranked result returned by the external search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
}

/// One (claim, search-result) pair with its assessed stance and source weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub source: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    pub stance: Stance,
    /// Source credibility weight in [0, 1].
    pub authority: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
}

/// Evidence partitioned by stance with the authority-weighted consensus.
/// Invariant: `total_sources == supporting + contradicting + inconclusive`;
/// `consensus_score == 0` whenever the weighted denominator is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEvidence {
    pub supporting: Vec<Evidence>,
    pub contradicting: Vec<Evidence>,
    pub inconclusive: Vec<Evidence>,
    /// Authority-weighted net agreement in [-1, 1].
    pub consensus_score: f64,
    pub total_sources: usize,
}

impl AggregatedEvidence {
    /// All evidence in stance order, for warning checks and display.
    pub fn all(&self) -> impl Iterator<Item = &Evidence> {
        self.supporting
            .iter()
            .chain(self.contradicting.iter())
            .chain(self.inconclusive.iter())
    }
}

// ============ Verdicts ============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    Supported,
    False,
    Misleading,
    InsufficientEvidence,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::Supported => "supported",
            VerdictLabel::False => "false",
            VerdictLabel::Misleading => "misleading",
            VerdictLabel::InsufficientEvidence => "insufficient_evidence",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub source: String,
    pub url: String,
    pub snippet: String,
}

/// Terminal per-claim result. Never updated in place; a new verification
/// run produces a new Verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub claim_id: Uuid,
    pub verdict: VerdictLabel,
    /// Calibrated confidence in [0.1, 0.9]; 0.9 is a deliberate ceiling.
    pub confidence: f64,
    pub explanation: String,
    /// At most 3, sorted by authority descending.
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_explanation: Option<String>,
}

// ============ Run-level output ============

/// Whole-run, user-visible conditions distinct from per-claim outcomes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunNotice {
    NoClaimsFound,
    NoFactualClaims,
}

/// Output of one verification run. Claims include non-factual ones for
/// display; verdicts exist only for factual claims that were searched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub claims: Vec<Claim>,
    pub verdicts: Vec<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<RunNotice>,
}
