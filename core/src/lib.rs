//! folio - rule matching and coverage scoring over manuscript token corpora
//!
//! A small engine that applies hand-written pattern rules to a transliterated
//! token corpus and reports how much of the corpus each rule explains.
//!
//! # Architecture
//!
//! - [`Pattern`] — Compiled pattern (prefix, suffix, chargram, ordered pair)
//! - [`SectionGate`] — Optional allow/deny lists over corpus sections
//! - [`Rule`] — Validated rule: id + pattern + gate + label + weights
//! - [`RuleConfig`] — Serde record as written in a rulebook file (all fields optional)
//! - [`RuleSet`] — Loaded rules plus the records that were rejected
//! - [`Token`] — Corpus token with optional section and gold label
//!
//! Operations:
//!
//! - [`Rule::matches`] — does one rule fire on one token?
//! - [`evaluate_corpus`] — per-rule match counts and coverage
//! - [`summarize_weights`] — weight retention after ablation
//! - [`score_corpus`] — label predictions against gold labels
//!
//! # Key Invariants
//!
//! 1. **Malformed → no match**: an empty token, or a record that fails
//!    validation, never matches and never aborts an evaluation.
//!
//! 2. **Zero denominators have defaults**: coverage of an empty corpus is `0.0`,
//!    retention with no positive original weight is `1.0`.
//!
//! # Example
//!
//! ```
//! use folio::prelude::*;
//!
//! let rule = Rule::new("r1", Pattern::suffix("aiin").unwrap());
//! let tokens = vec![Token::new("qokaiin"), Token::new("chol"), Token::new("daiin")];
//!
//! let report = evaluate_corpus(&tokens, &RuleSet::from_rules(vec![rule]));
//! let r1 = report.get("r1").unwrap();
//! assert_eq!(r1.matches, 2);
//! assert!((r1.coverage - 2.0 / 3.0).abs() < 1e-12);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod config;
mod coverage;
mod pattern;
mod rule;
mod rule_set;
mod scoring;
mod section;
mod token;
mod trace;
mod weights;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use config::{BaselineConfig, MetricRange, RuleConfig, RulebookConfig};
pub use coverage::{evaluate_corpus, CoverageReport, MatchResult};
#[cfg(feature = "parallel")]
pub use coverage::evaluate_corpus_par;
pub use pattern::{Pattern, RuleKind};
pub use rule::Rule;
pub use rule_set::{RejectedRule, RuleSet};
pub use scoring::{predict, score_corpus, ScoreSummary};
pub use section::SectionGate;
pub use token::Token;
pub use trace::{MatchTrace, Verdict};
pub use weights::{shape_retention, summarize_weights, AblationReport, WeightSummary, Weighted};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use folio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        evaluate_corpus, score_corpus, summarize_weights, AblationReport, BaselineConfig,
        CoverageReport, MatchResult, MatchTrace, Pattern, Rule, RuleConfig, RuleError,
        RuleKind, RuleSet, RulebookConfig, ScoreSummary, SectionGate, Token, Verdict,
        WeightSummary, Weighted,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length of a rule pattern, in bytes.
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Separator between the two halves of a `pair` pattern (`"qo|dy"`).
pub const PAIR_SEPARATOR: char = '|';

/// Exponent applied to the retained weight fraction before interpolating
/// ablation metrics.
pub const RETENTION_EXPONENT: f64 = 0.9;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Reasons a rule record is rejected at load time.
///
/// Rejection never aborts a load: the record is kept as a [`RejectedRule`]
/// and treated as non-matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A required field (`id`, `kind`, `pattern`) is absent or blank.
    #[error("missing required field \"{field}\"")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// The `kind` is not one of `prefix`, `suffix`, `chargram`, `pair`.
    #[error("unknown rule kind \"{kind}\" (expected prefix, suffix, chargram or pair)")]
    UnknownKind {
        /// The kind as written.
        kind: String,
    },
    /// The pattern is the empty string.
    #[error("pattern is empty")]
    EmptyPattern,
    /// A pair pattern is not of the form `A|B` with both halves non-empty.
    #[error("pair pattern \"{pattern}\" must be two non-empty halves joined by '|'")]
    MalformedPair {
        /// The pattern as written.
        pattern: String,
    },
    /// The pattern exceeds [`MAX_PATTERN_LENGTH`].
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Another rule with the same id was loaded first.
    #[error("duplicate rule id \"{id}\"")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
}
