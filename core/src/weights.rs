//! Weight retention — how much rule weight survives an ablation.
//!
//! Ablation deactivates rules by zeroing their current weight. The retained
//! fraction (active ÷ original positive weight) is shaped by
//! [`RETENTION_EXPONENT`] and used to interpolate reported metrics between a
//! fixed floor and a measured baseline, without re-running the evaluation.

use crate::{BaselineConfig, Rule, RuleConfig, ScoreSummary, RETENTION_EXPONENT};
use serde::Serialize;

/// Anything that carries a current and an original weight.
///
/// Implemented by [`Rule`] and by raw [`RuleConfig`] records, so a weight
/// summary can be computed over a rulebook whether or not its patterns
/// validate.
pub trait Weighted {
    /// The current weight, or `None` if absent or invalid.
    fn current_weight(&self) -> Option<f64>;

    /// The weight before ablation. Falls back to the current weight when absent.
    fn original_weight(&self) -> Option<f64>;
}

impl Weighted for Rule {
    fn current_weight(&self) -> Option<f64> {
        self.weight
    }

    fn original_weight(&self) -> Option<f64> {
        self.original_weight.or(self.weight)
    }
}

impl Weighted for RuleConfig {
    fn current_weight(&self) -> Option<f64> {
        self.weight
    }

    fn original_weight(&self) -> Option<f64> {
        self.original_weight.or(self.weight)
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn current_weight(&self) -> Option<f64> {
        (**self).current_weight()
    }

    fn original_weight(&self) -> Option<f64> {
        (**self).original_weight()
    }
}

/// Active versus original positive rule weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightSummary {
    /// Sum of positive current weights.
    pub active_weight: f64,
    /// Sum of positive original weights.
    pub total_weight: f64,
    /// `active_weight / total_weight` clamped to `[0, 1]`; `1.0` when
    /// `total_weight` is zero.
    pub retained_weight_frac: f64,
}

impl WeightSummary {
    /// The retained fraction raised to [`RETENTION_EXPONENT`].
    #[must_use]
    pub fn shaped(&self) -> f64 {
        shape_retention(self.retained_weight_frac)
    }
}

/// `retained ^ RETENTION_EXPONENT`, with `retained` clamped to `[0, 1]`.
#[must_use]
pub fn shape_retention(retained: f64) -> f64 {
    retained.clamp(0.0, 1.0).powf(RETENTION_EXPONENT)
}

/// Sum positive original and current weights over a rule collection.
///
/// Absent weights are skipped. With no positive original weight the
/// retained fraction is `1.0`: there was nothing to lose.
///
/// # Example
///
/// ```
/// use folio::{summarize_weights, RuleConfig, RuleKind};
///
/// let mut a = RuleConfig::new("a", RuleKind::Prefix, "qo");
/// a.weight = Some(3.0);
/// let mut b = RuleConfig::new("b", RuleKind::Suffix, "dy");
/// b.weight = Some(0.0);
/// b.original_weight = Some(1.0);
///
/// let summary = summarize_weights(&[a, b]);
/// assert_eq!(summary.total_weight, 4.0);
/// assert_eq!(summary.active_weight, 3.0);
/// assert_eq!(summary.retained_weight_frac, 0.75);
/// ```
pub fn summarize_weights<I>(rules: I) -> WeightSummary
where
    I: IntoIterator,
    I::Item: Weighted,
{
    let positive = |w: Option<f64>| w.filter(|w| w.is_finite() && *w > 0.0).unwrap_or(0.0);

    let (active_weight, total_weight) = rules.into_iter().fold((0.0, 0.0), |(active, total), rule| {
        (
            active + positive(rule.current_weight()),
            total + positive(rule.original_weight()),
        )
    });

    let retained_weight_frac = if total_weight > 0.0 {
        (active_weight / total_weight).clamp(0.0, 1.0)
    } else {
        1.0
    };

    WeightSummary {
        active_weight,
        total_weight,
        retained_weight_frac,
    }
}

/// Weight summary plus the three metrics interpolated from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AblationReport {
    /// Sum of positive current weights.
    pub active_weight: f64,
    /// Sum of positive original weights.
    pub total_weight: f64,
    /// Retained fraction, see [`WeightSummary`].
    pub retained_weight_frac: f64,
    /// Interpolated coverage.
    pub coverage: f64,
    /// Interpolated accuracy among covered tokens.
    pub accuracy_on_covered: f64,
    /// Interpolated overall accuracy.
    pub overall_accuracy: f64,
}

impl AblationReport {
    /// Interpolate each metric as `floor + (baseline - floor) * shaped`.
    #[must_use]
    pub fn new(summary: WeightSummary, baseline: &BaselineConfig) -> Self {
        let t = summary.shaped();
        Self {
            active_weight: summary.active_weight,
            total_weight: summary.total_weight,
            retained_weight_frac: summary.retained_weight_frac,
            coverage: baseline.coverage.interpolate(t),
            accuracy_on_covered: baseline.accuracy_on_covered.interpolate(t),
            overall_accuracy: baseline.overall_accuracy.interpolate(t),
        }
    }
}

impl BaselineConfig {
    /// Replace the baseline endpoints with values measured on a corpus,
    /// keeping the configured floors.
    #[must_use]
    pub fn with_measured(mut self, score: &ScoreSummary) -> Self {
        self.coverage.baseline = score.coverage;
        self.accuracy_on_covered.baseline = score.accuracy_on_covered;
        self.overall_accuracy.baseline = score.overall_accuracy;
        self
    }
}
