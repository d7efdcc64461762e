//! Config types for rulebook and baseline files.
//!
//! These types mirror the runtime types but are serde-deserializable and
//! deliberately lenient: rulebooks in the wild are hand-edited and noisy, so
//! every rule field is optional and every odd value deserializes to "absent"
//! instead of failing the whole file. Validation happens afterwards, per
//! record, in [`RuleConfig::compile`].
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader |
//! |-------------|-------------|--------|
//! | [`RulebookConfig`] | [`RuleSet`](crate::RuleSet) | `RuleSet::load()` |
//! | [`RuleConfig`] | [`Rule`](crate::Rule) | `RuleConfig::compile()` |
//! | [`BaselineConfig`] | [`AblationReport`](crate::AblationReport) | `AblationReport::new()` |

use crate::{Pattern, Rule, RuleError, RuleKind, SectionGate};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A rule record as written in a rulebook file.
///
/// JSON example:
/// ```json
/// { "id": "r1", "kind": "suffix", "pattern": "aiin", "predicted": "noun",
///   "weight": 1.0, "allow_sections": ["Herbal"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleConfig {
    /// Rule identifier.
    #[serde(default, alias = "rule_id", deserialize_with = "lenient::text")]
    pub id: Option<String>,

    /// One of `prefix`, `suffix`, `chargram`, `pair`.
    #[serde(default, alias = "type", deserialize_with = "lenient::text")]
    pub kind: Option<String>,

    /// Pattern string; pair patterns are `A|B`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub pattern: Option<String>,

    /// Predicted classification label.
    #[serde(
        default,
        alias = "predicted",
        alias = "predict",
        deserialize_with = "lenient::text"
    )]
    pub label: Option<String>,

    /// Current weight. Zero means the rule was deactivated.
    #[serde(default, deserialize_with = "lenient::weight")]
    pub weight: Option<f64>,

    /// Weight before any ablation. Falls back to `weight` when absent.
    #[serde(
        default,
        alias = "orig_weight",
        alias = "base_weight",
        deserialize_with = "lenient::weight"
    )]
    pub original_weight: Option<f64>,

    /// Sections the rule is restricted to.
    #[serde(
        default,
        alias = "allow",
        alias = "sections",
        deserialize_with = "lenient::sections"
    )]
    pub allow_sections: Option<Vec<String>>,

    /// Sections the rule never applies to.
    #[serde(default, alias = "deny", deserialize_with = "lenient::sections")]
    pub deny_sections: Option<Vec<String>>,
}

impl RuleConfig {
    /// Create a record with the three required fields set.
    pub fn new(id: impl Into<String>, kind: RuleKind, pattern: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind.as_str().to_owned()),
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Validate this record into a runtime [`Rule`].
    ///
    /// # Errors
    ///
    /// - [`RuleError::MissingField`] if `id`, `kind` or `pattern` is absent or blank
    /// - [`RuleError::UnknownKind`] if `kind` is not a known kind
    /// - any pattern error from [`Pattern::compile`]
    pub fn compile(&self) -> Result<Rule, RuleError> {
        let id = required(self.id.as_deref(), "id")?;
        let kind: RuleKind = required(self.kind.as_deref(), "kind")?.parse()?;
        let pattern = match self.pattern.as_deref() {
            None => return Err(RuleError::MissingField { field: "pattern" }),
            Some(raw) => Pattern::compile(kind, raw)?,
        };

        let mut gate = SectionGate::open();
        if let Some(allow) = &self.allow_sections {
            gate = gate.with_allow(allow.iter().cloned());
        }
        if let Some(deny) = &self.deny_sections {
            gate = gate.with_deny(deny.iter().cloned());
        }

        let mut rule = Rule::new(id.trim(), pattern).with_gate(gate);
        rule.label = self.label.clone();
        rule.weight = self.weight;
        rule.original_weight = self.original_weight;
        Ok(rule)
    }

    /// Decide whether this raw record fires on `token`.
    ///
    /// A record that fails validation is non-matching rather than an error.
    #[must_use]
    pub fn matches(&self, token: &str, section: Option<&str>) -> bool {
        self.compile()
            .is_ok_and(|rule| rule.matches(token, section))
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, RuleError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RuleError::MissingField { field })
}

/// A rulebook file: either `{ "rules": [...] }` or a bare list of rules.
///
/// Entries that are not objects at all become empty records, so they are
/// rejected (and counted) by the loader instead of failing the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RulebookRepr")]
pub struct RulebookConfig {
    /// Rule records in file order.
    pub rules: Vec<RuleConfig>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RulebookRepr {
    Wrapped { rules: Vec<RuleEntry> },
    Bare(Vec<RuleEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleEntry {
    Record(RuleConfig),
    Junk(IgnoredAny),
}

impl From<RulebookRepr> for RulebookConfig {
    fn from(repr: RulebookRepr) -> Self {
        let entries = match repr {
            RulebookRepr::Wrapped { rules } | RulebookRepr::Bare(rules) => rules,
        };
        let rules = entries
            .into_iter()
            .map(|entry| match entry {
                RuleEntry::Record(rule) => rule,
                RuleEntry::Junk(_) => RuleConfig::default(),
            })
            .collect();
        Self { rules }
    }
}

/// Two endpoints of an interpolated metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    /// Value reported when no rule weight is retained.
    pub floor: f64,
    /// Value reported when all rule weight is retained.
    pub baseline: f64,
}

impl MetricRange {
    /// Create a range.
    #[must_use]
    pub fn new(floor: f64, baseline: f64) -> Self {
        Self { floor, baseline }
    }

    /// Linear interpolation: `floor + (baseline - floor) * t`.
    #[must_use]
    pub fn interpolate(&self, t: f64) -> f64 {
        self.floor + (self.baseline - self.floor) * t
    }
}

/// Baseline endpoints for the three metrics reported by an ablation run.
///
/// YAML example:
/// ```yaml
/// coverage: { floor: 0.05, baseline: 0.62 }
/// accuracy_on_covered: { floor: 0.10, baseline: 0.81 }
/// overall_accuracy: { floor: 0.01, baseline: 0.50 }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Fraction of tokens covered.
    pub coverage: MetricRange,
    /// Accuracy among covered tokens.
    pub accuracy_on_covered: MetricRange,
    /// Accuracy over all scored tokens.
    pub overall_accuracy: MetricRange,
}

mod lenient {
    //! Field deserializers that map unusable values to `None`.

    use super::{Deserialize, Deserializer, IgnoredAny};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    impl Scalar {
        /// Numbers are kept as written by the parser: `1.5` stays `"1.5"`, but
        /// an unquoted `007` has already become `7`. Quote ids that need zeros.
        fn into_text(self) -> Option<String> {
            match self {
                Self::Text(s) => Some(s),
                Self::Int(i) => Some(i.to_string()),
                Self::Float(f) => Some(f.to_string()),
                Self::Other(_) => None,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sections {
        Many(Vec<Scalar>),
        One(String),
        Other(IgnoredAny),
    }

    /// Strings pass through; integers are stringified; anything else is absent.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Scalar::deserialize(d)?.into_text())
    }

    /// Finite, non-negative numbers (or numeric strings); anything else is absent.
    pub fn weight<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        #[allow(clippy::cast_precision_loss)]
        let value = match Scalar::deserialize(d)? {
            Scalar::Int(i) => Some(i as f64),
            Scalar::Float(f) => Some(f),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Other(_) => None,
        };
        Ok(value.filter(|w| w.is_finite() && *w >= 0.0))
    }

    /// A list of labels, or a single comma-separated string.
    pub fn sections<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        let labels: Vec<String> = match Sections::deserialize(d)? {
            Sections::Many(items) => items
                .into_iter()
                .filter_map(Scalar::into_text)
                .collect(),
            Sections::One(s) => s.split(',').map(str::to_owned).collect(),
            Sections::Other(_) => return Ok(None),
        };
        let labels: Vec<String> = labels
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
        Ok((!labels.is_empty()).then_some(labels))
    }
}
