//! `Rule` — A validated pattern rule.

use crate::{MatchTrace, Pattern, SectionGate, Verdict};

/// A validated rule: identifier, compiled pattern, section gate, predicted
/// label and weights.
///
/// Rules are immutable during evaluation. The only mutation is
/// [`deactivate`](Self::deactivate), used by ablation runs between
/// evaluations.
///
/// # Example
///
/// ```
/// use folio::{Pattern, Rule, SectionGate};
///
/// let rule = Rule::new("r1", Pattern::suffix("aiin").unwrap())
///     .with_gate(SectionGate::allow(["Herbal"]));
///
/// assert!(rule.matches("daiin", Some("Herbal")));
/// assert!(!rule.matches("daiin", Some("Recipes")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Rule identifier, unique within a [`RuleSet`](crate::RuleSet).
    pub id: String,
    /// The compiled pattern.
    pub pattern: Pattern,
    /// Which sections the rule applies to.
    pub gate: SectionGate,
    /// Predicted classification label.
    pub label: Option<String>,
    /// Current weight; `Some(0.0)` once deactivated.
    pub weight: Option<f64>,
    /// Weight before any ablation.
    pub original_weight: Option<f64>,
}

impl Rule {
    /// Create an ungated rule with no label and no weight.
    pub fn new(id: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            id: id.into(),
            pattern,
            gate: SectionGate::open(),
            label: None,
            weight: None,
            original_weight: None,
        }
    }

    /// Set the section gate (builder pattern).
    #[must_use]
    pub fn with_gate(mut self, gate: SectionGate) -> Self {
        self.gate = gate;
        self
    }

    /// Set the predicted label (builder pattern).
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the current weight (builder pattern).
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Decide whether this rule fires on `token` drawn from `section`.
    ///
    /// Returns `false` for an empty token or when the section gate does not
    /// admit `section`.
    #[must_use]
    pub fn matches(&self, token: &str, section: Option<&str>) -> bool {
        !token.is_empty() && self.gate.admits(section) && self.pattern.matches(token)
    }

    /// Like [`matches`](Self::matches), but reports why the rule did or did
    /// not fire.
    #[must_use]
    pub fn explain(&self, token: &str, section: Option<&str>) -> MatchTrace {
        let verdict = if token.is_empty() {
            Verdict::EmptyToken
        } else if !self.gate.is_allowed(section) {
            Verdict::SectionNotAllowed
        } else if self.gate.is_denied(section) {
            Verdict::SectionDenied
        } else if self.pattern.matches(token) {
            Verdict::Fired
        } else {
            Verdict::PatternMissed
        };

        MatchTrace {
            rule_id: self.id.clone(),
            pattern: self.pattern.to_string(),
            token: token.to_owned(),
            section: section.map(str::to_owned),
            verdict,
        }
    }

    /// Whether the rule still carries weight.
    ///
    /// Agrees with [`summarize_weights`](crate::summarize_weights): a zeroed
    /// weight deactivates, and so does a missing current weight when a
    /// positive original weight says the rule once carried some. A rule with
    /// no weight at all counts as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match (self.weight, self.original_weight) {
            (Some(w), _) => w > 0.0,
            (None, Some(original)) => original <= 0.0,
            (None, None) => true,
        }
    }

    /// Zero the current weight, remembering the original.
    ///
    /// Idempotent: a second call keeps the first original weight.
    pub fn deactivate(&mut self) {
        if self.original_weight.is_none() {
            self.original_weight = self.weight;
        }
        self.weight = Some(0.0);
    }
}
