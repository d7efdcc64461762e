//! Rulebook scoring against gold labels.
//!
//! Each token gets at most one predicted label: the label of the heaviest
//! active rule that fires on it. Ties go to the rule declared first, so a
//! rulebook without weights behaves as first-match-wins.

use crate::coverage::ratio;
use crate::{Rule, RuleSet, Token};
use serde::Serialize;
use tracing::debug;

/// Accuracy and coverage of a rulebook's predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    /// Tokens that carry a gold label (and have text).
    pub scored: usize,
    /// Scored tokens that received a prediction.
    pub covered: usize,
    /// Covered tokens whose prediction equals the gold label.
    pub correct: usize,
    /// `covered / scored`.
    pub coverage: f64,
    /// `correct / covered`.
    pub accuracy_on_covered: f64,
    /// `correct / scored`.
    pub overall_accuracy: f64,
}

impl ScoreSummary {
    fn new(scored: usize, covered: usize, correct: usize) -> Self {
        Self {
            scored,
            covered,
            correct,
            coverage: ratio(covered, scored),
            accuracy_on_covered: ratio(correct, covered),
            overall_accuracy: ratio(correct, scored),
        }
    }
}

/// The rule whose label is predicted for `token`, if any.
///
/// Only active rules with a label compete. Absent weights count as zero.
#[must_use]
pub fn predict<'a>(rules: &'a RuleSet, token: &Token) -> Option<&'a Rule> {
    let mut best: Option<&Rule> = None;
    for rule in rules {
        if rule.label.is_none() || !rule.is_active() || !rule.matches(&token.text, token.section())
        {
            continue;
        }
        let heavier = best.map_or(true, |b| rule.weight.unwrap_or(0.0) > b.weight.unwrap_or(0.0));
        if heavier {
            best = Some(rule);
        }
    }
    best
}

/// Score a rulebook's predictions against the tokens' gold labels.
///
/// Tokens without a gold label, and malformed tokens, are not scored. All
/// ratios are `0.0` when their denominator is zero.
#[must_use]
pub fn score_corpus(tokens: &[Token], rules: &RuleSet) -> ScoreSummary {
    let mut scored = 0;
    let mut covered = 0;
    let mut correct = 0;

    for token in tokens.iter().filter(|t| !t.is_malformed()) {
        let Some(gold) = token.label() else {
            continue;
        };
        scored += 1;

        if let Some(rule) = predict(rules, token) {
            covered += 1;
            if rule.label.as_deref() == Some(gold) {
                correct += 1;
            }
        }
    }

    let summary = ScoreSummary::new(scored, covered, correct);
    debug!(scored, covered, correct, "corpus scored");
    summary
}
