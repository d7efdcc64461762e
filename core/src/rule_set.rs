//! `RuleSet` — A loaded rulebook.
//!
//! Loading is fail-soft: each [`RuleConfig`] is validated on its own, and a
//! record that fails validation is kept as a [`RejectedRule`] instead of
//! aborting the load. Rejected rules never match, but those with an
//! identifier still get a (zero) row in coverage reports.

use crate::{Rule, RuleConfig, RuleError, RulebookConfig};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A rule record that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRule {
    /// Position of the record in the rulebook (0-based).
    pub index: usize,
    /// The record's identifier, if it had a usable one. Duplicates keep the
    /// id they collided on.
    pub id: Option<String>,
    /// Why the record was rejected.
    pub error: RuleError,
}

/// Validated rules in rulebook order, plus the rejected records.
///
/// # INV: unique ids
///
/// No two rules in [`rules()`](Self::rules) share an identifier; a later
/// duplicate is rejected with [`RuleError::DuplicateId`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    rejected: Vec<RejectedRule>,
}

impl RuleSet {
    /// Build a set from already-validated rules.
    ///
    /// Duplicate ids are rejected the same way [`load`](Self::load) rejects them.
    #[must_use]
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        let mut set = Self::default();
        let mut seen = HashSet::new();
        for (index, rule) in rules.into_iter().enumerate() {
            set.push(index, rule, &mut seen);
        }
        set
    }

    /// Validate every record of a rulebook.
    #[must_use]
    pub fn load(book: &RulebookConfig) -> Self {
        Self::load_records(&book.rules)
    }

    /// Validate a slice of rule records.
    #[must_use]
    pub fn load_records(records: &[RuleConfig]) -> Self {
        let mut set = Self::default();
        let mut seen = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            match record.compile() {
                Ok(rule) => set.push(index, rule, &mut seen),
                Err(error) => {
                    let id = record
                        .id
                        .as_deref()
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_owned);
                    warn!(index, id = ?id, %error, "rejecting rule record");
                    set.rejected.push(RejectedRule { index, id, error });
                }
            }
        }

        debug!(
            loaded = set.rules.len(),
            rejected = set.rejected.len(),
            "rule set loaded"
        );
        set
    }

    fn push(&mut self, index: usize, rule: Rule, seen: &mut HashSet<String>) {
        if seen.insert(rule.id.clone()) {
            self.rules.push(rule);
        } else {
            let error = RuleError::DuplicateId {
                id: rule.id.clone(),
            };
            warn!(index, id = %rule.id, %error, "rejecting rule record");
            self.rejected.push(RejectedRule {
                index,
                id: Some(rule.id),
                error,
            });
        }
    }

    /// The validated rules, in rulebook order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rejected records, in rulebook order.
    #[must_use]
    pub fn rejected(&self) -> &[RejectedRule] {
        &self.rejected
    }

    /// Look up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Number of validated rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the validated rules.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Ids of the rules that fire on `token`, in rulebook order.
    #[must_use]
    pub fn matching_ids(&self, token: &str, section: Option<&str>) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(token, section))
            .map(|rule| rule.id.as_str())
            .collect()
    }

    /// Deactivate (zero the weight of) the rule with the given id.
    ///
    /// Returns `false` if no such rule exists.
    pub fn deactivate(&mut self, id: &str) -> bool {
        match self.rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => {
                rule.deactivate();
                true
            }
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
