//! Corpus evaluation — per-rule match counts and coverage.
//!
//! [`evaluate_corpus`] scans every token against every rule. The scan is a
//! pure function of its inputs: evaluating the same tokens and rules twice
//! yields identical reports.

use crate::{RuleSet, Token};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Match statistics for one rule over a corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// The rule identifier.
    pub rule_id: String,
    /// Number of tokens the rule fired on.
    pub matches: usize,
    /// Number of non-empty tokens admitted by the rule's section gate.
    pub applicable: usize,
    /// `matches / corpus_size`, or `0.0` for an empty corpus.
    pub coverage: f64,
    /// `false` if the rule record was rejected at load time.
    pub valid: bool,
}

impl MatchResult {
    fn new(
        rule_id: String,
        matches: usize,
        applicable: usize,
        corpus_size: usize,
        valid: bool,
    ) -> Self {
        Self {
            rule_id,
            matches,
            applicable,
            coverage: ratio(matches, corpus_size),
            valid,
        }
    }

    /// `matches / applicable`: coverage within the sections the rule is
    /// allowed to see. `0.0` when nothing was applicable.
    #[must_use]
    pub fn section_coverage(&self) -> f64 {
        ratio(self.matches, self.applicable)
    }
}

/// Result of evaluating a rule set over a corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    /// Total tokens scanned, malformed ones included.
    pub corpus_size: usize,
    /// Tokens with no text.
    pub malformed_tokens: usize,
    /// Tokens matched by at least one rule.
    pub union_matches: usize,
    /// `union_matches / corpus_size`, or `0.0` for an empty corpus.
    pub union_coverage: f64,
    /// One row per rule id: validated rules in rulebook order, then rejected
    /// records whose id no validated rule or earlier rejected record holds.
    pub results: Vec<MatchResult>,
}

impl CoverageReport {
    /// Look up the row for a rule id.
    #[must_use]
    pub fn get(&self, rule_id: &str) -> Option<&MatchResult> {
        self.results.iter().find(|r| r.rule_id == rule_id)
    }

    /// Rows sorted by descending match count (ties keep rulebook order).
    #[must_use]
    pub fn ranked(&self) -> Vec<&MatchResult> {
        let mut rows: Vec<&MatchResult> = self.results.iter().collect();
        rows.sort_by(|a, b| b.matches.cmp(&a.matches));
        rows
    }
}

/// Per-rule tallies accumulated over a slice of tokens.
///
/// Tallies over disjoint slices add up to the tally over their union, which
/// is what lets the parallel scan split the corpus.
#[derive(Debug, Clone, Default, PartialEq)]
struct Tally {
    matches: Vec<usize>,
    applicable: Vec<usize>,
    union_matches: usize,
    malformed: usize,
}

impl Tally {
    fn new(rule_count: usize) -> Self {
        Self {
            matches: vec![0; rule_count],
            applicable: vec![0; rule_count],
            union_matches: 0,
            malformed: 0,
        }
    }

    fn scan(mut self, rules: &RuleSet, tokens: &[Token]) -> Self {
        for token in tokens {
            if token.is_malformed() {
                self.malformed += 1;
                continue;
            }

            let section = token.section();
            let mut any = false;
            for (i, rule) in rules.iter().enumerate() {
                if !rule.gate.admits(section) {
                    continue;
                }
                self.applicable[i] += 1;
                if rule.pattern.matches(&token.text) {
                    self.matches[i] += 1;
                    any = true;
                }
            }
            if any {
                self.union_matches += 1;
            }
        }
        self
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.matches.iter_mut().zip(other.matches) {
            *a += b;
        }
        for (a, b) in self.applicable.iter_mut().zip(other.applicable) {
            *a += b;
        }
        self.union_matches += other.union_matches;
        self.malformed += other.malformed;
        self
    }

    fn into_report(self, rules: &RuleSet, corpus_size: usize) -> CoverageReport {
        let mut results: Vec<MatchResult> = rules
            .iter()
            .zip(self.matches.into_iter().zip(self.applicable))
            .map(|(rule, (matches, applicable))| {
                MatchResult::new(rule.id.clone(), matches, applicable, corpus_size, true)
            })
            .collect();

        // One row per id: a rejected record only reports an id nothing else claimed.
        let mut claimed: HashSet<String> = rules.iter().map(|rule| rule.id.clone()).collect();
        for id in rules.rejected().iter().filter_map(|rejected| rejected.id.as_ref()) {
            if claimed.insert(id.clone()) {
                results.push(MatchResult::new(id.clone(), 0, 0, corpus_size, false));
            }
        }

        CoverageReport {
            corpus_size,
            malformed_tokens: self.malformed,
            union_matches: self.union_matches,
            union_coverage: ratio(self.union_matches, corpus_size),
            results,
        }
    }
}

/// Count, for every rule, the tokens it fires on.
///
/// Each token is tested with its own section. Coverage is
/// `matches / tokens.len()`; an empty corpus yields `0.0` for every rule.
/// Malformed tokens are counted in the corpus size and match nothing.
///
/// # Example
///
/// ```
/// use folio::prelude::*;
///
/// let rules = RuleSet::from_rules(vec![Rule::new("r1", Pattern::suffix("aiin").unwrap())]);
/// let report = evaluate_corpus(&[], &rules);
/// assert_eq!(report.get("r1").unwrap().coverage, 0.0);
/// ```
#[must_use]
pub fn evaluate_corpus(tokens: &[Token], rules: &RuleSet) -> CoverageReport {
    let report = Tally::new(rules.len())
        .scan(rules, tokens)
        .into_report(rules, tokens.len());
    debug!(
        tokens = report.corpus_size,
        rules = rules.len(),
        union = report.union_matches,
        "corpus evaluated"
    );
    report
}

/// Parallel form of [`evaluate_corpus`].
///
/// Splits the corpus into chunks, tallies each on the rayon pool and sums
/// the tallies. The report is identical to the sequential one.
#[cfg(feature = "parallel")]
#[must_use]
pub fn evaluate_corpus_par(tokens: &[Token], rules: &RuleSet) -> CoverageReport {
    use rayon::prelude::*;

    const CHUNK: usize = 4096;

    let tally = tokens
        .par_chunks(CHUNK)
        .map(|chunk| Tally::new(rules.len()).scan(rules, chunk))
        .reduce(|| Tally::new(rules.len()), Tally::merge);
    let report = tally.into_report(rules, tokens.len());
    debug!(
        tokens = report.corpus_size,
        rules = rules.len(),
        union = report.union_matches,
        "corpus evaluated in parallel"
    );
    report
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
