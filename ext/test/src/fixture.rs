//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the folio engine. A fixture is
//! a rulebook plus any of three kinds of expectations:
//!
//! ```yaml
//! name: suffix rule
//! rules:
//!   - { id: r1, kind: suffix, pattern: aiin }
//! cases:                 # which rules fire on single tokens
//!   - { name: hit, token: qokaiin, expect: [r1] }
//! corpus:                # per-rule counts over a token list
//!   tokens: [{ text: qokaiin }, { text: chol }]
//!   expect: { r1: { matches: 1, coverage: 0.5 } }
//! weights:               # retention after deactivating rules
//!   drop: [r1]
//!   retained_weight_frac: 0.0
//! ```

use folio::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Tolerance for comparing fractions read from YAML.
const EPSILON: f64 = 1e-4;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rules: RulebookConfig,
    #[serde(default)]
    pub cases: Vec<TokenCase>,
    #[serde(default)]
    pub corpus: Option<CorpusCase>,
    #[serde(default)]
    pub weights: Option<WeightCase>,
}

/// Which rules fire on one token
#[derive(Debug, Deserialize)]
pub struct TokenCase {
    pub name: String,
    pub token: String,
    #[serde(default)]
    pub section: Option<String>,
    pub expect: Vec<String>,
}

/// Per-rule expectations over a token list
#[derive(Debug, Deserialize)]
pub struct CorpusCase {
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub expect: BTreeMap<String, CoverageExpect>,
    #[serde(default)]
    pub union_matches: Option<usize>,
    /// Total rows in the report; each rule id appears once.
    #[serde(default)]
    pub rows: Option<usize>,
}

/// Expected counts for one rule
#[derive(Debug, Deserialize)]
pub struct CoverageExpect {
    pub matches: usize,
    #[serde(default)]
    pub coverage: Option<f64>,
    #[serde(default)]
    pub valid: Option<bool>,
}

/// Retention after deactivating some rules
#[derive(Debug, Deserialize)]
pub struct WeightCase {
    #[serde(default)]
    pub drop: Vec<String>,
    pub retained_weight_frac: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single check
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl CaseResult {
    fn new(case_name: String, expected: String, actual: String, passed: bool) -> Self {
        Self {
            case_name,
            passed,
            expected,
            actual,
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all checks and return results
    pub fn run(&self) -> Vec<CaseResult> {
        let rules = RuleSet::load(&self.rules);
        let mut results = Vec::new();

        for case in &self.cases {
            let actual: Vec<String> = rules
                .matching_ids(&case.token, case.section.as_deref())
                .into_iter()
                .map(str::to_owned)
                .collect();
            results.push(CaseResult::new(
                case.name.clone(),
                format!("{:?}", case.expect),
                format!("{actual:?}"),
                actual == case.expect,
            ));
        }

        if let Some(corpus) = &self.corpus {
            results.extend(corpus.run(&rules));
        }

        if let Some(weights) = &self.weights {
            let mut rules = rules.clone();
            for id in &weights.drop {
                rules.deactivate(id);
            }
            let actual = summarize_weights(&rules).retained_weight_frac;
            results.push(CaseResult::new(
                "retained_weight_frac".into(),
                weights.retained_weight_frac.to_string(),
                actual.to_string(),
                close(actual, weights.retained_weight_frac),
            ));
        }

        results
    }

    /// Run all checks and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

impl CorpusCase {
    fn run(&self, rules: &RuleSet) -> Vec<CaseResult> {
        let report = evaluate_corpus(&self.tokens, rules);
        let mut results = Vec::new();

        for (rule_id, expect) in &self.expect {
            let name = format!("corpus/{rule_id}");
            let Some(row) = report.get(rule_id) else {
                results.push(CaseResult::new(
                    name,
                    format!("{} matches", expect.matches),
                    "no row".into(),
                    false,
                ));
                continue;
            };
            let coverage_ok = expect.coverage.map_or(true, |c| close(c, row.coverage));
            let valid_ok = expect.valid.map_or(true, |v| v == row.valid);
            results.push(CaseResult::new(
                name,
                format!(
                    "{} matches, coverage {:?}, valid {:?}",
                    expect.matches, expect.coverage, expect.valid
                ),
                format!(
                    "{} matches, coverage {}, valid {}",
                    row.matches, row.coverage, row.valid
                ),
                row.matches == expect.matches && coverage_ok && valid_ok,
            ));
        }

        if let Some(union) = self.union_matches {
            results.push(CaseResult::new(
                "corpus/union".into(),
                union.to_string(),
                report.union_matches.to_string(),
                report.union_matches == union,
            ));
        }

        if let Some(rows) = self.rows {
            results.push(CaseResult::new(
                "corpus/rows".into(),
                rows.to_string(),
                report.results.len().to_string(),
                report.results.len() == rows,
            ));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_run_inline_fixture() {
        let yaml = r"
name: inline
rules:
  - { id: r1, kind: suffix, pattern: aiin, weight: 1 }
  - { id: r2, kind: prefix, pattern: qo, weight: 3 }
cases:
  - { name: both, token: qokaiin, expect: [r1, r2] }
  - { name: none, token: chol, expect: [] }
corpus:
  tokens: [{ text: qokaiin }, { text: chol }, { text: daiin }]
  expect:
    r1: { matches: 2, coverage: 0.6667 }
  union_matches: 2
weights:
  drop: [r2]
  retained_weight_frac: 0.25
";
        let fixture = Fixture::from_yaml(yaml).unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn failing_case_is_reported() {
        let yaml = r"
name: wrong
rules: [{ id: r1, kind: prefix, pattern: qo }]
cases:
  - { name: miss, token: chol, expect: [r1] }
";
        let results = Fixture::from_yaml(yaml).unwrap().run();
        assert!(!results[0].passed);
    }
}
