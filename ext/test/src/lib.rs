//! folio-test: Test helpers and conformance fixtures
//!
//! Provides small corpus and rulebook builders for tests, and (with the
//! `fixtures` feature) a YAML fixture runner used by the conformance suite.
//!
//! # Example
//!
//! ```
//! use folio_test::prelude::*;
//!
//! let tokens = sectioned(&[("daiin", "Herbal"), ("chol", "Recipes")]);
//! let rules = rulebook(&[("r1", RuleKind::Suffix, "aiin")]);
//!
//! let report = evaluate_corpus(&tokens, &rules);
//! assert_eq!(report.get("r1").unwrap().matches, 1);
//! ```

use folio::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Tokens without sections.
#[must_use]
pub fn corpus(words: &[&str]) -> Vec<Token> {
    words.iter().map(|w| Token::new(*w)).collect()
}

/// Tokens with sections, from `(text, section)` pairs.
#[must_use]
pub fn sectioned(pairs: &[(&str, &str)]) -> Vec<Token> {
    pairs
        .iter()
        .map(|(text, section)| Token::new(*text).in_section(*section))
        .collect()
}

/// Rule records from `(id, kind, pattern)` triples.
#[must_use]
pub fn records(rules: &[(&str, RuleKind, &str)]) -> Vec<RuleConfig> {
    rules
        .iter()
        .map(|(id, kind, pattern)| RuleConfig::new(*id, *kind, *pattern))
        .collect()
}

/// A loaded rule set from `(id, kind, pattern)` triples.
#[must_use]
pub fn rulebook(rules: &[(&str, RuleKind, &str)]) -> RuleSet {
    RuleSet::load_records(&records(rules))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{corpus, records, rulebook, sectioned};
    pub use folio::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectioned_tokens() {
        let tokens = sectioned(&[("daiin", "Herbal")]);
        assert_eq!(tokens[0].section(), Some("Herbal"));
    }

    #[test]
    fn rulebook_loads_every_triple() {
        let rules = rulebook(&[
            ("a", RuleKind::Prefix, "qo"),
            ("b", RuleKind::Pair, "qo|dy"),
            ("c", RuleKind::Pair, "qody"),
        ]);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rejected().len(), 1);
    }

    #[test]
    fn ordered_pair_rule() {
        let rules = rulebook(&[("p", RuleKind::Pair, "qo|dy")]);
        assert_eq!(rules.matching_ids("qokedy", None), vec!["p"]);
    }

    #[test]
    fn full_pipeline() {
        let tokens = corpus(&["qokaiin", "chol", "daiin"]);
        let rules = rulebook(&[("r1", RuleKind::Suffix, "aiin")]);
        let report = evaluate_corpus(&tokens, &rules);
        let row = report.get("r1").unwrap();
        assert_eq!(row.matches, 2);
        assert!((row.coverage - 2.0 / 3.0).abs() < 1e-9);
    }
}
