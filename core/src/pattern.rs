//! `Pattern` — Compiled token patterns
//!
//! A rule's `kind` and `pattern` string compile into a [`Pattern`], validated
//! once at load time. Matching is then a plain string test on the token.
//!
//! # Available Patterns
//!
//! - [`Pattern::Prefix`] — token starts with the pattern
//! - [`Pattern::Suffix`] — token ends with the pattern
//! - [`Pattern::Chargram`] — pattern occurs anywhere in the token
//! - [`Pattern::Pair`] — `first` occurs, then `second` occurs after it

use crate::{RuleError, MAX_PATTERN_LENGTH, PAIR_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a rule, as written in a rulebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Token starts with the pattern.
    Prefix,
    /// Token ends with the pattern.
    Suffix,
    /// Pattern occurs anywhere in the token.
    Chargram,
    /// Two ordered sub-patterns, `A|B`.
    Pair,
}

impl RuleKind {
    /// The lowercase name used in rulebook files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::Chargram => "chargram",
            Self::Pair => "pair",
        }
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    /// Parses a kind name. Surrounding whitespace and ASCII case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "suffix" => Ok(Self::Suffix),
            "chargram" => Ok(Self::Chargram),
            "pair" => Ok(Self::Pair),
            _ => Err(RuleError::UnknownKind { kind: s.to_owned() }),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated token pattern.
///
/// Every variant holds non-empty strings no longer than
/// [`MAX_PATTERN_LENGTH`]; the constructors enforce this.
///
/// # Example
///
/// ```
/// use folio::Pattern;
///
/// let pair = Pattern::compile(folio::RuleKind::Pair, "qo|dy").unwrap();
/// assert!(pair.matches("qokedy"));
/// assert!(!pair.matches("dyqo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Token starts with this string.
    Prefix(String),
    /// Token ends with this string.
    Suffix(String),
    /// Token contains this string.
    Chargram(String),
    /// Token contains `first`, and `second` occurs after the end of the
    /// first occurrence of `first`.
    Pair {
        /// Leading sub-pattern.
        first: String,
        /// Trailing sub-pattern.
        second: String,
    },
}

impl Pattern {
    /// Compile a pattern string for the given kind.
    ///
    /// # Errors
    ///
    /// - [`RuleError::EmptyPattern`] if `raw` is empty
    /// - [`RuleError::PatternTooLong`] if `raw` exceeds [`MAX_PATTERN_LENGTH`]
    /// - [`RuleError::MalformedPair`] if a pair pattern is not `A|B`
    pub fn compile(kind: RuleKind, raw: &str) -> Result<Self, RuleError> {
        if raw.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        if raw.len() > MAX_PATTERN_LENGTH {
            return Err(RuleError::PatternTooLong {
                len: raw.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        Ok(match kind {
            RuleKind::Prefix => Self::Prefix(raw.to_owned()),
            RuleKind::Suffix => Self::Suffix(raw.to_owned()),
            RuleKind::Chargram => Self::Chargram(raw.to_owned()),
            RuleKind::Pair => {
                let malformed = || RuleError::MalformedPair {
                    pattern: raw.to_owned(),
                };
                let (first, second) = raw.split_once(PAIR_SEPARATOR).ok_or_else(malformed)?;
                if first.is_empty() || second.is_empty() || second.contains(PAIR_SEPARATOR) {
                    return Err(malformed());
                }
                Self::Pair {
                    first: first.to_owned(),
                    second: second.to_owned(),
                }
            }
        })
    }

    /// Create a prefix pattern.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn prefix(value: &str) -> Result<Self, RuleError> {
        Self::compile(RuleKind::Prefix, value)
    }

    /// Create a suffix pattern.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn suffix(value: &str) -> Result<Self, RuleError> {
        Self::compile(RuleKind::Suffix, value)
    }

    /// Create a chargram (substring) pattern.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn chargram(value: &str) -> Result<Self, RuleError> {
        Self::compile(RuleKind::Chargram, value)
    }

    /// Create a pair pattern from its two halves.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn pair(first: &str, second: &str) -> Result<Self, RuleError> {
        Self::compile(RuleKind::Pair, &format!("{first}{PAIR_SEPARATOR}{second}"))
    }

    /// The kind this pattern was compiled from.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Prefix(_) => RuleKind::Prefix,
            Self::Suffix(_) => RuleKind::Suffix,
            Self::Chargram(_) => RuleKind::Chargram,
            Self::Pair { .. } => RuleKind::Pair,
        }
    }

    /// Test the pattern against a token. Section gating is not applied here.
    ///
    /// An empty token never matches.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        match self {
            Self::Prefix(p) => token.starts_with(p.as_str()),
            Self::Suffix(p) => token.ends_with(p.as_str()),
            Self::Chargram(p) => token.contains(p.as_str()),
            Self::Pair { first, second } => token
                .find(first.as_str())
                .and_then(|start| token.get(start + first.len()..))
                .is_some_and(|rest| rest.contains(second.as_str())),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(v) => write!(f, "Prefix(\"{v}\")"),
            Self::Suffix(v) => write!(f, "Suffix(\"{v}\")"),
            Self::Chargram(v) => write!(f, "Chargram(\"{v}\")"),
            Self::Pair { first, second } => write!(f, "Pair(\"{first}\", \"{second}\")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: &[&str] = &[
        "qokaiin", "chol", "daiin", "qokedy", "otedy", "shedy", "ol", "a", "aiinaiin", "qoqo",
    ];

    #[test]
    fn prefix_agrees_with_starts_with() {
        for p in ["qo", "ch", "d", "ol", "qokaiin", "qokaiinx"] {
            let pattern = Pattern::prefix(p).unwrap();
            for t in TOKENS {
                assert_eq!(pattern.matches(t), t.starts_with(p), "{p} on {t}");
            }
        }
    }

    #[test]
    fn suffix_agrees_with_ends_with() {
        for p in ["aiin", "dy", "l", "in", "edy"] {
            let pattern = Pattern::suffix(p).unwrap();
            for t in TOKENS {
                assert_eq!(pattern.matches(t), t.ends_with(p), "{p} on {t}");
            }
        }
    }

    #[test]
    fn chargram_agrees_with_contains() {
        for p in ["ai", "ke", "o", "iina", "zz"] {
            let pattern = Pattern::chargram(p).unwrap();
            for t in TOKENS {
                assert_eq!(pattern.matches(t), t.contains(p), "{p} on {t}");
            }
        }
    }

    #[test]
    fn pair_requires_order() {
        let pattern = Pattern::compile(RuleKind::Pair, "qo|dy").unwrap();
        assert!(pattern.matches("qokedy"));
        assert!(!pattern.matches("dyqok"));
        assert!(!pattern.matches("qok"));
    }

    #[test]
    fn pair_searches_after_first_span() {
        // "aa" starts at 0; "a" must be found from index 2 onward.
        let pattern = Pattern::pair("aa", "a").unwrap();
        assert!(!pattern.matches("aa"));
        assert!(pattern.matches("aaa"));

        // Halves may be identical.
        let pattern = Pattern::pair("qo", "qo").unwrap();
        assert!(pattern.matches("qoqo"));
        assert!(!pattern.matches("qok"));
    }

    #[test]
    fn pair_uses_first_occurrence_of_leading_half() {
        let pattern = Pattern::pair("o", "k").unwrap();
        assert!(pattern.matches("okol"));
        assert!(pattern.matches("olok"));
    }

    #[test]
    fn pair_handles_multibyte_tokens() {
        let pattern = Pattern::pair("é", "ï").unwrap();
        assert!(pattern.matches("aéxï"));
        assert!(!pattern.matches("ïé"));
    }

    #[test]
    fn empty_token_never_matches() {
        assert!(!Pattern::prefix("a").unwrap().matches(""));
        assert!(!Pattern::chargram("a").unwrap().matches(""));
        assert!(!Pattern::pair("a", "b").unwrap().matches(""));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert_eq!(Pattern::prefix(""), Err(RuleError::EmptyPattern));
        assert_eq!(
            Pattern::compile(RuleKind::Pair, ""),
            Err(RuleError::EmptyPattern)
        );
    }

    #[test]
    fn malformed_pairs_rejected() {
        for raw in ["qody", "|dy", "qo|", "a|b|c", "|"] {
            assert!(
                matches!(
                    Pattern::compile(RuleKind::Pair, raw),
                    Err(RuleError::MalformedPair { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn overlong_pattern_rejected() {
        let raw = "a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            Pattern::chargram(&raw),
            Err(RuleError::PatternTooLong { .. })
        ));
        assert!(Pattern::chargram(&raw[1..]).is_ok());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Suffix".parse::<RuleKind>(), Ok(RuleKind::Suffix));
        assert_eq!(" pair ".parse::<RuleKind>(), Ok(RuleKind::Pair));
        assert!(matches!(
            "infix".parse::<RuleKind>(),
            Err(RuleError::UnknownKind { .. })
        ));
    }

    #[test]
    fn kind_round_trips_through_pattern() {
        for kind in [
            RuleKind::Prefix,
            RuleKind::Suffix,
            RuleKind::Chargram,
            RuleKind::Pair,
        ] {
            let pattern = Pattern::compile(kind, "a|b").unwrap();
            assert_eq!(pattern.kind(), kind);
        }
    }

    #[test]
    fn display() {
        assert_eq!(Pattern::suffix("aiin").unwrap().to_string(), r#"Suffix("aiin")"#);
        assert_eq!(
            Pattern::pair("qo", "dy").unwrap().to_string(),
            r#"Pair("qo", "dy")"#
        );
    }
}
