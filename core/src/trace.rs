//! Match trace types for debugging rulebooks.
//!
//! [`Rule::explain()`](crate::Rule::explain) returns a [`MatchTrace`] instead
//! of a bare `bool`, recording which check decided the outcome.
//!
//! # INV: `trace.fired()` == `rule.matches()`
//!
//! For the same token and section, the trace verdict is [`Verdict::Fired`]
//! exactly when [`Rule::matches`](crate::Rule::matches) returns `true`.

use serde::Serialize;
use std::fmt;

/// The check that decided a match.
///
/// Checks run in declaration order; the first failing one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The rule fired.
    Fired,
    /// The token has no text.
    EmptyToken,
    /// The rule has an allow-list and the section is not on it.
    SectionNotAllowed,
    /// The section is on the rule's deny-list.
    SectionDenied,
    /// The section was admitted but the pattern did not match.
    PatternMissed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fired => "fired",
            Self::EmptyToken => "empty token",
            Self::SectionNotAllowed => "section not allowed",
            Self::SectionDenied => "section denied",
            Self::PatternMissed => "pattern missed",
        })
    }
}

/// Trace of one rule evaluated against one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchTrace {
    /// The rule evaluated.
    pub rule_id: String,
    /// Display form of the rule's pattern (e.g. `Suffix("aiin")`).
    pub pattern: String,
    /// The token text.
    pub token: String,
    /// The token's section.
    pub section: Option<String>,
    /// Outcome.
    pub verdict: Verdict,
}

impl MatchTrace {
    /// Whether the rule fired.
    #[must_use]
    pub fn fired(&self) -> bool {
        self.verdict == Verdict::Fired
    }
}

impl fmt::Display for MatchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.rule_id, self.pattern, self.verdict)
    }
}
