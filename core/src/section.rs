//! Section gating — restricting a rule to parts of the manuscript.

use std::collections::BTreeSet;

/// Optional allow/deny lists over section labels.
///
/// - An allow-list admits only tokens whose section is a member. A token
///   without a section is not a member of any list.
/// - A deny-list rejects tokens whose section is a member.
/// - An absent (or empty) list places no restriction on its side.
///
/// # Example
///
/// ```
/// use folio::SectionGate;
///
/// let gate = SectionGate::allow(["Herbal"]);
/// assert!(gate.admits(Some("Herbal")));
/// assert!(!gate.admits(Some("Recipes")));
/// assert!(!gate.admits(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionGate {
    allow: Option<BTreeSet<String>>,
    deny: Option<BTreeSet<String>>,
}

impl SectionGate {
    /// A gate with no restrictions.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// A gate admitting only the given sections.
    #[must_use]
    pub fn allow<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::open().with_allow(sections)
    }

    /// A gate rejecting the given sections.
    #[must_use]
    pub fn deny<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::open().with_deny(sections)
    }

    /// Replace the allow-list (builder pattern).
    #[must_use]
    pub fn with_allow<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = non_empty(sections);
        self
    }

    /// Replace the deny-list (builder pattern).
    #[must_use]
    pub fn with_deny<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny = non_empty(sections);
        self
    }

    /// Returns the allow-list, if any.
    #[must_use]
    pub fn allowed(&self) -> Option<&BTreeSet<String>> {
        self.allow.as_ref()
    }

    /// Returns the deny-list, if any.
    #[must_use]
    pub fn denied(&self) -> Option<&BTreeSet<String>> {
        self.deny.as_ref()
    }

    /// Returns `true` if neither list is set.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.allow.is_none() && self.deny.is_none()
    }

    /// Whether a rule behind this gate applies to a token from `section`.
    #[must_use]
    pub fn admits(&self, section: Option<&str>) -> bool {
        self.is_allowed(section) && !self.is_denied(section)
    }

    pub(crate) fn is_allowed(&self, section: Option<&str>) -> bool {
        self.allow
            .as_ref()
            .map_or(true, |allow| section.is_some_and(|s| allow.contains(s)))
    }

    pub(crate) fn is_denied(&self, section: Option<&str>) -> bool {
        self.deny
            .as_ref()
            .is_some_and(|deny| section.is_some_and(|s| deny.contains(s)))
    }
}

fn non_empty<I, S>(sections: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: BTreeSet<String> = sections.into_iter().map(Into::into).collect();
    (!set.is_empty()).then_some(set)
}
