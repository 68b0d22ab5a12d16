//! Canonical member roster and name normalization.
//!
//! The roster is process-scoped, read-only configuration: built once
//! before any document is processed and consulted (never mutated) by
//! the extraction engine. Matching never throws and never silently
//! drops a name; an unmatched or ambiguous token is a typed result the
//! caller must surface, because silent loss corrupts vote totals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate canonical name: {0}")]
    DuplicateName(String),
}

/// A stable identity for one council member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMember {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Outcome of resolving one raw name token against the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch<'a> {
    /// Exact or case/punctuation-insensitive match (including aliases).
    Canonical(&'a str),
    /// Matched through bounded edit distance; callers should record a
    /// fuzzy-match note alongside the member record.
    Fuzzy { canonical: &'a str, distance: usize },
    /// Two or more members at the same minimal distance; reported, not
    /// guessed. Candidates are in lexical order.
    Ambiguous { candidates: Vec<&'a str> },
    /// No roster member within the distance threshold.
    Unmatched,
}

/// Read-only lookup table over [`CanonicalMember`] entries.
///
/// Each member's match forms (canonical name, aliases, and their
/// surname tokens) are folded once at construction so per-token
/// resolution stays cheap.
#[derive(Debug, Clone)]
pub struct MemberRoster {
    members: Vec<CanonicalMember>,
    /// Folded match forms per member, parallel to `members`.
    forms: Vec<Vec<String>>,
}

impl MemberRoster {
    /// Build a roster from members, rejecting duplicate canonical names.
    pub fn new(members: Vec<CanonicalMember>) -> Result<Self, RosterError> {
        let mut seen = std::collections::BTreeSet::new();
        for m in &members {
            if !seen.insert(fold(&m.name)) {
                return Err(RosterError::DuplicateName(m.name.clone()));
            }
        }
        let forms = members.iter().map(match_forms).collect();
        Ok(Self { members, forms })
    }

    /// Build a roster of bare names with no aliases.
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|n| CanonicalMember {
                    name: n.into(),
                    aliases: Vec::new(),
                })
                .collect(),
        )
    }

    /// Load a roster from the external collaborator's JSON list:
    /// `[{ "name": "...", "aliases": ["..."] }, ...]`.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let members: Vec<CanonicalMember> = serde_json::from_str(json)?;
        Self::new(members)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[CanonicalMember] {
        &self.members
    }

    /// Resolve a raw name token to a canonical member.
    ///
    /// Exact match first, then case/punctuation-insensitive, then edit
    /// distance at most `max_distance` against every match form of
    /// every member. Fuzzy ties across distinct members come back as
    /// [`NameMatch::Ambiguous`]. Resolving an already-canonical name
    /// returns it unchanged.
    pub fn resolve(&self, raw: &str, max_distance: usize) -> NameMatch<'_> {
        let folded = fold(raw);
        if folded.is_empty() {
            return NameMatch::Unmatched;
        }

        // Exact / case-punctuation-insensitive pass over all forms. A
        // surname or alias shared by several members is a tie, never a
        // first-member-wins guess.
        let mut exact: Vec<&str> = Vec::new();
        for (member, forms) in self.members.iter().zip(&self.forms) {
            if forms.iter().any(|f| *f == folded) {
                exact.push(member.name.as_str());
            }
        }
        match exact.len() {
            0 => {}
            1 => return NameMatch::Canonical(exact[0]),
            _ => {
                exact.sort_unstable();
                return NameMatch::Ambiguous { candidates: exact };
            }
        }

        // Fuzzy pass: minimal Levenshtein distance over the cross
        // product of query forms and member forms.
        let query_forms = query_forms(&folded);
        let mut best: Vec<&str> = Vec::new();
        let mut best_distance = max_distance + 1;

        for (member, forms) in self.members.iter().zip(&self.forms) {
            let mut member_best = usize::MAX;
            for q in &query_forms {
                for f in forms {
                    member_best = member_best.min(strsim::levenshtein(q, f));
                }
            }
            if member_best < best_distance {
                best_distance = member_best;
                best = vec![member.name.as_str()];
            } else if member_best == best_distance && best_distance <= max_distance {
                best.push(member.name.as_str());
            }
        }

        match best.len() {
            0 => NameMatch::Unmatched,
            1 => {
                tracing::debug!(raw, canonical = best[0], distance = best_distance, "fuzzy name match");
                NameMatch::Fuzzy {
                    canonical: best[0],
                    distance: best_distance,
                }
            }
            _ => {
                best.sort_unstable();
                best.dedup();
                if best.len() == 1 {
                    NameMatch::Fuzzy {
                        canonical: best[0],
                        distance: best_distance,
                    }
                } else {
                    NameMatch::Ambiguous { candidates: best }
                }
            }
        }
    }
}

/// Fold a name for comparison: lowercase, strip punctuation, collapse
/// whitespace.
fn fold(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_space = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_space = false;
        } else if (c.is_whitespace() || c == '.' || c == ',' || c == '-' || c == '\'')
            && !last_space
        {
            out.push(' ');
            last_space = true;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Folded forms a member can be matched under: full name, each alias,
/// and the surname token of each, so "J. Smyth" can reach
/// "John Smith" through smyth ↔ smith.
fn match_forms(member: &CanonicalMember) -> Vec<String> {
    let mut forms = Vec::new();
    for source in std::iter::once(&member.name).chain(&member.aliases) {
        let folded = fold(source);
        if folded.is_empty() {
            continue;
        }
        if let Some(surname) = folded.rsplit(' ').next()
            && surname != folded
        {
            forms.push(surname.to_string());
        }
        forms.push(folded);
    }
    forms.sort_unstable();
    forms.dedup();
    forms
}

/// Query-side forms: the folded token plus its surname token.
fn query_forms(folded: &str) -> Vec<String> {
    let mut forms = vec![folded.to_string()];
    if let Some(surname) = folded.rsplit(' ').next()
        && surname != folded
    {
        forms.push(surname.to_string());
    }
    forms
}
