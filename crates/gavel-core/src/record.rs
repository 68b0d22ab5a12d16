//! Output data model for extracted vote records.
//!
//! These types are the engine's contract with the external storage
//! collaborator: every record carries its own join key (meeting date,
//! item number, motion number), so no engine-internal surrogate key is
//! needed. Degraded parses are expressed as values plus [`QualityFlag`]
//! annotations, never as swallowed errors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed set of vote categories a member can be recorded under.
///
/// Source documents use drifting labels (Ayes/Noes/Abstentions/Excused/
/// Recused/Non Voting); [`VoteCategory::from_label`] maps the known
/// synonyms onto this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCategory {
    Aye,
    No,
    Abstain,
    Absent,
    Recused,
    PresentNotVoting,
}

impl VoteCategory {
    pub const ALL: [VoteCategory; 6] = [
        Self::Aye,
        Self::No,
        Self::Abstain,
        Self::Absent,
        Self::Recused,
        Self::PresentNotVoting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aye => "aye",
            Self::No => "no",
            Self::Abstain => "abstain",
            Self::Absent => "absent",
            Self::Recused => "recused",
            Self::PresentNotVoting => "present_not_voting",
        }
    }

    /// Map a source-document label onto a category.
    ///
    /// Accepts the tabular headers ("Ayes", "Noes", "Abstentions",
    /// "Excused", "Recused", "Non Voting") and the shorter variants
    /// seen in drifted formats ("Aye", "Abstain", "Absent").
    pub fn from_label(label: &str) -> Option<Self> {
        let folded = label.trim().to_ascii_lowercase().replace('-', " ");
        match folded.as_str() {
            "aye" | "ayes" => Some(Self::Aye),
            "no" | "noes" | "nays" => Some(Self::No),
            "abstain" | "abstains" | "abstention" | "abstentions" => Some(Self::Abstain),
            "absent" | "excused" => Some(Self::Absent),
            "recused" => Some(Self::Recused),
            "non voting" | "nonvoting" | "present not voting" => Some(Self::PresentNotVoting),
            _ => None,
        }
    }
}

/// Controlled vocabulary of motion types.
///
/// Inferred from the verb phrase following "to" in motion sentences.
/// Verbs outside the vocabulary are preserved verbatim in `Other`
/// rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionType {
    Approve,
    Adopt,
    Refer,
    Amend,
    Accept,
    Confirm,
    Grant,
    Deny,
    Table,
    Other(String),
}

impl MotionType {
    /// Infer a motion type from the verb phrase of a motion title.
    ///
    /// Only the leading verb is consulted; "Adopt Floor Amendment #1"
    /// maps to `Adopt`, "Call the Question" falls through to
    /// `Other("Call")`.
    pub fn from_phrase(phrase: &str) -> Self {
        let verb = phrase.split_whitespace().next().unwrap_or("");
        match verb.to_ascii_lowercase().trim_end_matches(',') {
            "approve" => Self::Approve,
            "adopt" => Self::Adopt,
            "refer" | "re-refer" => Self::Refer,
            "amend" => Self::Amend,
            "accept" => Self::Accept,
            "confirm" => Self::Confirm,
            "grant" => Self::Grant,
            "deny" => Self::Deny,
            "table" => Self::Table,
            "" => Self::Other(String::new()),
            _ => Self::Other(verb.trim_end_matches([',', '.', ';']).to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Approve => "Approve",
            Self::Adopt => "Adopt",
            Self::Refer => "Refer",
            Self::Amend => "Amend",
            Self::Accept => "Accept",
            Self::Confirm => "Confirm",
            Self::Grant => "Grant",
            Self::Deny => "Deny",
            Self::Table => "Table",
            Self::Other(v) => v.as_str(),
        }
    }
}

/// Non-fatal data-quality annotations.
///
/// Flags are surfaced on records and in the document warning channel;
/// none of them blocks emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    /// Document-level: no anchors found, zero output, explicit status.
    NoMotionsDetected,
    /// Block matched no supported dialect and was skipped.
    UnrecognizedBlock,
    /// Motion emitted with null mover/seconder/title fields.
    IncompleteMotionFields,
    /// Category counts disagree with a stated total or enumeration.
    CountMismatch,
    /// Outcome not statable from text; tally counts are all zero.
    Indeterminate,
    /// A name token matched no roster member and was omitted.
    UnmatchedName,
    /// A name token matched multiple roster members at equal distance.
    AmbiguousNameMatch,
    /// A name token was matched through edit distance, not exactly.
    FuzzyNameMatch,
    /// A member appeared more than once under one motion.
    DuplicateMemberVote,
}

impl QualityFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoMotionsDetected => "no_motions_detected",
            Self::UnrecognizedBlock => "unrecognized_block",
            Self::IncompleteMotionFields => "incomplete_motion_fields",
            Self::CountMismatch => "count_mismatch",
            Self::Indeterminate => "indeterminate",
            Self::UnmatchedName => "unmatched_name",
            Self::AmbiguousNameMatch => "ambiguous_name_match",
            Self::FuzzyNameMatch => "fuzzy_name_match",
            Self::DuplicateMemberVote => "duplicate_member_vote",
        }
    }
}

/// One entry in the per-document warning side channel, keyed by
/// item/motion number where the degraded record can be identified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub flag: QualityFlag,
    pub item_number: Option<String>,
    pub motion_number: Option<u32>,
    pub detail: String,
}

impl Warning {
    pub fn document(flag: QualityFlag, detail: impl Into<String>) -> Self {
        Self {
            flag,
            item_number: None,
            motion_number: None,
            detail: detail.into(),
        }
    }

    pub fn motion(
        flag: QualityFlag,
        item_number: Option<&str>,
        motion_number: u32,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            flag,
            item_number: item_number.map(str::to_string),
            motion_number: Some(motion_number),
            detail: detail.into(),
        }
    }
}

/// One motion acted upon at a meeting.
///
/// `(meeting_date, item_number, motion_number)` is unique within a run;
/// the motion number defaults to 1 and increments when an item carries
/// several successive motions (amendment, then main motion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionRecord {
    pub meeting_date: NaiveDate,
    pub item_number: Option<String>,
    pub motion_number: u32,
    pub title: String,
    pub motion_type: MotionType,
    pub legislative_reference: Option<String>,
    pub reference_url: Option<String>,
    pub mover: Option<String>,
    pub seconder: Option<String>,
}

/// Per-category vote counts for one motion.
///
/// An all-zero tally is valid and means the outcome was not statable
/// from the text (paired with [`QualityFlag::Indeterminate`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub ayes: u32,
    pub noes: u32,
    pub abstentions: u32,
    pub absent: u32,
    pub recused: u32,
    pub present_not_voting: u32,
    /// Council size used for consistency checking, when known.
    pub total_expected_voters: Option<u32>,
}

impl VoteTally {
    pub fn count(&self, category: VoteCategory) -> u32 {
        match category {
            VoteCategory::Aye => self.ayes,
            VoteCategory::No => self.noes,
            VoteCategory::Abstain => self.abstentions,
            VoteCategory::Absent => self.absent,
            VoteCategory::Recused => self.recused,
            VoteCategory::PresentNotVoting => self.present_not_voting,
        }
    }

    pub fn count_mut(&mut self, category: VoteCategory) -> &mut u32 {
        match category {
            VoteCategory::Aye => &mut self.ayes,
            VoteCategory::No => &mut self.noes,
            VoteCategory::Abstain => &mut self.abstentions,
            VoteCategory::Absent => &mut self.absent,
            VoteCategory::Recused => &mut self.recused,
            VoteCategory::PresentNotVoting => &mut self.present_not_voting,
        }
    }

    /// Sum over all categories.
    pub fn total(&self) -> u32 {
        VoteCategory::ALL.iter().map(|c| self.count(*c)).sum()
    }

    /// Unanimous iff exactly one of {aye, no} is nonzero and no
    /// counted voter abstained, was recused, or was present without
    /// voting. Absent members are not counted voters and do not
    /// defeat unanimity.
    pub fn is_unanimous(&self) -> bool {
        let split = (self.ayes > 0) ^ (self.noes > 0);
        split && self.abstentions == 0 && self.recused == 0 && self.present_not_voting == 0
    }

    /// Check counts against the expected total, when one is known.
    ///
    /// `None` means no check is possible.
    pub fn matches_expected(&self) -> Option<bool> {
        self.total_expected_voters.map(|t| self.total() == t)
    }
}

/// One council member's recorded vote on one motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberVoteRecord {
    pub meeting_date: NaiveDate,
    pub item_number: Option<String>,
    pub motion_number: u32,
    /// Canonical member name resolved by the roster.
    pub member: String,
    pub category: VoteCategory,
}

/// One summary row per motion/tally pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub meeting_date: NaiveDate,
    pub item_number: Option<String>,
    pub motion_number: u32,
    pub title: String,
    pub motion_type: MotionType,
    pub legislative_reference: Option<String>,
    pub reference_url: Option<String>,
    pub mover: Option<String>,
    pub seconder: Option<String>,
    pub tally: VoteTally,
    pub is_unanimous: bool,
    pub flags: Vec<QualityFlag>,
}

/// Document-level extraction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Extracted,
    /// No anchors found; some meetings legitimately have no votable
    /// items, so this is a status, not an error.
    NoMotionsDetected,
}

/// The engine's complete per-document output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExtract {
    pub document_id: String,
    pub meeting_date: NaiveDate,
    pub status: DocumentStatus,
    pub summaries: Vec<SummaryRecord>,
    pub member_votes: Vec<MemberVoteRecord>,
    pub warnings: Vec<Warning>,
}
