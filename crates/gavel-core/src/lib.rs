pub mod options;
pub mod record;
pub mod roster;

pub use options::ExtractOptions;
pub use record::{
    DocumentExtract, DocumentStatus, MemberVoteRecord, MotionRecord, MotionType, QualityFlag,
    SummaryRecord, VoteCategory, VoteTally, Warning,
};
pub use roster::{CanonicalMember, MemberRoster, NameMatch, RosterError};
