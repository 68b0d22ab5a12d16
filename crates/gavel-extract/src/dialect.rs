//! Dialect classification for item blocks.
//!
//! The two supported formats use disjoint vocabulary: finalized
//! ("approved") minutes carry numeric labeled vote counts, while
//! unapproved minutes narrate motions in prose. First match wins;
//! ambiguous blocks land in `Unrecognized` for manual review rather
//! than being guessed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Numeric labeled count header, e.g. "Ayes: 15" or "Noes: 2 -".
static COUNT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:Ayes|Noes|Nays|Abstentions?|Abstain|Absent|Excused|Recused|Non[ -]?Voting|Present Not Voting):\s*\d+\b",
    )
    .unwrap()
});

/// Narrative connector phrases from unapproved minutes.
static NARRATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bA motion was made by\b|\bseconded by\b|\bthe motion (?:carried|failed|passed)\b")
        .unwrap()
});

/// Approved-format motion markers that appear without a count table
/// (voice votes and unanimous adoptions). Bare "Adopt" is not enough:
/// it also occurs in discussion prose ("Adoption of the schedule").
static TABULAR_MOTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bAdopt the Following Amendment\b|\bAdopt\s+Unanimously\b|\bvoice vote\b|\bunanimous consent\b",
    )
    .unwrap()
});

/// Structural format of one block. Closed set: adding a dialect means
/// adding one variant and one parser strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentDialect {
    ApprovedTabular,
    UnapprovedNarrative,
    Unrecognized,
}

impl DocumentDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApprovedTabular => "approved_tabular",
            Self::UnapprovedNarrative => "unapproved_narrative",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Whether the text carries a numeric labeled count table.
pub(crate) fn has_count_table(text: &str) -> bool {
    COUNT_HEADER.is_match(text)
}

/// Outcome sentence from narrative minutes.
static OUTCOME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bthe motion (?:carried|failed|passed)\b").unwrap());

/// Voice-vote and unanimity markers, without the adoption titles.
static VOICE_VOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bvoice vote\b|\bunanimous(?:ly)?\b|\bunanimous consent\b").unwrap()
});

/// Whether the text records an actual outcome: a count table, an
/// outcome sentence, or a voice-vote/unanimity marker. An adoption
/// title alone is not evidence that a vote happened.
pub(crate) fn has_vote_evidence(text: &str) -> bool {
    COUNT_HEADER.is_match(text) || VOICE_VOTE.is_match(text) || OUTCOME.is_match(text)
}

/// Classify one block's text. Exactly one dialect per block.
pub fn classify(text: &str) -> DocumentDialect {
    if COUNT_HEADER.is_match(text) {
        DocumentDialect::ApprovedTabular
    } else if NARRATIVE.is_match(text) {
        DocumentDialect::UnapprovedNarrative
    } else if TABULAR_MOTION.is_match(text) {
        DocumentDialect::ApprovedTabular
    } else {
        DocumentDialect::Unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_table_is_tabular() {
        let text = "8. 78911 Amending the budget.\nAyes: 15 - A; B\nNoes: 2 - C; D";
        assert_eq!(classify(text), DocumentDialect::ApprovedTabular);
    }

    #[test]
    fn inline_counts_are_tabular() {
        let text = "Moved by Smith, seconded by Jones, to Approve Item 12. \
                    Ayes: 15, Noes: 2, Abstain: 0.";
        assert_eq!(classify(text), DocumentDialect::ApprovedTabular);
    }

    #[test]
    fn narrative_prose_is_narrative() {
        let text = "A motion was made by Lee, seconded by Kim, to refer Item 7 to committee. \
                    The motion carried unanimously.";
        assert_eq!(classify(text), DocumentDialect::UnapprovedNarrative);
    }

    #[test]
    fn counts_win_over_narrative_phrasing() {
        // Unapproved minutes sometimes carry a count table after the
        // narrative sentence; the count table decides the parse path.
        let text = "A motion was made by Lee, seconded by Kim, to Call the Question.\n\
                    The motion passed by the following vote:\nAyes: 17 - A; B";
        assert_eq!(classify(text), DocumentDialect::ApprovedTabular);
    }

    #[test]
    fn enumerated_names_without_counts_stay_narrative() {
        let text = "A motion was made by Lee, seconded by Kim, to adopt the report. \
                    Ayes: Lee, Kim. Noes: Park.";
        assert_eq!(classify(text), DocumentDialect::UnapprovedNarrative);
    }

    #[test]
    fn voice_vote_adoption_is_tabular() {
        let text = "8. 78911 Amending the budget.\nAdopt Unanimously by voice vote";
        assert_eq!(classify(text), DocumentDialect::ApprovedTabular);
    }

    #[test]
    fn adoption_discussion_is_not_tabular() {
        let text = "Adoption of the 2026 meeting schedule was discussed. No action taken.";
        assert_eq!(classify(text), DocumentDialect::Unrecognized);
        assert!(!has_vote_evidence(text));
    }

    #[test]
    fn unmarked_text_is_unrecognized() {
        assert_eq!(
            classify("General discussion of the annual report."),
            DocumentDialect::Unrecognized
        );
        assert_eq!(classify(""), DocumentDialect::Unrecognized);
    }
}
