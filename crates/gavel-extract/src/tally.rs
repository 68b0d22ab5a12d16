//! Vote-outcome parsing: labeled count tables, enumerated name lists,
//! and voice-vote/unanimous markers.
//!
//! Every motion gets exactly one tally. An all-zero tally is valid and
//! means the outcome was not statable from the text; it travels with
//! the `Indeterminate` flag instead of being dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use gavel_core::{ExtractOptions, QualityFlag, VoteCategory, VoteTally};

use crate::dialect::DocumentDialect;
use crate::names::parse_name_tokens;

/// Labeled numeric count section: "Ayes: 15" or "Noes: 2 - names…".
static COUNT_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Ayes|Noes|Nays|Abstentions?|Abstain|Absent|Excused|Recused|Non[ -]?Voting|Present Not Voting):\s*(\d+)\s*(-)?",
    )
    .unwrap()
});

/// Enumerated narrative list header: "Ayes: Lee, Kim."
static NAME_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Ayes|Noes|Nays|Abstentions?|Abstain|Absent|Excused|Recused|Non[ -]?Voting|Present Not Voting)\s*:\s*",
    )
    .unwrap()
});

/// End of a narrative name list within a motion sentence.
static LIST_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:The|A) motion\b").unwrap());

static UNANIMOUS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bunanimous(?:ly)?\b|\bvoice vote\b|\bunanimous consent\b").unwrap()
});

/// Parsed outcome of one motion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyParse {
    pub tally: VoteTally,
    /// Enumerated member names per category, in document order.
    pub names: Vec<(VoteCategory, Vec<String>)>,
    pub flags: Vec<QualityFlag>,
    /// The text carried an explicit unanimity/voice-vote marker.
    pub unanimous_marker: bool,
}

/// Parse the vote outcome from motion-scoped text.
///
/// Never fails; the worst case is an all-zero `Indeterminate` tally.
pub fn parse_tally(text: &str, dialect: DocumentDialect, opts: &ExtractOptions) -> TallyParse {
    let mut parse = match dialect {
        DocumentDialect::UnapprovedNarrative => parse_narrative(text),
        // Unrecognized blocks never reach the tally parser; treat any
        // stray caller like the tabular path.
        _ => parse_tabular(text),
    };

    parse.unanimous_marker = UNANIMOUS_MARKER.is_match(text);

    // A unanimity or voice-vote marker standing in for a table fills
    // the aye count with the expected total, when one is known.
    if parse.tally.total() == 0 {
        if parse.unanimous_marker {
            match opts.total_expected_voters {
                Some(total) => parse.tally.ayes = total,
                None => parse.flags.push(QualityFlag::Indeterminate),
            }
        } else {
            parse.flags.push(QualityFlag::Indeterminate);
        }
    }

    parse.tally.total_expected_voters = opts.total_expected_voters;
    if parse.tally.matches_expected() == Some(false) && parse.tally.total() > 0 {
        parse.flags.push(QualityFlag::CountMismatch);
    }

    parse.flags.sort();
    parse.flags.dedup();
    parse
}

/// Approved format: read the labeled count table directly. Names are
/// enumerated only behind a dash ("Ayes: 15 - A; B").
fn parse_tabular(text: &str) -> TallyParse {
    let mut parse = TallyParse::default();

    let sections: Vec<_> = COUNT_SECTION.captures_iter(text).collect();
    for (i, caps) in sections.iter().enumerate() {
        let Some(category) = VoteCategory::from_label(&caps[1]) else {
            continue;
        };
        let count: u32 = caps[2].parse().unwrap_or(0);
        *parse.tally.count_mut(category) = count;

        if caps.get(3).is_some() {
            let span_start = caps.get(0).unwrap().end();
            let span_end = sections
                .get(i + 1)
                .map(|c| c.get(0).unwrap().start())
                .unwrap_or(text.len());
            let tokens = parse_name_tokens(&text[span_start..span_end]);
            if tokens.len() as u32 != count {
                parse.flags.push(QualityFlag::CountMismatch);
            }
            if !tokens.is_empty() {
                parse.names.push((category, tokens));
            }
        }
    }

    parse
}

/// Unapproved format: counts are derived from enumerated name lists.
fn parse_narrative(text: &str) -> TallyParse {
    let mut parse = TallyParse::default();

    let sections: Vec<_> = NAME_LIST.captures_iter(text).collect();
    for (i, caps) in sections.iter().enumerate() {
        let Some(category) = VoteCategory::from_label(&caps[1]) else {
            continue;
        };
        let span_start = caps.get(0).unwrap().end();
        let span_end = sections
            .get(i + 1)
            .map(|c| c.get(0).unwrap().start())
            .unwrap_or(text.len());
        let span = &text[span_start..span_end];
        let span = match LIST_END.find(span) {
            Some(m) => &span[..m.start()],
            None => span,
        };

        let tokens = parse_name_tokens(span);
        *parse.tally.count_mut(category) = tokens.len() as u32;
        if !tokens.is_empty() {
            parse.names.push((category, tokens));
        }
    }

    parse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts_with(total: Option<u32>) -> ExtractOptions {
        ExtractOptions {
            total_expected_voters: total,
            ..ExtractOptions::default()
        }
    }

    #[test]
    fn inline_count_table() {
        let text = "Moved by Smith, seconded by Jones, to Approve Item 12. \
                    Ayes: 15, Noes: 2, Abstain: 0.";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(None));
        assert_eq!(parse.tally.ayes, 15);
        assert_eq!(parse.tally.noes, 2);
        assert_eq!(parse.tally.abstentions, 0);
        assert!(parse.names.is_empty());
        assert!(parse.flags.is_empty());
        assert!(!parse.tally.is_unanimous());
    }

    #[test]
    fn count_table_with_enumerated_names() {
        let text = "Ayes: 3 - Vidaver; Field and Govindarajan\nNoes: 1 - Currie";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(Some(4)));
        assert_eq!(parse.tally.ayes, 3);
        assert_eq!(parse.tally.noes, 1);
        assert_eq!(
            parse.names,
            vec![
                (
                    VoteCategory::Aye,
                    vec![
                        "Vidaver".to_string(),
                        "Field".to_string(),
                        "Govindarajan".to_string()
                    ]
                ),
                (VoteCategory::No, vec!["Currie".to_string()]),
            ]
        );
        assert!(parse.flags.is_empty());
    }

    #[test]
    fn enumeration_shorter_than_count_is_a_mismatch() {
        let text = "Ayes: 3 - Vidaver; Field";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(None));
        assert_eq!(parse.tally.ayes, 3);
        assert_eq!(parse.flags, vec![QualityFlag::CountMismatch]);
    }

    #[test]
    fn voice_vote_fills_expected_total() {
        let text = "Adopt Unanimously by voice vote";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(Some(20)));
        assert_eq!(parse.tally.ayes, 20);
        assert_eq!(parse.tally.total(), 20);
        assert!(parse.unanimous_marker);
        assert!(parse.flags.is_empty());
        assert!(parse.tally.is_unanimous());
    }

    #[test]
    fn voice_vote_without_known_total_is_indeterminate() {
        let text = "Adopt Unanimously by voice vote";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(None));
        assert_eq!(parse.tally.total(), 0);
        assert!(parse.unanimous_marker);
        assert_eq!(parse.flags, vec![QualityFlag::Indeterminate]);
    }

    #[test]
    fn narrative_enumerated_names() {
        let text = "A motion was made by Lee, seconded by Kim, to adopt the report. \
                    Ayes: Lee, Kim. Noes: Park.";
        let parse = parse_tally(text, DocumentDialect::UnapprovedNarrative, &opts_with(Some(3)));
        assert_eq!(parse.tally.ayes, 2);
        assert_eq!(parse.tally.noes, 1);
        assert_eq!(
            parse.names,
            vec![
                (VoteCategory::Aye, vec!["Lee".to_string(), "Kim".to_string()]),
                (VoteCategory::No, vec!["Park".to_string()]),
            ]
        );
        assert!(parse.flags.is_empty());
    }

    #[test]
    fn bare_motion_carried_is_indeterminate() {
        let text = "A motion was made by Lee, seconded by Kim, to adopt the report. \
                    The motion carried.";
        let parse = parse_tally(text, DocumentDialect::UnapprovedNarrative, &opts_with(Some(20)));
        assert_eq!(parse.tally.total(), 0);
        assert!(!parse.unanimous_marker);
        assert_eq!(parse.flags, vec![QualityFlag::Indeterminate]);
    }

    #[test]
    fn carried_unanimously_resolves_total() {
        let text = "A motion was made by Lee, seconded by Kim, to refer Item 7 to committee. \
                    The motion carried unanimously.";
        let parse = parse_tally(text, DocumentDialect::UnapprovedNarrative, &opts_with(Some(20)));
        assert_eq!(parse.tally.ayes, 20);
        assert!(parse.unanimous_marker);
        assert!(parse.flags.is_empty());
        assert_eq!(parse.tally.matches_expected(), Some(true));
    }

    #[test]
    fn sum_differing_from_expected_total_is_flagged() {
        let text = "Ayes: 15, Noes: 2";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(Some(20)));
        assert_eq!(parse.tally.total(), 17);
        assert_eq!(parse.flags, vec![QualityFlag::CountMismatch]);
    }

    #[test]
    fn all_categories_read() {
        let text = "Ayes: 14 - A\nNoes: 2 - B\nAbstentions: 1 - C\nExcused: 2 - D\n\
                    Recused: 1 - E\nNon Voting: 1 - F";
        let parse = parse_tally(text, DocumentDialect::ApprovedTabular, &opts_with(Some(21)));
        assert_eq!(parse.tally.ayes, 14);
        assert_eq!(parse.tally.noes, 2);
        assert_eq!(parse.tally.abstentions, 1);
        assert_eq!(parse.tally.absent, 2);
        assert_eq!(parse.tally.recused, 1);
        assert_eq!(parse.tally.present_not_voting, 1);
        // Stated counts above one with a single enumerated name are
        // mismatches.
        assert!(parse.flags.contains(&QualityFlag::CountMismatch));
    }
}
