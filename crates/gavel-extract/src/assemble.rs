//! Record assembly: the full per-document pipeline.
//!
//! Segmenter → classifier → motion/tally parsers → name normalizer →
//! output records. Failures are block-scoped and degrade to partial
//! records plus flags; the engine never aborts a document because one
//! block fails, and no warning is ever swallowed.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use gavel_core::{
    DocumentExtract, DocumentStatus, ExtractOptions, MemberRoster, MemberVoteRecord, NameMatch,
    QualityFlag, SummaryRecord, Warning,
};

use crate::dialect::{self, DocumentDialect};
use crate::motion::parse_motions;
use crate::segment::segment;
use crate::tally::parse_tally;

/// Extract all vote records from one document's plain text.
///
/// Pure over its input: no I/O, no shared mutable state beyond the
/// read-only roster. Identical input yields byte-identical output.
pub fn extract_document(
    document_id: &str,
    meeting_date: NaiveDate,
    text: &str,
    roster: &MemberRoster,
    opts: &ExtractOptions,
) -> DocumentExtract {
    let mut summaries: Vec<SummaryRecord> = Vec::new();
    let mut member_votes: Vec<MemberVoteRecord> = Vec::new();
    let mut warnings: Vec<Warning> = Vec::new();
    let mut seen_keys: BTreeSet<(Option<String>, u32)> = BTreeSet::new();

    for block in segment(document_id, meeting_date, text) {
        let dialect = dialect::classify(block.text);
        if dialect == DocumentDialect::Unrecognized {
            tracing::warn!(
                document_id,
                start = block.start,
                end = block.end,
                "unrecognized block"
            );
            warnings.push(Warning::document(
                QualityFlag::UnrecognizedBlock,
                format!("block at bytes {}..{} matched no supported dialect", block.start, block.end),
            ));
            continue;
        }

        for motion in parse_motions(&block, dialect, opts) {
            let parse = parse_tally(motion.text, dialect, opts);
            let mut record = motion.record;
            let mut flags = motion.flags;
            flags.extend(parse.flags.iter().copied());

            // Enforce (date, item, motion) uniqueness within the run.
            let mut key = (record.item_number.clone(), record.motion_number);
            while seen_keys.contains(&key) {
                key.1 += 1;
            }
            record.motion_number = key.1;
            seen_keys.insert(key);

            if flags.contains(&QualityFlag::CountMismatch) {
                warnings.push(Warning::motion(
                    QualityFlag::CountMismatch,
                    record.item_number.as_deref(),
                    record.motion_number,
                    format!(
                        "category counts sum to {} (expected {:?})",
                        parse.tally.total(),
                        parse.tally.total_expected_voters
                    ),
                ));
            }

            // Resolve enumerated names against the roster. Unmatched
            // and ambiguous tokens surface as warnings, never as
            // member records, and never as silent drops.
            let mut seen_members: BTreeSet<String> = BTreeSet::new();
            for (category, tokens) in &parse.names {
                for token in tokens {
                    let canonical = match roster.resolve(token, opts.fuzzy_distance_threshold) {
                        NameMatch::Canonical(name) => name.to_string(),
                        NameMatch::Fuzzy {
                            canonical,
                            distance,
                        } => {
                            flags.push(QualityFlag::FuzzyNameMatch);
                            warnings.push(Warning::motion(
                                QualityFlag::FuzzyNameMatch,
                                record.item_number.as_deref(),
                                record.motion_number,
                                format!("\"{token}\" matched \"{canonical}\" at distance {distance}"),
                            ));
                            canonical.to_string()
                        }
                        NameMatch::Ambiguous { candidates } => {
                            flags.push(QualityFlag::AmbiguousNameMatch);
                            warnings.push(Warning::motion(
                                QualityFlag::AmbiguousNameMatch,
                                record.item_number.as_deref(),
                                record.motion_number,
                                format!("\"{token}\" is equidistant from {}", candidates.join(", ")),
                            ));
                            continue;
                        }
                        NameMatch::Unmatched => {
                            flags.push(QualityFlag::UnmatchedName);
                            warnings.push(Warning::motion(
                                QualityFlag::UnmatchedName,
                                record.item_number.as_deref(),
                                record.motion_number,
                                format!("\"{token}\" matched no roster member"),
                            ));
                            continue;
                        }
                    };

                    if !seen_members.insert(canonical.clone()) {
                        flags.push(QualityFlag::DuplicateMemberVote);
                        warnings.push(Warning::motion(
                            QualityFlag::DuplicateMemberVote,
                            record.item_number.as_deref(),
                            record.motion_number,
                            format!("\"{canonical}\" recorded more than once"),
                        ));
                        continue;
                    }
                    member_votes.push(MemberVoteRecord {
                        meeting_date,
                        item_number: record.item_number.clone(),
                        motion_number: record.motion_number,
                        member: canonical,
                        category: *category,
                    });
                }
            }

            let is_unanimous =
                parse.tally.is_unanimous() || (parse.unanimous_marker && parse.tally.total() == 0);

            flags.sort();
            flags.dedup();
            summaries.push(SummaryRecord {
                meeting_date: record.meeting_date,
                item_number: record.item_number,
                motion_number: record.motion_number,
                title: record.title,
                motion_type: record.motion_type,
                legislative_reference: record.legislative_reference,
                reference_url: record.reference_url,
                mover: record.mover,
                seconder: record.seconder,
                tally: parse.tally,
                is_unanimous,
                flags,
            });
        }
    }

    let status = if summaries.is_empty() {
        DocumentStatus::NoMotionsDetected
    } else {
        DocumentStatus::Extracted
    };
    tracing::info!(
        document_id,
        summaries = summaries.len(),
        member_votes = member_votes.len(),
        warnings = warnings.len(),
        "document extracted"
    );

    DocumentExtract {
        document_id: document_id.to_string(),
        meeting_date,
        status,
        summaries,
        member_votes,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_core::{MotionType, VoteCategory};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn roster() -> MemberRoster {
        MemberRoster::from_names(["John Smith", "Ana Jones", "Priya Lee"]).unwrap()
    }

    fn opts_with(total: Option<u32>) -> ExtractOptions {
        ExtractOptions {
            total_expected_voters: total,
            ..ExtractOptions::default()
        }
    }

    #[test]
    fn tabular_scenario_end_to_end() {
        let text =
            "Moved by Smith, seconded by Jones, to Approve Item 12. Ayes: 15, Noes: 2, Abstain: 0.";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(None));
        assert_eq!(out.status, DocumentStatus::Extracted);
        assert_eq!(out.summaries.len(), 1);
        let s = &out.summaries[0];
        assert_eq!(s.item_number.as_deref(), Some("12"));
        assert_eq!(s.motion_type, MotionType::Approve);
        assert_eq!(s.mover.as_deref(), Some("Smith"));
        assert_eq!(s.seconder.as_deref(), Some("Jones"));
        assert_eq!(s.tally.ayes, 15);
        assert_eq!(s.tally.noes, 2);
        assert_eq!(s.tally.abstentions, 0);
        assert!(!s.is_unanimous);
        assert!(out.member_votes.is_empty());
    }

    #[test]
    fn narrative_unanimous_scenario_end_to_end() {
        let text = "A motion was made by Lee, seconded by Kim, to refer Item 7 to committee. \
                    The motion carried unanimously.";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(Some(20)));
        assert_eq!(out.summaries.len(), 1);
        let s = &out.summaries[0];
        assert_eq!(s.motion_type, MotionType::Refer);
        assert_eq!(s.tally.ayes, 20);
        assert!(s.is_unanimous);
        assert!(!s.flags.contains(&QualityFlag::CountMismatch));
        assert!(out.member_votes.is_empty());
    }

    #[test]
    fn no_anchors_yields_no_motions_detected() {
        let out = extract_document(
            "doc",
            date(),
            "General discussion. Nothing moved or voted on.",
            &roster(),
            &opts_with(None),
        );
        assert_eq!(out.status, DocumentStatus::NoMotionsDetected);
        assert!(out.summaries.is_empty());
        assert!(out.member_votes.is_empty());
    }

    #[test]
    fn empty_text_short_circuits() {
        let out = extract_document("doc", date(), "", &roster(), &opts_with(None));
        assert_eq!(out.status, DocumentStatus::NoMotionsDetected);
        assert!(out.summaries.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn adoption_discussion_produces_no_motion() {
        let text =
            "8. 78911 Adoption of the 2026 meeting schedule was discussed. No action taken.";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(None));
        assert!(out.summaries.is_empty());
        assert_eq!(out.status, DocumentStatus::NoMotionsDetected);
        assert!(out
            .warnings
            .iter()
            .all(|w| w.flag == QualityFlag::UnrecognizedBlock));
    }

    #[test]
    fn shared_surname_vote_is_reported_ambiguous() {
        let r = MemberRoster::from_names(["Dana Park", "John Park", "Ana Jones"]).unwrap();
        let text = "8. 78911 Budget.\nMoved by Jones, seconded by Park, to Approve Item 8.\n\
                    Ayes: 1 - Park";
        let out = extract_document("doc", date(), text, &r, &opts_with(None));
        assert!(out.member_votes.is_empty());
        let w = out
            .warnings
            .iter()
            .find(|w| w.flag == QualityFlag::AmbiguousNameMatch)
            .expect("ambiguous warning");
        assert!(w.detail.contains("Dana Park") && w.detail.contains("John Park"));
    }

    #[test]
    fn unrecognized_block_is_reported_not_dropped() {
        let text = "8. 78911 Opaque agenda fragment with no vote vocabulary.";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(None));
        assert!(out.summaries.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].flag, QualityFlag::UnrecognizedBlock);
    }

    #[test]
    fn member_records_resolve_through_roster() {
        let text = "8. 78911 Budget amendment.\n\
                    Moved by Smith, seconded by Jones, to Approve Item 8.\n\
                    Ayes: 2 - Smith; Lee\nNoes: 1 - J0nes";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(Some(3)));
        assert_eq!(out.summaries.len(), 1);
        assert_eq!(out.member_votes.len(), 3);

        let members: Vec<&str> = out.member_votes.iter().map(|m| m.member.as_str()).collect();
        assert_eq!(members, vec!["John Smith", "Priya Lee", "Ana Jones"]);
        assert_eq!(out.member_votes[2].category, VoteCategory::No);

        // "J0nes" resolved fuzzily; note recorded, not silenced.
        assert!(out
            .warnings
            .iter()
            .any(|w| w.flag == QualityFlag::FuzzyNameMatch && w.detail.contains("J0nes")));
        assert!(out.summaries[0].flags.contains(&QualityFlag::FuzzyNameMatch));
    }

    #[test]
    fn member_identities_are_pairwise_distinct_per_motion() {
        let text = "8. 78911 Budget.\nMoved by Smith, seconded by Jones, to Approve Item 8.\n\
                    Ayes: 2 - Smith; Smith";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(None));
        assert_eq!(out.member_votes.len(), 1);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.flag == QualityFlag::DuplicateMemberVote));
    }

    #[test]
    fn unmatched_name_is_omitted_with_warning() {
        let text = "8. 78911 Budget.\nMoved by Smith, seconded by Jones, to Approve Item 8.\n\
                    Ayes: 2 - Smith; Zzyzx";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(None));
        assert_eq!(out.member_votes.len(), 1);
        let w = out
            .warnings
            .iter()
            .find(|w| w.flag == QualityFlag::UnmatchedName)
            .expect("unmatched-name warning");
        assert!(w.detail.contains("Zzyzx"));
        assert_eq!(w.item_number.as_deref(), Some("8"));
    }

    #[test]
    fn ambiguous_name_is_distinguished_from_a_miss() {
        let r = MemberRoster::from_names(["Dana Park", "Dana Mark"]).unwrap();
        let text = "8. 78911 Budget.\nMoved by Park, seconded by Mark, to Approve Item 8.\n\
                    Ayes: 1 - Dana Bark";
        let out = extract_document("doc", date(), text, &r, &opts_with(None));
        assert!(out.member_votes.is_empty());
        let w = out
            .warnings
            .iter()
            .find(|w| w.flag == QualityFlag::AmbiguousNameMatch)
            .expect("ambiguous warning");
        assert!(w.detail.contains("Dana Mark") && w.detail.contains("Dana Park"));
        assert!(!out
            .warnings
            .iter()
            .any(|w| w.flag == QualityFlag::UnmatchedName));
    }

    #[test]
    fn summary_count_equals_parsed_motions() {
        let text = "4. 90249 Pilot program.\n\
                    A motion was made by Lee, seconded by Smith, to Adopt Floor Amendment #1.\n\
                    The motion passed by voice vote.\n\
                    A motion was made by Jones, seconded by Lee, to approve the substitute.\n\
                    Ayes: 2 - Lee; Jones\n\
                    9. 78920 Accepting a report.\n\
                    Moved by Smith, seconded by Jones, to Accept the report. Ayes: 3, Noes: 0.";
        let out = extract_document("doc", date(), text, &roster(), &opts_with(Some(3)));
        assert_eq!(out.summaries.len(), 3);
        assert_eq!(out.summaries[0].motion_number, 1);
        assert_eq!(out.summaries[1].motion_number, 2);
        assert_eq!(out.summaries[2].item_number.as_deref(), Some("9"));
        assert_eq!(out.summaries[2].motion_number, 1);
    }

    #[test]
    fn rerun_is_byte_identical() {
        let text = "4. 90249 Pilot program.\n\
                    A motion was made by Lee, seconded by Smith, to Adopt Floor Amendment #1.\n\
                    Ayes: 2 - Lee; Smith\nNoes: 1 - J0nes";
        let opts = opts_with(Some(3));
        let r = roster();
        let a = extract_document("doc", date(), text, &r, &opts);
        let b = extract_document("doc", date(), text, &r, &opts);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
