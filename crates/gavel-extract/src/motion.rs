//! Motion-level parsing: item/reference numbers, motion clauses,
//! mover/seconder names, and the motion-type vocabulary.
//!
//! A block yields zero or more motions. Motion numbers start at 1 and
//! increment for each successive clause within the block, since one
//! agenda item can carry an amendment and then the main motion.

use once_cell::sync::Lazy;
use regex::Regex;

use gavel_core::{ExtractOptions, MotionRecord, MotionType, QualityFlag};

use crate::dialect::{self, DocumentDialect};
use crate::segment::RawBlock;

/// Agenda-item line: item number, legislative reference, rest of line.
static ITEM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\d+)\.\s+(\d{4,6})\b[ \t]*([^\n]*)").unwrap());

/// "Item NN" label inside a motion sentence.
static ITEM_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bItem\s+#?(\d+)\b").unwrap());

/// The documented narrative construct, in full.
static MADE_BY_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bA motion was made by\s+(.+?),\s*(?:and\s+)?seconded by\s+(.+?),\s*to\s+([^.;\n]+)")
        .unwrap()
});

/// Narrative clause missing its seconder but keeping a to-clause; the
/// mover capture stops at " to " so the title does not bleed into it.
static MADE_BY_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bA motion was made by\s+([^,.;\n]+?)\s+to\s+([^.;\n]+)").unwrap()
});

/// Narrative clause reduced to a bare mover.
static MADE_BY_PARTIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bA motion was made by\s+([^,.;\n]+)").unwrap());

/// Approved-format mover/seconder clause with a title.
static MOVED_BY_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bMoved by\s+(.+?),\s*(?:and\s+)?seconded by\s+(.+?),\s*to\s+([^.;\n]+)")
        .unwrap()
});

/// Approved-format mover/seconder clause without a title.
static MOVED_BY_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bMoved by\s+(.+?),\s*(?:and\s+)?seconded by\s+([^,.;\n]+)").unwrap()
});

/// Stray seconder in a deviating narrative sentence.
static SECONDED_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bseconded by\s+([^,.;\n]+)").unwrap());

/// Title continuation after a partial clause, within the sentence.
static TO_AFTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^.\n]*?\bto\s+([^.;\n]+)").unwrap());

/// Approved-format adoption titles (no mover/seconder in this form).
/// Both branches are word-bounded so "Adoption of …" prose never
/// reads as an action line.
static ADOPT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bAdopt the Following Amendment\b|\bAdopt\b(?:\s+Unanimously)?").unwrap()
});

/// One motion extracted from a block, with the motion-scoped text the
/// tally parser should read.
#[derive(Debug, Clone)]
pub struct MotionParse<'a> {
    pub record: MotionRecord,
    pub text: &'a str,
    pub flags: Vec<QualityFlag>,
}

#[derive(Debug)]
struct Clause {
    start: usize,
    mover: Option<String>,
    seconder: Option<String>,
    title: Option<String>,
    motion_type: Option<MotionType>,
    incomplete: bool,
}

/// Parse all motions in one classified block.
///
/// Returns an empty vector only when the block describes no actionable
/// motion at all (pure discussion). A block with vote evidence but no
/// recognizable clause still yields one flagged motion, so its tally
/// is surfaced rather than dropped.
pub fn parse_motions<'a>(
    block: &RawBlock<'a>,
    dialect: DocumentDialect,
    opts: &ExtractOptions,
) -> Vec<MotionParse<'a>> {
    let text = block.text;
    let mut clauses = scan_clauses(text, dialect);

    if clauses.is_empty() {
        if !dialect::has_vote_evidence(text) {
            return Vec::new();
        }
        // Vote evidence with no clause: synthesize one degraded motion
        // so the outcome is not silently lost.
        clauses.push(Clause {
            start: 0,
            mover: None,
            seconder: None,
            title: item_line_title(text),
            motion_type: Some(MotionType::Other("Main Motion".to_string())),
            incomplete: true,
        });
    }

    let (item_number, reference) = item_and_reference(text);

    let mut motions = Vec::with_capacity(clauses.len());
    for (i, clause) in clauses.iter().enumerate() {
        let span_end = clauses.get(i + 1).map(|c| c.start).unwrap_or(text.len());
        let motion_text = &text[clause.start..span_end];

        let title = clause.title.clone().unwrap_or_default();
        let motion_type = clause
            .motion_type
            .clone()
            .unwrap_or_else(|| MotionType::from_phrase(&title));

        let item = item_number
            .clone()
            .or_else(|| ITEM_LABEL.captures(&title).map(|c| c[1].to_string()))
            .or_else(|| ITEM_LABEL.captures(motion_text).map(|c| c[1].to_string()));

        let mut flags = Vec::new();
        if clause.incomplete
            || (dialect == DocumentDialect::UnapprovedNarrative
                && (clause.mover.is_none() || clause.seconder.is_none()))
            || item.is_none()
        {
            flags.push(QualityFlag::IncompleteMotionFields);
        }

        motions.push(MotionParse {
            record: MotionRecord {
                meeting_date: block.meeting_date,
                item_number: item,
                motion_number: (i + 1) as u32,
                title,
                motion_type,
                legislative_reference: reference.clone(),
                reference_url: reference.as_deref().map(|r| opts.reference_url(r)),
                mover: clause.mover.clone(),
                seconder: clause.seconder.clone(),
            },
            text: motion_text,
            flags,
        });
    }

    tracing::debug!(
        document_id = block.document_id,
        dialect = dialect.as_str(),
        motions = motions.len(),
        "parsed block"
    );
    motions
}

/// Collect motion clauses in document order, suppressing partial
/// patterns that fall inside an already-claimed full clause.
fn scan_clauses(text: &str, dialect: DocumentDialect) -> Vec<Clause> {
    let mut clauses: Vec<Clause> = Vec::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for caps in MADE_BY_FULL
        .captures_iter(text)
        .chain(MOVED_BY_FULL.captures_iter(text))
    {
        let m = caps.get(0).unwrap();
        claimed.push((m.start(), m.end()));
        clauses.push(Clause {
            start: m.start(),
            mover: Some(clean_name(&caps[1])),
            seconder: Some(clean_name(&caps[2])),
            title: Some(clean_title(&caps[3])),
            motion_type: None,
            incomplete: false,
        });
    }

    for caps in MOVED_BY_BARE.captures_iter(text) {
        let m = caps.get(0).unwrap();
        if inside(&claimed, m.start()) {
            continue;
        }
        claimed.push((m.start(), m.end()));
        clauses.push(Clause {
            start: m.start(),
            mover: Some(clean_name(&caps[1])),
            seconder: Some(clean_name(&caps[2])),
            title: None,
            motion_type: None,
            incomplete: true,
        });
    }

    for caps in MADE_BY_TO.captures_iter(text) {
        let m = caps.get(0).unwrap();
        if inside(&claimed, m.start()) {
            continue;
        }
        let rest = &text[m.end()..];
        let seconder = SECONDED_ONLY
            .captures(rest)
            .filter(|c| c.get(0).unwrap().start() < rest.find('.').unwrap_or(rest.len()))
            .map(|c| clean_name(&c[1]));
        claimed.push((m.start(), m.end()));
        clauses.push(Clause {
            start: m.start(),
            mover: Some(clean_name(&caps[1])),
            seconder,
            title: Some(clean_title(&caps[2])),
            motion_type: None,
            incomplete: true,
        });
    }

    for caps in MADE_BY_PARTIAL.captures_iter(text) {
        let m = caps.get(0).unwrap();
        if inside(&claimed, m.start()) {
            continue;
        }
        // Deviating narrative construct: recover what the sentence
        // still offers and flag the record.
        let rest = &text[m.end()..];
        let seconder = SECONDED_ONLY
            .captures(rest)
            .filter(|c| c.get(0).unwrap().start() < rest.find('.').unwrap_or(rest.len()))
            .map(|c| clean_name(&c[1]));
        let title = TO_AFTER.captures(rest).map(|c| clean_title(&c[1]));
        claimed.push((m.start(), m.end()));
        clauses.push(Clause {
            start: m.start(),
            mover: Some(clean_name(&caps[1])),
            seconder,
            title,
            motion_type: None,
            incomplete: true,
        });
    }

    if dialect == DocumentDialect::ApprovedTabular {
        for m in ADOPT_TITLE.find_iter(text) {
            if inside(&claimed, m.start()) {
                continue;
            }
            claimed.push((m.start(), m.end()));
            let motion_type = if m.as_str().contains("Amendment") {
                MotionType::Amend
            } else {
                MotionType::Adopt
            };
            clauses.push(Clause {
                start: m.start(),
                mover: None,
                seconder: None,
                title: Some(m.as_str().to_string()),
                motion_type: Some(motion_type),
                incomplete: false,
            });
        }
    }

    clauses.sort_by_key(|c| c.start);
    clauses
}

fn inside(claimed: &[(usize, usize)], pos: usize) -> bool {
    claimed.iter().any(|&(s, e)| pos >= s && pos < e)
}

/// Item number and legislative reference from the block's anchor line.
fn item_and_reference(text: &str) -> (Option<String>, Option<String>) {
    match ITEM_LINE.captures(text) {
        Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
        None => (None, None),
    }
}

/// First-line remainder as a fallback title for synthesized motions.
fn item_line_title(text: &str) -> Option<String> {
    ITEM_LINE
        .captures(text)
        .map(|caps| clean_title(&caps[3]))
        .filter(|t| !t.is_empty())
}

fn clean_name(raw: &str) -> String {
    raw.trim().trim_end_matches([',', '.', ';']).trim().to_string()
}

fn clean_title(raw: &str) -> String {
    raw.trim().trim_end_matches([',', '.', ';', ':']).trim().to_string()
}
