//! Splits raw document text into candidate agenda-item blocks.
//!
//! A block spans from one structural anchor to the next (or end of
//! document). Anchors are agenda-item lines ("8. 78911 …", an item
//! number followed by a legislative reference number); documents with
//! no item numbering fall back to motion connector phrases so purely
//! narrative minutes still segment. Preamble before the first anchor
//! is discarded, not emitted.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Agenda-item anchor: item number, period, legislative reference.
static ITEM_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(\d+)\.\s+(\d{4,6})\b").unwrap());

/// Fallback anchor for minutes without item numbering.
static MOTION_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bA motion was made by\b|\bMoved by\b").unwrap());

/// Trailing boilerplate that terminates a block's useful text: page
/// footers, enactment tails, and agenda section headers.
static BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)City of [A-Za-z .]+ Page\s+\d+|\bEnactment No:|^[ \t]*(?:ROLL CALL|ADJOURN(?:MENT)?|SWEARING IN|CONVENE|REFER ALL)\b",
    )
    .unwrap()
});

/// A contiguous span of document text believed to correspond to one
/// agenda item. Never persisted; consumed by the parsers and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    pub document_id: &'a str,
    pub meeting_date: NaiveDate,
    /// Byte offset of the block's first character in the document.
    pub start: usize,
    /// Byte offset one past the block's last retained character.
    pub end: usize,
    pub text: &'a str,
}

/// Segment a document into item blocks.
///
/// Deterministic for identical input; zero anchors yields an empty
/// vector, which the caller reports as `NoMotionsDetected`.
pub fn segment<'a>(
    document_id: &'a str,
    meeting_date: NaiveDate,
    text: &'a str,
) -> Vec<RawBlock<'a>> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut anchors: Vec<usize> = ITEM_ANCHOR.find_iter(text).map(|m| m.start()).collect();
    if anchors.is_empty() {
        anchors = MOTION_ANCHOR.find_iter(text).map(|m| m.start()).collect();
    }
    tracing::debug!(document_id, anchors = anchors.len(), "segmented document");

    let mut blocks = Vec::with_capacity(anchors.len());
    for (i, &start) in anchors.iter().enumerate() {
        let end = anchors.get(i + 1).copied().unwrap_or(text.len());
        let slice = &text[start..end];

        // Cut the block at the first boilerplate boundary past its
        // anchor line, then drop trailing whitespace.
        let cut = BOUNDARY
            .find(slice)
            .map(|m| m.start())
            .filter(|&p| p > 0)
            .unwrap_or(slice.len());
        let block_text = slice[..cut].trim_end();
        if block_text.is_empty() {
            continue;
        }

        blocks.push(RawBlock {
            document_id,
            meeting_date,
            start,
            end: start + block_text.len(),
            text: block_text,
        });
    }
    blocks
}
