//! Name-token cleanup for enumerated vote lists.
//!
//! OCR and layout loss run page furniture into name lists; this module
//! truncates at known markers, splits member names apart, and drops
//! boilerplate tokens before the roster ever sees them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Markers that end a names list: enactment tails, page footers,
/// legislative reference numbers, and agenda section headers.
static TRUNCATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)Enactment No:|City of [A-Za-z .]+ Page|\b\d{5,6}\b|REFER ALL|ADJOURN|SWEARING IN|CONVENE|ROLL CALL",
    )
    .unwrap()
});

/// "and" as a list separator (not inside a name).
static AND_SEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

/// A stray category header glued into a names span.
static EMBEDDED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Ayes|Noes|Nays|Abstentions?|Excused|Recused|Non[ -]?Voting):\s*\d*\s*-?\s*")
        .unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A page-footer fragment that survived truncation ("Page 2").
static PAGE_FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^page\s+\d+$").unwrap());

/// Boilerplate tokens that are never member names. Compared against
/// the whole cleaned token, so a member actually surnamed Page or
/// Referee is kept.
const NOISE: &[&str] = &[
    "substitute",
    "sponsor",
    "sponsors",
    "refer",
    "adjourn",
    "adjournment",
    "swearing in",
    "convene",
    "roll call",
    "the motion",
];

/// Split a raw names span into cleaned name tokens.
///
/// Never fails; garbage in yields an empty vector, not a panic.
pub fn parse_name_tokens(raw: &str) -> Vec<String> {
    let truncated = match TRUNCATE.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };

    let separated = AND_SEP.replace_all(truncated, ";").replace(',', ";");

    let mut names = Vec::new();
    for part in separated.split(';') {
        let cleaned = EMBEDDED_HEADER.replace_all(part, "");
        let cleaned = WHITESPACE.replace_all(cleaned.trim(), " ");
        let cleaned = cleaned
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '-'))
            .to_string();
        if cleaned.is_empty() {
            continue;
        }
        let lower = cleaned.to_lowercase();
        if PAGE_FRAGMENT.is_match(&cleaned) || NOISE.iter().any(|kw| lower == *kw) {
            continue;
        }
        names.push(cleaned);
    }
    names
}
