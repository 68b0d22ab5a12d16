//! Vertical card display for extraction results.
//!
//! Renders a `DocumentExtract` as one card per motion, with tally,
//! member votes, and any quality warnings grouped underneath.

use gavel_core::{DocumentExtract, DocumentStatus, SummaryRecord, VoteCategory, Warning};

// ── Public API ──

/// Print a whole document extract as human-readable cards.
pub fn print_extract(out: &DocumentExtract) {
    println!("=== {} ({}) ===", out.document_id, out.meeting_date);
    if out.status == DocumentStatus::NoMotionsDetected {
        println!("no motions detected");
        println!();
        print_warnings(&out.warnings);
        return;
    }
    println!(
        "{} motion(s), {} member vote(s), {} warning(s)",
        out.summaries.len(),
        out.member_votes.len(),
        out.warnings.len()
    );
    println!();

    for summary in &out.summaries {
        print_motion_card(summary, out);
    }
    print_warnings(&out.warnings);
}

// ── Motion cards ──

fn print_motion_card(summary: &SummaryRecord, out: &DocumentExtract) {
    match summary.item_number.as_deref() {
        Some(item) => println!("Item {item}, motion {}", summary.motion_number),
        None => println!("Motion {}", summary.motion_number),
    }
    if !summary.title.is_empty() {
        println!("  {}", summary.title);
    }

    println!("  {:<18} {}", "type", summary.motion_type.label());
    if let Some(reference) = &summary.legislative_reference {
        println!("  {:<18} {}", "reference", reference);
    }
    if let Some(url) = &summary.reference_url {
        println!("  {:<18} {}", "url", url);
    }
    if let Some(mover) = &summary.mover {
        println!("  {:<18} {}", "moved by", mover);
    }
    if let Some(seconder) = &summary.seconder {
        println!("  {:<18} {}", "seconded by", seconder);
    }

    for category in VoteCategory::ALL {
        let count = summary.tally.count(category);
        if count == 0 {
            continue;
        }
        let members: Vec<&str> = out
            .member_votes
            .iter()
            .filter(|v| {
                v.item_number == summary.item_number
                    && v.motion_number == summary.motion_number
                    && v.category == category
            })
            .map(|v| v.member.as_str())
            .collect();
        if members.is_empty() {
            println!("  {:<18} {}", category.as_str(), count);
        } else {
            println!("  {:<18} {} ({})", category.as_str(), count, members.join("; "));
        }
    }
    if summary.is_unanimous {
        println!("  {:<18} yes", "unanimous");
    }

    if !summary.flags.is_empty() {
        let tags: Vec<&str> = summary.flags.iter().map(|f| f.as_str()).collect();
        println!("  {:<18} {}", "flags", tags.join(", "));
    }
    println!();
}

// ── Warnings ──

fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    println!("Warnings");
    for w in warnings {
        match (&w.item_number, w.motion_number) {
            (Some(item), Some(motion)) => {
                println!("  [{}] item {item} motion {motion}: {}", w.flag.as_str(), w.detail)
            }
            _ => println!("  [{}] {}", w.flag.as_str(), w.detail),
        }
    }
}
