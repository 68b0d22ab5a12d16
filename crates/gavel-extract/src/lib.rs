//! Extraction engine: plain-text meeting minutes in, structured vote records out.

pub mod assemble;
pub mod dialect;
pub mod motion;
pub mod names;
pub mod segment;
pub mod tally;

pub use assemble::extract_document;
pub use dialect::{classify, DocumentDialect};
pub use motion::{parse_motions, MotionParse};
pub use names::parse_name_tokens;
pub use segment::{segment, RawBlock};
pub use tally::{parse_tally, TallyParse};
