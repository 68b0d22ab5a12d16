//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Per-run extraction options, injected alongside the roster.
///
/// Deserializable so callers can keep it in a config file next to the
/// roster; all fields have workable defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Council size used for tally consistency checks and for filling
    /// unanimous/voice-vote tallies. `None` disables both.
    pub total_expected_voters: Option<u32>,
    /// Template for building a reference URL from a legislative
    /// reference number; `{}` is replaced by the number.
    pub reference_url_template: String,
    /// Maximum Levenshtein distance for fuzzy roster matching.
    pub fuzzy_distance_threshold: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            total_expected_voters: None,
            reference_url_template:
                "https://madison.legistar.com/gateway.aspx?m=l&id=/matter.aspx?key={}".to_string(),
            fuzzy_distance_threshold: 2,
        }
    }
}

impl ExtractOptions {
    /// Build the reference URL for a legislative reference number.
    pub fn reference_url(&self, reference: &str) -> String {
        self.reference_url_template.replace("{}", reference)
    }
}
