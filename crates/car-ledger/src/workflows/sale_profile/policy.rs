use serde::Serialize;

use super::domain::SaleProfile;

/// Visibility flags of a sale profile, resolved once and threaded through the
/// pipeline as a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionPolicy {
    pub include_amounts: bool,
    pub include_evidence: bool,
    #[serde(rename = "highlightTopN")]
    pub highlight_top_n: usize,
}

impl RedactionPolicy {
    pub fn from_profile(profile: &SaleProfile) -> Self {
        Self {
            include_amounts: profile.include_amounts,
            include_evidence: profile.include_evidence,
            highlight_top_n: clamp_top_n(profile.highlight_top_n),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_amounts(self, include_amounts: bool) -> Self {
        Self {
            include_amounts,
            ..self
        }
    }

    /// Returns `amount` only when amounts are published.
    pub fn amount(&self, amount: Option<u64>) -> Option<u64> {
        if self.include_amounts {
            amount
        } else {
            None
        }
    }
}

/// Negative counts clamp to zero.
fn clamp_top_n(raw: i64) -> usize {
    usize::try_from(raw.max(0)).unwrap_or(usize::MAX)
}
