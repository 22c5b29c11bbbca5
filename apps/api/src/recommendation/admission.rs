//! Record Admitter — business policy applied after sanitization.

use tracing::info;

use crate::recommendation::policy::{DiscardReason, Recommendation, Variant};

/// Keeps or rejects a sanitized item under its variant's score gate.
pub fn admit<T: Recommendation>(item: &T) -> Result<(), DiscardReason> {
    match T::policy().admission_threshold {
        Some(threshold) if item.score() < threshold => Err(DiscardReason::BelowThreshold {
            score: item.score(),
            threshold,
        }),
        _ => Ok(()),
    }
}

/// Emits the structured log line every discard gets, whichever stage
/// rejected the record.
pub fn log_discard(variant: Variant, index: usize, title: Option<&str>, reason: &DiscardReason) {
    info!(
        variant = %variant,
        index,
        title = title.unwrap_or(""),
        reason = reason.code(),
        "Discarded candidate record: {reason}"
    );
}
