//! Heuristic family classifier.
//!
//! Four independent, unordered signature sets, one per [`Family`], are
//! scored against the trimmed input. Signatures are not mutually exclusive;
//! overlap between families is expected (a `{ }` block matches both script
//! and structured-data) and resolved by a fixed-priority reduction.

pub mod signatures;

use sq_core::{Classification, Family};
use std::collections::HashMap;

/// Classify raw text into a family.
///
/// Total and deterministic: never fails, same input always yields the same
/// result. Winner is the first family in [`Family::PRIORITY`] whose score
/// equals the maximum. An all-zero score map means no signature produced
/// evidence, and the input falls back to script, the broadest family.
pub fn classify(text: &str) -> Classification {
    let trimmed = text.trim();

    let mut scores = HashMap::new();
    for family in Family::PRIORITY {
        scores.insert(family, signatures::score(family, trimmed));
    }

    let max = scores.values().copied().max().unwrap_or(0);
    let family = if max == 0 {
        Family::Script
    } else {
        Family::PRIORITY
            .into_iter()
            .find(|f| scores[f] == max)
            .unwrap_or(Family::Script)
    };

    tracing::debug!(%family, max, "classified input");
    Classification { family, scores }
}
