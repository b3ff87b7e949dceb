//! Fragment merge engine.
//!
//! Merging is text-level: per-fragment comment stripping (when asked),
//! ordered concatenation, then one transform pass over the joined text.
//! Comment stripping happens fragment-by-fragment *before* concatenation:
//! a trailing line comment in one fragment must never swallow the next
//! fragment's code. Program-level collisions between fragments (two script
//! fragments declaring the same top-level binding) keep whatever semantics
//! the host execution environment gives repeated declarations.

use serde::{Deserialize, Serialize};
use sq_core::{Family, Fragment, OptionSet, PipelineError, Result};
use sq_transform::scanner::{self, ScanLang};
use sq_transform::TransformEngine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOptions {
    /// Remove comments from each fragment before concatenation.
    pub strip_comments: bool,
    /// Insert a blank-line separator between consecutive fragments.
    pub insert_separators: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strip_comments: false,
            insert_separators: true,
        }
    }
}

/// Merge same-family fragments into one compacted unit.
///
/// All fragments must match the option set's family; the first mismatch is
/// fatal, never a best-effort concatenation. The transform result for the
/// joined text is returned verbatim, failures included. An empty fragment
/// list merges to the empty string without invoking the engine.
pub fn merge(
    engine: &TransformEngine,
    fragments: &[Fragment],
    options: &OptionSet,
    merge_options: &MergeOptions,
) -> Result<String> {
    let family = options.family();
    for fragment in fragments {
        if fragment.family != family {
            return Err(PipelineError::FamilyMismatch {
                name: fragment.name.clone(),
                expected: family,
                found: fragment.family,
            });
        }
    }
    if fragments.is_empty() {
        return Ok(String::new());
    }

    let mut bodies = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let body = if merge_options.strip_comments {
            strip_fragment(&fragment.body, family)?
        } else {
            fragment.body.clone()
        };
        bodies.push(body);
    }

    let separator = if merge_options.insert_separators {
        "\n\n"
    } else {
        ""
    };
    let joined = bodies.join(separator);
    tracing::debug!(
        count = fragments.len(),
        %family,
        joined_len = joined.len(),
        "merging fragments"
    );
    engine.transform(&joined, options)
}

/// Family-appropriate comment stripping for one fragment. The structured
/// families have no comment syntax, so their bodies pass through.
fn strip_fragment(body: &str, family: Family) -> Result<String> {
    match family {
        Family::Script => scanner::strip_comments(body, ScanLang::Script),
        Family::Stylesheet => scanner::strip_comments(body, ScanLang::Stylesheet),
        Family::StructuredData | Family::SerializedObject => Ok(body.to_string()),
    }
}

#[cfg(test)]
mod tests;
