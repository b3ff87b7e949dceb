use crate::family::Family;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable input text with an optional caller-declared family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceText {
    body: String,
    family: Option<Family>,
}

impl SourceText {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            family: None,
        }
    }

    pub fn with_family(body: impl Into<String>, family: Family) -> Self {
        Self {
            body: body.into(),
            family: Some(family),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn family(&self) -> Option<Family> {
        self.family
    }
}

/// One named, ordered unit of input for the merge engine.
/// Array index is concatenation order; fragments are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub name: String,
    pub body: String,
    pub family: Family,
}

impl Fragment {
    pub fn new(name: impl Into<String>, body: impl Into<String>, family: Family) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            family,
        }
    }
}

/// Classifier verdict: winning family plus the raw per-family scores.
/// The scores are informational, kept for debugging and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub family: Family,
    pub scores: HashMap<Family, usize>,
}

impl Classification {
    pub fn score(&self, family: Family) -> usize {
        self.scores.get(&family).copied().unwrap_or(0)
    }
}
