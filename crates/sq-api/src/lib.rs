//! Inbound surface of the squish pipeline.
//!
//! The surrounding application (HTTP routing, page rendering, persistence;
//! all out of scope here) passes plain text and whatever option state its
//! UI holds; it gets plain text or a typed failure back. Requests and
//! responses are serde values with camelCase names so that boundary can
//! forward state unchanged.

use serde::{Deserialize, Serialize};
use sq_classifier::classify;
use sq_core::{resolve, FailureKind, Family, Fragment, PartialOptionSet, PipelineError};
use sq_merge::{merge, MergeOptions};
use sq_transform::TransformEngine;

pub use sq_classifier::classify as classify_text;
pub use sq_core::{Classification, OptionSet, SourceText};

/// Single-text request: classify (when no family is declared), resolve
/// options, transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    pub text: String,
    #[serde(default)]
    pub family: Option<Family>,
    #[serde(default)]
    pub options: PartialOptionSet,
}

/// Multi-fragment request. The family is mandatory here: merging is only
/// defined within one family, so nothing is inferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub fragments: Vec<Fragment>,
    pub family: Family,
    #[serde(default)]
    pub options: PartialOptionSet,
    #[serde(default)]
    pub merge_options: MergeOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PipelineResponse {
    Success { output: String },
    Failure { failure: FailureKind, detail: String },
}

impl PipelineResponse {
    fn from_result(result: Result<String, PipelineError>) -> Self {
        match result {
            Ok(output) => PipelineResponse::Success { output },
            Err(e) => PipelineResponse::Failure {
                failure: e.kind(),
                detail: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResponse::Success { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            PipelineResponse::Success { output } => Some(output),
            PipelineResponse::Failure { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<(FailureKind, &str)> {
        match self {
            PipelineResponse::Success { .. } => None,
            PipelineResponse::Failure { failure, detail } => Some((*failure, detail)),
        }
    }
}

/// Transform one text. A declared family is trusted as-is; otherwise the
/// classifier picks one.
pub fn process_text(engine: &TransformEngine, request: &TextRequest) -> PipelineResponse {
    let family = request
        .family
        .unwrap_or_else(|| classify(&request.text).family);
    let options = resolve(&request.options, family);
    tracing::debug!(%family, declared = request.family.is_some(), "processing text");
    PipelineResponse::from_result(engine.transform(&request.text, &options))
}

/// Merge fragments and transform the joined result.
pub fn process_merge(engine: &TransformEngine, request: &MergeRequest) -> PipelineResponse {
    let options = resolve(&request.options, request.family);
    PipelineResponse::from_result(merge(
        engine,
        &request.fragments,
        &options,
        &request.merge_options,
    ))
}
