//! Structural transform engine.
//!
//! One entry point, [`TransformEngine::transform`], dispatching per family:
//!
//! - script/stylesheet: trim, then delegate size reduction to the family's
//!   [`GenericCompactor`] under mapped options
//! - structured-data: parse → ordered rewrite rules → canonical
//!   minimal-whitespace serialization
//! - serialized-object: validate token grammar → option-subset rewrites →
//!   re-emit with recomputed length prefixes
//!
//! Every invocation owns its tree; nothing is shared across calls, so any
//! number of transforms may run in parallel.

pub mod compactor;
pub mod json;
pub mod php;
pub mod rules;
pub mod scanner;

pub use compactor::{
    CompactorError, CompactorOptions, GenericCompactor, ScriptCompactor, StylesheetCompactor,
};

use sq_core::{JsonOptions, OptionSet, PipelineError, Result, SerializedOptions};

pub struct TransformEngine {
    script: Box<dyn GenericCompactor>,
    stylesheet: Box<dyn GenericCompactor>,
}

impl TransformEngine {
    /// Engine with the built-in conservative compactors.
    pub fn new() -> Self {
        Self {
            script: Box::new(ScriptCompactor),
            stylesheet: Box::new(StylesheetCompactor),
        }
    }

    /// Swap in real optimizers behind the compactor boundary.
    pub fn with_compactors(
        script: Box<dyn GenericCompactor>,
        stylesheet: Box<dyn GenericCompactor>,
    ) -> Self {
        Self { script, stylesheet }
    }

    /// Run the full transform for the option set's family. On failure the
    /// input is untouched; there is no partial output.
    pub fn transform(&self, text: &str, options: &OptionSet) -> Result<String> {
        options.validate()?;
        let output = match options {
            OptionSet::StructuredData(o) => transform_structured(text, o)?,
            OptionSet::SerializedObject(o) => transform_serialized(text, o)?,
            OptionSet::Script(o) => {
                run_compactor(&*self.script, text, &CompactorOptions::for_script(o))?
            }
            OptionSet::Stylesheet(o) => run_compactor(
                &*self.stylesheet,
                text,
                &CompactorOptions::for_stylesheet(o),
            )?,
        };
        tracing::debug!(
            family = %options.family(),
            input_len = text.len(),
            output_len = output.len(),
            "transform complete"
        );
        Ok(output)
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn transform_structured(text: &str, opts: &JsonOptions) -> Result<String> {
    let mut value = json::parse(text, opts)?;
    rules::apply(&mut value, opts);
    Ok(json::serialize(&value, opts))
}

fn transform_serialized(text: &str, opts: &SerializedOptions) -> Result<String> {
    let mut value = php::parse(text)?;
    php::rewrite(&mut value, opts);
    Ok(php::serialize(&value))
}

fn run_compactor(
    compactor: &dyn GenericCompactor,
    text: &str,
    options: &CompactorOptions,
) -> Result<String> {
    match compactor.compact(text, options) {
        Ok(output) => Ok(output),
        Err(CompactorError::Syntax {
            line,
            column,
            message,
        }) => Err(PipelineError::Syntax {
            line,
            column,
            message,
        }),
        Err(CompactorError::Internal(source)) => Err(PipelineError::Compactor(source.to_string())),
    }
}
