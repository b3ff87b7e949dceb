//! The option model.
//!
//! Callers hand the pipeline a [`PartialOptionSet`] holding whatever subset
//! of toggles their UI happened to populate. [`resolve`] turns that into a
//! fully-populated, family-specific [`OptionSet`] by filling documented
//! defaults and clamping out-of-range numeric fields. Resolution is total:
//! it never fails, because failing here would surprise a UI caller
//! supplying partial state.

use crate::error::Result;
use crate::family::Family;
use serde::{Deserialize, Serialize};

/// Compaction tier handed to the generic compactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    /// Comments and whitespace only.
    Whitespace,
    /// + punctuation-adjacent whitespace removal.
    Standard,
    /// + line joins (script) / value shortening (stylesheet).
    Aggressive,
}

impl Aggressiveness {
    /// Numeric tier as exposed to UIs; out-of-range levels clamp.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Aggressiveness::Whitespace,
            1 => Aggressiveness::Standard,
            _ => Aggressiveness::Aggressive,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Aggressiveness::Whitespace => 0,
            Aggressiveness::Standard => 1,
            Aggressiveness::Aggressive => 2,
        }
    }
}

/// Structured-data rewrite options. Field order matches rule evaluation
/// order; later rules observe the output of earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonOptions {
    /// Repair trailing commas / unquoted keys, only if the raw parse fails.
    pub fix_common_errors: bool,
    pub remove_null_values: bool,
    pub remove_empty_keys: bool,
    /// UI-facing synonym kept for parity; a parse cannot produce
    /// "undefined", so this is a documented no-op on the tree.
    pub remove_undefined_values: bool,
    pub remove_empty_array_elements: bool,
    pub remove_duplicate_array_elements: bool,
    pub sort_array_elements: bool,
    pub remove_empty_objects: bool,
    pub remove_empty_arrays: bool,
    /// Last occurrence wins; a no-op with a last-wins parser.
    pub remove_duplicate_keys: bool,
    pub sort_object_keys: bool,
    pub optimize_numbers: bool,
    pub use_scientific_notation: bool,
    /// |v| >= 10^upper switches to scientific form. Clamped to 1..=308.
    pub scientific_upper_exponent: i32,
    /// 0 < |v| < 10^lower switches to scientific form. Clamped to -324..=-1.
    pub scientific_lower_exponent: i32,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            fix_common_errors: false,
            remove_null_values: false,
            remove_empty_keys: false,
            remove_undefined_values: false,
            remove_empty_array_elements: false,
            remove_duplicate_array_elements: false,
            sort_array_elements: false,
            remove_empty_objects: false,
            remove_empty_arrays: false,
            remove_duplicate_keys: false,
            sort_object_keys: false,
            optimize_numbers: false,
            use_scientific_notation: false,
            scientific_upper_exponent: 21,
            scientific_lower_exponent: -7,
        }
    }
}

/// Script compaction options, mapped onto the compactor's grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOptions {
    pub aggressiveness: Aggressiveness,
    pub strip_comments: bool,
    pub rename_identifiers: bool,
    pub preserve_names: bool,
    pub remove_dead_code: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            aggressiveness: Aggressiveness::Standard,
            strip_comments: true,
            rename_identifiers: false,
            preserve_names: true,
            remove_dead_code: false,
        }
    }
}

/// Stylesheet compaction options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesheetOptions {
    pub aggressiveness: Aggressiveness,
    pub strip_comments: bool,
}

impl Default for StylesheetOptions {
    fn default() -> Self {
        Self {
            aggressiveness: Aggressiveness::Standard,
            strip_comments: true,
        }
    }
}

/// Serialized-object rewrite options: the subset of the structured-data
/// rewrites meaningful to this family, applied in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedOptions {
    pub include_null_values: bool,
    pub remove_empty_arrays: bool,
    pub remove_empty_objects: bool,
    pub sort_keys: bool,
}

impl Default for SerializedOptions {
    fn default() -> Self {
        Self {
            include_null_values: true,
            remove_empty_arrays: false,
            remove_empty_objects: false,
            sort_keys: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialJsonOptions {
    pub fix_common_errors: Option<bool>,
    pub remove_null_values: Option<bool>,
    pub remove_empty_keys: Option<bool>,
    pub remove_undefined_values: Option<bool>,
    pub remove_empty_array_elements: Option<bool>,
    pub remove_duplicate_array_elements: Option<bool>,
    pub sort_array_elements: Option<bool>,
    pub remove_empty_objects: Option<bool>,
    pub remove_empty_arrays: Option<bool>,
    pub remove_duplicate_keys: Option<bool>,
    pub sort_object_keys: Option<bool>,
    pub optimize_numbers: Option<bool>,
    pub use_scientific_notation: Option<bool>,
    pub scientific_upper_exponent: Option<i32>,
    pub scientific_lower_exponent: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialScriptOptions {
    /// Numeric tier (0..=2); out-of-range values clamp.
    pub aggressiveness: Option<i64>,
    pub strip_comments: Option<bool>,
    pub rename_identifiers: Option<bool>,
    pub preserve_names: Option<bool>,
    pub remove_dead_code: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialStylesheetOptions {
    pub aggressiveness: Option<i64>,
    pub strip_comments: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSerializedOptions {
    pub include_null_values: Option<bool>,
    pub remove_empty_arrays: Option<bool>,
    pub remove_empty_objects: Option<bool>,
    pub sort_keys: Option<bool>,
}

/// Whatever subset of the option surface the caller populated. One bag for
/// all families so UI state passes through unchanged; [`resolve`] picks the
/// section matching the active family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialOptionSet {
    pub json: PartialJsonOptions,
    pub script: PartialScriptOptions,
    pub stylesheet: PartialStylesheetOptions,
    pub serialized: PartialSerializedOptions,
}

/// Fully-resolved, family-specific configuration. Exactly one variant is
/// active per pipeline run; the transform layer never branches on "is this
/// field present".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum OptionSet {
    SerializedObject(SerializedOptions),
    StructuredData(JsonOptions),
    Stylesheet(StylesheetOptions),
    Script(ScriptOptions),
}

impl OptionSet {
    pub fn family(&self) -> Family {
        match self {
            OptionSet::SerializedObject(_) => Family::SerializedObject,
            OptionSet::StructuredData(_) => Family::StructuredData,
            OptionSet::Stylesheet(_) => Family::Stylesheet,
            OptionSet::Script(_) => Family::Script,
        }
    }

    /// Reject mutually-exclusive option pairs. No such pair exists in the
    /// current surface; the check is the reserved seam for
    /// [`FailureKind::UnsupportedOptionCombination`], so a future conflict
    /// is rejected instead of silently resolved.
    ///
    /// [`FailureKind::UnsupportedOptionCombination`]: crate::error::FailureKind::UnsupportedOptionCombination
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Resolve a partial option set against documented defaults for `family`.
/// Pure and total; numeric fields clamp instead of erroring.
pub fn resolve(partial: &PartialOptionSet, family: Family) -> OptionSet {
    match family {
        Family::StructuredData => {
            let p = &partial.json;
            let d = JsonOptions::default();
            OptionSet::StructuredData(JsonOptions {
                fix_common_errors: p.fix_common_errors.unwrap_or(d.fix_common_errors),
                remove_null_values: p.remove_null_values.unwrap_or(d.remove_null_values),
                remove_empty_keys: p.remove_empty_keys.unwrap_or(d.remove_empty_keys),
                remove_undefined_values: p
                    .remove_undefined_values
                    .unwrap_or(d.remove_undefined_values),
                remove_empty_array_elements: p
                    .remove_empty_array_elements
                    .unwrap_or(d.remove_empty_array_elements),
                remove_duplicate_array_elements: p
                    .remove_duplicate_array_elements
                    .unwrap_or(d.remove_duplicate_array_elements),
                sort_array_elements: p.sort_array_elements.unwrap_or(d.sort_array_elements),
                remove_empty_objects: p.remove_empty_objects.unwrap_or(d.remove_empty_objects),
                remove_empty_arrays: p.remove_empty_arrays.unwrap_or(d.remove_empty_arrays),
                remove_duplicate_keys: p.remove_duplicate_keys.unwrap_or(d.remove_duplicate_keys),
                sort_object_keys: p.sort_object_keys.unwrap_or(d.sort_object_keys),
                optimize_numbers: p.optimize_numbers.unwrap_or(d.optimize_numbers),
                use_scientific_notation: p
                    .use_scientific_notation
                    .unwrap_or(d.use_scientific_notation),
                scientific_upper_exponent: p
                    .scientific_upper_exponent
                    .unwrap_or(d.scientific_upper_exponent)
                    .clamp(1, 308),
                scientific_lower_exponent: p
                    .scientific_lower_exponent
                    .unwrap_or(d.scientific_lower_exponent)
                    .clamp(-324, -1),
            })
        }
        Family::Script => {
            let p = &partial.script;
            let d = ScriptOptions::default();
            OptionSet::Script(ScriptOptions {
                aggressiveness: p
                    .aggressiveness
                    .map(Aggressiveness::from_level)
                    .unwrap_or(d.aggressiveness),
                strip_comments: p.strip_comments.unwrap_or(d.strip_comments),
                rename_identifiers: p.rename_identifiers.unwrap_or(d.rename_identifiers),
                preserve_names: p.preserve_names.unwrap_or(d.preserve_names),
                remove_dead_code: p.remove_dead_code.unwrap_or(d.remove_dead_code),
            })
        }
        Family::Stylesheet => {
            let p = &partial.stylesheet;
            let d = StylesheetOptions::default();
            OptionSet::Stylesheet(StylesheetOptions {
                aggressiveness: p
                    .aggressiveness
                    .map(Aggressiveness::from_level)
                    .unwrap_or(d.aggressiveness),
                strip_comments: p.strip_comments.unwrap_or(d.strip_comments),
            })
        }
        Family::SerializedObject => {
            let p = &partial.serialized;
            let d = SerializedOptions::default();
            OptionSet::SerializedObject(SerializedOptions {
                include_null_values: p.include_null_values.unwrap_or(d.include_null_values),
                remove_empty_arrays: p.remove_empty_arrays.unwrap_or(d.remove_empty_arrays),
                remove_empty_objects: p.remove_empty_objects.unwrap_or(d.remove_empty_objects),
                sort_keys: p.sort_keys.unwrap_or(d.sort_keys),
            })
        }
    }
}
