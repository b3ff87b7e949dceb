use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four supported structured-text families.
///
/// Declaration order is the classifier tie-break priority: the narrow,
/// high-precision families come first, the broad catch-all last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    SerializedObject,
    StructuredData,
    Stylesheet,
    Script,
}

impl Family {
    /// All families, in tie-break priority order.
    pub const PRIORITY: [Family; 4] = [
        Family::SerializedObject,
        Family::StructuredData,
        Family::Stylesheet,
        Family::Script,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Family::SerializedObject => "serialized-object",
            Family::StructuredData => "structured-data",
            Family::Stylesheet => "stylesheet",
            Family::Script => "script",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
