use serde::{Deserialize, Serialize};

use crate::shape::MemberKind;

/// Default recursion limit for nested composites and sequences.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Session options of a [`Json`](crate::Json) engine.
///
/// Options deserialize with defaults for every missing key, so they can be
/// embedded in a larger configuration file:
///
/// ```
/// use json_chain::JsonOptions;
///
/// let opts: JsonOptions = serde_json::from_str(r#"{"indented": true}"#).unwrap();
/// assert!(opts.indented);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Pretty-print with newlines and two-space indentation.
    pub indented: bool,
    /// Encode and decode record members declared as properties. When off,
    /// members declared as fields are used instead.
    pub use_property: bool,
    /// Maximum nesting of composites and sequences.
    pub max_depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indented: false,
            use_property: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl JsonOptions {
    pub fn indented(mut self, indented: bool) -> Self {
        self.indented = indented;
        self
    }

    pub fn use_property(mut self, use_property: bool) -> Self {
        self.use_property = use_property;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Record members visible under these options.
    pub fn member_kind(&self) -> MemberKind {
        if self.use_property {
            MemberKind::Property
        } else {
            MemberKind::Field
        }
    }
}
