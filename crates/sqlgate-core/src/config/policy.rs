//! Typed policy flags.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key of the global override flag.
pub const ALLOW_ALL_OPERATIONS: &str = "ALLOW_ALL_OPERATIONS";

/// Key of the schema-modification flag.
pub const ALLOW_DDL_OPERATIONS: &str = "ALLOW_DDL_OPERATIONS";

/// Key of the keyword-scan flag.
pub const BLOCK_DANGEROUS_KEYWORDS: &str = "BLOCK_DANGEROUS_KEYWORDS";

/// All keys recognized by [`PolicyConfig::from_map`].
pub const POLICY_KEYS: [&str; 3] = [
    ALLOW_ALL_OPERATIONS,
    ALLOW_DDL_OPERATIONS,
    BLOCK_DANGEROUS_KEYWORDS,
];

/// Resolved authorization policy.
///
/// Built once from raw configuration and never mutated afterwards. The
/// defaults are the restrictive ones: nothing is allowed beyond data-level
/// statements, and the keyword scan is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Bypass every check. Supersedes both other flags.
    #[serde(default)]
    pub allow_all_operations: bool,

    /// Permit CREATE, ALTER, DROP and other schema-modifying statements.
    #[serde(default)]
    pub allow_ddl_operations: bool,

    /// Reject statements containing dangerous keywords.
    #[serde(default = "default_block_dangerous_keywords")]
    pub block_dangerous_keywords: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allow_all_operations: false,
            allow_ddl_operations: false,
            block_dangerous_keywords: default_block_dangerous_keywords(),
        }
    }
}

impl PolicyConfig {
    /// Resolve a policy from a raw key/value map.
    ///
    /// Unrecognized keys are ignored. A flag is set by `"true"` or `"false"`
    /// (any casing); an unparseable value or a missing key yields the flag's
    /// default. This never fails.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let flag = |key: &str, default: bool| parse_flag(map.get(key).map(String::as_str), default);

        Self {
            allow_all_operations: flag(ALLOW_ALL_OPERATIONS, false),
            allow_ddl_operations: flag(ALLOW_DDL_OPERATIONS, false),
            block_dangerous_keywords: flag(
                BLOCK_DANGEROUS_KEYWORDS,
                default_block_dangerous_keywords(),
            ),
        }
    }

    /// Render the policy back into its canonical key/value form.
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                ALLOW_ALL_OPERATIONS.to_string(),
                self.allow_all_operations.to_string(),
            ),
            (
                ALLOW_DDL_OPERATIONS.to_string(),
                self.allow_ddl_operations.to_string(),
            ),
            (
                BLOCK_DANGEROUS_KEYWORDS.to_string(),
                self.block_dangerous_keywords.to_string(),
            ),
        ])
    }

    /// Whether the keyword scan runs at all under this policy.
    pub fn scans_keywords(&self) -> bool {
        !self.allow_all_operations && self.block_dangerous_keywords
    }
}

/// Permissive boolean parse used for every policy flag.
///
/// `"true"` and `"false"` are accepted in any casing, with surrounding
/// whitespace. Anything else, or a missing value, returns `default`.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some(raw) if raw.eq_ignore_ascii_case("true") => true,
        Some(raw) if raw.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}

fn default_block_dangerous_keywords() -> bool {
    true
}
