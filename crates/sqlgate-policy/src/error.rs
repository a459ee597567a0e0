//! Denial types returned by the authorization gate.
//!
//! A denial is an ordinary outcome of asking the gate about a statement the
//! policy does not permit. It names the rule that fired and the keyword or
//! operation tag that triggered it.

use serde::Serialize;
use std::fmt;

/// A rejected statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    /// The rule that rejected the statement.
    pub kind: DenialKind,
    /// The operation tag or dangerous keyword that triggered the rule,
    /// in canonical upper case.
    pub keyword: String,
    /// Human-readable reason.
    pub message: String,
}

impl Denial {
    /// Create a new denial.
    pub fn new(kind: DenialKind, keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    // =========================================================================
    // OPERATION DENIALS
    // =========================================================================

    /// Create an operation not permitted denial for a DDL tag.
    pub fn operation_not_permitted(tag: &str) -> Self {
        Self::new(
            DenialKind::OperationNotPermitted,
            tag,
            format!("DDL operations are not allowed: {}", tag),
        )
    }

    // =========================================================================
    // KEYWORD SCAN DENIALS
    // =========================================================================

    /// Create a dangerous keyword denial.
    pub fn dangerous_keyword(keyword: &str) -> Self {
        Self::new(
            DenialKind::DangerousKeywordDetected,
            keyword,
            format!("Dangerous keyword detected: {}", keyword),
        )
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Denial {}

/// Categories of denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The statement is tagged as schema-modifying and DDL is disabled.
    OperationNotPermitted,

    /// A non-exempt dangerous keyword appears as a whole word in the text.
    DangerousKeywordDetected,
}

impl DenialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialKind::OperationNotPermitted => "operation_not_permitted",
            DenialKind::DangerousKeywordDetected => "dangerous_keyword_detected",
        }
    }
}

impl fmt::Display for DenialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
