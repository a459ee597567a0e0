//! Request types and operation classification.
//!
//! The gate trusts the operation tag it is given. [`classify_statement`] is a
//! lightweight leading-verb classifier for callers that only have the SQL
//! text; it does not parse the statement.

use std::fmt;
use std::str::FromStr;

/// The primary verb of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationTag {
    Select,
    Insert,
    Update,
    Delete,
    Replace,
    Create,
    Alter,
    Drop,
    Truncate,
    Rename,
    Show,
    Describe,
    Explain,
    Use,
    Set,
    /// Anything not recognized, including an empty label.
    Unknown,
}

impl OperationTag {
    /// Tags that modify the schema.
    pub const DDL: [OperationTag; 5] = [
        OperationTag::Create,
        OperationTag::Alter,
        OperationTag::Drop,
        OperationTag::Truncate,
        OperationTag::Rename,
    ];

    /// Interpret a caller-supplied label. Case-insensitive, never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SELECT" => OperationTag::Select,
            "INSERT" => OperationTag::Insert,
            "UPDATE" => OperationTag::Update,
            "DELETE" => OperationTag::Delete,
            "REPLACE" => OperationTag::Replace,
            "CREATE" => OperationTag::Create,
            "ALTER" => OperationTag::Alter,
            "DROP" => OperationTag::Drop,
            "TRUNCATE" => OperationTag::Truncate,
            "RENAME" => OperationTag::Rename,
            "SHOW" => OperationTag::Show,
            "DESCRIBE" | "DESC" => OperationTag::Describe,
            "EXPLAIN" => OperationTag::Explain,
            "USE" => OperationTag::Use,
            "SET" => OperationTag::Set,
            _ => OperationTag::Unknown,
        }
    }

    /// Canonical upper-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationTag::Select => "SELECT",
            OperationTag::Insert => "INSERT",
            OperationTag::Update => "UPDATE",
            OperationTag::Delete => "DELETE",
            OperationTag::Replace => "REPLACE",
            OperationTag::Create => "CREATE",
            OperationTag::Alter => "ALTER",
            OperationTag::Drop => "DROP",
            OperationTag::Truncate => "TRUNCATE",
            OperationTag::Rename => "RENAME",
            OperationTag::Show => "SHOW",
            OperationTag::Describe => "DESCRIBE",
            OperationTag::Explain => "EXPLAIN",
            OperationTag::Use => "USE",
            OperationTag::Set => "SET",
            OperationTag::Unknown => "UNKNOWN",
        }
    }

    /// Whether this tag is schema-modifying.
    pub fn is_ddl(&self) -> bool {
        Self::DDL.contains(self)
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

/// A statement to authorize.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    /// Raw SQL text, not necessarily valid.
    pub sql: &'a str,
    /// The statement's classified operation.
    pub operation: OperationTag,
}

impl<'a> QueryRequest<'a> {
    /// Create a request from SQL text and a caller-supplied label.
    pub fn new(sql: &'a str, operation_tag: &str) -> Self {
        Self {
            sql,
            operation: OperationTag::from_label(operation_tag),
        }
    }

    /// Create a request, deriving the operation from the SQL text.
    pub fn classified(sql: &'a str) -> Self {
        Self {
            sql,
            operation: classify_statement(sql),
        }
    }
}

/// Classify a statement by its leading verb.
///
/// Leading whitespace, comments (`-- `, `#`, `/* */`) and opening parentheses
/// are skipped. The body of a MySQL executable comment (`/*! ... */`) is
/// classified as if it were plain text. `WITH` is treated as a query.
pub fn classify_statement(sql: &str) -> OperationTag {
    let rest = skip_preamble(sql);
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());

    match &rest[..end] {
        w if w.eq_ignore_ascii_case("WITH") => OperationTag::Select,
        w => OperationTag::from_label(w),
    }
}

fn skip_preamble(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(comment) = rest.strip_prefix("--").or_else(|| rest.strip_prefix('#')) {
            rest = comment.find('\n').map_or("", |i| &comment[i + 1..]);
        } else if let Some(executable) = rest.strip_prefix("/*!") {
            // MySQL runs the body of `/*! ... */` and `/*!50000 ... */`.
            rest = executable.trim_start_matches(|c: char| c.is_ascii_digit());
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.find("*/").map_or("", |i| &comment[i + 2..]);
        } else if let Some(inner) = rest.strip_prefix('(') {
            rest = inner;
        } else {
            return rest;
        }
    }
}
