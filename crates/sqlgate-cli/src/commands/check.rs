//! `sqlgate check` command implementation.
//!
//! Runs a single statement through the authorization gate and reports the
//! outcome. The operation tag comes from `--operation` or, failing that, the
//! statement's leading verb.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlgate_policy::{AuthorizationGate, Denial, OperationTag, QueryRequest};
use std::fs;
use std::path::Path;

use super::load_sources;

/// Outcome of a check, as printed with `--json`.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub allowed: bool,
    pub operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<&'a Denial>,
}

/// Take the statement from the argument or from `--sql-file`.
pub fn read_statement(sql: Option<String>, sql_file: Option<&Path>) -> Result<String> {
    match (sql, sql_file) {
        (Some(sql), _) => Ok(sql),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read statement from {:?}", path)),
        (None, None) => anyhow::bail!("Either a statement or --sql-file is required"),
    }
}

/// Check a statement. Returns whether it was allowed.
pub fn run(
    config_path: Option<&Path>,
    sql: &str,
    operation: Option<&str>,
    json: bool,
) -> Result<bool> {
    let sources = load_sources(config_path)?;
    let gate = AuthorizationGate::new(sources.values());

    let request = match operation {
        Some(tag) => QueryRequest::new(sql, tag),
        None => QueryRequest::classified(sql),
    };

    let outcome = gate.validate_request(&request);
    match &outcome {
        Ok(()) => tracing::info!(operation = %request.operation, "Statement allowed"),
        Err(denial) => tracing::warn!(
            operation = %request.operation,
            kind = %denial.kind,
            keyword = %denial.keyword,
            "Statement denied"
        ),
    }

    println!("{}", render(request.operation, &outcome, json)?);
    Ok(outcome.is_ok())
}

/// Format an outcome for the terminal.
pub fn render(operation: OperationTag, outcome: &Result<(), Denial>, json: bool) -> Result<String> {
    if json {
        let report = CheckReport {
            allowed: outcome.is_ok(),
            operation: operation.as_str(),
            denial: outcome.as_ref().err(),
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    Ok(match outcome {
        Ok(()) => format!("ALLOWED ({})", operation),
        Err(denial) => format!("DENIED [{}] {}", denial.kind, denial.message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_allowed_text() {
        let out = render(OperationTag::Select, &Ok(()), false).unwrap();
        assert_eq!(out, "ALLOWED (SELECT)");
    }

    #[test]
    fn test_render_denied_text() {
        let outcome = Err(Denial::dangerous_keyword("GRANT"));
        let out = render(OperationTag::Unknown, &outcome, false).unwrap();
        assert_eq!(
            out,
            "DENIED [dangerous_keyword_detected] Dangerous keyword detected: GRANT"
        );
    }

    #[test]
    fn test_render_json() {
        let outcome = Err(Denial::operation_not_permitted("DROP"));
        let out = render(OperationTag::Drop, &outcome, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["allowed"], false);
        assert_eq!(value["operation"], "DROP");
        assert_eq!(value["denial"]["kind"], "operation_not_permitted");
        assert_eq!(value["denial"]["keyword"], "DROP");

        let out = render(OperationTag::Select, &Ok(()), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["allowed"], true);
        assert!(value.get("denial").is_none());
    }

    #[test]
    fn test_read_statement_prefers_argument() {
        let sql = read_statement(Some("SELECT 1".to_string()), None).unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn test_read_statement_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.sql");
        fs::write(&path, "DROP TABLE t").unwrap();

        let sql = read_statement(None, Some(&path)).unwrap();
        assert_eq!(sql, "DROP TABLE t");
    }

    #[test]
    fn test_read_statement_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_statement(None, Some(&dir.path().join("absent.sql"))).is_err());
        assert!(read_statement(None, None).is_err());
    }
}
