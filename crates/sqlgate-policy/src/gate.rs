//! The authorization gate.
//!
//! The `AuthorizationGate` decides whether a statement may be executed. It is
//! built once from raw configuration and is read-only afterwards, so a single
//! instance can be shared across threads without locking.
//!
//! Decision order:
//!
//! 1. **Global override** - `ALLOW_ALL_OPERATIONS` permits everything
//! 2. **Operation check** - DDL-tagged statements need `ALLOW_DDL_OPERATIONS`
//! 3. **Keyword scan** - dangerous keywords are rejected while
//!    `BLOCK_DANGEROUS_KEYWORDS` is on; DDL keywords are exempt for a
//!    permitted DDL statement

use crate::error::Denial;
use crate::keywords::{DangerousKeyword, KeywordScanner};
use crate::request::{OperationTag, QueryRequest};
use sqlgate_core::PolicyConfig;
use std::collections::HashMap;

/// Authorizes SQL statements against a [`PolicyConfig`].
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    policy: PolicyConfig,
}

impl AuthorizationGate {
    /// Create a gate from raw key/value configuration.
    ///
    /// Recognized keys are `ALLOW_ALL_OPERATIONS`, `ALLOW_DDL_OPERATIONS`
    /// and `BLOCK_DANGEROUS_KEYWORDS`. Never fails; missing or unparseable
    /// values fall back to the restrictive defaults.
    pub fn new(config: &HashMap<String, String>) -> Self {
        Self::with_policy(PolicyConfig::from_map(config))
    }

    /// Create a gate from an already resolved policy.
    pub fn with_policy(policy: PolicyConfig) -> Self {
        tracing::debug!(
            allow_all_operations = policy.allow_all_operations,
            allow_ddl_operations = policy.allow_ddl_operations,
            block_dangerous_keywords = policy.block_dangerous_keywords,
            "Authorization gate configured"
        );
        Self { policy }
    }

    /// The effective policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Validate a statement against the policy.
    ///
    /// `operation_tag` is the caller's classification of the statement
    /// (e.g. `"CREATE"`, `"SELECT"`, `"UNKNOWN"`). It is trusted for the DDL
    /// check; the text is scanned for dangerous keywords regardless.
    pub fn validate_query(&self, sql: &str, operation_tag: &str) -> Result<(), Denial> {
        self.validate_request(&QueryRequest::new(sql, operation_tag))
    }

    /// Validate a statement, classifying it from its leading verb.
    pub fn validate_statement(&self, sql: &str) -> Result<(), Denial> {
        self.validate_request(&QueryRequest::classified(sql))
    }

    pub fn validate_request(&self, request: &QueryRequest) -> Result<(), Denial> {
        if self.policy.allow_all_operations {
            return Ok(());
        }

        self.check_operation(request.operation)?;
        self.check_keywords(request)
    }

    /// Whether `keyword` is skipped by the scan for a statement tagged `operation`.
    pub fn is_exempt(&self, keyword: &DangerousKeyword, operation: OperationTag) -> bool {
        keyword.is_ddl() && self.ddl_permitted(operation)
    }

    fn ddl_permitted(&self, operation: OperationTag) -> bool {
        self.policy.allow_ddl_operations && operation.is_ddl()
    }

    fn check_operation(&self, operation: OperationTag) -> Result<(), Denial> {
        if operation.is_ddl() && !self.policy.allow_ddl_operations {
            return Err(Denial::operation_not_permitted(operation.as_str()));
        }
        Ok(())
    }

    fn check_keywords(&self, request: &QueryRequest) -> Result<(), Denial> {
        if !self.policy.block_dangerous_keywords {
            return Ok(());
        }

        let hit = KeywordScanner::shared()
            .find_first(request.sql, |keyword| self.is_exempt(keyword, request.operation));

        match hit {
            Some(keyword) => Err(Denial::dangerous_keyword(keyword.keyword)),
            None => Ok(()),
        }
    }
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::with_policy(PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenialKind;
    use crate::keywords::DANGEROUS_KEYWORDS;

    fn gate(pairs: &[(&str, &str)]) -> AuthorizationGate {
        let config = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthorizationGate::new(&config)
    }

    fn all_policies() -> Vec<PolicyConfig> {
        let mut policies = Vec::new();
        for allow_all_operations in [false, true] {
            for allow_ddl_operations in [false, true] {
                for block_dangerous_keywords in [false, true] {
                    policies.push(PolicyConfig {
                        allow_all_operations,
                        allow_ddl_operations,
                        block_dangerous_keywords,
                    });
                }
            }
        }
        policies
    }

    #[test]
    fn test_allow_all_permits_everything() {
        let every_keyword = DANGEROUS_KEYWORDS
            .iter()
            .map(|k| k.keyword)
            .collect::<Vec<_>>()
            .join(" ; ");

        for policy in all_policies().into_iter().filter(|p| p.allow_all_operations) {
            let gate = AuthorizationGate::with_policy(policy);
            for tag in ["CREATE", "ALTER", "DROP", "TRUNCATE", "RENAME", "UNKNOWN", "SELECT"] {
                assert!(gate.validate_query(&every_keyword, tag).is_ok(), "{policy:?} {tag}");
            }
        }
    }

    #[test]
    fn test_ddl_tag_rejected_regardless_of_text() {
        for policy in all_policies()
            .into_iter()
            .filter(|p| !p.allow_all_operations && !p.allow_ddl_operations)
        {
            let gate = AuthorizationGate::with_policy(policy);
            for tag in ["CREATE", "ALTER", "DROP"] {
                for text in ["", "SELECT 1", "GRANT ALL ON *.* TO u", "CREATE TABLE t (id INT)"] {
                    let denial = gate.validate_query(text, tag).unwrap_err();
                    assert_eq!(denial.kind, DenialKind::OperationNotPermitted);
                    assert_eq!(denial.keyword, tag);
                }
            }
        }
    }

    #[test]
    fn test_ddl_tag_check_precedes_keyword_scan() {
        let gate = gate(&[]);
        // GRANT would trip the scan, but the tag is rejected first.
        let denial = gate
            .validate_query("GRANT ALL ON *.* TO u", "DROP")
            .unwrap_err();
        assert_eq!(denial.kind, DenialKind::OperationNotPermitted);
        assert_eq!(denial.keyword, "DROP");
    }

    #[test]
    fn test_ddl_allowed_exempts_ddl_keywords_only() {
        let gate = gate(&[("ALLOW_DDL_OPERATIONS", "true")]);

        assert!(gate.validate_query("CREATE TABLE t (id INT)", "CREATE").is_ok());
        assert!(gate.validate_query("DROP INDEX idx ON t", "CREATE").is_ok());

        let denial = gate
            .validate_query("CREATE USER u; GRANT ALL ON *.* TO u", "CREATE")
            .unwrap_err();
        assert_eq!(denial.kind, DenialKind::DangerousKeywordDetected);
        assert_eq!(denial.keyword, "GRANT");
    }

    #[test]
    fn test_ddl_keywords_flagged_for_non_ddl_tag() {
        let gate = gate(&[("ALLOW_DDL_OPERATIONS", "true")]);
        let denial = gate
            .validate_query("SELECT 1; DROP TABLE t", "SELECT")
            .unwrap_err();
        assert_eq!(denial.kind, DenialKind::DangerousKeywordDetected);
        assert_eq!(denial.keyword, "DROP");
    }

    #[test]
    fn test_keyword_scan_disabled() {
        let gate = gate(&[("BLOCK_DANGEROUS_KEYWORDS", "false")]);
        assert!(gate.validate_query("GRANT ALL ON *.* TO u", "UNKNOWN").is_ok());
        // Disabling the scan does not lift the DDL restriction.
        assert!(gate.validate_query("DROP TABLE t", "DROP").is_err());
    }

    #[test]
    fn test_keyword_reported_in_canonical_case() {
        let gate = gate(&[]);
        let denial = gate.validate_query("revoke all on db.* from u", "unknown").unwrap_err();
        assert_eq!(denial.keyword, "REVOKE");
        assert_eq!(denial.message, "Dangerous keyword detected: REVOKE");
    }

    #[test]
    fn test_tag_reported_in_canonical_case() {
        let denial = gate(&[]).validate_query("alter table t", "alter").unwrap_err();
        assert_eq!(denial.keyword, "ALTER");
    }

    #[test]
    fn test_empty_statement_passes() {
        assert!(gate(&[]).validate_query("", "").is_ok());
        assert!(gate(&[]).validate_query("", "SELECT").is_ok());
    }

    #[test]
    fn test_no_false_positive_on_identifiers() {
        let gate = gate(&[]);
        assert!(
            gate.validate_query("SELECT created_at, altered_by FROM users", "SELECT")
                .is_ok()
        );
        assert!(
            gate.validate_query("SELECT * FROM users WHERE name = 'CreateUser'", "SELECT")
                .is_ok()
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let gate = gate(&[("ALLOW_DDL_OPERATIONS", "true")]);
        for (sql, tag) in [
            ("GRANT ALL ON *.* TO u", "UNKNOWN"),
            ("DROP TABLE t", "DROP"),
            ("SELECT 1", "SELECT"),
        ] {
            assert_eq!(gate.validate_query(sql, tag), gate.validate_query(sql, tag));
        }
    }

    #[test]
    fn test_validate_statement_classifies() {
        let gate = gate(&[]);
        let denial = gate.validate_statement("  create table t (id int)").unwrap_err();
        assert_eq!(denial.kind, DenialKind::OperationNotPermitted);
        assert_eq!(denial.keyword, "CREATE");

        assert!(gate.validate_statement("SELECT created_at FROM t").is_ok());
    }

    #[test]
    fn test_is_exempt() {
        let gate = gate(&[("ALLOW_DDL_OPERATIONS", "true")]);
        let create = &DANGEROUS_KEYWORDS[0];
        let grant = DANGEROUS_KEYWORDS
            .iter()
            .find(|k| k.keyword == "GRANT")
            .unwrap();

        assert!(gate.is_exempt(create, OperationTag::Create));
        assert!(!gate.is_exempt(create, OperationTag::Select));
        assert!(!gate.is_exempt(grant, OperationTag::Create));
    }

    #[test]
    fn test_default_gate_is_restrictive() {
        assert_eq!(*AuthorizationGate::default().policy(), PolicyConfig::default());
    }

    #[test]
    fn test_gate_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthorizationGate>();
    }
}
