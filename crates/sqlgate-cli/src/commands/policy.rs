//! `sqlgate policy` command implementation.
//!
//! Prints the effective policy after the config file and environment have
//! been merged, together with how each dangerous keyword is treated.

use anyhow::Result;
use serde::Serialize;
use sqlgate_core::PolicyConfig;
use sqlgate_policy::{AuthorizationGate, DANGEROUS_KEYWORDS, DangerousKeyword, OperationTag};
use std::path::Path;

use super::load_sources;

/// How the keyword scan treats a keyword under a given policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordStatus {
    /// Every check is bypassed.
    Bypassed,
    /// The keyword scan is off.
    NotScanned,
    /// Skipped for permitted DDL statements, blocked otherwise.
    ExemptForDdl,
    Blocked,
}

impl KeywordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordStatus::Bypassed => "bypassed",
            KeywordStatus::NotScanned => "not scanned",
            KeywordStatus::ExemptForDdl => "exempt for DDL statements",
            KeywordStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeywordEntry {
    pub keyword: &'static str,
    pub status: KeywordStatus,
}

#[derive(Debug, Serialize)]
pub struct PolicyReport {
    pub policy: PolicyConfig,
    pub keywords: Vec<KeywordEntry>,
}

/// Classify one keyword under the gate's policy.
pub fn keyword_status(gate: &AuthorizationGate, keyword: &DangerousKeyword) -> KeywordStatus {
    let policy = gate.policy();
    if policy.allow_all_operations {
        KeywordStatus::Bypassed
    } else if !policy.block_dangerous_keywords {
        KeywordStatus::NotScanned
    } else if OperationTag::DDL
        .iter()
        .any(|tag| gate.is_exempt(keyword, *tag))
    {
        KeywordStatus::ExemptForDdl
    } else {
        KeywordStatus::Blocked
    }
}

/// Build the report for a gate.
pub fn report(gate: &AuthorizationGate) -> PolicyReport {
    PolicyReport {
        policy: *gate.policy(),
        keywords: DANGEROUS_KEYWORDS
            .iter()
            .map(|keyword| KeywordEntry {
                keyword: keyword.keyword,
                status: keyword_status(gate, keyword),
            })
            .collect(),
    }
}

/// Print the effective policy.
pub fn run(config_path: Option<&Path>, json: bool) -> Result<()> {
    let sources = load_sources(config_path)?;
    let gate = AuthorizationGate::new(sources.values());
    let report = report(&gate);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let policy = &report.policy;
    println!("Effective policy:");
    println!("   ALLOW_ALL_OPERATIONS:     {}", policy.allow_all_operations);
    println!("   ALLOW_DDL_OPERATIONS:     {}", policy.allow_ddl_operations);
    println!("   BLOCK_DANGEROUS_KEYWORDS: {}", policy.block_dangerous_keywords);
    println!();
    println!("Dangerous keywords:");
    for entry in &report.keywords {
        println!("   {:<14} {}", entry.keyword, entry.status.as_str());
    }

    Ok(())
}
