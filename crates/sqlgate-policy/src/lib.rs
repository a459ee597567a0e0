//! Sqlgate Authorization
//!
//! Decides whether a SQL statement may be executed under an operator policy
//! of three flags: a global override, a DDL permission, and a dangerous
//! keyword scan. Denials are returned as [`Denial`] values naming the rule and
//! the keyword or operation that triggered it.
//!
//! The gate performs no I/O and keeps no state beyond its policy.

pub mod error;
pub mod gate;
pub mod keywords;
pub mod request;

pub use error::{Denial, DenialKind};
pub use gate::AuthorizationGate;
pub use keywords::{
    DANGEROUS_KEYWORDS, DangerousKeyword, KeywordCategory, KeywordScanner, is_whole_word_match,
};
pub use request::{OperationTag, QueryRequest, classify_statement};
pub use sqlgate_core::PolicyConfig;
