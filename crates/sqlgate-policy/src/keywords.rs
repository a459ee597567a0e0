//! Dangerous keyword detection.
//!
//! Keywords are matched as whole words, case-insensitively. A keyword only
//! matches when it is bounded by non-word characters or the ends of the text,
//! so identifiers such as `created_at`, `CreateUser` or `altered_by` never
//! trigger `CREATE` or `ALTER`. Word characters are letters, digits and `_`.
//!
//! Multi-word keywords (`INTO OUTFILE`) match across any run of whitespace
//! and comments, since MySQL treats `/* */`, `-- ` and `#` comments as
//! token separators.

use regex::Regex;
use std::sync::LazyLock;

/// What a dangerous keyword does to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Schema modification. Exempt when DDL is allowed for a DDL-tagged request.
    Ddl,
    /// Privilege changes.
    Privilege,
    /// Reading or writing server-side files.
    FileAccess,
    /// Server administration.
    Server,
}

/// A keyword the gate refuses unless the policy says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DangerousKeyword {
    /// Canonical upper-case spelling, reported in denials.
    pub keyword: &'static str,
    pub category: KeywordCategory,
}

impl DangerousKeyword {
    const fn new(keyword: &'static str, category: KeywordCategory) -> Self {
        Self { keyword, category }
    }

    /// Whether this keyword belongs to the DDL category.
    pub fn is_ddl(&self) -> bool {
        self.category == KeywordCategory::Ddl
    }
}

/// The dangerous keyword set, in scan order.
///
/// When a statement contains several of these, the first one in this list is
/// the one reported.
pub const DANGEROUS_KEYWORDS: &[DangerousKeyword] = &[
    DangerousKeyword::new("CREATE", KeywordCategory::Ddl),
    DangerousKeyword::new("ALTER", KeywordCategory::Ddl),
    DangerousKeyword::new("DROP", KeywordCategory::Ddl),
    DangerousKeyword::new("TRUNCATE", KeywordCategory::Ddl),
    DangerousKeyword::new("RENAME", KeywordCategory::Ddl),
    DangerousKeyword::new("GRANT", KeywordCategory::Privilege),
    DangerousKeyword::new("REVOKE", KeywordCategory::Privilege),
    DangerousKeyword::new("LOAD_FILE", KeywordCategory::FileAccess),
    DangerousKeyword::new("INTO OUTFILE", KeywordCategory::FileAccess),
    DangerousKeyword::new("INTO DUMPFILE", KeywordCategory::FileAccess),
    DangerousKeyword::new("SHUTDOWN", KeywordCategory::Server),
];

/// Whitespace or comments between the words of a multi-word keyword.
const WORD_SEPARATOR: &str = r"(?:\s|/\*(?s:.*?)\*/|--[^\n]*\n|#[^\n]*\n)+";

/// Build the whole-word pattern for a keyword.
fn keyword_pattern(keyword: &str) -> Result<Regex, regex::Error> {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(WORD_SEPARATOR);
    Regex::new(&format!(r"(?i)\b{}\b", body))
}

/// Check whether `keyword` occurs in `text` as a complete word.
///
/// Case-insensitive. An empty keyword never matches. Built-in keywords reuse
/// the shared scanner's compiled patterns.
pub fn is_whole_word_match(text: &str, keyword: &str) -> bool {
    let keyword = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
    if keyword.is_empty() {
        return false;
    }

    if let Some(compiled) = KeywordScanner::shared().lookup(&keyword) {
        return compiled.pattern.is_match(text);
    }

    // Escaped literals always compile.
    keyword_pattern(&keyword).is_ok_and(|re| re.is_match(text))
}

struct CompiledKeyword {
    keyword: &'static DangerousKeyword,
    pattern: Regex,
}

/// Pre-compiled matchers for [`DANGEROUS_KEYWORDS`].
pub struct KeywordScanner {
    compiled: Vec<CompiledKeyword>,
}

static SHARED_SCANNER: LazyLock<KeywordScanner> = LazyLock::new(KeywordScanner::new);

impl KeywordScanner {
    fn new() -> Self {
        let compiled = DANGEROUS_KEYWORDS
            .iter()
            .map(|keyword| CompiledKeyword {
                keyword,
                pattern: keyword_pattern(keyword.keyword)
                    .expect("built-in keyword patterns are valid"),
            })
            .collect();
        Self { compiled }
    }

    /// The process-wide scanner. Compiled on first use, read-only afterwards.
    pub fn shared() -> &'static KeywordScanner {
        &SHARED_SCANNER
    }

    fn lookup(&self, keyword: &str) -> Option<&CompiledKeyword> {
        self.compiled
            .iter()
            .find(|c| c.keyword.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Find the first dangerous keyword in `text`, in set order, skipping
    /// keywords for which `exempt` returns true.
    pub fn find_first<F>(&self, text: &str, exempt: F) -> Option<&'static DangerousKeyword>
    where
        F: Fn(&DangerousKeyword) -> bool,
    {
        self.compiled
            .iter()
            .filter(|c| !exempt(c.keyword))
            .find(|c| c.pattern.is_match(text))
            .map(|c| c.keyword)
    }

    /// All dangerous keywords present in `text`, in set order.
    pub fn find_all(&self, text: &str) -> Vec<&'static DangerousKeyword> {
        self.compiled
            .iter()
            .filter(|c| c.pattern.is_match(text))
            .map(|c| c.keyword)
            .collect()
    }
}
