//! Static inspection of SQL before execution
//!
//! The guard is a coarse textual check, not a parser: the query must start
//! with SELECT and must not contain any mutating keyword as a substring
//! anywhere in the text. Substring matching is deliberately over-broad (a
//! quoted literal like `'UPDATE'` is rejected) and offers no protection
//! against statements disguised via comments, string literals, or
//! multi-statement batching. A stronger check would parse the statement and
//! assert its root node is a read-only select.

/// Keywords that indicate mutating statements
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE",
];

/// Rejection message for statements that are not SELECTs
pub const REASON_NOT_SELECT: &str = "Only SELECT queries are allowed";

/// Rejection message for queries containing a denylisted keyword
pub const REASON_FORBIDDEN_KEYWORD: &str = "Query contains forbidden keywords";

/// Accept/reject decision for a query, consumed immediately by the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(&'static str),
}

impl Verdict {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Static SQL inspector for the read-only tool
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryGuard;

impl QueryGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Inspect a SQL string; the original, unmodified string is what gets
    /// executed on acceptance.
    #[must_use]
    pub fn check(&self, sql: &str) -> Verdict {
        let normalized = sql.trim().to_uppercase();

        if !normalized.starts_with("SELECT") {
            return Verdict::Rejected(REASON_NOT_SELECT);
        }

        if FORBIDDEN_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
            return Verdict::Rejected(REASON_FORBIDDEN_KEYWORD);
        }

        Verdict::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(sql: &str) -> Verdict {
        QueryGuard::new().check(sql)
    }

    #[test]
    fn test_plain_select_accepted() {
        assert_eq!(check("SELECT id, name FROM users LIMIT 5"), Verdict::Accepted);
    }

    #[test]
    fn test_lowercase_select_accepted() {
        assert_eq!(check("select count(*) from events"), Verdict::Accepted);
    }

    #[test]
    fn test_leading_whitespace_ignored() {
        assert_eq!(check("   \n\tSELECT 1"), Verdict::Accepted);
    }

    #[test]
    fn test_non_select_rejected() {
        assert_eq!(
            check("SHOW TABLES"),
            Verdict::Rejected(REASON_NOT_SELECT)
        );
    }

    #[test]
    fn test_insert_rejected() {
        assert_eq!(
            check("INSERT INTO users VALUES (1)"),
            Verdict::Rejected(REASON_NOT_SELECT)
        );
    }

    #[test]
    fn test_empty_string_rejected() {
        assert_eq!(check(""), Verdict::Rejected(REASON_NOT_SELECT));
    }

    #[test]
    fn test_forbidden_keyword_anywhere() {
        assert_eq!(
            check("SELECT 1; DROP TABLE users"),
            Verdict::Rejected(REASON_FORBIDDEN_KEYWORD)
        );
    }

    #[test]
    fn test_forbidden_keyword_case_insensitive() {
        assert_eq!(
            check("select * from t where delete_flag = 1"),
            Verdict::Rejected(REASON_FORBIDDEN_KEYWORD)
        );
    }

    #[test]
    fn test_quoted_keyword_still_rejected() {
        // A read-only query mentioning UPDATE in a string literal is
        // rejected too; the check is substring-level.
        assert_eq!(
            check("SELECT * FROM audit_log WHERE action='UPDATE'"),
            Verdict::Rejected(REASON_FORBIDDEN_KEYWORD)
        );
    }

    #[test]
    fn test_keyword_inside_identifier_rejected() {
        assert_eq!(
            check("SELECT update_count FROM stats"),
            Verdict::Rejected(REASON_FORBIDDEN_KEYWORD)
        );
    }

    #[test]
    fn test_verdict_is_accepted() {
        assert!(Verdict::Accepted.is_accepted());
        assert!(!Verdict::Rejected(REASON_NOT_SELECT).is_accepted());
    }
}
