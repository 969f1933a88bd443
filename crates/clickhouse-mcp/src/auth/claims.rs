//! JWT claims types

use serde::Deserialize;

/// Claims carried by issued tokens
///
/// Only `exp` is required for validation; issuers also set `sub`, `iat` and
/// `iss`, which are decoded for completeness but not consumed downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_claims() {
        let json = r#"{
            "sub": "agent",
            "iss": "clickhouse_mcp_client",
            "iat": 1700000000,
            "exp": 1700003600
        }"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("agent"));
        assert_eq!(claims.iss.as_deref(), Some("clickhouse_mcp_client"));
        assert_eq!(claims.iat, Some(1_700_000_000));
        assert_eq!(claims.exp, 1_700_003_600);
    }

    #[test]
    fn test_deserialize_minimal_claims() {
        let json = r#"{"exp": 1700003600}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(claims.sub.is_none());
        assert!(claims.iss.is_none());
        assert!(claims.iat.is_none());
    }

    #[test]
    fn test_deserialize_missing_exp_fails() {
        let json = r#"{"sub": "agent"}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }
}
