use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token lifetime. Always at least one second, so a claim set built from it
/// expires strictly after it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtl(Duration);

impl TokenTtl {
    pub fn new(duration: Duration) -> Option<Self> {
        if duration.num_seconds() > 0 {
            Some(Self(Duration::seconds(duration.num_seconds())))
        } else {
            None
        }
    }

    pub fn from_secs(seconds: i64) -> Option<Self> {
        Self::new(Duration::seconds(seconds))
    }

    pub fn num_seconds(&self) -> i64 {
        self.0.num_seconds()
    }
}

/// Payload signed inside every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    #[serde(rename = "sub")]
    pub subject: String, // Login email
    pub role: String,
    #[serde(rename = "iat", alias = "created")]
    pub issued_at: i64, // Unix timestamp
    #[serde(rename = "exp")]
    pub expires_at: i64, // Unix timestamp
}

impl ClaimSet {
    pub fn new(subject: String, role: String, issued_at: DateTime<Utc>, ttl: TokenTtl) -> Self {
        let issued_at = issued_at.timestamp();
        Self { subject, role, issued_at, expires_at: issued_at + ttl.num_seconds() }
    }

    /// Same subject and role, new issue time.
    pub fn reissued(&self, issued_at: DateTime<Utc>, ttl: TokenTtl) -> Self {
        Self::new(self.subject.clone(), self.role.clone(), issued_at, ttl)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_ttl_rejects_non_positive_durations() {
        assert!(TokenTtl::from_secs(0).is_none());
        assert!(TokenTtl::from_secs(-5).is_none());
        assert!(TokenTtl::new(Duration::milliseconds(500)).is_none());
        assert_eq!(TokenTtl::from_secs(3600).unwrap().num_seconds(), 3600);
    }

    #[test]
    fn test_expiry_is_issue_time_plus_ttl() {
        let ttl = TokenTtl::from_secs(3600).unwrap();
        let claims = ClaimSet::new("alice@example.com".into(), "ADMIN".into(), t0(), ttl);

        assert_eq!(claims.issued_at, t0().timestamp());
        assert_eq!(claims.expires_at, claims.issued_at + 3600);
        assert!(claims.expires_at > claims.issued_at);
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let ttl = TokenTtl::from_secs(60).unwrap();
        let claims = ClaimSet::new("bob@example.com".into(), "USER".into(), t0(), ttl);

        assert!(!claims.is_expired_at(t0() + Duration::seconds(59)));
        assert!(claims.is_expired_at(t0() + Duration::seconds(60)));
        assert!(claims.is_expired_at(t0() + Duration::seconds(61)));
    }

    #[test]
    fn test_wire_keys() {
        let ttl = TokenTtl::from_secs(10).unwrap();
        let claims = ClaimSet::new("bob@example.com".into(), "USER".into(), t0(), ttl);
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["sub"], "bob@example.com");
        assert_eq!(value["role"], "USER");
        assert_eq!(value["iat"], t0().timestamp());
        assert_eq!(value["exp"], t0().timestamp() + 10);
    }

    #[test]
    fn test_created_is_accepted_for_issued_at() {
        let claims: ClaimSet = serde_json::from_str(
            r#"{"sub":"bob@example.com","role":"USER","created":100,"exp":200}"#,
        )
        .unwrap();

        assert_eq!(claims.issued_at, 100);
        assert_eq!(claims.expires_at, 200);
    }
}
