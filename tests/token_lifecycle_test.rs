use chrono::{DateTime, Duration, Utc};
use finbook_rs::auth::{
    claims::TokenTtl,
    errors::{RefreshFlowError, TokenError},
    jwt::TokenCodec,
    lifecycle::TokenManager,
    principal::{Identity, Principal},
    refresh::refresh_from_header_value_at,
};

const SECRET: &[u8] = b"scenario-secret";

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_171_717, 0).unwrap()
}

fn manager() -> TokenManager {
    TokenManager::with_ttl(SECRET, TokenTtl::from_secs(3600).unwrap())
}

fn alice() -> Principal {
    Principal { id: Some(1), subject: "alice@example.com".to_string(), role: "ADMIN".to_string() }
}

fn scenario_a_token() -> String {
    manager().issue_at(&alice(), t0()).expect("Failed to issue token")
}

#[test]
fn test_scenario_a_issue_and_decode() {
    let claims = manager().codec().decode(&scenario_a_token()).unwrap();

    assert_eq!(claims.subject, "alice@example.com");
    assert_eq!(claims.role, "ADMIN");
    assert_eq!(claims.issued_at, t0().timestamp());
    assert_eq!(claims.expires_at, t0().timestamp() + 3600);
}

#[test]
fn test_scenario_b_other_secret() {
    let other = TokenCodec::new(b"a-completely-different-secret");
    assert_eq!(other.decode(&scenario_a_token()), Err(TokenError::SignatureInvalid));
}

#[test]
fn test_scenario_c_expired_but_decodable() {
    let token = scenario_a_token();
    let later = t0() + Duration::seconds(3601);

    assert!(!manager().is_valid_at(&token, later));
    assert!(manager().codec().decode(&token).is_ok());
}

#[test]
fn test_scenario_d_refresh() {
    let refreshed = manager().refresh_at(&scenario_a_token(), t0() + Duration::seconds(100)).unwrap();
    let claims = manager().codec().decode(&refreshed).unwrap();

    assert_eq!(claims.subject, "alice@example.com");
    assert_eq!(claims.role, "ADMIN");
    assert_eq!(claims.issued_at, t0().timestamp() + 100);
    assert_eq!(claims.expires_at, t0().timestamp() + 3700);
}

#[test]
fn test_scenario_e_refresh_flow_after_expiry() {
    let header = format!("Bearer {}", scenario_a_token());
    let outcome = refresh_from_header_value_at(&manager(), Some(&header), t0() + Duration::seconds(3601));

    assert_eq!(outcome, Err(RefreshFlowError::InvalidOrExpired));
}

#[test]
fn test_roundtrip_for_several_principals() {
    let manager = manager();
    let identities = [
        Identity { id: 1, email: "a@example.com".into(), password_hash: String::new(), role: "USER".into() },
        Identity { id: 2, email: "b+tag@example.org".into(), password_hash: String::new(), role: "ADMIN".into() },
        Identity { id: 3, email: "ü@exämple.de".into(), password_hash: String::new(), role: "USER".into() },
    ];

    for identity in &identities {
        let token = manager.issue_at(&Principal::from_identity(identity), t0()).unwrap();
        let claims = manager.codec().decode(&token).unwrap();

        assert_eq!(claims.subject, identity.email);
        assert_eq!(claims.role, identity.role);
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
    }
}

#[test]
fn test_issue_for_identity_is_currently_valid() {
    let manager = manager();
    let identity = Identity { id: 9, email: "now@example.com".into(), password_hash: String::new(), role: "USER".into() };

    let token = manager.issue_for_identity(&identity).unwrap();
    assert!(manager.is_valid(&token));

    let principal = manager.authorize(&token).unwrap();
    assert_eq!(principal.subject, "now@example.com");
    assert_eq!(principal.id, None);
}

#[test]
fn test_refresh_of_refreshed_token() {
    let manager = manager();
    let first = manager.refresh_at(&scenario_a_token(), t0() + Duration::seconds(3000)).unwrap();

    // Original would be dead by now, the refreshed one is not.
    let later = t0() + Duration::seconds(5000);
    assert!(!manager.is_valid_at(&scenario_a_token(), later));
    assert!(manager.is_valid_at(&first, later));

    let second = manager.refresh_at(&first, later).unwrap();
    let claims = manager.codec().decode(&second).unwrap();
    assert_eq!(claims.expires_at, later.timestamp() + 3600);
}

#[test]
fn test_concurrent_use_without_locks() {
    let manager = manager();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let manager = manager.clone();
            std::thread::spawn(move || {
                let principal = Principal { id: None, subject: format!("user{}@example.com", i), role: "USER".into() };
                let token = manager.issue_at(&principal, t0()).unwrap();
                let refreshed = manager.refresh_at(&token, t0() + Duration::seconds(10)).unwrap();
                manager.authorize_at(&refreshed, t0() + Duration::seconds(20)).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let principal = handle.join().unwrap();
        assert_eq!(principal.subject, format!("user{}@example.com", i));
    }
}
