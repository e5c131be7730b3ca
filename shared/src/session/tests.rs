use super::*;
use crate::token::encode_unsigned;
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;

// =========================================================
// 辅助函数
// =========================================================

const NOW: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

#[derive(Clone, Copy)]
struct FixedClock(Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }

    fn today(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }
}

fn session() -> (Session<MemoryTokenStore, FixedClock>, MemoryTokenStore) {
    let store = MemoryTokenStore::new();
    let session = Session::new(store.clone(), FixedClock(Timestamp::from_secs(NOW)));
    (session, store)
}

fn token_expiring_in(offset: i64) -> String {
    encode_unsigned(&json!({
        "id": 7,
        "email": "sita@example.com",
        "exp": NOW + offset,
    }))
}

// =========================================================
// 守卫状态
// =========================================================

#[test]
fn test_no_token_redirects_without_touching_store() {
    let (session, _) = session();
    assert_eq!(session.inspect(Role::User), TokenState::NoToken);
    assert_eq!(
        session.guard(Role::User),
        GuardOutcome::Redirected(Redirect {
            role: Role::User,
            reason: RedirectReason::NotLoggedIn,
        })
    );
}

#[test]
fn test_token_expired_one_second_ago_is_cleared() {
    let (session, store) = session();
    store.save(Role::User.storage_key(), &token_expiring_in(-1));

    assert_eq!(session.inspect(Role::User), TokenState::TokenExpired);
    let outcome = session.guard(Role::User);

    assert_eq!(
        outcome,
        GuardOutcome::Redirected(Redirect {
            role: Role::User,
            reason: RedirectReason::Expired,
        })
    );
    assert!(store.load(Role::User.storage_key()).is_none());
}

#[test]
fn test_token_expiring_exactly_now_is_expired() {
    let (session, _) = session();
    let token = token_expiring_in(0);
    session.store.save(Role::User.storage_key(), &token);
    assert_eq!(session.inspect(Role::User), TokenState::TokenExpired);
}

#[test]
fn test_valid_token_exposes_identity() {
    let (session, store) = session();
    let token = token_expiring_in(3600);
    store.save(Role::User.storage_key(), &token);

    let identity = session.current_identity(Role::User).expect("authorized");
    assert_eq!(identity.account_id.as_str(), "7");
    assert_eq!(identity.role, Role::User);
    assert_eq!(identity.email.as_deref(), Some("sita@example.com"));
    assert_eq!(identity.token, token);
    assert_eq!(
        identity.expires_at,
        Timestamp::from_secs(NOW) + Duration::from_secs(3600)
    );
    // 校验不会移除有效令牌
    assert!(store.load(Role::User.storage_key()).is_some());
}

#[test]
fn test_unparseable_token_behaves_like_expired() {
    let (session, store) = session();
    store.save(Role::Owner.storage_key(), "garbage");

    assert!(matches!(
        session.inspect(Role::Owner),
        TokenState::TokenInvalid(_)
    ));
    let outcome = session.guard(Role::Owner);
    let GuardOutcome::Redirected(redirect) = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(redirect.path(), "/owner/login");
    assert_eq!(redirect.reason, RedirectReason::Invalid);
    assert!(store.load(Role::Owner.storage_key()).is_none());
}

#[test]
fn test_role_mismatch_is_invalid() {
    let (session, store) = session();
    let token = encode_unsigned(&json!({"id": 1, "role": "user", "exp": NOW + 60}));
    store.save(Role::Admin.storage_key(), &token);

    assert!(session.current_identity(Role::Admin).is_none());
    assert!(store.load(Role::Admin.storage_key()).is_none());
}

#[test]
fn test_roles_are_isolated() {
    let (session, store) = session();
    store.save(Role::Owner.storage_key(), &token_expiring_in(60));

    assert!(session.current_identity(Role::Owner).is_some());
    assert!(session.current_identity(Role::User).is_none());
    assert!(session.current_identity(Role::Admin).is_none());
    assert_eq!(session.any_identity().map(|i| i.role), Some(Role::Owner));
}

// =========================================================
// 登录与注销
// =========================================================

#[test]
fn test_sign_in_stores_valid_token() {
    let (session, store) = session();
    let token = token_expiring_in(600);

    let identity = session.sign_in(Role::User, &token).unwrap();
    assert_eq!(identity.account_id.as_str(), "7");
    assert_eq!(store.load(Role::User.storage_key()), Some(token));
}

#[test]
fn test_sign_in_rejects_expired_token() {
    let (session, store) = session();
    assert_eq!(
        session.sign_in(Role::User, &token_expiring_in(-10)),
        Err(SignInError::Expired)
    );
    assert!(store.load(Role::User.storage_key()).is_none());
}

#[test]
fn test_sign_in_rejects_garbage() {
    let (session, _) = session();
    assert!(matches!(
        session.sign_in(Role::Admin, "abc"),
        Err(SignInError::Invalid(TokenError::Format))
    ));
}

#[test]
fn test_invalidate_clears_only_that_role() {
    let (session, store) = session();
    store.save(Role::User.storage_key(), &token_expiring_in(60));
    store.save(Role::Owner.storage_key(), &token_expiring_in(60));

    session.invalidate(Role::User);

    assert!(session.current_identity(Role::User).is_none());
    assert!(session.current_identity(Role::Owner).is_some());
}

#[test]
fn test_display_name_fallbacks() {
    let (session, store) = session();
    store.save(Role::User.storage_key(), &token_expiring_in(60));
    let identity = session.current_identity(Role::User).unwrap();
    assert_eq!(identity.display_name(), "sita@example.com");

    let anonymous = Identity {
        email: None,
        ..identity
    };
    assert_eq!(anonymous.display_name(), "user #7");
}
