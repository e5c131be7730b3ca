//! 会话令牌解码
//!
//! 客户端只解码 JWT 的载荷段，不校验签名（签名由后端校验）。

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;
use crate::date::Timestamp;

/// base64url，容忍有无补齐符
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Format,
    #[error("token payload is not valid base64url")]
    Encoding,
    #[error("token payload is malformed: {0}")]
    Payload(String),
    #[error("token was issued for {found}, expected {expected}")]
    RoleMismatch { expected: Role, found: String },
}

/// 账号 ID
///
/// 后端签发的 `id` 可能是数字也可能是字符串，统一规范为字符串。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawAccountId", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccountId {
    Number(i64),
    Text(String),
}

impl From<RawAccountId> for AccountId {
    fn from(raw: RawAccountId) -> Self {
        match raw {
            RawAccountId::Number(n) => Self(n.to_string()),
            RawAccountId::Text(s) => Self(s),
        }
    }
}

/// 令牌载荷中客户端关心的字段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    pub id: AccountId,
    pub exp: Timestamp,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Claims {
    /// `exp` 严格大于当前时间才算有效
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.exp <= now
    }

    /// 载荷中带了 `role` 时必须与期望角色一致
    pub fn check_role(&self, expected: Role) -> Result<(), TokenError> {
        match self.role.as_deref() {
            Some(found) if !expected.matches_claim(found) => Err(TokenError::RoleMismatch {
                expected,
                found: found.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// 解码令牌的载荷段
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Format);
    };

    if payload.is_empty() {
        return Err(TokenError::Format);
    }

    let bytes = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))
}

/// 测试辅助：构造一个未签名的 JWT
#[cfg(test)]
pub(crate) fn encode_unsigned(payload: &serde_json::Value) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_numeric_id() {
        let token = encode_unsigned(&json!({"id": 42, "exp": 1_700_000_000, "email": "a@b.np"}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.id.as_str(), "42");
        assert_eq!(claims.exp, Timestamp::from_secs(1_700_000_000));
        assert_eq!(claims.email.as_deref(), Some("a@b.np"));
        assert_eq!(claims.role, None);
    }

    #[test]
    fn test_decode_string_id_and_padding() {
        use base64::engine::general_purpose::URL_SAFE;

        let body = URL_SAFE.encode(json!({"id": "u-7", "exp": 10}).to_string());
        let token = format!("h.{body}.s");
        assert_eq!(decode_claims(&token).unwrap().id.as_str(), "u-7");
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        assert_eq!(decode_claims("not-a-token"), Err(TokenError::Format));
        assert_eq!(decode_claims("a..c"), Err(TokenError::Format));
        assert_eq!(decode_claims("a.b.c.d"), Err(TokenError::Format));
        assert_eq!(decode_claims("a.!!!.c"), Err(TokenError::Encoding));
    }

    #[test]
    fn test_decode_rejects_missing_exp() {
        let token = encode_unsigned(&json!({"id": 1}));
        assert!(matches!(decode_claims(&token), Err(TokenError::Payload(_))));
    }

    #[test]
    fn test_expiry_is_strict() {
        let token = encode_unsigned(&json!({"id": 1, "exp": 100}));
        let claims = decode_claims(&token).unwrap();
        assert!(claims.is_expired_at(Timestamp::from_secs(100)));
        assert!(claims.is_expired_at(Timestamp::from_secs(101)));
        assert!(!claims.is_expired_at(Timestamp::from_secs(99)));
    }

    #[test]
    fn test_role_check() {
        let token = encode_unsigned(&json!({"id": 1, "exp": 100, "role": "owner"}));
        let claims = decode_claims(&token).unwrap();
        assert!(claims.check_role(Role::Owner).is_ok());
        assert!(matches!(
            claims.check_role(Role::Admin),
            Err(TokenError::RoleMismatch { .. })
        ));
    }
}
