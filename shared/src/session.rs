//! 会话守卫
//!
//! 整个应用只构造一个 `Session`，由它负责：
//! 读取存储中的令牌 -> 解码 -> 判断过期 -> 决定放行或重定向。
//! 每次进入受保护页面都会重新校验，不缓存校验结果。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::{Clock, Timestamp};
use crate::token::{AccountId, TokenError, decode_claims};

// =========================================================
// 角色
// =========================================================

/// 使用方角色，每个角色拥有独立的令牌存储键和登录页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Owner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Owner, Role::Admin];

    /// LocalStorage 中保存该角色令牌的键
    pub fn storage_key(&self) -> &'static str {
        match self {
            Role::User => "easyrent_user_token",
            Role::Owner => "easyrent_owner_token",
            Role::Admin => "easyrent_admin_token",
        }
    }

    pub fn login_path(&self) -> &'static str {
        match self {
            Role::User => "/login",
            Role::Owner => "/owner/login",
            Role::Admin => "/admin/login",
        }
    }

    /// 登录成功后的落地页
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::User => "/",
            Role::Owner => "/owner/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }

    /// 令牌载荷里的 `role` 字段是否表示本角色
    pub fn matches_claim(&self, claim: &str) -> bool {
        let claim = claim.trim().to_ascii_lowercase();
        match self {
            Role::User => matches!(claim.as_str(), "user" | "renter" | "customer"),
            Role::Owner => matches!(claim.as_str(), "owner" | "vehicle_owner"),
            Role::Admin => matches!(claim.as_str(), "admin"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =========================================================
// 存储抽象
// =========================================================

/// 令牌存储（浏览器中为 LocalStorage）
pub trait TokenStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 内存实现，用于测试和非浏览器环境
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    entries: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 身份与守卫结果
// =========================================================

/// 已校验的调用方身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: AccountId,
    pub role: Role,
    pub email: Option<String>,
    pub name: Option<String>,
    pub expires_at: Timestamp,
    /// 原始令牌，用于 Bearer 认证头
    pub token: String,
}

impl Identity {
    /// 页面上展示用的名称
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| format!("{} #{}", self.role, self.account_id))
    }
}

/// 读取存储后的令牌状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    TokenExpired,
    TokenInvalid(TokenError),
    TokenValid(Identity),
}

/// 需要重新登录的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NotLoggedIn,
    Expired,
    Invalid,
    /// 后端拒绝了令牌（401/403）或用户主动退出
    Revoked,
}

impl RedirectReason {
    /// 展示给用户的提示
    pub fn notice(&self) -> &'static str {
        match self {
            RedirectReason::NotLoggedIn => "Please log in to continue.",
            RedirectReason::Expired => "Your session has expired. Please log in again.",
            RedirectReason::Invalid => "Your session is invalid. Please log in again.",
            RedirectReason::Revoked => "You have been signed out. Please log in again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub role: Role,
    pub reason: RedirectReason,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        self.role.login_path()
    }
}

/// 守卫的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Authorized(Identity),
    Redirected(Redirect),
}

impl GuardOutcome {
    pub fn identity(self) -> Option<Identity> {
        match self {
            GuardOutcome::Authorized(identity) => Some(identity),
            GuardOutcome::Redirected(_) => None,
        }
    }
}

// =========================================================
// Session
// =========================================================

/// 进程级会话上下文
#[derive(Debug, Clone, Copy, Default)]
pub struct Session<S, C> {
    store: S,
    clock: C,
}

impl<S: TokenStore, C: Clock> Session<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// 只读地判定令牌状态，不产生副作用
    pub fn inspect(&self, role: Role) -> TokenState {
        let Some(token) = self.store.load(role.storage_key()) else {
            return TokenState::NoToken;
        };
        evaluate(role, &token, self.clock.now())
    }

    /// 守卫入口：过期或无效的令牌会先被清除，再要求重定向
    pub fn guard(&self, role: Role) -> GuardOutcome {
        let reason = match self.inspect(role) {
            TokenState::TokenValid(identity) => return GuardOutcome::Authorized(identity),
            TokenState::NoToken => RedirectReason::NotLoggedIn,
            TokenState::TokenExpired => {
                log::info!("[Session] {role} token expired, clearing");
                self.store.remove(role.storage_key());
                RedirectReason::Expired
            }
            TokenState::TokenInvalid(err) => {
                log::warn!("[Session] {role} token rejected: {err}");
                self.store.remove(role.storage_key());
                RedirectReason::Invalid
            }
        };
        GuardOutcome::Redirected(Redirect { role, reason })
    }

    pub fn current_identity(&self, role: Role) -> Option<Identity> {
        self.guard(role).identity()
    }

    /// 当前任意一个有效角色的身份（用于导航栏展示）
    pub fn any_identity(&self) -> Option<Identity> {
        Role::ALL
            .iter()
            .find_map(|role| match self.inspect(*role) {
                TokenState::TokenValid(identity) => Some(identity),
                _ => None,
            })
    }

    /// 清除该角色的凭据
    pub fn invalidate(&self, role: Role) {
        log::debug!("[Session] invalidating {role} session");
        self.store.remove(role.storage_key());
    }

    /// 保存登录返回的令牌
    ///
    /// 保存前先校验；已过期或格式错误的令牌不会写入存储。
    pub fn sign_in(&self, role: Role, token: &str) -> Result<Identity, SignInError> {
        match evaluate(role, token, self.clock.now()) {
            TokenState::TokenValid(identity) => {
                self.store.save(role.storage_key(), token.trim());
                Ok(identity)
            }
            TokenState::TokenExpired => Err(SignInError::Expired),
            TokenState::TokenInvalid(err) => Err(SignInError::Invalid(err)),
            TokenState::NoToken => Err(SignInError::Invalid(TokenError::Format)),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SignInError {
    #[error("the server issued an already expired session")]
    Expired,
    #[error("the server issued an unreadable session: {0}")]
    Invalid(TokenError),
}

fn evaluate(role: Role, token: &str, now: Timestamp) -> TokenState {
    if token.trim().is_empty() {
        return TokenState::NoToken;
    }

    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(err) => return TokenState::TokenInvalid(err),
    };

    if let Err(err) = claims.check_role(role) {
        return TokenState::TokenInvalid(err);
    }

    if claims.is_expired_at(now) {
        return TokenState::TokenExpired;
    }

    TokenState::TokenValid(Identity {
        account_id: claims.id,
        role,
        email: claims.email,
        name: claims.name,
        expires_at: claims.exp,
        token: token.trim().to_string(),
    })
}

#[cfg(test)]
mod tests;
