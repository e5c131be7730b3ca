//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

use easyrent_shared::date::Clock;
use easyrent_shared::model::RecordId;
use easyrent_shared::{GuardOutcome, Identity, Redirect, Role, Session, TokenStore};

/// 应用路由枚举
///
/// 支付回跳的 `pidx` 和未匹配的原始地址都保存在路由里，
/// 写回 History 时地址栏不会丢失它们。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 车辆列表 (公开首页)
    #[default]
    Home,
    /// 各角色登录页
    Login(Role),
    /// 注册页，只有用户和车主可以自助注册
    Register(Role),
    /// 车辆详情与预订 (需要用户登录)
    VehicleDetail(RecordId),
    /// 我的订单
    MyBookings,
    /// Khalti 回跳后的支付校验，携带未解码的 `pidx`
    PaymentVerify(Option<String>),
    /// 修改密码
    Account,
    /// 车主面板
    OwnerDashboard,
    /// 管理员面板
    AdminDashboard,
    /// 页面未找到，保留用户请求的地址
    NotFound(String),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(raw: &str) -> Self {
        let (path, query) = split_query(raw);
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        match path {
            "/" | "/vehicles" => Self::Home,
            "/login" => Self::Login(Role::User),
            "/owner/login" => Self::Login(Role::Owner),
            "/admin/login" => Self::Login(Role::Admin),
            "/register" => Self::Register(Role::User),
            "/owner/register" => Self::Register(Role::Owner),
            "/bookings" => Self::MyBookings,
            "/payment/verify" => Self::PaymentVerify(query_value(query, "pidx")),
            "/account" => Self::Account,
            "/owner/dashboard" => Self::OwnerDashboard,
            "/admin/dashboard" => Self::AdminDashboard,
            other => other
                .strip_prefix("/vehicles/")
                .and_then(|id| id.parse::<RecordId>().ok())
                .map(Self::VehicleDetail)
                .unwrap_or_else(|| Self::NotFound(raw.to_string())),
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login(role) => role.login_path().to_string(),
            Self::Register(Role::Owner) => "/owner/register".to_string(),
            Self::Register(_) => "/register".to_string(),
            Self::VehicleDetail(id) => format!("/vehicles/{id}"),
            Self::MyBookings => "/bookings".to_string(),
            Self::PaymentVerify(None) => "/payment/verify".to_string(),
            Self::PaymentVerify(Some(pidx)) => format!("/payment/verify?pidx={pidx}"),
            Self::Account => "/account".to_string(),
            Self::OwnerDashboard => "/owner/dashboard".to_string(),
            Self::AdminDashboard => "/admin/dashboard".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// **核心守卫逻辑：该路由需要哪个角色的会话**
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::VehicleDetail(_) | Self::MyBookings | Self::PaymentVerify(_) | Self::Account => {
                Some(Role::User)
            }
            Self::OwnerDashboard => Some(Role::Owner),
            Self::AdminDashboard => Some(Role::Admin),
            Self::Home | Self::Login(_) | Self::Register(_) | Self::NotFound(_) => None,
        }
    }

    /// 已登录该角色时应离开的页面（登录页、注册页）
    pub fn redirect_when_authenticated(&self) -> Option<Role> {
        match self {
            Self::Login(role) | Self::Register(role) => Some(*role),
            _ => None,
        }
    }

    /// 登录成功后的落地页
    pub fn home_for(role: Role) -> Self {
        Self::from_path(role.home_path())
    }
}

/// 拆出路径和查询串，丢弃片段
fn split_query(raw: &str) -> (&str, &str) {
    let raw = raw.split('#').next().unwrap_or_default();
    raw.split_once('?').unwrap_or((raw, ""))
}

/// 查询串中某个参数的原始值，空值视为缺失
fn query_value(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.trim().is_empty())
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫放行后实际展示的页面
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivePage {
    pub route: AppRoute,
    /// 受保护页面上已校验的身份
    pub identity: Option<Identity>,
}

/// 一次导航的守卫结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 放行
    Allow(ActivePage),
    /// 会话缺失或失效，需要去登录页
    Denied { redirect: Redirect, target: AppRoute },
    /// 已登录时访问登录 / 注册页，转到该角色首页
    Forward(AppRoute),
}

/// 每次导航都重新执行守卫，不缓存结果
pub fn resolve<S: TokenStore, C: Clock>(session: &Session<S, C>, target: AppRoute) -> Resolution {
    if let Some(role) = target.required_role() {
        return match session.guard(role) {
            GuardOutcome::Authorized(identity) => Resolution::Allow(ActivePage {
                route: target,
                identity: Some(identity),
            }),
            GuardOutcome::Redirected(redirect) => Resolution::Denied { redirect, target },
        };
    }

    if let Some(role) = target.redirect_when_authenticated() {
        if session.current_identity(role).is_some() {
            return Resolution::Forward(AppRoute::home_for(role));
        }
    }

    Resolution::Allow(ActivePage {
        route: target,
        identity: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::NaiveDate;
    use easyrent_shared::RedirectReason;
    use easyrent_shared::date::Timestamp;
    use easyrent_shared::session::MemoryTokenStore;
    use serde_json::json;

    const NOW: i64 = 1_704_067_200;

    #[derive(Clone, Copy)]
    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_secs(NOW)
        }

        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        }
    }

    fn token(exp: i64, role: &str) -> String {
        let body = URL_SAFE_NO_PAD.encode(json!({"id": 9, "exp": exp, "role": role}).to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{body}.sig")
    }

    fn session_with(role: Role, value: &str) -> (Session<MemoryTokenStore, FixedClock>, MemoryTokenStore) {
        let store = MemoryTokenStore::new();
        store.save(role.storage_key(), value);
        (Session::new(store.clone(), FixedClock), store)
    }

    #[test]
    fn test_parse_static_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login(Role::User));
        assert_eq!(AppRoute::from_path("/owner/login/"), AppRoute::Login(Role::Owner));
        assert_eq!(AppRoute::from_path("/admin/login"), AppRoute::Login(Role::Admin));
        assert_eq!(AppRoute::from_path("/owner/register"), AppRoute::Register(Role::Owner));
        assert_eq!(
            AppRoute::from_path("/admin/register"),
            AppRoute::NotFound("/admin/register".to_string())
        );
        assert_eq!(AppRoute::from_path("/bookings?tab=all#top"), AppRoute::MyBookings);
    }

    #[test]
    fn test_payment_return_keeps_reference() {
        let khalti_return =
            "/payment/verify?pidx=bZQLD9wRVWo4CdESSfuSsB&txnId=4H7AhoXDJWg5WjrcPT9ixW&status=Completed";
        let route = AppRoute::from_path(khalti_return);
        assert_eq!(
            route,
            AppRoute::PaymentVerify(Some("bZQLD9wRVWo4CdESSfuSsB".to_string()))
        );

        let written = route.to_path();
        assert_eq!(written, "/payment/verify?pidx=bZQLD9wRVWo4CdESSfuSsB");
        assert_eq!(AppRoute::from_path(&written), route);
    }

    #[test]
    fn test_payment_return_without_reference() {
        assert_eq!(AppRoute::from_path("/payment/verify"), AppRoute::PaymentVerify(None));
        assert_eq!(AppRoute::from_path("/payment/verify?pidx="), AppRoute::PaymentVerify(None));
        assert_eq!(AppRoute::PaymentVerify(None).to_path(), "/payment/verify");
    }

    #[test]
    fn test_unknown_path_is_kept() {
        let route = AppRoute::from_path("/vehicles/abc?ref=ad");
        assert_eq!(route, AppRoute::NotFound("/vehicles/abc?ref=ad".to_string()));
        assert_eq!(route.to_path(), "/vehicles/abc?ref=ad");
        assert_eq!(route.required_role(), None);
    }

    #[test]
    fn test_parse_vehicle_detail() {
        assert_eq!(AppRoute::from_path("/vehicles/42"), AppRoute::VehicleDetail(42));
        assert_eq!(
            AppRoute::from_path("/vehicles/abc"),
            AppRoute::NotFound("/vehicles/abc".to_string())
        );
        assert_eq!(AppRoute::VehicleDetail(42).to_path(), "/vehicles/42");
    }

    #[test]
    fn test_paths_round_trip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Login(Role::User),
            AppRoute::Login(Role::Owner),
            AppRoute::Login(Role::Admin),
            AppRoute::Register(Role::User),
            AppRoute::Register(Role::Owner),
            AppRoute::VehicleDetail(7),
            AppRoute::MyBookings,
            AppRoute::PaymentVerify(None),
            AppRoute::PaymentVerify(Some("pidx-1".to_string())),
            AppRoute::Account,
            AppRoute::OwnerDashboard,
            AppRoute::AdminDashboard,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route, "{route}");
        }
    }

    #[test]
    fn test_denied_payment_return_remembers_reference() {
        let session = Session::new(MemoryTokenStore::new(), FixedClock);
        let target = AppRoute::from_path("/payment/verify?pidx=abc123");
        let Resolution::Denied { target, .. } = resolve(&session, target) else {
            panic!("expected a redirect");
        };
        assert_eq!(target.to_path(), "/payment/verify?pidx=abc123");
    }

    #[test]
    fn test_allowed_payment_return_keeps_reference() {
        let (session, _) = session_with(Role::User, &token(NOW + 60, "user"));
        let Resolution::Allow(page) = resolve(&session, AppRoute::from_path("/payment/verify?pidx=abc123")) else {
            panic!("expected the page to be allowed");
        };
        assert!(page.route.to_path().contains("pidx=abc123"));
        assert!(page.identity.is_some());
    }

    #[test]
    fn test_required_roles() {
        assert_eq!(AppRoute::Home.required_role(), None);
        assert_eq!(AppRoute::Login(Role::Admin).required_role(), None);
        assert_eq!(AppRoute::VehicleDetail(1).required_role(), Some(Role::User));
        assert_eq!(AppRoute::MyBookings.required_role(), Some(Role::User));
        assert_eq!(AppRoute::OwnerDashboard.required_role(), Some(Role::Owner));
        assert_eq!(AppRoute::AdminDashboard.required_role(), Some(Role::Admin));
    }

    #[test]
    fn test_role_home_routes() {
        assert_eq!(AppRoute::home_for(Role::User), AppRoute::Home);
        assert_eq!(AppRoute::home_for(Role::Owner), AppRoute::OwnerDashboard);
        assert_eq!(AppRoute::home_for(Role::Admin), AppRoute::AdminDashboard);
        assert_eq!(
            AppRoute::Login(Role::Owner).redirect_when_authenticated(),
            Some(Role::Owner)
        );
    }

    #[test]
    fn test_public_route_is_allowed_without_session() {
        let session = Session::new(MemoryTokenStore::new(), FixedClock);
        assert_eq!(
            resolve(&session, AppRoute::Home),
            Resolution::Allow(ActivePage::default())
        );
    }

    #[test]
    fn test_protected_route_without_token_is_denied() {
        let session = Session::new(MemoryTokenStore::new(), FixedClock);
        let Resolution::Denied { redirect, target } = resolve(&session, AppRoute::MyBookings) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.role, Role::User);
        assert_eq!(redirect.reason, RedirectReason::NotLoggedIn);
        assert_eq!(redirect.path(), "/login");
        assert_eq!(target, AppRoute::MyBookings);
    }

    #[test]
    fn test_expired_token_is_cleared_on_navigation() {
        let (session, store) = session_with(Role::Owner, &token(NOW, "owner"));
        let Resolution::Denied { redirect, .. } = resolve(&session, AppRoute::OwnerDashboard) else {
            panic!("expected a redirect");
        };
        assert_eq!(redirect.reason, RedirectReason::Expired);
        assert_eq!(redirect.path(), "/owner/login");
        assert_eq!(store.load(Role::Owner.storage_key()), None);
    }

    #[test]
    fn test_valid_token_carries_identity() {
        let (session, _) = session_with(Role::Admin, &token(NOW + 60, "admin"));
        let Resolution::Allow(page) = resolve(&session, AppRoute::AdminDashboard) else {
            panic!("expected the page to be allowed");
        };
        assert_eq!(page.route, AppRoute::AdminDashboard);
        assert_eq!(page.identity.map(|i| i.account_id.to_string()), Some("9".to_string()));
    }

    #[test]
    fn test_other_role_token_does_not_authorize() {
        let (session, _) = session_with(Role::User, &token(NOW + 60, "user"));
        assert!(matches!(
            resolve(&session, AppRoute::AdminDashboard),
            Resolution::Denied { .. }
        ));
    }

    #[test]
    fn test_login_page_forwards_when_signed_in() {
        let (session, _) = session_with(Role::Owner, &token(NOW + 60, "owner"));
        assert_eq!(
            resolve(&session, AppRoute::Login(Role::Owner)),
            Resolution::Forward(AppRoute::OwnerDashboard)
        );
        assert!(matches!(
            resolve(&session, AppRoute::Login(Role::User)),
            Resolution::Allow(_)
        ));
    }
}
