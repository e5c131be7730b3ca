//! 认证模块
//!
//! 三个角色的会话都保存在 LocalStorage 中，由共享层的 `Session` 负责校验。
//! 路由服务通过 `revision` 感知登录 / 退出，不直接依赖页面。

use easyrent_shared::config::{API_URL_STORAGE_KEY, ClientConfig};
use easyrent_shared::date::SystemClock;
use easyrent_shared::session::SignInError;
use easyrent_shared::{
    ApiError, ApiResult, Identity, LoadState, RedirectReason, RentApi, Role, Session,
};
use leptos::prelude::*;

use crate::web::{FetchHttpClient, LocalStorage};

pub type AppSession = Session<LocalStorage, SystemClock>;
pub type Api = RentApi<FetchHttpClient>;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub session: AppSession,
    api_base: StoredValue<String>,
    /// 每次登录 / 退出 / 令牌被拒绝时递增
    revision: RwSignal<u64>,
    /// 主动退出或令牌被拒绝时，下次重定向使用的原因
    pending_reason: StoredValue<Option<RedirectReason>>,
}

impl AuthContext {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            session: Session::new(LocalStorage, SystemClock),
            api_base: StoredValue::new(config.api_base_url.clone()),
            revision: RwSignal::new(0),
            pending_reason: StoredValue::new(None),
        }
    }

    /// 会话变更计数（响应式）
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn bump(&self) {
        self.revision.update(|r| *r += 1);
    }

    /// 当前任意一个有效角色的身份（响应式，用于导航栏）
    pub fn identity(&self) -> Option<Identity> {
        self.revision.track();
        self.session.any_identity()
    }

    /// 匿名 API 客户端
    pub fn public_api(&self) -> Api {
        RentApi::new(FetchHttpClient, self.api_base.get_value())
    }

    /// 以指定身份调用的 API 客户端
    pub fn api_for(&self, identity: &Identity) -> Api {
        RentApi::authorized(FetchHttpClient, self.api_base.get_value(), identity)
    }

    pub fn sign_in(&self, role: Role, token: &str) -> Result<Identity, SignInError> {
        let result = self.session.sign_in(role, token);
        if result.is_ok() {
            self.bump();
        }
        result
    }

    /// 注销该角色
    ///
    /// 导航将由路由服务的 revision 监听自动处理。
    pub fn logout(&self, role: Role) {
        self.pending_reason.set_value(Some(RedirectReason::Revoked));
        self.session.invalidate(role);
        self.bump();
    }

    /// 取走待使用的重定向原因
    pub fn take_pending_reason(&self) -> Option<RedirectReason> {
        self.pending_reason
            .try_update_value(Option::take)
            .flatten()
    }

    /// 将 API 错误转换为页面上显示的文字
    ///
    /// 后端以 401/403 拒绝令牌时清除该角色的会话，路由服务随后重定向到登录页。
    pub fn describe_error(&self, role: Role, err: &ApiError) -> String {
        if err.is_unauthorized() {
            log::info!("[Auth] backend rejected the {role} session: {err}");
            self.logout(role);
            return RedirectReason::Revoked.notice().to_string();
        }
        err.to_string()
    }

    /// 读请求的结果转换为页面加载状态
    pub fn load_state<T>(&self, role: Role, result: ApiResult<T>) -> LoadState<T> {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(e) => LoadState::Failed(self.describe_error(role, &e)),
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 读取运行时配置
///
/// LocalStorage 中的地址优先于构建时的 `EASYRENT_API_URL`。
pub fn load_config() -> ClientConfig {
    ClientConfig::resolve(
        LocalStorage::get(API_URL_STORAGE_KEY),
        option_env!("EASYRENT_API_URL"),
        option_env!("EASYRENT_LOG"),
    )
}

/// 登录并保存令牌
///
/// # Returns
/// 成功时返回已校验的身份，失败时返回可直接展示的错误文字
pub async fn login(ctx: AuthContext, role: Role, email: String, password: String) -> Result<Identity, String> {
    let api = ctx.public_api();

    let response = api
        .login(role, &email, &password)
        .await
        .map_err(|e| e.server_message())?;

    ctx.sign_in(role, &response.token).map_err(|e| {
        log::error!("[Auth] {role} login returned an unusable token: {e}");
        e.to_string()
    })
}
