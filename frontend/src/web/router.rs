//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 首次加载、应用内跳转、浏览器前进后退都会重新执行守卫。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{ActivePage, AppRoute, Resolution, resolve};
use crate::auth::AuthContext;
use crate::notify::Notifier;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前页面（只读信号）
    current: ReadSignal<ActivePage>,
    /// 设置当前页面（写入信号）
    set_current: WriteSignal<ActivePage>,
    auth: AuthContext,
    notifier: Notifier,
    /// 因未登录被拦下的目标页，登录后返回
    return_to: StoredValue<Option<AppRoute>>,
}

impl RouterService {
    fn new(auth: AuthContext, notifier: Notifier) -> Self {
        let (current, set_current) = signal(ActivePage::default());

        Self {
            current,
            set_current,
            auth,
            notifier,
            return_to: StoredValue::new(None),
        }
    }

    /// 获取当前页面信号
    pub fn current(&self) -> ReadSignal<ActivePage> {
        self.current
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    pub fn go(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 登录成功后跳转：优先返回被拦下的页面
    pub fn finish_login(&self, role: easyrent_shared::Role) {
        let target = self
            .return_to
            .try_update_value(Option::take)
            .flatten()
            .filter(|route| route.required_role() == Some(role))
            .unwrap_or_else(|| AppRoute::home_for(role));
        self.navigate_to_route(target, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let write_history = |path: &str| {
            if use_push {
                push_history_state(path);
            } else {
                replace_history_state(path);
            }
        };

        // --- Step 1: 验证目标路由 ---
        match resolve(&self.auth.session, target_route) {
            Resolution::Allow(page) => {
                // --- Step 2: 加载页面 (更新状态) ---
                write_history(&page.route.to_path());
                self.set_current.set(page);
            }
            Resolution::Denied { redirect, target } => {
                let reason = self.auth.take_pending_reason().unwrap_or(redirect.reason);
                log::info!("[Router] Access to {target} denied ({reason:?}), redirecting to {}", redirect.path());
                self.notifier.error(reason.notice());
                self.return_to.set_value(Some(target));

                write_history(redirect.path());
                self.set_current.set(ActivePage {
                    route: AppRoute::Login(redirect.role),
                    identity: None,
                });
            }
            Resolution::Forward(home) => {
                log::debug!("[Router] Already authenticated, forwarding to {home}");
                self.navigate_to_route(home, use_push);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.navigate_to_route(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化（退出、令牌被拒绝）时重新守卫当前页面
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |prev: Option<u64>| {
            let revision = router.auth.revision();
            if prev.is_some() {
                let route = router.current.get_untracked().route;
                if route.required_role().is_some() {
                    router.navigate_to_route(route, false);
                } else {
                    // 公开页面上退出不需要重定向
                    router.auth.take_pending_reason();
                }
            }
            revision
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(auth: AuthContext, notifier: Notifier) -> RouterService {
    let router = RouterService::new(auth, notifier);

    // 首次加载同样经过守卫
    router.navigate_to_route(AppRoute::from_path(&current_path()), false);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    auth: AuthContext,
    notifier: Notifier,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(auth, notifier);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收守卫放行的页面，返回对应视图
    matcher: fn(ActivePage) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    // 守卫重复放行同一页面时不重建视图
    let page = Memo::new(move |_| router.current().get());

    move || matcher(page.get())
}

/// 应用内链接，点击时走路由守卫而不是整页刷新
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(into, optional)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let href = to.to_path();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.go(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
