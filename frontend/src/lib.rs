//! Easy Rent Nepal 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫判定（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话与 API 客户端
//! - `notify`: 全局通知
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod account;
    pub mod add_vehicle_dialog;
    pub mod admin_dashboard;
    pub mod bookings;
    pub mod earnings;
    pub mod home;
    pub mod login;
    pub mod navbar;
    pub mod owner_dashboard;
    pub mod payment;
    pub mod register;
    pub mod vehicle_detail;
}
mod notify;
pub mod web;

use crate::auth::{AuthContext, load_config};
use crate::components::account::AccountPage;
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::bookings::MyBookingsPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::owner_dashboard::OwnerDashboardPage;
use crate::components::payment::PaymentVerifyPage;
use crate::components::register::RegisterPage;
use crate::components::vehicle_detail::VehicleDetailPage;
use crate::notify::{Notifier, Toast};

use leptos::prelude::*;

use web::route::{ActivePage, AppRoute};
use web::router::{Link, Router, RouterOutlet};

fn not_found() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-[70vh]">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <Link to=AppRoute::Home class="btn btn-primary mt-6">"Browse vehicles"</Link>
            </div>
        </div>
    }
    .into_any()
}

/// 路由匹配函数
///
/// 根据守卫放行的页面返回对应的视图组件；受保护页面一定带有身份。
fn route_matcher(page: ActivePage) -> AnyView {
    let ActivePage { route, identity } = page;

    match (route, identity) {
        (AppRoute::Home, _) => view! { <HomePage /> }.into_any(),
        (AppRoute::Login(role), _) => view! { <LoginPage role=role /> }.into_any(),
        (AppRoute::Register(role), _) => view! { <RegisterPage role=role /> }.into_any(),
        (AppRoute::VehicleDetail(id), Some(identity)) => {
            view! { <VehicleDetailPage vehicle_id=id identity=identity /> }.into_any()
        }
        (AppRoute::MyBookings, Some(identity)) => view! { <MyBookingsPage identity=identity /> }.into_any(),
        (AppRoute::PaymentVerify(pidx), Some(identity)) => {
            view! { <PaymentVerifyPage pidx=pidx identity=identity /> }.into_any()
        }
        (AppRoute::Account, Some(identity)) => view! { <AccountPage identity=identity /> }.into_any(),
        (AppRoute::OwnerDashboard, Some(identity)) => {
            view! { <OwnerDashboardPage identity=identity /> }.into_any()
        }
        (AppRoute::AdminDashboard, Some(identity)) => {
            view! { <AdminDashboardPage identity=identity /> }.into_any()
        }
        (route, None) if route.required_role().is_some() => {
            log::error!("[Router] {route} rendered without a session");
            not_found()
        }
        _ => not_found(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取配置并创建认证上下文
    let config = load_config();
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);

    // 2. 全局通知
    let notifier = Notifier::new();
    provide_context(notifier);

    log::info!("[App] using API at {}", config.api_base_url);

    view! {
        // 3. 路由器组件：注入会话实现守卫
        <Router auth=auth_ctx notifier=notifier>
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <Toast />
                <RouterOutlet matcher=route_matcher />
            </div>
        </Router>
    }
}

/// 安装控制台日志器
pub fn init_logging() {
    web::logger::init(load_config().log_level);
}
