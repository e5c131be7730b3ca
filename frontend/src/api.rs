//! 页面级请求调度
//!
//! 页面创建一个 `PageScope`，所有请求都挂在它下面；
//! 页面销毁时作用域被取消，迟到的响应直接丢弃。

use std::future::Future;

use easyrent_shared::{ApiError, ApiResult, RequestScope};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct PageScope {
    scope: StoredValue<RequestScope>,
}

/// 创建绑定到当前组件生命周期的请求作用域
pub fn use_page_scope() -> PageScope {
    let scope = RequestScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.cancel()
    });

    PageScope {
        scope: StoredValue::new(scope),
    }
}

impl PageScope {
    /// 在作用域内执行请求，完成后回调
    ///
    /// 作用域已取消时不会调用 `on_done`。
    pub fn spawn<T: 'static>(
        &self,
        fut: impl Future<Output = ApiResult<T>> + 'static,
        on_done: impl FnOnce(ApiResult<T>) + 'static,
    ) {
        let Some(scope) = self.scope.try_get_value() else {
            return;
        };

        spawn_local(async move {
            match scope.api(fut).await {
                Err(ApiError::Cancelled) => log::debug!("[Scope] dropped a late response"),
                result => on_done(result),
            }
        });
    }
}
