//! 请求作用域
//!
//! 页面发起的请求绑定到页面生命周期：页面销毁时取消作用域，
//! 尚未完成的请求被中止，结果不会再写入已销毁的状态。

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{AbortHandle, abortable};

use crate::error::{ApiError, ApiResult};

/// 作用域已取消
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scope cancelled")]
pub struct Cancelled;

#[derive(Default)]
struct ScopeState {
    cancelled: bool,
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
}

#[derive(Clone, Default)]
pub struct RequestScope {
    state: Arc<Mutex<ScopeState>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ScopeState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn is_cancelled(&self) -> bool {
        self.with_state(|s| s.cancelled)
    }

    /// 取消作用域并中止所有进行中的请求
    pub fn cancel(&self) {
        let handles: Vec<AbortHandle> = self.with_state(|s| {
            s.cancelled = true;
            s.in_flight.drain().map(|(_, h)| h).collect()
        });
        if !handles.is_empty() {
            log::debug!("[Scope] aborting {} in-flight request(s)", handles.len());
        }
        for handle in handles {
            handle.abort();
        }
    }

    /// 在作用域内运行一个 Future
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        let (fut, handle) = abortable(fut);
        let id = self.with_state(|s| {
            if s.cancelled {
                return None;
            }
            let id = s.next_id;
            s.next_id += 1;
            s.in_flight.insert(id, handle);
            Some(id)
        });
        let Some(id) = id else {
            return Err(Cancelled);
        };

        let result = fut.await;
        self.with_state(|s| s.in_flight.remove(&id));
        result.map_err(|_| Cancelled)
    }

    /// 运行 API 请求，取消时返回 `ApiError::Cancelled`
    pub async fn api<T>(&self, fut: impl Future<Output = ApiResult<T>>) -> ApiResult<T> {
        self.run(fut).await.unwrap_or(Err(ApiError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    #[tokio::test]
    async fn test_run_completes() {
        let scope = RequestScope::new();
        assert_eq!(scope.run(async { 5 }).await, Ok(5));
        assert!(scope.with_state(|s| s.in_flight.is_empty()));
    }

    #[tokio::test]
    async fn test_cancelled_scope_rejects_new_work() {
        let scope = RequestScope::new();
        scope.cancel();
        assert_eq!(scope.run(async { 5 }).await, Err(Cancelled));
        assert_eq!(
            scope.api(async { Ok::<_, ApiError>(1) }).await,
            Err(ApiError::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_cancel_drops_in_flight_result() {
        let scope = RequestScope::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let (result, _) = futures::join!(scope.run(rx), async {
            scope.cancel();
            let _ = tx.send(7);
        });

        assert!(matches!(result, Err(Cancelled)));
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let scope = RequestScope::new();
        let other = scope.clone();
        other.cancel();
        assert!(scope.is_cancelled());
    }
}
