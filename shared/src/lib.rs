//! Easy Rent Nepal 共享逻辑
//!
//! 不依赖 DOM，可在原生目标上测试：
//! - `date`: 日期区间匹配与日历
//! - `token` / `session`: 令牌解码与会话守卫
//! - `protocol` / `api` / `request`: 类型化的 REST 客户端
//! - `validate` / `booking`: 表单校验、报价与收入汇总
//! - `load` / `scope`: 页面加载状态与请求取消

pub mod api;
pub mod booking;
pub mod config;
pub mod date;
pub mod error;
pub mod load;
pub mod model;
pub mod protocol;
pub mod request;
pub mod scope;
pub mod session;
pub mod token;
pub mod validate;

pub use api::RentApi;
pub use error::{ApiError, ApiResult};
pub use load::LoadState;
pub use scope::RequestScope;
pub use session::{GuardOutcome, Identity, Redirect, RedirectReason, Role, Session, TokenStore};
