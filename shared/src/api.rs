use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, LoginRequest, LoginResponse};
use crate::request::{HttpClient, HttpRequest};
use crate::session::{Identity, Role};

/// Easy Rent REST 客户端
///
/// 与具体的 HTTP 实现解耦；受保护的请求需要先通过会话守卫拿到 `Identity`。
#[derive(Clone, Debug, PartialEq)]
pub struct RentApi<C> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> RentApi<C> {
    /// 匿名客户端（登录、注册、公开车辆列表）
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// 携带身份令牌的客户端
    pub fn authorized(client: C, base_url: impl Into<String>, identity: &Identity) -> Self {
        Self {
            token: Some(identity.token.clone()),
            ..Self::new(client, base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 后端返回的图片路径可能是相对路径（如 `uploads/a.jpg`）
    pub fn asset_url(&self, path: &str) -> String {
        let path = path.trim();
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
            path.to_string()
        } else {
            self.url(path)
        }
    }

    /// 发送一个类型化的请求并解析响应
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header("Accept", "application/json");

        if let Some(token) = &self.token {
            http = http.with_header("Authorization", &format!("Bearer {}", token));
        } else if R::REQUIRES_AUTH {
            // 守卫未放行时不允许发出受保护请求
            return Err(ApiError::Unauthorized("no active session".to_string()));
        }

        if let Some(body) = req.body().map_err(|e| ApiError::Encode(e.to_string()))? {
            http = http.with_body(body);
        }

        let res = self.client.send(http).await.map_err(|e| {
            log::warn!("[Api] {} {} failed: {}", R::METHOD.as_str(), path, e);
            ApiError::from(e)
        })?;

        if !res.ok() {
            log::warn!("[Api] {} {} -> {}", R::METHOD.as_str(), path, res.status);
            return Err(ApiError::from_status(res.status, &res.body));
        }

        parse_body(&res.body).inspect_err(|e| {
            log::error!("[Api] {} {} returned an unexpected body: {}", R::METHOD.as_str(), path, e);
        })
    }

    /// 登录，返回后端签发的令牌
    pub async fn login(&self, role: Role, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.send(&LoginRequest {
            role,
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await
    }
}

/// 空响应体按 `null` 解析（适用于 `Ack` / `Option<T>`）
fn parse_body<T: for<'de> serde::Deserialize<'de>>(body: &str) -> ApiResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(ApiError::from)
}
