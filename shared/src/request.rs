//! HTTP 抽象层
//!
//! API 客户端只依赖 `HttpClient` trait；浏览器中由 `fetch` 实现，
//! 测试中使用 `MockHttpClient`。

use thiserror::Error;

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// 该方法的请求是否携带请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// multipart 表单中的一项
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Json(String),
    /// 文件上传，Content-Type 由浏览器生成（含 boundary）
    Multipart(Vec<(String, MultipartValue)>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: HttpBody) -> Self {
        if let HttpBody::Json(_) = body {
            self = self.with_header("Content-Type", "application/json");
        }
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("failed to build request: {0}")]
    RequestBuildFailed(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("failed to read response: {0}")]
    ResponseParseFailed(String),
}

/// HTTP 客户端特性
///
/// 浏览器环境下的 Future 不是 Send 的，因此使用 `?Send`。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    pub struct MockHttpClient {
        // ("METHOD url", (status, body))
        responses: RefCell<HashMap<String, (u16, String)>>,
        pub requests: RefCell<Vec<HttpRequest>>,
        offline: bool,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                responses: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
                offline: false,
            }
        }

        /// 所有请求都以网络错误失败
        pub fn offline() -> Self {
            Self {
                offline: true,
                ..Self::new()
            }
        }

        pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
            self.responses.borrow_mut().insert(
                format!("{} {}", method.as_str(), url),
                (status, body.to_string()),
            );
        }

        pub fn last_request(&self) -> HttpRequest {
            self.requests
                .borrow()
                .last()
                .cloned()
                .expect("no request was sent")
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.requests.borrow_mut().push(req.clone());

            if self.offline {
                return Err(HttpError::NetworkError("Failed to fetch".to_string()));
            }

            let key = format!("{} {}", req.method.as_str(), req.url);
            match self.responses.borrow().get(&key) {
                Some((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                None => Ok(HttpResponse {
                    status: 404,
                    body: "Not Found".to_string(),
                }),
            }
        }
    }
}
