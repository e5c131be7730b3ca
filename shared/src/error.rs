//! API 错误类型
//!
//! 所有错误都在页面内部恢复（显示为行内错误或重定向到登录页），
//! 不会传播到当前视图之外。

use thiserror::Error;

use crate::request::HttpError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 网络请求失败（无法连接、CORS 等）
    #[error("network error: {0}")]
    Network(String),
    /// 缺少会话，或后端以 401/403 拒绝了令牌
    #[error("session rejected: {0}")]
    Unauthorized(String),
    /// 其他非 2xx 响应
    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },
    /// 响应体不符合约定的结构
    #[error("unexpected response from server: {0}")]
    MalformedResponse(String),
    /// 请求体无法编码
    #[error("could not encode request: {0}")]
    Encode(String),
    /// 所属视图已销毁，结果被丢弃
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// 后端给出的原始文字，没有时退回完整描述
    ///
    /// 用于登录、改密码这类 401/403 表示"凭据不对"而不是会话失效的请求。
    pub fn server_message(&self) -> String {
        match self {
            ApiError::Unauthorized(message) | ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// 根据状态码和响应体构造错误
    ///
    /// 后端错误体形如 `{"message": ".."}` 或 `{"error": ".."}`，取其中的文字。
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| default_message(status).to_string());
        match status {
            401 | 403 => ApiError::Unauthorized(message),
            _ => ApiError::Status { status, message },
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RequestBuildFailed(msg) => ApiError::Encode(msg),
            HttpError::NetworkError(msg) => ApiError::Network(msg),
            HttpError::ResponseParseFailed(msg) => ApiError::MalformedResponse(msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::MalformedResponse(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| value.get(key)?.as_str())
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "bad request",
        401 => "not logged in",
        403 => "not allowed",
        404 => "not found",
        409 => "conflict",
        500..=599 => "server error",
        _ => "unexpected status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_message() {
        assert_eq!(
            ApiError::from_status(400, r#"{"message":"Vehicle already booked"}"#),
            ApiError::Status {
                status: 400,
                message: "Vehicle already booked".to_string()
            }
        );
        assert_eq!(
            ApiError::from_status(500, r#"{"error":"db down"}"#).to_string(),
            "request failed (500): db down"
        );
    }

    #[test]
    fn test_from_status_falls_back_to_default_text() {
        assert_eq!(
            ApiError::from_status(404, "<html>Not Found</html>"),
            ApiError::Status {
                status: 404,
                message: "not found".to_string()
            }
        );
    }

    #[test]
    fn test_auth_statuses_are_unauthorized() {
        assert!(ApiError::from_status(401, "").is_unauthorized());
        assert!(ApiError::from_status(403, r#"{"message":"Invalid token"}"#).is_unauthorized());
        assert!(!ApiError::from_status(404, "").is_unauthorized());
    }

    #[test]
    fn test_server_message_keeps_backend_text() {
        assert_eq!(
            ApiError::from_status(401, r#"{"message":"Current password is incorrect"}"#).server_message(),
            "Current password is incorrect"
        );
        assert_eq!(
            ApiError::from_status(409, r#"{"error":"Email already used"}"#).server_message(),
            "Email already used"
        );
        assert_eq!(
            ApiError::Network("Failed to fetch".to_string()).server_message(),
            "network error: Failed to fetch"
        );
    }
}
