//! 客户端配置
//!
//! 后端地址优先级：LocalStorage 覆盖值 > 构建时环境变量 > 默认值。

use log::LevelFilter;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const API_URL_STORAGE_KEY: &str = "easyrent_api_url";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub log_level: LevelFilter,
}

impl ClientConfig {
    /// # Arguments
    /// * `stored_url` - LocalStorage 中保存的地址
    /// * `build_url` - 构建时的 `EASYRENT_API_URL`
    /// * `build_log` - 构建时的 `EASYRENT_LOG`
    pub fn resolve(stored_url: Option<String>, build_url: Option<&str>, build_log: Option<&str>) -> Self {
        let api_base_url = stored_url
            .filter(|u| is_http_url(u))
            .or_else(|| build_url.filter(|u| is_http_url(u)).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let default_level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let log_level = build_log
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or(default_level);

        Self {
            api_base_url,
            log_level,
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_url_wins() {
        let config = ClientConfig::resolve(
            Some("https://api.easyrent.np/".to_string()),
            Some("http://build.example"),
            None,
        );
        assert_eq!(config.api_base_url, "https://api.easyrent.np");
    }

    #[test]
    fn test_build_url_then_default() {
        let config = ClientConfig::resolve(None, Some("http://build.example//"), Some("warn"));
        assert_eq!(config.api_base_url, "http://build.example");
        assert_eq!(config.log_level, LevelFilter::Warn);

        let config = ClientConfig::resolve(Some("not a url".to_string()), None, Some("nonsense"));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert!(config.log_level >= LevelFilter::Info);
    }
}
