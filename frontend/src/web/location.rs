//! window.location 封装

/// 当前站点的源，如 `https://easyrent.np`
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// 解码查询串中的参数值，`+` 表示空格
pub fn decode_query_value(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    js_sys::decode_uri_component(&spaced)
        .ok()
        .and_then(|decoded| decoded.as_string())
        .unwrap_or(spaced)
}

/// 整页跳转到外部地址（支付网关）
pub fn redirect_to(url: &str) -> bool {
    web_sys::window()
        .map(|w| w.location().set_href(url).is_ok())
        .unwrap_or(false)
}
