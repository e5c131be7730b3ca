//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 `HttpClient` trait。

use async_trait::async_trait;
use easyrent_shared::request::{
    HttpBody, HttpClient, HttpError, HttpRequest, HttpResponse, MultipartValue,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

/// 基于浏览器 `fetch` 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchHttpClient;

fn build_err(context: &str) -> impl Fn(JsValue) -> HttpError + '_ {
    move |e| HttpError::RequestBuildFailed(format!("{}: {:?}", context, e))
}

/// 构造 multipart 表单；Content-Type 与 boundary 交给浏览器生成
fn form_data(fields: &[(String, MultipartValue)]) -> Result<FormData, HttpError> {
    let form = FormData::new().map_err(build_err("创建 FormData 失败"))?;

    for (name, value) in fields {
        match value {
            MultipartValue::Text(text) => form
                .append_with_str(name, text)
                .map_err(build_err("添加表单字段失败"))?,
            MultipartValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let parts = js_sys::Array::new();
                parts.push(&js_sys::Uint8Array::from(bytes.as_slice()).into());
                let bag = BlobPropertyBag::new();
                bag.set_type(content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
                    .map_err(build_err("创建 Blob 失败"))?;
                form.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(build_err("添加文件失败"))?;
            }
        }
    }

    Ok(form)
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new().map_err(build_err("创建 Headers 失败"))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(build_err("设置 Header 失败"))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(HttpBody::Json(json)) => opts.set_body(&JsValue::from_str(json)),
            Some(HttpBody::Multipart(fields)) => opts.set_body(&form_data(fields)?.into()),
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(build_err("创建 Request 失败"))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e))
        })?;

        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}
