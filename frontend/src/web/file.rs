//! 文件输入读取

use easyrent_shared::protocol::ImageUpload;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

/// 读取文件输入框中选中的第一个文件
///
/// 未选择文件时返回 `Ok(None)`。
pub async fn read_selected_file(input: &HtmlInputElement) -> Result<Option<ImageUpload>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Could not read the selected file: {:?}", e))?;

    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };

    Ok(Some(ImageUpload {
        file_name: file.name(),
        content_type,
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    }))
}
