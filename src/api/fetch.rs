//! Browser Transport
//!
//! `window.fetch` through web-sys.

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::{HttpResponse, Method, Transport};
use crate::error::{ApiError, ApiResult};

fn js_err(context: &str, value: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Transport(format!("{}: {:?}", context, value))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, method: Method, url: &str, body: Option<String>) -> ApiResult<HttpResponse> {
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;

        let init = RequestInit::new();
        init.set_method(method.as_str());
        if let Some(body) = body.as_deref() {
            init.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &init).map_err(|e| js_err("request", e))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| js_err("headers", e))?;
        }

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_err("fetch", e))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|e| js_err("response", e))?;

        let text_promise = resp.text().map_err(|e| js_err("body", e))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(|e| js_err("body", e))?
            .as_string()
            .unwrap_or_default();

        log::debug!(target: "fetch", "{} {} -> {}", method.as_str(), url, resp.status());
        Ok(HttpResponse {
            status: resp.status(),
            body: text,
        })
    }
}
