use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use shapepad_shared::lookup::{LOOKUP_PATH, REGISTER_PATH};
use shapepad_shared::{LookupRequest, LookupResponse, RegisterRequest, ShapeSummary};

use crate::lookup_view::LookupError;

pub fn api_url(window: &Window, path: &str) -> Result<String, JsValue> {
    let origin = window.location().origin()?;
    Ok(format!("{}{path}", origin.trim_end_matches('/')))
}

pub async fn lookup_shape(
    window: &Window,
    request: &LookupRequest,
) -> Result<LookupResponse, LookupError> {
    post_json(window, LOOKUP_PATH, request).await
}

pub async fn register_shape(
    window: &Window,
    request: &RegisterRequest,
) -> Result<ShapeSummary, LookupError> {
    post_json(window, REGISTER_PATH, request).await
}

async fn post_json<B: Serialize, R: DeserializeOwned>(
    window: &Window,
    path: &str,
    body: &B,
) -> Result<R, LookupError> {
    let url = api_url(window, path).map_err(js_error)?;
    let payload =
        serde_json::to_string(body).map_err(|error| LookupError::Decode(error.to_string()))?;

    let headers = Headers::new().map_err(js_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_error)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&payload));
    let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();
    decode_response(response.ok(), response.status(), &text)
}

pub fn decode_response<R: DeserializeOwned>(
    ok: bool,
    status: u16,
    text: &str,
) -> Result<R, LookupError> {
    if !ok {
        return Err(LookupError::Status(status));
    }
    serde_json::from_str(text).map_err(|error| LookupError::Decode(error.to_string()))
}

fn js_error(value: JsValue) -> LookupError {
    LookupError::Transport(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
