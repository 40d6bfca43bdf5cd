use std::fmt;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call: verb, fully built URL, optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

/// Seam between the resource layer and the network.  The browser build uses
/// [`FetchTransport`]; tests substitute a recording mock.
///
/// Resolves to the raw response body on a 2xx answer.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, ApiError>;
}

/// Browser `fetch` transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl HttpTransport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, ApiError> {
        use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new()?;
        headers.append("Accept", "application/json")?;

        // Add Content-Type & body if provided
        if let Some(data) = &request.body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(data));
            headers.append("Content-Type", "application/json")?;
        }
        opts.set_headers(&headers);

        let js_request = Request::new_with_str_and_init(&request.url, &opts)?;

        let window = web_sys::window()
            .ok_or_else(|| ApiError::Transport("no global window exists".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&js_request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            return Err(ApiError::Status {
                status: resp.status(),
                status_text: resp.status_text(),
            });
        }

        // Parse body as text – the resource layer decodes JSON.
        let text = JsFuture::from(resp.text()?).await?;
        Ok(text.as_string().unwrap_or_default())
    }
}
