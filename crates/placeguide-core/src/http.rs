//! Minimal blocking HTTP over libcurl, shared by the providers.
//!
//! Runs in the current thread; call from `spawn_blocking` if used from async code.
//! Status codes are returned as-is; callers decide what counts as failure.

use std::time::Duration;

use crate::control::AbortToken;
use crate::retry::ProviderError;

/// Per-request settings.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub user_agent: Option<String>,
    /// Whole-transfer timeout. Connect timeout is capped at 15s.
    pub timeout: Duration,
    /// Extra headers as (name, value).
    pub headers: Vec<(String, String)>,
    /// When set, an in-flight transfer stops shortly after the token is raised.
    pub abort: Option<AbortToken>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: Duration::from_secs(30),
            headers: Vec::new(),
            abort: None,
        }
    }
}

/// Status code and decoded body of a completed transfer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `Ok(self)` for 2xx, otherwise `ProviderError::Http` with a body excerpt.
    pub fn error_for_status(self) -> Result<Self, ProviderError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProviderError::http(self.status, &self.body))
        }
    }
}

/// GET `url`.
pub fn get(url: &str, opts: &RequestOptions) -> Result<HttpResponse, ProviderError> {
    let mut easy = configure(url, opts)?;
    easy.get(true)?;
    perform(&mut easy, opts)
}

/// POST `body` to `url` as `application/json`.
pub fn post_json(
    url: &str,
    body: &[u8],
    opts: &RequestOptions,
) -> Result<HttpResponse, ProviderError> {
    let mut easy = configure(url, opts)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;

    let mut list = header_list(opts)?;
    list.append("Content-Type: application/json")?;
    easy.http_headers(list)?;

    perform(&mut easy, opts)
}

fn configure(url: &str, opts: &RequestOptions) -> Result<curl::easy::Easy, ProviderError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.timeout.min(Duration::from_secs(15)))?;
    easy.timeout(opts.timeout)?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }
    if !opts.headers.is_empty() {
        easy.http_headers(header_list(opts)?)?;
    }
    if opts.abort.is_some() {
        easy.progress(true)?;
    }
    Ok(easy)
}

fn header_list(opts: &RequestOptions) -> Result<curl::easy::List, ProviderError> {
    let mut list = curl::easy::List::new();
    for (k, v) in &opts.headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    Ok(list)
}

fn perform(
    easy: &mut curl::easy::Easy,
    opts: &RequestOptions,
) -> Result<HttpResponse, ProviderError> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        if let Some(token) = &opts.abort {
            // Returning false makes libcurl fail the transfer with "aborted by callback".
            transfer.progress_function(|_, _, _, _| !token.is_aborted())?;
        }
        let performed = transfer.perform();
        if opts.abort.as_ref().is_some_and(AbortToken::is_aborted) {
            return Err(ProviderError::Message("request cancelled".to_string()));
        }
        performed?;
    }
    let status = easy.response_code()?;
    Ok(HttpResponse {
        status,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
