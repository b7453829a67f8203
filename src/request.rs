use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Method;

use crate::{sign::SIGN_TYPE, AbfinanceError, Credentials, Params, Result};

pub const HEADER_API_KEY: &str = "X-BAPI-API-KEY";
pub const HEADER_SIGN: &str = "X-BAPI-SIGN";
pub const HEADER_SIGN_TYPE: &str = "X-BAPI-SIGN-TYPE";
pub const HEADER_TIMESTAMP: &str = "X-BAPI-TIMESTAMP";
pub const HEADER_RECV_WINDOW: &str = "X-BAPI-RECV-WINDOW";

/// One logical call: what to send, before any attempt is made.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the base URL, e.g. `/v5/market/tickers`.
    pub path: String,
    pub params: Params,
    pub auth: bool,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>, params: impl Into<Params>, auth: bool) -> Self {
        Self {
            method,
            path: path.into(),
            params: params.into(),
            auth,
        }
    }
}

/// Timestamp and receive window of a single attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AuthWindow {
    pub timestamp_ms: u64,
    pub recv_window_ms: u64,
}

impl AuthWindow {
    /// Stamps the current time.
    pub fn now(recv_window_ms: u64) -> Self {
        Self {
            timestamp_ms: now_ms(),
            recv_window_ms,
        }
    }
}

/// A fully signed request, ready to hand to the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(&'static str, String)>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Combines method, path and the canonical payload into a transport request,
/// signing it with `window` when `auth` is set.
///
/// `payload` must be the output of [`crate::payload::prepare_payload`]; it is
/// signed and sent byte for byte.
pub fn assemble(
    method: &Method,
    base_url: &str,
    path: &str,
    payload: &str,
    auth: bool,
    credentials: Option<&Credentials>,
    window: AuthWindow,
) -> Result<PreparedRequest> {
    let headers = if auth {
        let credentials = credentials.ok_or(AbfinanceError::AuthenticationUnavailable)?;
        auth_headers(credentials, payload, window)?
    } else {
        Vec::new()
    };

    let (url, body) = if *method == Method::GET {
        let url = if payload.is_empty() {
            format!("{base_url}{path}")
        } else {
            format!("{base_url}{path}?{payload}")
        };
        (url, None)
    } else {
        (format!("{base_url}{path}"), Some(payload.to_owned()))
    };

    Ok(PreparedRequest {
        method: method.clone(),
        url,
        body,
        headers,
    })
}

fn auth_headers(
    credentials: &Credentials,
    payload: &str,
    window: AuthWindow,
) -> Result<Vec<(&'static str, String)>> {
    let signature = credentials.sign_request(window.timestamp_ms, window.recv_window_ms, payload)?;
    Ok(vec![
        ("Content-Type", "application/json".to_owned()),
        (HEADER_API_KEY, credentials.api_key().to_owned()),
        (HEADER_SIGN, signature),
        (HEADER_SIGN_TYPE, SIGN_TYPE.to_owned()),
        (HEADER_TIMESTAMP, window.timestamp_ms.to_string()),
        (HEADER_RECV_WINDOW, window.recv_window_ms.to_string()),
    ])
}

/// Header list safe for logs: key and signature are masked.
pub(crate) fn redacted_headers<'a>(
    headers: &'a [(&'static str, String)],
) -> Vec<(&'static str, &'a str)> {
    headers
        .iter()
        .map(|(name, value)| {
            if *name == HEADER_SIGN || *name == HEADER_API_KEY {
                (*name, "<redacted>")
            } else {
                (*name, value.as_str())
            }
        })
        .collect()
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
