use std::time::Duration;

use reqwest::header::HeaderMap;

/// Successful response envelope.
///
/// `body` is the decoded JSON exactly as sent by the exchange, including
/// `retCode`, `retMsg` and `result`. `elapsed` and `headers` are filled in
/// according to [`crate::ClientOptions`].
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub body: serde_json::Value,
    pub elapsed: Option<Duration>,
    pub headers: Option<HeaderMap>,
}

impl ApiResponse {
    /// `retCode` of the envelope; `0` when absent and `-1` when it is not a
    /// number.
    pub fn ret_code(&self) -> i64 {
        parse_ret_code(self.body.get("retCode")).unwrap_or(UNRECOGNIZED_RET_CODE)
    }

    pub fn ret_msg(&self) -> Option<&str> {
        self.body.get("retMsg").and_then(serde_json::Value::as_str)
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.body.get("result")
    }

    pub fn into_body(self) -> serde_json::Value {
        self.body
    }
}

/// Reported in place of a `retCode` that cannot be read as an integer.
pub(crate) const UNRECOGNIZED_RET_CODE: i64 = -1;

/// Reads `retCode` leniently. Absent, `null`, `false` and `""` mean `0`;
/// integral floats and numeric strings map to their integer value. `None` for
/// anything else.
pub(crate) fn parse_ret_code(value: Option<&serde_json::Value>) -> Option<i64> {
    use serde_json::Value as Json;

    match value {
        None | Some(Json::Null) | Some(Json::Bool(false)) => Some(0),
        Some(Json::Number(number)) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
                .map(|value| value as i64)
        }),
        Some(Json::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Some(0)
            } else {
                text.parse().ok()
            }
        }
        Some(_) => None,
    }
}
