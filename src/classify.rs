use std::time::Duration;

use reqwest::{header::HeaderMap, StatusCode};

use crate::{
    options::{RATE_LIMIT_ERROR_CODE, RECV_WINDOW_ERROR_CODE},
    types::{parse_ret_code, UNRECOGNIZED_RET_CODE},
    AbfinanceError, ApiResponse, ClientOptions,
};

/// Response header carrying the epoch millis at which the rate limit resets.
pub const HEADER_LIMIT_RESET: &str = "X-Bapi-Limit-Reset-Timestamp";

/// Added to the receive window after a clock-skew rejection.
pub const RECV_WINDOW_STEP_MS: u64 = 2_500;

const FORBIDDEN_MESSAGE: &str = "You have breached the IP rate limit or your IP is from the USA.";
const NON_200_MESSAGE: &str = "HTTP status code is not 200.";

/// Verdict on one transport response.
#[derive(Debug)]
pub enum Outcome {
    Success(ApiResponse),
    /// Retryable application error. Consumed by the retry loop only.
    Retry {
        recv_window_ms: u64,
        delay: Duration,
        reason: String,
    },
    /// The body was not JSON.
    DecodeFailure(serde_json::Error),
    Failed(AbfinanceError),
}

/// Per-attempt inputs the classifier needs besides the response itself.
#[derive(Clone, Copy, Debug)]
pub struct ClassifyContext<'a> {
    pub options: &'a ClientOptions,
    /// `"{METHOD} {path}: {payload}"` of the attempt, for error reports.
    pub request: &'a str,
    pub recv_window_ms: u64,
    pub now_ms: u64,
    pub elapsed: Duration,
}

pub fn classify(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    ctx: ClassifyContext<'_>,
) -> Outcome {
    if status != StatusCode::OK {
        let message = if status == StatusCode::FORBIDDEN {
            FORBIDDEN_MESSAGE
        } else {
            NON_200_MESSAGE
        };
        return Outcome::Failed(AbfinanceError::Http {
            request: ctx.request.to_owned(),
            status: status.as_u16(),
            message: message.to_owned(),
            headers: headers.clone(),
            at_ms: ctx.now_ms,
        });
    }

    let envelope: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => return Outcome::DecodeFailure(err),
    };

    let ret_msg = envelope
        .get("retMsg")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    let Some(ret_code) = parse_ret_code(envelope.get("retCode")) else {
        return Outcome::Failed(AbfinanceError::InvalidRequest {
            request: ctx.request.to_owned(),
            code: UNRECOGNIZED_RET_CODE,
            message: format!(
                "unrecognized retCode {}: {ret_msg}",
                envelope.get("retCode").unwrap_or(&serde_json::Value::Null)
            ),
            headers: headers.clone(),
            at_ms: ctx.now_ms,
        });
    };

    if ret_code != 0 {
        if ctx.options.retry_codes.contains(&ret_code) {
            return retry_outcome(ret_code, ret_msg, headers, ctx);
        }

        if !ctx.options.ignore_codes.contains(&ret_code) {
            return Outcome::Failed(AbfinanceError::InvalidRequest {
                request: ctx.request.to_owned(),
                code: ret_code,
                message: ret_msg.to_owned(),
                headers: headers.clone(),
                at_ms: ctx.now_ms,
            });
        }
    }

    let opts = ctx.options;
    Outcome::Success(ApiResponse {
        body: envelope,
        elapsed: (opts.record_request_time || opts.return_response_headers).then_some(ctx.elapsed),
        headers: opts.return_response_headers.then(|| headers.clone()),
    })
}

fn retry_outcome(
    ret_code: i64,
    ret_msg: &str,
    headers: &HeaderMap,
    ctx: ClassifyContext<'_>,
) -> Outcome {
    let default_delay = Duration::from_millis(ctx.options.retry_delay_ms);
    let base = format!("{ret_msg} (ErrCode: {ret_code})");

    match ret_code {
        RECV_WINDOW_ERROR_CODE => {
            let recv_window_ms = ctx.recv_window_ms + RECV_WINDOW_STEP_MS;
            Outcome::Retry {
                recv_window_ms,
                delay: default_delay,
                reason: format!("{base}. Added 2.5 seconds to recv_window"),
            }
        }
        RATE_LIMIT_ERROR_CODE => match limit_reset_ms(headers) {
            Some(reset_ms) => {
                let delay = Duration::from_millis(reset_ms.saturating_sub(ctx.now_ms));
                Outcome::Retry {
                    recv_window_ms: ctx.recv_window_ms,
                    delay,
                    reason: format!(
                        "{base}. API rate limit resets at {reset_ms}. Sleeping for {} ms",
                        delay.as_millis()
                    ),
                }
            }
            None => Outcome::Retry {
                recv_window_ms: ctx.recv_window_ms,
                delay: default_delay,
                reason: format!("{base}. Rate limit hit without a reset timestamp"),
            },
        },
        _ => Outcome::Retry {
            recv_window_ms: ctx.recv_window_ms,
            delay: default_delay,
            reason: base,
        },
    }
}

fn limit_reset_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(HEADER_LIMIT_RESET)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::{
        header::{HeaderMap, HeaderValue},
        StatusCode,
    };
    use serde_json::json;

    use super::{classify, ClassifyContext, Outcome};
    use crate::{AbfinanceError, ClientOptions};

    const NOW_MS: u64 = 1_700_000_000_000;
    const LIMIT_RESET: &str = "x-bapi-limit-reset-timestamp";

    fn ctx(options: &ClientOptions) -> ClassifyContext<'_> {
        ClassifyContext {
            options,
            request: "GET /v5/market/time: ",
            recv_window_ms: 5_000,
            now_ms: NOW_MS,
            elapsed: Duration::from_millis(12),
        }
    }

    fn run(options: &ClientOptions, status: StatusCode, headers: &HeaderMap, body: &str) -> Outcome {
        classify(status, headers, body, ctx(options))
    }

    #[test]
    fn forbidden_is_http_error_regardless_of_body() {
        let opts = ClientOptions::default();
        let outcome = run(&opts, StatusCode::FORBIDDEN, &HeaderMap::new(), r#"{"retCode":0}"#);
        match outcome {
            Outcome::Failed(AbfinanceError::Http { status, message, .. }) => {
                assert_eq!(status, 403);
                assert!(message.contains("rate limit"));
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[test]
    fn other_non_200_uses_generic_message() {
        let opts = ClientOptions::default();
        let outcome = run(&opts, StatusCode::BAD_GATEWAY, &HeaderMap::new(), "oops");
        match outcome {
            Outcome::Failed(AbfinanceError::Http { status, message, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "HTTP status code is not 200.");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_decode_failure() {
        let opts = ClientOptions::default();
        let outcome = run(&opts, StatusCode::OK, &HeaderMap::new(), "<html>");
        assert!(matches!(outcome, Outcome::DecodeFailure(_)));
    }

    #[test]
    fn zero_ret_code_is_success() {
        let opts = ClientOptions::default();
        let body = json!({"retCode": 0, "retMsg": "OK", "result": {"list": []}});
        let outcome = run(&opts, StatusCode::OK, &HeaderMap::new(), &body.to_string());
        match outcome {
            Outcome::Success(response) => {
                assert_eq!(response.body, body);
                assert!(response.elapsed.is_none());
                assert!(response.headers.is_none());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn clock_skew_code_grows_recv_window() {
        let opts = ClientOptions::default();
        let body = json!({"retCode": 10002, "retMsg": "invalid request, please check your server timestamp"});
        match run(&opts, StatusCode::OK, &HeaderMap::new(), &body.to_string()) {
            Outcome::Retry {
                recv_window_ms,
                delay,
                ..
            } => {
                assert_eq!(recv_window_ms, 7_500);
                assert_eq!(delay, Duration::from_millis(opts.retry_delay_ms));
            }
            other => panic!("expected retry, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_code_waits_until_reset() {
        let opts = ClientOptions::default();
        let mut headers = HeaderMap::new();
        headers.insert(
            LIMIT_RESET,
            HeaderValue::from_str(&(NOW_MS + 1_250).to_string()).expect("valid header"),
        );
        let body = json!({"retCode": 10006, "retMsg": "Too many visits!"});
        match run(&opts, StatusCode::OK, &headers, &body.to_string()) {
            Outcome::Retry {
                recv_window_ms,
                delay,
                ..
            } => {
                assert_eq!(recv_window_ms, 5_000);
                assert_eq!(delay, Duration::from_millis(1_250));
            }
            other => panic!("expected retry, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_reset_in_the_past_means_no_wait() {
        let opts = ClientOptions::default();
        let mut headers = HeaderMap::new();
        headers.insert(LIMIT_RESET, HeaderValue::from_static("1000"));
        let body = json!({"retCode": 10006, "retMsg": "Too many visits!"});
        match run(&opts, StatusCode::OK, &headers, &body.to_string()) {
            Outcome::Retry { delay, .. } => assert_eq!(delay, Duration::ZERO),
            other => panic!("expected retry, got {other:?}"),
        }
    }

    #[test]
    fn other_retry_code_uses_configured_delay() {
        let opts = ClientOptions {
            retry_delay_ms: 42,
            ..ClientOptions::default()
        };
        let body = json!({"retCode": 130150, "retMsg": "busy"});
        match run(&opts, StatusCode::OK, &HeaderMap::new(), &body.to_string()) {
            Outcome::Retry {
                recv_window_ms,
                delay,
                ..
            } => {
                assert_eq!(recv_window_ms, 5_000);
                assert_eq!(delay, Duration::from_millis(42));
            }
            other => panic!("expected retry, got {other:?}"),
        }
    }

    #[test]
    fn ignored_code_returns_payload_unchanged() {
        let opts = ClientOptions {
            ignore_codes: [110043].into_iter().collect(),
            ..ClientOptions::default()
        };
        let body = json!({"retCode": 110043, "retMsg": "leverage not modified", "result": {}});
        match run(&opts, StatusCode::OK, &HeaderMap::new(), &body.to_string()) {
            Outcome::Success(response) => assert_eq!(response.body, body),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn unknown_code_is_invalid_request() {
        let opts = ClientOptions::default();
        let body = json!({"retCode": 10001, "retMsg": "params error"});
        match run(&opts, StatusCode::OK, &HeaderMap::new(), &body.to_string()) {
            Outcome::Failed(AbfinanceError::InvalidRequest { code, message, .. }) => {
                assert_eq!(code, 10001);
                assert_eq!(message, "params error");
            }
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[test]
    fn numeric_string_code_is_invalid_request() {
        let opts = ClientOptions::default();
        let body = json!({"retCode": "10001", "retMsg": "params error"});
        match run(&opts, StatusCode::OK, &HeaderMap::new(), &body.to_string()) {
            Outcome::Failed(AbfinanceError::InvalidRequest { code, message, .. }) => {
                assert_eq!(code, 10001);
                assert_eq!(message, "params error");
            }
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[test]
    fn integral_float_code_is_retried() {
        let opts = ClientOptions::default();
        match run(&opts, StatusCode::OK, &HeaderMap::new(), r#"{"retCode":10002.0}"#) {
            Outcome::Retry { recv_window_ms, .. } => assert_eq!(recv_window_ms, 7_500),
            other => panic!("expected retry, got {other:?}"),
        }
    }

    #[test]
    fn string_zero_code_is_success() {
        let opts = ClientOptions::default();
        let outcome = run(&opts, StatusCode::OK, &HeaderMap::new(), r#"{"retCode":"0","result":{}}"#);
        assert!(matches!(outcome, Outcome::Success(_)));
    }

    #[test]
    fn unreadable_code_is_invalid_request() {
        let opts = ClientOptions::default();
        for body in [
            r#"{"retCode":"failed","retMsg":"boom"}"#,
            r#"{"retCode":1.5}"#,
            r#"{"retCode":true}"#,
        ] {
            match run(&opts, StatusCode::OK, &HeaderMap::new(), body) {
                Outcome::Failed(AbfinanceError::InvalidRequest { code, message, .. }) => {
                    assert_eq!(code, -1);
                    assert!(message.starts_with("unrecognized retCode"), "{message}");
                }
                other => panic!("expected invalid request for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rate_limit_without_reset_header_uses_configured_delay() {
        let opts = ClientOptions {
            retry_delay_ms: 250,
            ..ClientOptions::default()
        };
        let body = json!({"retCode": 10006, "retMsg": "Too many visits!"});
        let mut garbled = HeaderMap::new();
        garbled.insert(LIMIT_RESET, HeaderValue::from_static("soon"));

        for headers in [HeaderMap::new(), garbled] {
            match run(&opts, StatusCode::OK, &headers, &body.to_string()) {
                Outcome::Retry {
                    recv_window_ms,
                    delay,
                    ..
                } => {
                    assert_eq!(recv_window_ms, 5_000);
                    assert_eq!(delay, Duration::from_millis(250));
                }
                other => panic!("expected retry, got {other:?}"),
            }
        }
    }

    #[test]
    fn response_shape_toggles() {
        let opts = ClientOptions {
            return_response_headers: true,
            ..ClientOptions::default()
        };
        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("abc"));
        match run(&opts, StatusCode::OK, &headers, r#"{"retCode":0}"#) {
            Outcome::Success(response) => {
                assert_eq!(response.elapsed, Some(Duration::from_millis(12)));
                let returned = response.headers.expect("headers must be attached");
                assert_eq!(returned.get("x-trace").map(|v| v.as_bytes()), Some(&b"abc"[..]));
            }
            other => panic!("expected success, got {other:?}"),
        }

        let opts = ClientOptions {
            record_request_time: true,
            ..ClientOptions::default()
        };
        match run(&opts, StatusCode::OK, &headers, r#"{"retCode":0}"#) {
            Outcome::Success(response) => {
                assert!(response.elapsed.is_some());
                assert!(response.headers.is_none());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }
}
