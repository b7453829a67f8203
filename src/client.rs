use std::fmt;
use std::time::{Duration, Instant};

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    StatusCode,
};
use tokio::time::sleep;

use crate::{
    account::AccountApi,
    asset::AssetApi,
    classify::{classify, ClassifyContext, Outcome},
    endpoint::Endpoint,
    market::MarketApi,
    payload::prepare_payload,
    request::{assemble, now_ms, redacted_headers, AuthWindow, PreparedRequest, RequestSpec},
    trade::TradeApi,
    AbfinanceError, ApiResponse, ClientOptions, Credentials, Params, Result, SignatureScheme,
};

const EXHAUSTED_MESSAGE: &str = "Bad Request. Retries exceeded maximum.";
const EXHAUSTED_STATUS: u16 = 400;
const DECODE_CONFLICT_MESSAGE: &str = "Conflict. Could not decode JSON.";
const DECODE_CONFLICT_STATUS: u16 = 409;

/// Signed, retrying HTTP client for the V5 REST API.
///
/// Clones share one connection pool. Credentials and options never change
/// after construction, so a client can be used from many tasks at once.
#[derive(Clone)]
pub struct AbfinanceClient {
    /// Holds the setup error when the default headers could not be built.
    http: std::result::Result<reqwest::Client, String>,
    base_url: String,
    credentials: Option<Credentials>,
    options: ClientOptions,
}

impl fmt::Debug for AbfinanceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbfinanceClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("options", &self.options)
            .finish()
    }
}

impl AbfinanceClient {
    /// Creates an authenticated client for mainnet with default options.
    pub fn new(credentials: Credentials) -> Self {
        Self::build(Some(credentials), ClientOptions::default())
    }

    /// Creates a client for public endpoints only.
    pub fn public() -> Self {
        Self::build(None, ClientOptions::default())
    }

    fn build(credentials: Option<Credentials>, options: ClientOptions) -> Self {
        Self {
            http: http_client(&options).map_err(|err| match err {
                AbfinanceError::Config(message) => message,
                other => other.to_string(),
            }),
            base_url: options.base_url(),
            credentials,
            options,
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `ABFINANCE_API_KEY` and `ABFINANCE_API_SECRET`. When both are
    ///   missing a public client is returned.
    /// - `ABFINANCE_RSA=1` to treat the secret as an RSA private key (PEM).
    /// - `ABFINANCE_TESTNET=1` to target testnet.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("ABFINANCE_API_KEY").ok();
        let secret = std::env::var("ABFINANCE_API_SECRET").ok();
        let credentials = match (key, secret) {
            (Some(key), Some(secret)) => {
                if key.trim().is_empty() || secret.trim().is_empty() {
                    return Err(AbfinanceError::Config(
                        "ABFINANCE_API_KEY / ABFINANCE_API_SECRET is set but empty".to_owned(),
                    ));
                }
                let scheme = if env_flag("ABFINANCE_RSA") {
                    SignatureScheme::RsaSha256
                } else {
                    SignatureScheme::HmacSha256
                };
                Some(Credentials::new(key.trim(), secret, scheme))
            }
            (None, None) => None,
            _ => {
                return Err(AbfinanceError::Config(
                    "ABFINANCE_API_KEY and ABFINANCE_API_SECRET must be set together".to_owned(),
                ))
            }
        };

        let options = ClientOptions {
            testnet: env_flag("ABFINANCE_TESTNET"),
            ..ClientOptions::default()
        };
        Ok(Self::build(credentials, options))
    }

    /// Applies network target, timeout and retry options.
    ///
    /// Rebuilds the pooled HTTP client, so call this before
    /// [`AbfinanceClient::with_http_client`].
    pub fn with_options(self, opts: ClientOptions) -> Self {
        Self::build(self.credentials, opts)
    }

    /// Uses an existing `reqwest` client, sharing its connection pool.
    ///
    /// Its own default headers are sent instead of the JSON and `Referer`
    /// defaults.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Ok(http);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn market(&self) -> MarketApi<'_> {
        MarketApi::new(self)
    }

    pub fn trade(&self) -> TradeApi<'_> {
        TradeApi::new(self)
    }

    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    pub fn asset(&self) -> AssetApi<'_> {
        AssetApi::new(self)
    }

    /// Calls a table endpoint after checking its required parameters.
    pub async fn call(&self, endpoint: &Endpoint, params: impl Into<Params>) -> Result<ApiResponse> {
        let spec = endpoint.request(params.into())?;
        self.submit(spec).await
    }

    /// Sends one logical request, retrying as the options allow.
    ///
    /// At most `max_retries` transport sends are made. Retryable exchange
    /// codes, and with `force_retry` also transport and decoding failures,
    /// are handled here and never returned.
    pub async fn submit(&self, spec: RequestSpec) -> Result<ApiResponse> {
        let RequestSpec {
            method,
            path,
            params,
            auth,
        } = spec;

        let http = self.http.as_ref().map_err(|err| AbfinanceError::Config(err.clone()))?;
        if auth && self.credentials.is_none() {
            return Err(AbfinanceError::AuthenticationUnavailable);
        }

        let payload = prepare_payload(&method, params)?;
        let request = format!("{method} {path}: {payload}");
        let retry_delay = Duration::from_millis(self.options.retry_delay_ms);
        let mut recv_window_ms = self.options.recv_window_ms;
        let mut remaining = self.options.max_retries;

        while remaining > 0 {
            remaining -= 1;

            let window = AuthWindow::now(recv_window_ms);
            let prepared = assemble(
                &method,
                &self.base_url,
                &path,
                &payload,
                auth,
                self.credentials.as_ref(),
                window,
            )?;
            self.log_request(&prepared, &path, &payload);

            let started = Instant::now();
            let (status, headers, body) = match send(http, &prepared, self.options.timeout_ms).await? {
                Ok(parts) => parts,
                Err(err) => {
                    if self.options.force_retry {
                        tracing::warn!(%request, error = %err, remaining, "transport error, retrying");
                        if remaining > 0 {
                            sleep(retry_delay).await;
                        }
                        continue;
                    }
                    return Err(AbfinanceError::Network {
                        request,
                        source: err,
                        at_ms: now_ms(),
                    });
                }
            };
            let elapsed = started.elapsed();

            if self.options.log_requests {
                tracing::debug!(status = status.as_u16(), headers = ?headers, "response");
            }

            let ctx = ClassifyContext {
                options: &self.options,
                request: &request,
                recv_window_ms,
                now_ms: now_ms(),
                elapsed,
            };
            match classify(status, &headers, &body, ctx) {
                Outcome::Success(response) => return Ok(response),
                Outcome::Retry {
                    recv_window_ms: next_window,
                    delay,
                    reason,
                } => {
                    tracing::warn!(
                        %request,
                        %reason,
                        delay_ms = delay.as_millis() as u64,
                        remaining,
                        "retryable error, retrying"
                    );
                    recv_window_ms = next_window;
                    if remaining > 0 {
                        sleep(delay).await;
                    }
                }
                Outcome::DecodeFailure(err) => {
                    if self.options.force_retry {
                        tracing::warn!(%request, error = %err, remaining, "undecodable body, retrying");
                        if remaining > 0 {
                            sleep(retry_delay).await;
                        }
                        continue;
                    }
                    tracing::debug!(%request, error = %err, body = %body, "undecodable body");
                    return Err(AbfinanceError::DecodeConflict {
                        request,
                        status: DECODE_CONFLICT_STATUS,
                        message: DECODE_CONFLICT_MESSAGE.to_owned(),
                        at_ms: now_ms(),
                    });
                }
                Outcome::Failed(err) => {
                    if matches!(err, AbfinanceError::Http { .. }) {
                        tracing::debug!(%request, body = %body, "non-200 response");
                    }
                    return Err(err);
                }
            }
        }

        Err(AbfinanceError::RetriesExhausted {
            request,
            status: EXHAUSTED_STATUS,
            message: EXHAUSTED_MESSAGE.to_owned(),
            at_ms: now_ms(),
        })
    }

    fn log_request(&self, prepared: &PreparedRequest, path: &str, payload: &str) {
        if !self.options.log_requests {
            return;
        }
        let headers = redacted_headers(&prepared.headers);
        if payload.is_empty() {
            tracing::debug!(method = %prepared.method, path, headers = ?headers, "request");
        } else {
            tracing::debug!(method = %prepared.method, path, payload, headers = ?headers, "request");
        }
    }
}

/// Builds the pooled client with the JSON and `Referer` defaults.
fn http_client(options: &ClientOptions) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(referral) = &options.referral_id {
        headers.insert(header::REFERER, header_value(referral)?);
    }
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|err| AbfinanceError::Config(format!("failed to build HTTP client: {err}")))
}

/// Sends one attempt. The outer error is a local header problem and is never
/// retried; the inner one comes from the transport.
async fn send(
    http: &reqwest::Client,
    prepared: &PreparedRequest,
    timeout_ms: u64,
) -> Result<std::result::Result<(StatusCode, HeaderMap, String), reqwest::Error>> {
    let mut builder = http
        .request(prepared.method.clone(), &prepared.url)
        .headers(request_headers(prepared)?)
        .timeout(Duration::from_millis(timeout_ms));
    if let Some(body) = &prepared.body {
        builder = builder.body(body.clone());
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(err) => return Ok(Err(err)),
    };
    let status = response.status();
    let headers = response.headers().clone();
    Ok(response.text().await.map(|body| (status, headers, body)))
}

fn request_headers(prepared: &PreparedRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &prepared.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| AbfinanceError::Config(format!("invalid header name '{name}': {err}")))?;
        headers.insert(name, header_value(value)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|err| AbfinanceError::Config(format!("invalid header value: {err}")))
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::{http_client, AbfinanceClient};
    use crate::{AbfinanceError, ClientOptions, Credentials, Params};

    #[test]
    fn debug_redacts_secret() {
        let client = AbfinanceClient::new(Credentials::hmac("key", "secret-token"));
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn with_options_recomputes_base_url() {
        let client = AbfinanceClient::public().with_options(ClientOptions {
            testnet: true,
            ..ClientOptions::default()
        });
        assert_eq!(client.base_url(), "https://api-testnet.abfinance.com");
    }

    #[tokio::test]
    async fn private_endpoint_without_keys_fails_before_sending() {
        let client = AbfinanceClient::public().with_options(ClientOptions {
            base_url: Some("http://127.0.0.1:9".to_owned()),
            ..ClientOptions::default()
        });
        let err = client
            .account()
            .get_wallet_balance(Params::new().with("accountType", "UNIFIED"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, AbfinanceError::AuthenticationUnavailable));
    }

    #[tokio::test]
    async fn invalid_api_key_header_is_config_error() {
        let client = AbfinanceClient::new(Credentials::hmac("bad\nkey", "secret")).with_options(
            ClientOptions {
                base_url: Some("http://127.0.0.1:9".to_owned()),
                ..ClientOptions::default()
            },
        );
        let err = client
            .account()
            .get_account_info(())
            .await
            .expect_err("must fail");
        assert!(matches!(err, AbfinanceError::Config(_)));
    }

    #[tokio::test]
    async fn invalid_referral_id_is_config_error_until_client_replaced() {
        let opts = ClientOptions {
            base_url: Some("http://127.0.0.1:9".to_owned()),
            referral_id: Some("bad\nreferral".to_owned()),
            ..ClientOptions::default()
        };
        assert!(http_client(&opts).is_err());

        let client = AbfinanceClient::public().with_options(opts);
        match client.market().get_server_time().await {
            Err(AbfinanceError::Config(message)) => {
                assert!(message.starts_with("invalid header value"), "{message}");
            }
            other => panic!("expected config error, got {other:?}"),
        }

        let recovered = client.with_http_client(reqwest::Client::new());
        let err = recovered
            .account()
            .get_account_info(())
            .await
            .expect_err("no keys configured");
        assert!(matches!(err, AbfinanceError::AuthenticationUnavailable));
    }
}
