use std::collections::BTreeSet;

pub const SUBDOMAIN_TESTNET: &str = "api-testnet";
pub const SUBDOMAIN_MAINNET: &str = "api";
pub const DOMAIN_MAIN: &str = "abfinance";
/// Global.
pub const TLD_MAIN: &str = "com";
/// The Netherlands.
pub const TLD_NL: &str = "nl";
/// Hong Kong.
pub const TLD_HK: &str = "com.hk";
/// Kazakhstan.
pub const TLD_KZ: &str = "kz";
/// European Economic Area, institutions only.
pub const TLD_EU: &str = "eu";

/// `retCode` for a timestamp outside the receive window.
pub const RECV_WINDOW_ERROR_CODE: i64 = 10002;
/// `retCode` for a breached API rate limit.
pub const RATE_LIMIT_ERROR_CODE: i64 = 10006;

/// Codes retried when no explicit set is configured.
pub const DEFAULT_RETRY_CODES: [i64; 6] = [10002, 10006, 30034, 30035, 130035, 130150];

/// Configures network target, timeouts, retry policy and response shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Use the `api-testnet` subdomain.
    pub testnet: bool,
    pub domain: String,
    pub tld: String,
    /// Overrides the computed `https://{subdomain}.{domain}.{tld}` base URL.
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Initial receive window in milliseconds.
    pub recv_window_ms: u64,
    /// Retry transport failures and undecodable bodies.
    pub force_retry: bool,
    pub retry_codes: BTreeSet<i64>,
    /// Non-zero codes treated as success. Must not overlap `retry_codes`.
    pub ignore_codes: BTreeSet<i64>,
    /// Total number of attempts per call.
    pub max_retries: usize,
    /// Delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
    /// Trace every request and response header set at debug level.
    pub log_requests: bool,
    /// Attach the request duration to successful responses.
    pub record_request_time: bool,
    /// Attach response headers (and duration) to successful responses.
    pub return_response_headers: bool,
    /// Sent as the `Referer` header.
    pub referral_id: Option<String>,
}

impl ClientOptions {
    pub fn base_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_owned();
        }
        let subdomain = if self.testnet {
            SUBDOMAIN_TESTNET
        } else {
            SUBDOMAIN_MAINNET
        };
        let domain = if self.domain.is_empty() {
            DOMAIN_MAIN
        } else {
            self.domain.as_str()
        };
        format!("https://{subdomain}.{domain}.{}", self.tld)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            testnet: false,
            domain: DOMAIN_MAIN.to_owned(),
            tld: TLD_MAIN.to_owned(),
            base_url: None,
            timeout_ms: 10_000,
            recv_window_ms: 5_000,
            force_retry: false,
            retry_codes: DEFAULT_RETRY_CODES.into_iter().collect(),
            ignore_codes: BTreeSet::new(),
            max_retries: 3,
            retry_delay_ms: 3_000,
            log_requests: false,
            record_request_time: false,
            return_response_headers: false,
            referral_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientOptions, TLD_HK};

    #[test]
    fn base_url_follows_network_target() {
        let mainnet = ClientOptions::default();
        assert_eq!(mainnet.base_url(), "https://api.abfinance.com");

        let testnet = ClientOptions {
            testnet: true,
            tld: TLD_HK.to_owned(),
            ..ClientOptions::default()
        };
        assert_eq!(testnet.base_url(), "https://api-testnet.abfinance.com.hk");
    }

    #[test]
    fn empty_domain_falls_back_to_main() {
        let opts = ClientOptions {
            domain: String::new(),
            ..ClientOptions::default()
        };
        assert_eq!(opts.base_url(), "https://api.abfinance.com");
    }

    #[test]
    fn base_url_override_wins() {
        let opts = ClientOptions {
            base_url: Some("http://127.0.0.1:9000/".to_owned()),
            testnet: true,
            ..ClientOptions::default()
        };
        assert_eq!(opts.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn default_retry_codes_cover_clock_skew_and_rate_limit() {
        let opts = ClientOptions::default();
        assert!(opts.retry_codes.contains(&super::RECV_WINDOW_ERROR_CODE));
        assert!(opts.retry_codes.contains(&super::RATE_LIMIT_ERROR_CODE));
        assert!(opts.ignore_codes.is_empty());
    }
}
