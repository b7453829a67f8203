use reqwest::Method;

use crate::{request::RequestSpec, AbfinanceError, Params, Result};

/// One row of the endpoint table: how a logical operation maps to HTTP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    pub auth: bool,
    /// Keys that must be present with a non-null value.
    pub required: &'static [&'static str],
}

impl Endpoint {
    pub const fn public_get(path: &'static str, required: &'static [&'static str]) -> Self {
        Self {
            method: Method::GET,
            path,
            auth: false,
            required,
        }
    }

    pub const fn private_get(path: &'static str, required: &'static [&'static str]) -> Self {
        Self {
            method: Method::GET,
            path,
            auth: true,
            required,
        }
    }

    pub const fn private_post(path: &'static str, required: &'static [&'static str]) -> Self {
        Self {
            method: Method::POST,
            path,
            auth: true,
            required,
        }
    }

    /// Checks the required keys and builds the request for this endpoint.
    pub fn request(&self, params: Params) -> Result<RequestSpec> {
        if let Some(key) = self.required.iter().copied().find(|key| !params.contains(key)) {
            return Err(AbfinanceError::MissingParameter {
                path: self.path,
                key,
            });
        }
        Ok(RequestSpec::new(self.method.clone(), self.path, params, self.auth))
    }
}

#[cfg(test)]
mod tests {
    use super::Endpoint;
    use crate::{AbfinanceError, Params};

    const ORDERBOOK: Endpoint = Endpoint::public_get("/v5/market/orderbook", &["category", "symbol"]);

    #[test]
    fn request_carries_method_path_and_auth() {
        let spec = ORDERBOOK
            .request(Params::from([("category", "spot"), ("symbol", "BTCUSDT")]))
            .expect("must build");
        assert_eq!(spec.method, reqwest::Method::GET);
        assert_eq!(spec.path, "/v5/market/orderbook");
        assert!(!spec.auth);
    }

    #[test]
    fn missing_required_key_is_reported() {
        let err = ORDERBOOK
            .request(Params::new().with("category", "spot").with("symbol", None::<String>))
            .expect_err("must fail");
        match err {
            AbfinanceError::MissingParameter { path, key } => {
                assert_eq!(path, "/v5/market/orderbook");
                assert_eq!(key, "symbol");
            }
            other => panic!("expected missing parameter, got {other:?}"),
        }
    }
}
