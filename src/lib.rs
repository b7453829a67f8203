//! `abfinance-http` is an async connector for the ABfinance V5 REST API.
//!
//! Every call goes through one pipeline: parameters are canonicalized,
//! signed (HMAC-SHA256 or RSA-SHA256), sent, and classified. Clock-skew and
//! rate-limit rejections are retried internally:
//! - [`AbfinanceClient::submit`] for a raw [`RequestSpec`]
//! - [`AbfinanceClient::call`] for an [`Endpoint`] table row
//! - [`AbfinanceClient::market`], [`AbfinanceClient::trade`],
//!   [`AbfinanceClient::account`] and [`AbfinanceClient::asset`] for the
//!   per-capability wrappers
//!
//! The signing primitive is exposed on its own in [`sign`] so a streaming
//! client can authenticate with the same keys.

pub mod account;
pub mod asset;
pub mod classify;
mod client;
pub mod endpoint;
mod error;
pub mod market;
mod options;
mod params;
pub mod payload;
pub mod request;
pub mod sign;
pub mod trade;
mod types;
mod value;

pub use client::AbfinanceClient;
pub use endpoint::Endpoint;
pub use error::AbfinanceError;
pub use options::{
    ClientOptions, DEFAULT_RETRY_CODES, DOMAIN_MAIN, RATE_LIMIT_ERROR_CODE, RECV_WINDOW_ERROR_CODE,
    TLD_EU, TLD_HK, TLD_KZ, TLD_MAIN, TLD_NL,
};
pub use params::Params;
pub use request::{AuthWindow, RequestSpec};
pub use sign::{Credentials, SignatureScheme};
pub use types::ApiResponse;
pub use value::Value;

pub type Result<T> = std::result::Result<T, AbfinanceError>;
