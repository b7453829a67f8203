//! Request signing.
//!
//! The signed string is `timestamp + api_key + recv_window + payload`. It is
//! shared by REST requests and the private stream handshake, so everything
//! here is free of I/O and usable on its own.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use rsa::{pkcs1::DecodeRsaPrivateKey, pkcs8::DecodePrivateKey, Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};

use crate::{AbfinanceError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Value of the `X-BAPI-SIGN-TYPE` header.
pub const SIGN_TYPE: &str = "2";

/// Signature algorithm bound to an API key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SignatureScheme {
    /// HMAC-SHA256, hex output. The secret is the raw API secret.
    #[default]
    HmacSha256,
    /// RSA PKCS#1 v1.5 over SHA-256, base64 output. The secret is a PEM
    /// private key (PKCS#8 or PKCS#1).
    RsaSha256,
}

/// API key pair plus the scheme used to sign with it.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
    scheme: SignatureScheme,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        scheme: SignatureScheme,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            scheme,
        }
    }

    pub fn hmac(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::new(api_key, api_secret, SignatureScheme::HmacSha256)
    }

    pub fn rsa(api_key: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        Self::new(api_key, private_key_pem, SignatureScheme::RsaSha256)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Signs an already assembled string with this key pair.
    pub fn sign(&self, param_str: &str) -> Result<String> {
        generate_signature(self.scheme, &self.api_secret, param_str)
    }

    /// Signs `payload` for the given timestamp and receive window.
    pub fn sign_request(&self, timestamp_ms: u64, recv_window_ms: u64, payload: &str) -> Result<String> {
        self.sign(&auth_string(timestamp_ms, &self.api_key, recv_window_ms, payload))
    }
}

/// Builds the string covered by the request signature.
pub fn auth_string(timestamp_ms: u64, api_key: &str, recv_window_ms: u64, payload: &str) -> String {
    format!("{timestamp_ms}{api_key}{recv_window_ms}{payload}")
}

/// Signs `param_str` with `secret` according to `scheme`.
///
/// # Errors
///
/// Returns [`AbfinanceError::Signing`] if the secret is not a usable key.
pub fn generate_signature(scheme: SignatureScheme, secret: &str, param_str: &str) -> Result<String> {
    match scheme {
        SignatureScheme::HmacSha256 => sign_hmac(secret, param_str),
        SignatureScheme::RsaSha256 => sign_rsa(secret, param_str),
    }
}

fn sign_hmac(secret: &str, param_str: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| AbfinanceError::Signing(format!("failed to create HMAC: {err}")))?;
    mac.update(param_str.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn sign_rsa(private_key_pem: &str, param_str: &str) -> Result<String> {
    let key = parse_private_key(private_key_pem)?;
    let digest = Sha256::digest(param_str.as_bytes());
    let signature = key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .map_err(|err| AbfinanceError::Signing(format!("RSA signing failed: {err}")))?;
    Ok(BASE64.encode(signature))
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    let pem = pem.trim();
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|err| AbfinanceError::Signing(format!("invalid RSA private key: {err}")))
}
