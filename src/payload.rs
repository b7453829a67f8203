use reqwest::Method;

use crate::{AbfinanceError, Params, Result, Value};

/// Keys the exchange only accepts as JSON strings in request bodies.
const STRING_PARAMS: [&str; 2] = ["qty", "price"];

/// Encodes parameters into the canonical payload that is both signed and sent.
///
/// `GET` parameters become a `key=value&...` string sorted by key; every other
/// method gets a compact JSON object. Null entries are dropped and integral
/// floats are written as integers.
pub fn prepare_payload(method: &Method, params: Params) -> Result<String> {
    let params = params.cleaned();

    if let Some((key, _)) = params
        .iter()
        .find(|(_, value)| matches!(value, Value::Float(f) if !f.is_finite()))
    {
        return Err(AbfinanceError::InvalidParameter(format!(
            "non-finite float value for '{key}' is unsupported"
        )));
    }

    if *method == Method::GET {
        Ok(encode_query(&params))
    } else {
        encode_body(&params)
    }
}

fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", value.to_query_string()))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_body(params: &Params) -> Result<String> {
    let object: serde_json::Map<String, serde_json::Value> = params
        .iter()
        .map(|(key, value)| {
            let json = if STRING_PARAMS.contains(&key) {
                string_coerced(value)
            } else {
                value.to_json()
            };
            (key.to_owned(), json)
        })
        .collect();

    serde_json::to_string(&object)
        .map_err(|err| AbfinanceError::InvalidParameter(format!("cannot encode body: {err}")))
}

fn string_coerced(value: &Value) -> serde_json::Value {
    match value {
        Value::Text(text) => serde_json::Value::String(text.clone()),
        Value::Json(serde_json::Value::String(text)) => serde_json::Value::String(text.clone()),
        other => serde_json::Value::String(other.to_query_string()),
    }
}
