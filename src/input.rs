//! Request body decoding
//!
//! The predict endpoint accepts either a JSON object or a form-encoded body.
//! Both decode into the same `RawFields` map so validation never has to know
//! where a value came from.

use serde_json::Value;
use thiserror::Error;

use crate::validation::RawFields;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to decode JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode JSON object: expected an object, got {0}")]
    NotAnObject(&'static str),
}

/// Request body tagged with its encoding
#[derive(Debug, Clone)]
pub enum InputSource<'a> {
    Json(&'a [u8]),
    FormEncoded(&'a [u8]),
}

impl<'a> InputSource<'a> {
    /// Select the decoder from a `Content-Type` header value.
    ///
    /// Only the media type essence is compared (`application/json;
    /// charset=utf-8` is JSON). Anything that is not JSON is read as a form.
    pub fn from_content_type(content_type: Option<&str>, body: &'a [u8]) -> Self {
        let is_json = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false);

        if is_json {
            InputSource::Json(body)
        } else {
            InputSource::FormEncoded(body)
        }
    }

    pub fn into_fields(self) -> Result<RawFields, InputError> {
        match self {
            InputSource::Json(body) => json_fields(body),
            InputSource::FormEncoded(body) => form_fields(body),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn json_fields(body: &[u8]) -> Result<RawFields, InputError> {
    let value: Value = serde_json::from_slice(body)?;
    let map = match value {
        Value::Object(map) => map,
        other => return Err(InputError::NotAnObject(json_type_name(&other))),
    };

    let mut fields = RawFields::default();
    for (key, value) in map {
        let text = match value {
            // null is a present value: not a number, not a known category
            Value::Null => "null".to_string(),
            Value::String(s) => s,
            Value::Bool(b) => String::from(if b { "1" } else { "0" }),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        fields.insert(key, text);
    }
    Ok(fields)
}

/// `+` and percent escapes are decoded; invalid UTF-8 becomes U+FFFD.
/// A repeated key keeps its last value.
fn form_fields(body: &[u8]) -> Result<RawFields, InputError> {
    Ok(form_urlencoded::parse(body)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}
