//! The response descriptor handed back to the host and the builder handlers write to.

use {
    super::request::{HeaderEntry, Headers},
    crate::{Error, Result, utils::encode_base64},
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Text,
    Base64,
}

///
/// The outbound response. `status` stays `None` until a handler sets it;
/// `body` and `body_encoding` are always written together.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,
}

/// Argument accepted by [`Reply::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Binary(Vec<u8>),
    Json(Value),
    Text(String),
}

impl Payload {
    /// Falsy payloads produce no body.
    fn is_falsy(&self) -> bool {
        match self {
            Payload::Empty => true,
            Payload::Binary(_) => false,
            Payload::Text(text) => text.is_empty(),
            Payload::Json(Value::Null) => true,
            Payload::Json(Value::Bool(flag)) => !flag,
            Payload::Json(Value::Number(number)) => number.as_f64() == Some(0.0),
            Payload::Json(Value::String(text)) => text.is_empty(),
            Payload::Json(_) => false,
        }
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&String> for Payload {
    fn from(text: &String) -> Self {
        Payload::Text(text.clone())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Binary(bytes.to_vec())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Empty, Into::into)
    }
}

///
/// Mutable view over a [`ResponseDescriptor`].
///
/// ```
/// use edge_router::{BodyEncoding, Response};
///
/// let mut res = Response::default();
/// res.set_header("Content-Type", "application/json");
/// res.status(201).json(&serde_json::json!({ "put": true, "id": "uuid-1" })).unwrap();
///
/// let data = res.into_descriptor();
/// assert_eq!(data.status, Some(201));
/// assert_eq!(data.body.as_deref(), Some(r#"{"put":true,"id":"uuid-1"}"#));
/// assert_eq!(data.body_encoding, Some(BodyEncoding::Text));
/// assert_eq!(data.headers["content-type"][0].key, "Content-Type");
/// ```
///
#[derive(Debug, Clone, Default)]
pub struct Response {
    data: ResponseDescriptor,
}

impl Response {
    /// Wraps a pre-seeded descriptor, or starts from empty headers and no status.
    pub fn new(data: Option<ResponseDescriptor>) -> Self {
        Self {
            data: data.unwrap_or_default(),
        }
    }

    pub fn data(&self) -> &ResponseDescriptor {
        &self.data
    }

    pub fn into_descriptor(self) -> ResponseDescriptor {
        self.data
    }

    /// Stores a single-valued header, replacing any previous value. Empty keys
    /// or values are ignored.
    pub fn set_header(&mut self, key: &str, value: &str) -> &mut Self {
        if !key.is_empty() && !value.is_empty() {
            self.data
                .headers
                .insert(key.to_lowercase(), vec![HeaderEntry::new(key, value)]);
        }
        self
    }

    /// Records the status code and returns a writer for the body.
    pub fn status(&mut self, code: u16) -> Reply<'_> {
        self.data.status = Some(code);
        Reply { data: &mut self.data }
    }
}

impl From<ResponseDescriptor> for Response {
    fn from(data: ResponseDescriptor) -> Self {
        Self { data }
    }
}

/// Short-lived body writer returned by [`Response::status`].
#[must_use = "a reply does nothing unless a body method is called"]
pub struct Reply<'r> {
    data: &'r mut ResponseDescriptor,
}

impl Reply<'_> {
    /// Sends binary data, base64-encoded.
    pub fn data(self, bytes: impl AsRef<[u8]>) {
        self.write(encode_base64(bytes), BodyEncoding::Base64);
    }

    /// Sends `value` serialized as JSON text.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        let body = serde_json::to_string(value).map_err(Error::serialization)?;
        self.write(body, BodyEncoding::Text);
        Ok(())
    }

    pub fn text(self, text: impl Into<String>) {
        self.write(text.into(), BodyEncoding::Text);
    }

    /// Sends whatever `payload` holds: bytes as data, objects and arrays as JSON,
    /// anything else as text. Falsy payloads leave the body unset.
    pub fn send(self, payload: impl Into<Payload>) {
        let payload = payload.into();
        if payload.is_falsy() {
            return;
        }

        match payload {
            Payload::Binary(bytes) => self.data(bytes),
            Payload::Json(Value::String(text)) | Payload::Text(text) => self.text(text),
            Payload::Json(value @ (Value::Object(_) | Value::Array(_))) => {
                self.write(value.to_string(), BodyEncoding::Text)
            }
            Payload::Json(value) => self.text(value.to_string()),
            Payload::Empty => {}
        }
    }

    fn write(self, body: String, encoding: BodyEncoding) {
        self.data.body = Some(body);
        self.data.body_encoding = Some(encoding);
    }
}
