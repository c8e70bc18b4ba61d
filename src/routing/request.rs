//! The request descriptor supplied by the host and the read-only view handlers see.

use {
    crate::utils::decode_base64,
    regex::Regex,
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::{collections::BTreeMap, sync::LazyLock},
    url::form_urlencoded,
};

static FORM_PARAMS_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^=&]+=[^&]*(?:&[^=&]+=[^&]*)*$").unwrap());

/// Decoded request parameters.
pub type Params = serde_json::Map<String, Value>;

/// Headers keyed by lowercase name, each holding the original `key`/`value` pairs.
pub type Headers = BTreeMap<String, Vec<HeaderEntry>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// Payload, base64-encoded unless `encoding` says otherwise.
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_truncated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

///
/// The inbound request as handed over by the host platform.
///
/// Field names follow the host envelope, so a descriptor can be deserialized
/// straight from the event JSON.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub method: String,
    pub uri: String,
    #[serde(default)]
    pub querystring: String,
    #[serde(default)]
    pub client_ip: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Adds a header entry under its lowercase name.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers
            .entry(key.to_lowercase())
            .or_default()
            .push(HeaderEntry::new(key, value));
        self
    }

    pub fn with_querystring(mut self, querystring: impl Into<String>) -> Self {
        self.querystring = querystring.into();
        self
    }

    pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = client_ip.into();
        self
    }

    /// Sets the body to an already base64-encoded payload.
    pub fn with_body(mut self, data: impl Into<String>) -> Self {
        self.body = Some(RequestBody {
            data: data.into(),
            encoding: Some("base64".into()),
            ..Default::default()
        });
        self
    }
}

///
/// Read-only view over a [`RequestDescriptor`].
///
/// ```
/// use edge_router::{Request, RequestDescriptor};
///
/// let req = Request::new(
///     RequestDescriptor::new("GET", "/api/foo")
///         .with_header("Accept", "application/json")
///         .with_querystring("foo=bar&biz=baz"),
/// );
///
/// assert_eq!(req.header("accept"), Some("application/json"));
/// assert!(req.is("application/json"));
/// assert_eq!(req.param("foo"), Some(serde_json::json!("bar")));
/// ```
///
#[derive(Debug, Clone)]
pub struct Request {
    data: RequestDescriptor,
}

impl Request {
    pub fn new(data: RequestDescriptor) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &RequestDescriptor {
        &self.data
    }

    pub fn method(&self) -> &str {
        &self.data.method
    }

    pub fn uri(&self) -> &str {
        &self.data.uri
    }

    pub fn query_string(&self) -> &str {
        &self.data.querystring
    }

    pub fn client_ip(&self) -> &str {
        &self.data.client_ip
    }

    /// The raw body payload, if the request carried one.
    pub fn body(&self) -> Option<&str> {
        self.data.body.as_ref().map(|body| body.data.as_str())
    }

    pub fn headers(&self) -> &Headers {
        &self.data.headers
    }

    /// Value of the first entry for `name`, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.data
            .headers
            .get(&name.to_lowercase())
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }

    /// True if the `Accept` header is exactly `mime`.
    pub fn is(&self, mime: &str) -> bool {
        self.header("accept") == Some(mime)
    }

    /// Decodes the request parameters.
    ///
    /// A non-empty query string wins over the body. Bodies are tried as a JSON
    /// object first and as a URL-encoded form second.
    pub fn params(&self) -> Option<Params> {
        if !self.data.querystring.is_empty() {
            return Some(parse_form(&self.data.querystring));
        }

        let body = self.data.body.as_ref()?;
        if body.data.is_empty() {
            return None;
        }

        match body.encoding.as_deref() {
            Some("text") => parse_text(&body.data),
            _ => Self::parse_body(&body.data),
        }
    }

    /// A single decoded parameter.
    pub fn param(&self, name: &str) -> Option<Value> {
        self.params()?.remove(name)
    }

    /// Decodes a base64 body into parameters, accepting JSON objects and
    /// URL-encoded forms. Padding errors in the base64 input are tolerated.
    ///
    /// ```
    /// use edge_router::Request;
    ///
    /// let params = Request::parse_body("Zm9vPWJhciZiaXo9YmF6==").unwrap();
    /// assert_eq!(params["foo"], "bar");
    /// assert_eq!(params["biz"], "baz");
    /// ```
    pub fn parse_body(data: &str) -> Option<Params> {
        let bytes = decode_base64(data)?;
        let text = String::from_utf8(bytes).ok()?;
        parse_text(&text)
    }

    /// True if `value` looks like `name=value` pairs joined by `&`.
    pub fn is_params(value: &str) -> bool {
        FORM_PARAMS_REGEXP.is_match(value)
    }

    /// True if `value` parses as a JSON object.
    pub fn is_json(value: &str) -> bool {
        matches!(serde_json::from_str::<Value>(value), Ok(Value::Object(_)))
    }
}

impl From<RequestDescriptor> for Request {
    fn from(data: RequestDescriptor) -> Self {
        Self::new(data)
    }
}

fn parse_text(text: &str) -> Option<Params> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Some(map);
    }
    Request::is_params(text).then(|| parse_form(text))
}

fn parse_form(text: &str) -> Params {
    form_urlencoded::parse(text.as_bytes())
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}
