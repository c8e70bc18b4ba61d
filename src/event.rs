//! The origin-request event envelope the host delivers to the function.
//!
//! Only the parts the router consumes are modelled: the request and the
//! optional pre-seeded response of the first record.

use {
    crate::{Error, RequestDescriptor, ResponseDescriptor, Result, Router},
    serde::Deserialize,
};

#[derive(Debug, Clone, Deserialize)]
pub struct OriginRequestEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub cf: CloudFrontRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudFrontRecord {
    pub request: RequestDescriptor,
    #[serde(default)]
    pub response: Option<ResponseDescriptor>,
}

impl OriginRequestEvent {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Hands back the descriptors of the first record.
    pub fn into_parts(self) -> Result<(RequestDescriptor, Option<ResponseDescriptor>)> {
        let record = self
            .records
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_input("event carries no records"))?;
        Ok((record.cf.request, record.cf.response))
    }

    /// Builds a router for the first record.
    ///
    /// ```
    /// use edge_router::{Handler, OriginRequestEvent};
    ///
    /// let event = OriginRequestEvent::from_json(r#"{
    ///     "Records": [{ "cf": { "request": { "method": "GET", "uri": "/health" } } }]
    /// }"#).unwrap();
    ///
    /// let mut router = event.into_router().unwrap();
    /// router.get("/health", Handler::route(|_, res| {
    ///     res.status(200).send("ok");
    ///     Ok(())
    /// }));
    /// assert_eq!(router.response().unwrap().ready().unwrap().status, Some(200));
    /// ```
    pub fn into_router(self) -> Result<Router> {
        let (request, response) = self.into_parts()?;
        Ok(Router::new(request, response))
    }
}
