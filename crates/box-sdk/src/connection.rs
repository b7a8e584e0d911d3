//! Authenticated connection to the Box API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RANGE};
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ApiConfig, BoxConfig};
use crate::error::{BoxError, Result};

const JSON_PATCH: &str = "application/json-patch+json";

/// Shared, cheaply clonable connection. Every resource handle carries one.
///
/// ```rust,no_run
/// use box_sdk::{BoxApiConnection, BoxFolder};
///
/// #[tokio::main]
/// async fn main() -> box_sdk::Result<()> {
///     let api = BoxApiConnection::new("developer-token")?;
///     let root = BoxFolder::root(&api).get_info(&["name"]).await?;
///     println!("{:?}", root.item.name);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BoxApiConnection {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    base_url: Url,
    base_upload_url: Url,
}

impl fmt::Debug for BoxApiConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxApiConnection")
            .field("base_url", &self.inner.base_url.as_str())
            .field("base_upload_url", &self.inner.base_upload_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BoxApiConnection {
    /// Connect to the public Box endpoints with a ready-made access token.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let mut cfg = BoxConfig::default();
        cfg.api.access_token = access_token.into();
        Self::from_config(&cfg)
    }

    pub fn from_config(cfg: &BoxConfig) -> Result<Self> {
        Self::from_api_config(&cfg.api)
    }

    pub fn from_api_config(api: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !api.access_token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", api.access_token))
                .map_err(|e| BoxError::InvalidArgument(format!("access token: {e}")))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(api.user_agent.clone())
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(BoxError::Http)?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: parse_base(&api.base_url)?,
                base_upload_url: parse_base(&api.base_upload_url)?,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn base_upload_url(&self) -> &Url {
        &self.inner.base_upload_url
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    async fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response> {
        debug!(%method, %url, "box request");
        let req = build(self.inner.client.request(method.clone(), url.clone()));
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = BoxError::from_response_body(status, &body);
            if let BoxError::Api { code, request_id, .. } = &err {
                warn!(%method, %url, status = status.as_u16(), ?code, ?request_id, "box request failed");
            }
            return Err(err);
        }
        Ok(resp)
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if resp.status() == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(BoxError::Json);
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return serde_json::from_value(Value::Null).map_err(BoxError::Json);
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T> {
        let resp = self
            .send(method, url, |req| match body {
                Some(b) => req.json(b),
                None => req,
            })
            .await?;
        Self::read_json(resp).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.request(Method::GET, url, None).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(&self, url: Url, body: &Value) -> Result<T> {
        self.request(Method::POST, url, Some(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(&self, url: Url, body: &Value) -> Result<T> {
        self.request(Method::PUT, url, Some(body)).await
    }

    /// `PUT` with an `application/json-patch+json` body.
    pub(crate) async fn put_json_patch<T: DeserializeOwned>(&self, url: Url, patch: String) -> Result<T> {
        let resp = self
            .send(Method::PUT, url, |req| req.header(CONTENT_TYPE, JSON_PATCH).body(patch))
            .await?;
        Self::read_json(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<()> {
        self.send(Method::DELETE, url, |req| req).await?;
        Ok(())
    }

    pub(crate) async fn download(&self, url: Url) -> Result<Vec<u8>> {
        let resp = self.send(Method::GET, url, |req| req).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// `GET` with a `Range: bytes=start-end` header. An open `end` reads to
    /// the last byte.
    pub(crate) async fn download_range(&self, url: Url, start: u64, end: Option<u64>) -> Result<Vec<u8>> {
        let range = match end {
            Some(end) => format!("bytes={start}-{end}"),
            None => format!("bytes={start}-"),
        };
        let resp = self.send(Method::GET, url, |req| req.header(RANGE, range)).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(&self, url: Url, form: multipart::Form) -> Result<T> {
        let resp = self.send(Method::POST, url, |req| req.multipart(form)).await?;
        Self::read_json(resp).await
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_gain_trailing_slash() {
        let mut cfg = BoxConfig::default();
        cfg.api.base_url = "http://127.0.0.1:9000/2.0".into();
        let api = BoxApiConnection::from_config(&cfg).unwrap();
        assert_eq!(api.base_url().as_str(), "http://127.0.0.1:9000/2.0/");
        assert_eq!(api.base_upload_url().as_str(), "https://upload.box.com/api/2.0/");
    }

    #[test]
    fn debug_output_hides_token() {
        let api = BoxApiConnection::new("super-secret").unwrap();
        let dbg = format!("{api:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("api.box.com"));
    }
}
