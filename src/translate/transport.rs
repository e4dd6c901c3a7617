use crate::error::Result;
use crate::translate::request::{Method, TranslateRequest};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// `.form()` alone omits the charset, which the endpoint expects.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Sends an assembled request and returns the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &TranslateRequest) -> Result<Value>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &TranslateRequest) -> Result<Value> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => {
                let form = request.form.as_deref().unwrap_or_default();
                // Set first: `.form()` only fills the content type when absent.
                self.client
                    .post(&request.url)
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .form(form)
            }
        };

        let response = builder.send().await?.error_for_status()?;
        debug!("Translate endpoint response status: {}", response.status());

        Ok(response.json::<Value>().await?)
    }
}
