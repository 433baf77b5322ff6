//! JSON-over-HTTP client for the registry backend.

use super::{ClientError, ClientFuture, ClientResult, CreateOutcome, TaxpayerClient};
use crate::types::{NewTaxpayer, Taxpayer, TaxpayerId};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Registry backend client speaking JSON over HTTP
///
/// - `POST /taxpayers` → `{"ok": taxpayer}` or `{"err": reason}`
/// - `GET /taxpayers` → `[taxpayer]`
/// - `GET /taxpayers/{tid}` → `taxpayer`, `null`, or `404`
#[derive(Clone, Debug)]
pub struct HttpTaxpayerClient {
    client: Client,
    base_url: String,
}

impl HttpTaxpayerClient {
    /// Create a client for the backend at `base_url`
    ///
    /// `timeout` bounds every request end to end.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The backend base URL, without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport(error: reqwest::Error) -> ClientError {
    ClientError::Transport(error.to_string())
}

async fn send(request: RequestBuilder) -> ClientResult<Response> {
    request.send().await.map_err(transport)
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

impl TaxpayerClient for HttpTaxpayerClient {
    fn create_taxpayer(&self, taxpayer: NewTaxpayer) -> ClientFuture<CreateOutcome> {
        let request = self.client.post(self.url("/taxpayers")).json(&taxpayer);

        Box::pin(async move {
            tracing::debug!("POST /taxpayers");
            decode(send(request).await?).await
        })
    }

    fn get_all_taxpayers(&self) -> ClientFuture<Vec<Taxpayer>> {
        let request = self.client.get(self.url("/taxpayers"));

        Box::pin(async move {
            tracing::debug!("GET /taxpayers");
            decode(send(request).await?).await
        })
    }

    fn get_taxpayer_by_tid(&self, tid: TaxpayerId) -> ClientFuture<Option<Taxpayer>> {
        let request = self.client.get(self.url(&format!("/taxpayers/{tid}")));

        Box::pin(async move {
            tracing::debug!(%tid, "GET /taxpayers/{{tid}}");
            let response = send(request).await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            decode(response).await
        })
    }
}
