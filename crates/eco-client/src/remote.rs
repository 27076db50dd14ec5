use std::time::Duration;

use async_trait::async_trait;
use eco_protocol::{
    endpoints, AddPointsRequest, ErrorResponse, PlantTreeResponse, PointsResponse,
};
use eco_types::{LedgerError, LedgerSnapshot, PlantReceipt, Points, Profile};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::backend::{LedgerBackend, PlantOutcome};
use crate::error::{BackendError, BackendResult, ClientError, ClientResult};

/// HTTP adapter for the authoritative ledger server.
#[derive(Clone, Debug)]
pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    /// Create an adapter for the server at `base_url`
    /// (e.g. `http://127.0.0.1:8888`). Without a `timeout` requests wait as
    /// long as the transport allows.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl LedgerBackend for RemoteBackend {
    async fn add_points(&self, delta: Points) -> BackendResult<Points> {
        let response = self
            .http
            .post(self.url(endpoints::ADD_POINTS))
            .json(&AddPointsRequest { points: delta })
            .send()
            .await
            .map_err(unreachable)?;

        if response.status() == StatusCode::BAD_REQUEST {
            let text = response.text().await.map_err(unreachable)?;
            return match serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.overflow_balance())
            {
                Some(balance) => Err(BackendError::Rejected(LedgerError::Overflow { balance, delta })),
                None => Err(BackendError::Status {
                    status: StatusCode::BAD_REQUEST.as_u16(),
                    body: text,
                }),
            };
        }

        let body: PointsResponse = decode(expect_success(response).await?).await?;
        Ok(body.points)
    }

    async fn plant_tree(&self) -> BackendResult<PlantOutcome> {
        let response = self
            .http
            .post(self.url(endpoints::PLANT_TREE))
            .send()
            .await
            .map_err(unreachable)?;

        if response.status() == StatusCode::BAD_REQUEST {
            let text = response.text().await.map_err(unreachable)?;
            return match serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.insufficient_balance())
            {
                Some(balance) => Ok(PlantOutcome::Rejected { balance }),
                None => Err(BackendError::Status {
                    status: StatusCode::BAD_REQUEST.as_u16(),
                    body: text,
                }),
            };
        }

        let body: PlantTreeResponse = decode(expect_success(response).await?).await?;
        Ok(PlantOutcome::Planted(PlantReceipt {
            balance: body.points,
            event: body.plant,
        }))
    }

    async fn snapshot(&self) -> BackendResult<LedgerSnapshot> {
        let response = self
            .http
            .get(self.url(endpoints::PROFILE))
            .send()
            .await
            .map_err(unreachable)?;
        let profile: Profile = decode(expect_success(response).await?).await?;
        Ok(profile.snapshot())
    }
}

fn unreachable(e: reqwest::Error) -> BackendError {
    BackendError::Unreachable(e.to_string())
}

async fn expect_success(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let bytes = response.bytes().await.map_err(unreachable)?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
}
