//! JSON-over-HTTP adapters for the transaction relay and the state indexer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{AccountAddress, GameId},
    error::{ApiError, ApiException},
    protocol::{Call, ExecuteRequest, PlayerSnapshot, TransactionReceipt},
};
use tracing::debug;
use url::Url;

use crate::{StateSource, TransactionExecutor};

fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).with_context(|| format!("invalid base url '{raw}'"))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn error_from_response(response: Response) -> anyhow::Error {
    let status = response.status();
    match response.json::<ApiError>().await {
        Ok(body) => ApiException::from(body).into(),
        Err(_) => anyhow::anyhow!("request failed with status {status}"),
    }
}

pub struct HttpTransactionRelay {
    http: Client,
    base_url: String,
}

impl HttpTransactionRelay {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl TransactionExecutor for HttpTransactionRelay {
    async fn execute(
        &self,
        account: &AccountAddress,
        calls: Vec<Call>,
    ) -> Result<TransactionReceipt> {
        debug!(account = %account, calls = calls.len(), "relay: submitting transaction");
        let response = self
            .http
            .post(format!("{}/transactions", self.base_url))
            .json(&ExecuteRequest {
                account: account.clone(),
                calls,
            })
            .send()
            .await
            .context("failed to reach transaction relay")?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<TransactionReceipt>()
            .await
            .context("malformed transaction receipt")
    }
}

pub struct HttpStateSource {
    http: Client,
    base_url: String,
}

impl HttpStateSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl StateSource for HttpStateSource {
    async fn fetch_player(
        &self,
        account: &AccountAddress,
        game_id: Option<GameId>,
    ) -> Result<Option<PlayerSnapshot>> {
        let mut request = self
            .http
            .get(format!("{}/players/{}", self.base_url, account.as_str()));
        if let Some(game_id) = game_id {
            request = request.query(&[("game_id", game_id.0)]);
        }
        let response = request
            .send()
            .await
            .context("failed to reach game state indexer")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let snapshot = response
            .json::<PlayerSnapshot>()
            .await
            .context("malformed player snapshot")?;
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
