//! Off-chain deposit-verification oracle callout.
//!
//! After the deposit transaction is mined, the verification oracle has to be
//! told a deposit happened. The block-indexing services the oracle reads lag
//! real confirmation by an observed 5–20 seconds, so the submission workflow
//! waits out [`DEPOSIT_INDEX_LAG`] before issuing the callout; calling too
//! early makes the oracle report a false negative.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::utils::{remove_trailing_slash, retry};

/// Fixed wait between deposit confirmation and the oracle callout.
pub const DEPOSIT_INDEX_LAG: Duration = Duration::from_secs(20);

/// Request header carrying the depositing wallet address.
pub const OWNER_ADDRESS_HEADER: &str = "x-flyweight-owner";

/// The deposit-verification collaborator. A failure here is never fatal to an
/// order: funds are already on-chain, only the oracle's awareness lags.
#[async_trait]
pub trait DepositVerifier: Send + Sync {
    async fn confirm_deposit(&self, owner: &str) -> anyhow::Result<()>;
}

/// HTTP implementation: a PUT to the network's confirmation URL.
pub struct HttpDepositOracle {
    url: String,
    client: reqwest::Client,
}

impl HttpDepositOracle {
    pub fn new(url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            url: remove_trailing_slash(url),
            client,
        }
    }

    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self {
            url: remove_trailing_slash(url),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DepositVerifier for HttpDepositOracle {
    async fn confirm_deposit(&self, owner: &str) -> anyhow::Result<()> {
        retry(2, 1000, || async {
            let response = self
                .client
                .put(&self.url)
                .header(OWNER_ADDRESS_HEADER, owner)
                .send()
                .await
                .with_context(|| format!("deposit confirmation PUT to {}", self.url))?;
            response
                .error_for_status()
                .context("deposit confirmation rejected")?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_normalized() {
        let oracle = HttpDepositOracle::new("https://api.flyweight.example/deposits/");
        assert_eq!(oracle.url(), "https://api.flyweight.example/deposits");
    }
}
