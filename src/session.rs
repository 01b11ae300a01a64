//! Session context: one user's connection to one network.
//!
//! Everything the original kept in ambient global stores lives here
//! explicitly: the network profile, the collaborator handles, the decimals
//! cache, the alert slot, and an orders-stale counter the dashboard
//! subscribes to. Workflows are methods on the session; after any workflow
//! terminates, the session bumps the stale counter and the dashboard
//! listener re-runs the view builder. Workflows never patch cached views.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::chain::{ChainReader, ChainWriter, WalletProvider};
use crate::decimals::TokenDecimalsCache;
use crate::errors::EngineError;
use crate::models::{AlertSlot, StateLayout};
use crate::network::NetworkProfile;
use crate::oracle::{DepositVerifier, DEPOSIT_INDEX_LAG};
use crate::views::{self, Dashboard};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Order-state numbering of the deployed contract.
    pub state_layout: StateLayout,
    /// Wait between deposit confirmation and the oracle callout. Injectable
    /// so tests don't sit through the production value.
    pub deposit_confirm_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_layout: StateLayout::default(),
            deposit_confirm_delay: DEPOSIT_INDEX_LAG,
        }
    }
}

/// What an `accountsChanged` notification means for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionChange {
    /// A (possibly different) account is connected; the dashboard was marked
    /// stale and should be reloaded for this address.
    Connected(String),
    /// The wallet disconnected every account; the host should clear its
    /// connection state.
    Disconnected,
}

pub struct Session {
    pub(crate) network: NetworkProfile,
    pub(crate) reader: Arc<dyn ChainReader>,
    pub(crate) writer: Arc<dyn ChainWriter>,
    pub(crate) wallet: Arc<dyn WalletProvider>,
    pub(crate) oracle: Option<Arc<dyn DepositVerifier>>,
    pub(crate) decimals: TokenDecimalsCache,
    pub(crate) alerts: Arc<AlertSlot>,
    pub(crate) config: SessionConfig,
    stale: watch::Sender<u64>,
}

impl Session {
    pub fn new(
        network: NetworkProfile,
        reader: Arc<dyn ChainReader>,
        writer: Arc<dyn ChainWriter>,
        wallet: Arc<dyn WalletProvider>,
    ) -> Self {
        let (stale, _) = watch::channel(0);
        Self {
            network,
            reader,
            writer,
            wallet,
            oracle: None,
            decimals: TokenDecimalsCache::new(),
            alerts: AlertSlot::new(),
            config: SessionConfig::default(),
            stale,
        }
    }

    /// Attach the deposit-verification oracle. Sessions without one skip the
    /// off-chain confirmation step entirely (legacy protocol deployments).
    pub fn with_oracle(mut self, oracle: Arc<dyn DepositVerifier>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    pub fn alerts(&self) -> &Arc<AlertSlot> {
        &self.alerts
    }

    /// Subscribe to the orders-stale counter. The value bumps every time a
    /// workflow finishes (successfully or not) and the dashboard should be
    /// rebuilt from the contract.
    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.stale.subscribe()
    }

    pub(crate) fn mark_orders_stale(&self) {
        self.stale.send_modify(|n| *n += 1);
    }

    /// Rebuild the dashboard projection for an account from the contract.
    pub async fn load_dashboard(&self, account: &str) -> Result<Dashboard, EngineError> {
        let raw_orders = self
            .reader
            .orders_by_address(account)
            .await
            .map_err(EngineError::from_provider)?;
        log::debug!("loaded {} raw orders for {}", raw_orders.len(), account);

        let order_views = views::build_order_views(
            &raw_orders,
            self.config.state_layout,
            &self.decimals,
            self.reader.as_ref(),
        )
        .await?;

        Ok(Dashboard::from_views(order_views))
    }

    /// Filter a candidate symbol list through the contract whitelist.
    pub async fn whitelisted_symbols(
        &self,
        candidates: &[String],
    ) -> Result<Vec<String>, EngineError> {
        self.reader
            .whitelisted_symbols(candidates)
            .await
            .map_err(EngineError::from_provider)
    }

    /// (Re-)notify the deposit-verification oracle for an account, without
    /// the indexer-lag wait. Meant for hosts retrying after a submission
    /// reported the callout warning; a no-op when no oracle is configured.
    pub async fn notify_deposit_confirmed(&self, account: &str) -> Result<(), EngineError> {
        match &self.oracle {
            None => Ok(()),
            Some(oracle) => oracle.confirm_deposit(account).await.map_err(|e| {
                log::error!("deposit confirmation callout failed: {:#}", e);
                EngineError::OffchainConfirmationFailed(e)
            }),
        }
    }

    /// Translate a signer `accountsChanged` notification into session state.
    pub fn handle_accounts_changed(&self, accounts: &[String]) -> ConnectionChange {
        match accounts.first() {
            Some(account) => {
                self.mark_orders_stale();
                ConnectionChange::Connected(account.clone())
            }
            None => {
                log::info!("wallet disconnected all accounts");
                ConnectionChange::Disconnected
            }
        }
    }

    /// Translate a signer `chainChanged` notification. Contract handles are
    /// per-network, so the host must rebuild the session around the returned
    /// profile (or disconnect when the chain is unsupported).
    pub fn handle_chain_changed(&self, chain_id: &str) -> Option<NetworkProfile> {
        self.mark_orders_stale();
        let profile = NetworkProfile::for_chain(chain_id);
        if profile.is_none() {
            log::warn!("switched to unsupported chain {}", chain_id);
        }
        profile
    }
}
