//! Static per-network configuration.
//!
//! Network selection (mainnet vs. test network) decides which orders
//! contract, block explorer, and deposit-verification oracle the engine
//! talks to. Addresses and URLs are supplied externally through environment
//! variables; the Goerli test deployment ships as a built-in default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Hex chain id as wallets report it, e.g. `"0x1"`.
    pub chain_id: String,
    pub name: String,
    /// Address of the orders smart contract; also the deposit target.
    pub orders_contract: String,
    /// Block-explorer transaction URL base, without trailing slash.
    pub explorer_tx_url: String,
    /// Deposit-verification oracle endpoint, when the network runs one.
    pub confirm_deposit_url: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl NetworkProfile {
    pub fn mainnet() -> Self {
        Self {
            chain_id: "0x1".to_string(),
            name: "mainnet".to_string(),
            orders_contract: env_or("FLYWEIGHT_ORDERS_CONTRACT_ADDRESS_MAINNET", ""),
            explorer_tx_url: env_or(
                "FLYWEIGHT_BLOCK_EXPLORER_TX_URL_MAINNET",
                "https://etherscan.io/tx",
            ),
            confirm_deposit_url: std::env::var("FLYWEIGHT_CONFIRM_DEPOSIT_URL_MAINNET").ok(),
        }
    }

    pub fn goerli() -> Self {
        Self {
            chain_id: "0x5".to_string(),
            name: "goerli".to_string(),
            orders_contract: env_or(
                "FLYWEIGHT_ORDERS_CONTRACT_ADDRESS_GOERLI",
                "0xE58E94E87547A4FfE03f11Ee086adc31cEED3F03",
            ),
            explorer_tx_url: env_or(
                "FLYWEIGHT_BLOCK_EXPLORER_TX_URL_GOERLI",
                "https://goerli.etherscan.io/tx",
            ),
            confirm_deposit_url: std::env::var("FLYWEIGHT_CONFIRM_DEPOSIT_URL_GOERLI").ok(),
        }
    }

    /// Profile for a wallet-reported chain id; `None` for unsupported chains.
    pub fn for_chain(chain_id: &str) -> Option<Self> {
        match chain_id {
            "0x1" | "1" => Some(Self::mainnet()),
            "0x5" | "5" => Some(Self::goerli()),
            _ => None,
        }
    }

    /// Fully custom profile, for hosts with their own deployments and tests.
    pub fn custom(
        chain_id: impl Into<String>,
        name: impl Into<String>,
        orders_contract: impl Into<String>,
        explorer_tx_url: impl Into<String>,
        confirm_deposit_url: Option<String>,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            name: name.into(),
            orders_contract: orders_contract.into(),
            explorer_tx_url: crate::utils::remove_trailing_slash(&explorer_tx_url.into()),
            confirm_deposit_url,
        }
    }

    /// True once the profile knows its contract address.
    pub fn is_configured(&self) -> bool {
        !self.orders_contract.is_empty()
    }

    /// Block-explorer link for a mined transaction.
    pub fn explorer_url_for(&self, tx_hash: &str) -> String {
        format!("{}/{}", self.explorer_tx_url, tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_url_contains_tx_hash() {
        let profile = NetworkProfile::goerli();
        let url = profile.explorer_url_for("0xabc123");
        assert_eq!(url, "https://goerli.etherscan.io/tx/0xabc123");
    }

    #[test]
    fn test_for_chain_mapping() {
        assert_eq!(NetworkProfile::for_chain("0x5").unwrap().name, "goerli");
        assert_eq!(NetworkProfile::for_chain("1").unwrap().name, "mainnet");
        assert!(NetworkProfile::for_chain("0x2105").is_none());
    }

    #[test]
    fn test_custom_profile_normalizes_explorer_url() {
        let profile = NetworkProfile::custom(
            "0x7a69",
            "anvil",
            "0x0000000000000000000000000000000000000001",
            "http://localhost:3000/tx/",
            None,
        );
        assert!(profile.is_configured());
        assert_eq!(profile.explorer_url_for("0x1"), "http://localhost:3000/tx/0x1");
    }
}
