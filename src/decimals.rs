//! Per-session cache of token decimal counts.
//!
//! Decimals for a deployed token contract never change, so entries are
//! resolved lazily on first use and never expire or get invalidated.
//! Resolution for one symbol is single-flight: concurrent first-access
//! callers collapse onto one pending query instead of racing duplicate
//! contract reads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::chain::ChainReader;
use crate::errors::EngineError;

pub struct TokenDecimalsCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<u8>>>>,
}

impl TokenDecimalsCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached decimal count for `symbol`, resolving it through the
    /// orders contract (symbol → token address → ERC-20 `decimals()`) on
    /// first access.
    ///
    /// A failed resolution is not cached; the caller may retry.
    pub async fn get_decimals(
        &self,
        symbol: &str,
        reader: &dyn ChainReader,
    ) -> Result<u8, EngineError> {
        let cell = {
            let mut entries = self.entries.lock().expect("decimals cache lock");
            Arc::clone(entries.entry(symbol.to_string()).or_default())
        };

        cell.get_or_try_init(|| async {
            let address = reader.token_address(symbol).await.map_err(|e| {
                log::error!("token address lookup failed for {}: {:?}", symbol, e);
                EngineError::TokenResolutionFailed {
                    symbol: symbol.to_string(),
                    cause: anyhow::Error::new(e),
                }
            })?;

            let decimals = reader.token_decimals(&address).await.map_err(|e| {
                log::error!("decimals() call failed for {} at {}: {:?}", symbol, address, e);
                EngineError::TokenResolutionFailed {
                    symbol: symbol.to_string(),
                    cause: anyhow::Error::new(e),
                }
            })?;

            log::debug!("resolved {} decimals for {}", decimals, symbol);
            Ok(decimals)
        })
        .await
        .copied()
    }

    /// Cached value without resolving, if present.
    pub fn peek(&self, symbol: &str) -> Option<u8> {
        let entries = self.entries.lock().expect("decimals cache lock");
        entries.get(symbol).and_then(|cell| cell.get().copied())
    }
}

impl Default for TokenDecimalsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::chain::{ChainResult, ChainReader};
    use crate::errors::ProviderFailure;
    use crate::models::RawOrder;

    struct CountingReader {
        lookups: AtomicUsize,
        fail_first: AtomicUsize,
    }

    impl CountingReader {
        fn new() -> Self {
            Self {
                lookups: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
            }
        }

        fn failing_once() -> Self {
            Self {
                lookups: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(1),
            }
        }
    }

    #[async_trait]
    impl ChainReader for CountingReader {
        async fn orders_by_address(&self, _owner: &str) -> ChainResult<Vec<RawOrder>> {
            Ok(Vec::new())
        }

        async fn token_address(&self, symbol: &str) -> ChainResult<String> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            }) == Ok(1)
            {
                return Err(ProviderFailure::new("node hiccup"));
            }
            Ok(format!("0x{}", symbol.to_lowercase()))
        }

        async fn whitelisted_symbols(&self, candidates: &[String]) -> ChainResult<Vec<String>> {
            Ok(candidates.to_vec())
        }

        async fn token_decimals(&self, _token_address: &str) -> ChainResult<u8> {
            Ok(18)
        }
    }

    #[tokio::test]
    async fn test_second_read_hits_cache() {
        let cache = TokenDecimalsCache::new();
        let reader = CountingReader::new();

        assert_eq!(cache.get_decimals("UNI", &reader).await.unwrap(), 18);
        assert_eq!(cache.get_decimals("UNI", &reader).await.unwrap(), 18);
        assert_eq!(reader.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(cache.peek("UNI"), Some(18));
    }

    #[tokio::test]
    async fn test_concurrent_first_access_is_single_flight() {
        let cache = TokenDecimalsCache::new();
        let reader = CountingReader::new();

        let (a, b) = tokio::join!(
            cache.get_decimals("WETH", &reader),
            cache.get_decimals("WETH", &reader)
        );
        assert_eq!(a.unwrap(), 18);
        assert_eq!(b.unwrap(), 18);
        assert_eq!(reader.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_resolution_is_not_cached() {
        let cache = TokenDecimalsCache::new();
        let reader = CountingReader::failing_once();

        let err = cache.get_decimals("UNI", &reader).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::TokenResolutionFailed { ref symbol, .. } if symbol == "UNI"
        ));
        assert_eq!(cache.peek("UNI"), None);

        // Retry succeeds and gets cached.
        assert_eq!(cache.get_decimals("UNI", &reader).await.unwrap(), 18);
        assert_eq!(cache.peek("UNI"), Some(18));
    }
}
