//! Token metadata resolution.
//!
//! Adapters describe their tokens with [`Erc20Metadata`] fetched through a
//! [`TokenMetadataResolver`]. The on-chain resolver reads the ERC-20 metadata
//! extension over RPC; the static resolver serves a fixed table.

use std::collections::HashMap;

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::chain::{Chain, ChainClient};
use crate::contracts::IERC20Metadata;
use crate::error::AdapterError;
use crate::types::Erc20Metadata;

/// Resolves descriptive metadata for a token address on a chain.
#[async_trait]
pub trait TokenMetadataResolver: Send + Sync {
    async fn get_token_metadata(
        &self,
        address: Address,
        chain: Chain,
    ) -> Result<Erc20Metadata, AdapterError>;
}

/// Metadata for the native asset, addressed as `Address::ZERO`.
pub fn native_token_metadata(chain: Chain) -> Erc20Metadata {
    let (name, symbol) = match chain {
        Chain::Polygon => ("Polygon Ecosystem Token", "POL"),
        Chain::Bsc => ("BNB", "BNB"),
        Chain::Fantom => ("Fantom", "FTM"),
        Chain::Avalanche => ("Avalanche", "AVAX"),
        _ => ("Ether", "ETH"),
    };
    Erc20Metadata {
        address: Address::ZERO,
        name: name.into(),
        symbol: symbol.into(),
        decimals: 18,
    }
}

/// Reads `name()`, `symbol()` and `decimals()` from the token contract.
pub struct OnChainTokenResolver {
    client: ChainClient,
}

impl OnChainTokenResolver {
    pub fn new(client: ChainClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenMetadataResolver for OnChainTokenResolver {
    async fn get_token_metadata(
        &self,
        address: Address,
        chain: Chain,
    ) -> Result<Erc20Metadata, AdapterError> {
        if chain != self.client.chain {
            return Err(AdapterError::ConfigError(format!(
                "Resolver is connected to {}, cannot resolve tokens on {chain}",
                self.client.chain
            )));
        }

        if address == Address::ZERO {
            return Ok(native_token_metadata(chain));
        }

        let token = IERC20Metadata::new(address, self.client.provider());
        let name = token.name().call().await?;
        let symbol = token.symbol().call().await?;
        let decimals = token.decimals().call().await?;

        tracing::debug!("Resolved token {address} on {chain}: {symbol} ({decimals} decimals)");

        Ok(Erc20Metadata {
            address,
            name,
            symbol,
            decimals,
        })
    }
}

/// In-memory token table for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<(Chain, Address), Erc20Metadata>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain: Chain, metadata: Erc20Metadata) {
        self.tokens.insert((chain, metadata.address), metadata);
    }

    pub fn with_token(mut self, chain: Chain, metadata: Erc20Metadata) -> Self {
        self.insert(chain, metadata);
        self
    }
}

#[async_trait]
impl TokenMetadataResolver for StaticTokenResolver {
    async fn get_token_metadata(
        &self,
        address: Address,
        chain: Chain,
    ) -> Result<Erc20Metadata, AdapterError> {
        if address == Address::ZERO {
            return Ok(native_token_metadata(chain));
        }
        self.tokens
            .get(&(chain, address))
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("Token {address} on {chain}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const USDC: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    fn usdc() -> Erc20Metadata {
        Erc20Metadata {
            address: USDC,
            name: "USD Coin".into(),
            symbol: "USDC".into(),
            decimals: 6,
        }
    }

    #[tokio::test]
    async fn test_static_resolver_lookup() {
        let resolver = StaticTokenResolver::new().with_token(Chain::Ethereum, usdc());
        let meta = resolver
            .get_token_metadata(USDC, Chain::Ethereum)
            .await
            .unwrap();
        assert_eq!(meta, usdc());
    }

    #[tokio::test]
    async fn test_static_resolver_is_chain_scoped() {
        let resolver = StaticTokenResolver::new().with_token(Chain::Ethereum, usdc());
        let result = resolver.get_token_metadata(USDC, Chain::Base).await;
        assert!(matches!(result, Err(AdapterError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_native_token() {
        let resolver = StaticTokenResolver::new();
        let eth = resolver
            .get_token_metadata(Address::ZERO, Chain::Arbitrum)
            .await
            .unwrap();
        assert_eq!(eth.symbol, "ETH");
        assert_eq!(eth.decimals, 18);
        assert_eq!(native_token_metadata(Chain::Polygon).symbol, "POL");
    }

    #[tokio::test]
    async fn test_on_chain_resolver_rejects_other_chain() {
        let client = ChainClient::new("http://localhost:8545", Chain::Ethereum).unwrap();
        let resolver = OnChainTokenResolver::new(client);
        let result = resolver.get_token_metadata(USDC, Chain::Polygon).await;
        assert!(matches!(result, Err(AdapterError::ConfigError(_))));
    }
}
