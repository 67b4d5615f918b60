//! Chain identity and a read-only client for EVM-compatible networks.
//!
//! The client carries no signer: adapters only read token data and build
//! unsigned calldata.

use std::fmt;
use std::str::FromStr;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Networks known to the adapter library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Ethereum,
    Optimism,
    Bsc,
    Polygon,
    Fantom,
    Base,
    Arbitrum,
    Avalanche,
    Linea,
}

impl Chain {
    pub const ALL: [Chain; 9] = [
        Chain::Ethereum,
        Chain::Optimism,
        Chain::Bsc,
        Chain::Polygon,
        Chain::Fantom,
        Chain::Base,
        Chain::Arbitrum,
        Chain::Avalanche,
        Chain::Linea,
    ];

    /// EIP-155 chain ID.
    pub fn id(self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Optimism => 10,
            Chain::Bsc => 56,
            Chain::Polygon => 137,
            Chain::Fantom => 250,
            Chain::Base => 8453,
            Chain::Arbitrum => 42161,
            Chain::Avalanche => 43114,
            Chain::Linea => 59144,
        }
    }

    pub fn from_id(id: u64) -> Option<Chain> {
        Chain::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Lowercase name, used in file names and env var prefixes.
    pub fn name(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Optimism => "optimism",
            Chain::Bsc => "bsc",
            Chain::Polygon => "polygon",
            Chain::Fantom => "fantom",
            Chain::Base => "base",
            Chain::Arbitrum => "arbitrum",
            Chain::Avalanche => "avalanche",
            Chain::Linea => "linea",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = AdapterError;

    /// Accepts either a chain name (`"arbitrum"`) or a numeric chain ID (`"42161"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u64>() {
            return Chain::from_id(id)
                .ok_or_else(|| AdapterError::ConfigError(format!("Unknown chain ID: {id}")));
        }
        Chain::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdapterError::ConfigError(format!("Unknown chain: {s}")))
    }
}

/// A read-only chain client wrapping a type-erased alloy provider.
#[derive(Clone)]
pub struct ChainClient {
    pub provider: DynProvider,
    pub chain: Chain,
}

impl ChainClient {
    /// Create a client from an HTTP JSON-RPC URL.
    pub fn new(rpc_url: &str, chain: Chain) -> Result<Self, AdapterError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| AdapterError::ConfigError(format!("Invalid RPC URL: {e}")))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self { provider, chain })
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}
