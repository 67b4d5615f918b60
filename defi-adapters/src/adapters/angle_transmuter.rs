use std::sync::{Arc, OnceLock};

use alloy::primitives::{Address, Bytes, U256, address};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use super::{ProtocolAdapter, WriteOnlyAdapter, parse_address, parse_amount};
use crate::cache::{CacheKey, MetadataCache, get_or_compute};
use crate::chain::{Chain, ChainClient};
use crate::config::AdapterConfig;
use crate::contracts::ITransmuter;
use crate::error::AdapterError;
use crate::token_metadata::{OnChainTokenResolver, TokenMetadataResolver};
use crate::types::{
    AssetDetails, AssetType, MetadataMap, PositionType, Protocol, ProtocolDetails,
    ProtocolTokenMetadata, TransactionParams,
};
use crate::write_actions::{
    ASSET_AMOUNT_RECEIVER, GetTransactionParams, WriteAction, WriteActionInputSchemas,
};

pub const PRODUCT_ID: &str = "transmuter";

/// Cache file key for the metadata map.
const FILE_KEY: &str = "transmuter";

/// Swap calls are sent here on every chain.
pub const TRANSMUTER: Address = address!("0x1a7e4e63778B4f12a199C062f3eFdD288afCBce8");

const EURA: Address = address!("0x1a7e4e63778B4f12a199C062f3eFdD288afCBce8");
const USDA: Address = address!("0x0000206329b97DB379d5E1Bf586BbDB969C63274");

const EUROC_ETHEREUM: Address = address!("0x1aBaEA1f7C830bD89Acc67eC4af516284b1bC33c");
const USDC_ETHEREUM: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
const USDC_BASE: Address = address!("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
const USDC_ARBITRUM: Address = address!("0xaf88d065e77c8cC2239327C5EDb3A432268e5831");
const USDC_POLYGON: Address = address!("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359");

/// Protocol token → underlying token, per chain.
const CONTRACT_ADDRESSES: &[(Chain, &[(Address, Address)])] = &[
    (
        Chain::Ethereum,
        &[(EURA, EUROC_ETHEREUM), (USDA, USDC_ETHEREUM)],
    ),
    (Chain::Base, &[(USDA, USDC_BASE)]),
    (Chain::Arbitrum, &[(USDA, USDC_ARBITRUM)]),
    (Chain::Polygon, &[(USDA, USDC_POLYGON)]),
];

/// Address pairs for `chain`, or `None` when the transmuter is not deployed there.
pub fn contract_addresses(chain: Chain) -> Option<&'static [(Address, Address)]> {
    CONTRACT_ADDRESSES
        .iter()
        .find(|(c, _)| *c == chain)
        .map(|(_, pairs)| *pairs)
}

pub fn supported_chains() -> Vec<Chain> {
    CONTRACT_ADDRESSES.iter().map(|(c, _)| *c).collect()
}

fn input_schemas() -> &'static WriteActionInputSchemas {
    static SCHEMAS: OnceLock<WriteActionInputSchemas> = OnceLock::new();
    SCHEMAS.get_or_init(|| {
        WriteActionInputSchemas::new()
            .with(WriteAction::Deposit, ASSET_AMOUNT_RECEIVER)
            .with(WriteAction::Withdraw, ASSET_AMOUNT_RECEIVER)
    })
}

/// Swaps between Angle stablecoins (EURA, USDA) and their collateral
/// through the Transmuter.
pub struct AngleTransmuterAdapter {
    chain: Chain,
    resolver: Arc<dyn TokenMetadataResolver>,
    cache: Arc<dyn MetadataCache>,
    transmuter: Address,
}

impl AngleTransmuterAdapter {
    pub fn new(
        chain: Chain,
        resolver: Arc<dyn TokenMetadataResolver>,
        cache: Arc<dyn MetadataCache>,
    ) -> Self {
        Self {
            chain,
            resolver,
            cache,
            transmuter: TRANSMUTER,
        }
    }

    /// Wire an on-chain resolver and the configured cache for `chain`.
    pub fn from_config(chain: Chain, config: &AdapterConfig) -> Result<Self, AdapterError> {
        let client = ChainClient::new(config.rpc_url(chain)?, chain)?;
        Ok(Self::new(
            chain,
            Arc::new(OnChainTokenResolver::new(client)),
            config.cache(),
        ))
    }

    pub fn with_transmuter(mut self, transmuter: Address) -> Self {
        self.transmuter = transmuter;
        self
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.protocol_id().id(), PRODUCT_ID, self.chain, FILE_KEY)
    }

    async fn fetch_metadata(&self) -> Result<MetadataMap, AdapterError> {
        let pairs = contract_addresses(self.chain).ok_or_else(|| {
            tracing::warn!("Angle transmuter requested on unsupported chain {}", self.chain);
            AdapterError::ConfigError(format!(
                "No contract addresses found for chain {}",
                self.chain
            ))
        })?;

        let mut result = MetadataMap::new();
        for &(protocol_token, underlying) in pairs {
            let (underlying_token, protocol_token) = futures::try_join!(
                self.resolver.get_token_metadata(underlying, self.chain),
                self.resolver.get_token_metadata(protocol_token, self.chain),
            )?;

            result.insert(
                protocol_token.address,
                ProtocolTokenMetadata {
                    protocol_token,
                    underlying_tokens: vec![underlying_token],
                },
            );
        }

        tracing::info!(
            "Built Angle transmuter metadata for {}: {} protocol tokens",
            self.chain,
            result.len()
        );
        Ok(result)
    }

    /// Encode `swapExactInput(amount, 1, tokenIn, tokenOut, receiver, 0)`.
    fn encode_swap_exact_input(
        amount_in: U256,
        token_in: Address,
        token_out: Address,
        receiver: Address,
    ) -> Bytes {
        let call = ITransmuter::swapExactInputCall {
            amountIn: amount_in,
            amountOutMin: U256::from(1),
            tokenIn: token_in,
            tokenOut: token_out,
            to: receiver,
            deadline: U256::ZERO,
        };
        Bytes::from(call.abi_encode())
    }

    /// Encode `swapExactOutput(amount, MAX, tokenIn, tokenOut, receiver, 0)`.
    fn encode_swap_exact_output(
        amount_out: U256,
        token_in: Address,
        token_out: Address,
        receiver: Address,
    ) -> Bytes {
        let call = ITransmuter::swapExactOutputCall {
            amountOut: amount_out,
            amountInMax: U256::MAX,
            tokenIn: token_in,
            tokenOut: token_out,
            to: receiver,
            deadline: U256::ZERO,
        };
        Bytes::from(call.abi_encode())
    }
}

impl ProtocolAdapter for AngleTransmuterAdapter {
    fn protocol_id(&self) -> Protocol {
        Protocol::AngleProtocol
    }

    fn product_id(&self) -> &str {
        PRODUCT_ID
    }

    fn chain(&self) -> Chain {
        self.chain
    }

    fn get_protocol_details(&self) -> ProtocolDetails {
        ProtocolDetails {
            protocol_id: self.protocol_id(),
            name: "AngleProtocol".into(),
            description: "AngleProtocol defi adapter".into(),
            site_url: "https://angle.money".into(),
            icon_url: "https://raw.githubusercontent.com/AngleProtocol/angle-assets/main/02%20-%20Logos/02%20-%20Logo%20Only/angle-only-fill-blue.png".into(),
            position_type: PositionType::Supply,
            chain_id: self.chain.id(),
            product_id: PRODUCT_ID.into(),
            asset_details: AssetDetails {
                asset_type: AssetType::NonStandardErc20,
            },
        }
    }
}

#[async_trait]
impl WriteOnlyAdapter for AngleTransmuterAdapter {
    fn write_action_input_schemas(&self) -> &WriteActionInputSchemas {
        input_schemas()
    }

    async fn build_metadata(&self) -> Result<MetadataMap, AdapterError> {
        get_or_compute(self.cache.as_ref(), &self.cache_key(), || self.fetch_metadata()).await
    }

    async fn get_transaction_params(
        &self,
        params: &GetTransactionParams,
    ) -> Result<TransactionParams, AdapterError> {
        let inputs = &params.inputs;
        let asset = parse_address("asset", &inputs.asset)?;

        let tokens = self.build_metadata().await?;
        let underlying = tokens
            .get(&asset)
            .and_then(|entry| entry.underlying_tokens.first())
            .map(|token| token.address)
            .ok_or_else(|| {
                tracing::warn!("No underlying token for {asset} on {}", self.chain);
                AdapterError::NotFound(format!(
                    "Underlying token not found for {asset} on {}",
                    self.chain
                ))
            })?;

        let data = match params.action {
            WriteAction::Deposit => {
                let amount = parse_amount(&inputs.amount)?;
                let receiver = parse_address("receiver", &inputs.receiver)?;
                Self::encode_swap_exact_input(amount, underlying, asset, receiver)
            }
            WriteAction::Withdraw => {
                let amount = parse_amount(&inputs.amount)?;
                let receiver = parse_address("receiver", &inputs.receiver)?;
                Self::encode_swap_exact_output(amount, asset, underlying, receiver)
            }
            action => {
                return Err(AdapterError::NotImplemented {
                    protocol: self.protocol_id().to_string(),
                    product: PRODUCT_ID.into(),
                    action,
                });
            }
        };

        tracing::debug!(
            "Encoded Angle transmuter {} for {asset} on {}",
            params.action,
            self.chain
        );

        Ok(TransactionParams {
            to: self.transmuter,
            data,
        })
    }
}
