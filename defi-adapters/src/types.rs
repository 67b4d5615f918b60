use std::collections::BTreeMap;
use std::fmt;

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// Protocols with adapters in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "angle-protocol")]
    AngleProtocol,
}

impl Protocol {
    pub fn id(self) -> &'static str {
        match self {
            Protocol::AngleProtocol => "angle-protocol",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Static description of a protocol product on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDetails {
    pub protocol_id: Protocol,
    pub name: String,
    pub description: String,
    pub site_url: String,
    pub icon_url: String,
    pub position_type: PositionType,
    pub chain_id: u64,
    pub product_id: String,
    pub asset_details: AssetDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Supply,
    Lend,
    Borrow,
    Staked,
    Reward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AssetType {
    StandardErc20,
    NonStandardErc20,
    Nft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetails {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

/// ERC-20 token descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Metadata {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A protocol token and the asset(s) backing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolTokenMetadata {
    pub protocol_token: Erc20Metadata,
    #[serde(rename = "underlyingToken")]
    pub underlying_tokens: Vec<Erc20Metadata>,
}

/// Protocol-token address → token metadata.
pub type MetadataMap = BTreeMap<Address, ProtocolTokenMetadata>;

/// An unsigned call: target contract and ABI-encoded calldata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionParams {
    pub to: Address,
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_protocol_details_serializes_camel_case() {
        let details = ProtocolDetails {
            protocol_id: Protocol::AngleProtocol,
            name: "AngleProtocol".into(),
            description: "d".into(),
            site_url: "https://angle.money".into(),
            icon_url: "https://example.com/icon.png".into(),
            position_type: PositionType::Supply,
            chain_id: 1,
            product_id: "transmuter".into(),
            asset_details: AssetDetails {
                asset_type: AssetType::NonStandardErc20,
            },
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["protocolId"], "angle-protocol");
        assert_eq!(json["positionType"], "supply");
        assert_eq!(json["assetDetails"]["type"], "NonStandardErc20");
        assert_eq!(json["siteUrl"], "https://angle.money");
    }

    #[test]
    fn test_metadata_map_keys_are_addresses() {
        let token = address!("0x0000206329b97DB379d5E1Bf586BbDB969C63274");
        let underlying = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        let mut map = MetadataMap::new();
        map.insert(
            token,
            ProtocolTokenMetadata {
                protocol_token: Erc20Metadata {
                    address: token,
                    name: "USDA".into(),
                    symbol: "USDA".into(),
                    decimals: 18,
                },
                underlying_tokens: vec![Erc20Metadata {
                    address: underlying,
                    name: "USD Coin".into(),
                    symbol: "USDC".into(),
                    decimals: 6,
                }],
            },
        );

        let json = serde_json::to_value(&map).unwrap();
        let entry = json
            .as_object()
            .unwrap()
            .values()
            .next()
            .unwrap();
        assert_eq!(entry["underlyingToken"][0]["symbol"], "USDC");

        let back: MetadataMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
