pub mod angle_transmuter;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::chain::Chain;
use crate::error::AdapterError;
use crate::types::{MetadataMap, Protocol, ProtocolDetails, TransactionParams};
use crate::write_actions::{GetTransactionParams, WriteActionInputSchemas};

/// Identity and description of one protocol product on one chain
pub trait ProtocolAdapter: Send + Sync {
    fn protocol_id(&self) -> Protocol;

    fn product_id(&self) -> &str;

    fn chain(&self) -> Chain;

    /// Static descriptor for registries and UIs. Never touches the network.
    fn get_protocol_details(&self) -> ProtocolDetails;
}

/// Adapters that only build transactions, never read positions.
#[async_trait]
pub trait WriteOnlyAdapter: ProtocolAdapter {
    /// Required input fields per supported action.
    fn write_action_input_schemas(&self) -> &WriteActionInputSchemas;

    /// Protocol-token address → protocol token and its underlying tokens.
    async fn build_metadata(&self) -> Result<MetadataMap, AdapterError>;

    /// Encode a single unsigned call for `params.action`.
    async fn get_transaction_params(
        &self,
        params: &GetTransactionParams,
    ) -> Result<TransactionParams, AdapterError>;
}

/// Parse a hex address string into an alloy Address.
pub fn parse_address(field: &str, value: &str) -> Result<Address, AdapterError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| AdapterError::InvalidInput(format!("Invalid {field} address '{value}': {e}")))
}

/// Parse a decimal string into a U256.
pub fn parse_amount(value: &str) -> Result<U256, AdapterError> {
    let digits = value.trim();
    if digits.is_empty() {
        return Err(AdapterError::InvalidInput("amount must not be empty".into()));
    }
    U256::from_str_radix(digits, 10)
        .map_err(|e| AdapterError::InvalidInput(format!("Invalid amount '{value}': {e}")))
}
