//! Write actions and their input schemas.
//!
//! Each write adapter publishes a [`WriteActionInputSchemas`] table naming the
//! fields every supported action requires. Callers validate raw JSON inputs
//! against it before asking the adapter for transaction params.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Action types a write adapter may be asked to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    Deposit,
    Withdraw,
    Supply,
    Borrow,
    Repay,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteAction::Deposit => "deposit",
            WriteAction::Withdraw => "withdraw",
            WriteAction::Supply => "supply",
            WriteAction::Borrow => "borrow",
            WriteAction::Repay => "repay",
        };
        f.write_str(name)
    }
}

/// Inputs shared by asset-in/asset-out actions. `amount` is a base-10 integer string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteActionInputs {
    pub asset: String,
    pub amount: String,
    pub receiver: String,
}

/// Request for a single unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionParams {
    pub action: WriteAction,
    pub inputs: WriteActionInputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
        }
    }
}

/// Required fields of one action's inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSchema {
    pub fields: &'static [FieldSpec],
}

impl InputSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Check that `value` is an object carrying every required field with the right kind.
    pub fn validate(&self, value: &serde_json::Value) -> Result<(), AdapterError> {
        let object = value
            .as_object()
            .ok_or_else(|| AdapterError::InvalidInput("inputs must be a JSON object".into()))?;

        for field in self.fields {
            let Some(v) = object.get(field.name) else {
                return Err(AdapterError::InvalidInput(format!(
                    "missing required field '{}'",
                    field.name
                )));
            };
            match field.kind {
                FieldKind::String if !v.is_string() => {
                    return Err(AdapterError::InvalidInput(format!(
                        "field '{}' must be a string",
                        field.name
                    )));
                }
                FieldKind::String => {}
            }
        }
        Ok(())
    }
}

const ASSET_AMOUNT_RECEIVER_FIELDS: [FieldSpec; 3] = [
    FieldSpec::string("asset"),
    FieldSpec::string("amount"),
    FieldSpec::string("receiver"),
];

/// Fields required by both Deposit and Withdraw: `{asset, amount, receiver}`.
pub const ASSET_AMOUNT_RECEIVER: InputSchema = InputSchema::new(&ASSET_AMOUNT_RECEIVER_FIELDS);

/// Action → required input fields.
#[derive(Debug, Clone, Default)]
pub struct WriteActionInputSchemas {
    schemas: BTreeMap<WriteAction, InputSchema>,
}

impl WriteActionInputSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: WriteAction, schema: InputSchema) -> Self {
        self.schemas.insert(action, schema);
        self
    }

    pub fn get(&self, action: WriteAction) -> Option<&InputSchema> {
        self.schemas.get(&action)
    }

    pub fn actions(&self) -> Vec<WriteAction> {
        self.schemas.keys().copied().collect()
    }

    /// Validate raw inputs for `action` and build a transaction request from them.
    pub fn parse(
        &self,
        protocol: &str,
        product: &str,
        action: WriteAction,
        inputs: &serde_json::Value,
    ) -> Result<GetTransactionParams, AdapterError> {
        let schema = self.get(action).ok_or_else(|| AdapterError::NotImplemented {
            protocol: protocol.to_string(),
            product: product.to_string(),
            action,
        })?;
        schema.validate(inputs)?;
        let inputs: WriteActionInputs = serde_json::from_value(inputs.clone())
            .map_err(|e| AdapterError::InvalidInput(e.to_string()))?;
        Ok(GetTransactionParams { action, inputs })
    }
}
