pub mod error;
pub mod types;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod token_metadata;
pub mod cache;
pub mod write_actions;
pub mod adapters;

pub use adapters::angle_transmuter::AngleTransmuterAdapter;
pub use adapters::{ProtocolAdapter, WriteOnlyAdapter};
pub use error::AdapterError;
pub use types::*;
