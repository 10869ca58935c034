pub use primitive_types::{H160, H256};

// Aliases for Ethereum types.
pub type Address = H160;
pub type TxHash = H256;
