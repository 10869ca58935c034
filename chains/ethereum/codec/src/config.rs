use crate::{error::Error, transactions::tx_type::TypeRegistry};

/// Network parameters enforced by [`crate::TransactionCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub blockchain: &'static str,
    pub network: &'static str,
    /// Transactions bound to another chain are rejected, `None` accepts any chain.
    pub chain_id: Option<u64>,
    pub registry: TypeRegistry,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            blockchain: "ethereum",
            network: "any",
            chain_id: None,
            registry: TypeRegistry::all(),
        }
    }
}

/// # Errors
/// Returns [`Error::UnknownNetwork`] if `network` is not supported.
pub fn config(network: &str) -> Result<CodecConfig, Error> {
    let (blockchain, network, chain_id, registry) = match network {
        "dev" => ("ethereum", "dev", 1337, TypeRegistry::ETHEREUM),
        "mainnet" => ("ethereum", "mainnet", 1, TypeRegistry::ETHEREUM),
        "sepolia" => ("ethereum", "sepolia", 11_155_111, TypeRegistry::ETHEREUM),
        "arbitrum" => ("arbitrum", "mainnet", 42161, TypeRegistry::EVM),
        "polygon" => ("polygon", "mainnet", 137, TypeRegistry::EVM),
        "optimism" => ("optimism", "mainnet", 10, TypeRegistry::OP_STACK),
        "base" => ("base", "mainnet", 8453, TypeRegistry::OP_STACK),
        "zksync" => ("zksync", "mainnet", 324, TypeRegistry::ZKSYNC),
        "celo" => ("celo", "mainnet", 42220, TypeRegistry::CELO),
        network => return Err(Error::UnknownNetwork(network.into())),
    };
    Ok(CodecConfig { blockchain, network, chain_id: Some(chain_id), registry })
}

#[cfg(test)]
mod tests {
    use super::config;
    use crate::{error::Error, transactions::tx_type::TxType};

    #[test]
    fn known_networks() {
        let mainnet = config("mainnet").unwrap();
        assert_eq!(mainnet.chain_id, Some(1));
        assert!(mainnet.registry.contains(TxType::Eip4844));
        assert!(!mainnet.registry.contains(TxType::Deposit));

        let base = config("base").unwrap();
        assert_eq!((base.blockchain, base.chain_id), ("base", Some(8453)));
        assert!(base.registry.contains(TxType::Deposit));

        assert!(config("zksync").unwrap().registry.contains(TxType::Eip712));
        assert!(config("celo").unwrap().registry.contains(TxType::Cip64));
        assert!(config("celo").unwrap().registry.contains(TxType::Cip42));
    }

    #[test]
    fn unknown_network() {
        assert_eq!(config("ropsten"), Err(Error::UnknownNetwork("ropsten".into())));
    }
}
