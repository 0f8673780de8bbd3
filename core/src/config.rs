use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use voting_codec::AccountAddress;
use voting_util::serde_helpers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the node RPC.
    ///
    /// Default: `https://rpc-testnet.supra.com`
    #[serde(default = "default_node_url")]
    pub node_url: String,

    /// Address the voting module is published under.
    pub contract_address: AccountAddress,

    /// Name of the voting module.
    pub module_name: String,

    /// How long a submitted transaction stays valid.
    ///
    /// Default: `30s`
    #[serde(default = "default_tx_expiry", with = "serde_helpers::humantime")]
    pub tx_expiry: Duration,
}

impl GatewayConfig {
    pub fn new(contract_address: AccountAddress, module_name: impl Into<String>) -> Self {
        Self {
            node_url: default_node_url(),
            contract_address,
            module_name: module_name.into(),
            tx_expiry: default_tx_expiry(),
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        serde_helpers::load_json_from_file(path)
    }

    /// Fully qualified `<address>::<module>::<function>` identifier.
    pub fn function_id(&self, function_name: &str) -> String {
        format!(
            "{}::{}::{function_name}",
            self.contract_address, self.module_name
        )
    }
}

fn default_node_url() -> String {
    "https://rpc-testnet.supra.com".to_owned()
}

fn default_tx_expiry() -> Duration {
    Duration::from_secs(30)
}
