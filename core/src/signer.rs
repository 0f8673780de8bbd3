use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use voting_codec::AccountAddress;
use voting_util::serde_helpers;

/// Everything a wallet needs to materialize an entry function transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionDescriptor {
    pub sender: AccountAddress,
    /// Always `0`, the wallet fills in the actual value.
    pub sequence_number: u64,
    pub contract_address: AccountAddress,
    pub module_name: String,
    pub function_name: String,
    pub type_arguments: Vec<String>,
    /// BCS-encoded positional arguments.
    #[serde(with = "serde_helpers::hex_bytes_list")]
    pub arguments: Vec<Vec<u8>>,
    /// Unix timestamp in seconds.
    pub tx_expiry_time: u64,
}

impl RawTransactionDescriptor {
    pub fn function_id(&self) -> String {
        format!(
            "{}::{}::{}",
            self.contract_address, self.module_name, self.function_name
        )
    }
}

/// A connected browser wallet (or anything else able to sign for an account).
///
/// Discovery is up to the caller, the gateway only receives a ready signer.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Requests access to the wallet accounts.
    async fn connect(&self) -> Result<Vec<AccountAddress>> {
        self.accounts().await
    }

    /// Currently connected accounts, the first one is used as a sender.
    async fn accounts(&self) -> Result<Vec<AccountAddress>>;

    /// Builds signable transaction data. `None` if the wallet refused to.
    async fn create_raw_transaction_data(
        &self,
        descriptor: &RawTransactionDescriptor,
    ) -> Result<Option<Bytes>>;

    /// Signs and submits the transaction, returning its hash.
    async fn send_transaction(&self, data: Bytes) -> Result<Option<String>>;
}
