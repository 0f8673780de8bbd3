pub use voting_codec::{AccountAddress, CandidateDetails, ElectionInfo, ElectionWinner};

pub use self::config::GatewayConfig;
pub use self::error::{GatewayError, Result};
pub use self::gateway::{ContractGateway, TxCall, TxFunction};
pub use self::node::{HttpNodeClient, NodeClient};
pub use self::signer::{RawTransactionDescriptor, WalletSigner};

mod config;
mod error;
mod gateway;
mod node;
mod signer;
