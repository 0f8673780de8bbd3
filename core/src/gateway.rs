use std::sync::Arc;

use voting_codec::view::{
    CandidateList, CandidateVotes, ElectionInfoView, ViewOutput, VoterVoted, WinnerView,
    decode_view,
};
use voting_codec::{
    AccountAddress, CandidateDetails, ElectionInfo, ElectionWinner, serialize_option_u64,
    serialize_str, serialize_u64,
};
use voting_util::time::expire_at;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::node::NodeClient;
use crate::signer::{RawTransactionDescriptor, WalletSigner};

/// State-changing entry functions of the voting module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxFunction {
    CreateElection,
    RegisterCandidate,
    RegisterVoter,
    Vote,
    StartElection,
    EndElection,
}

impl TxFunction {
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateElection => "create_election",
            Self::RegisterCandidate => "register_candidate",
            Self::RegisterVoter => "register_voter",
            Self::Vote => "vote",
            Self::StartElection => "start_election",
            Self::EndElection => "end_election",
        }
    }
}

impl std::fmt::Display for TxFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An entry function call with BCS-encoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxCall {
    pub function: TxFunction,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Vec<u8>>,
}

impl TxCall {
    fn new(function: TxFunction, arguments: Vec<Vec<u8>>) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }

    pub fn create_election(name: &str, start_time: Option<u64>, end_time: Option<u64>) -> Self {
        Self::new(TxFunction::CreateElection, vec![
            serialize_str(name),
            serialize_option_u64(start_time),
            serialize_option_u64(end_time),
        ])
    }

    pub fn register_candidate(name: &str, dao: &str, image_uri: &str, election_id: u64) -> Self {
        Self::new(TxFunction::RegisterCandidate, vec![
            serialize_str(name),
            serialize_str(dao),
            serialize_str(image_uri),
            serialize_u64(election_id),
        ])
    }

    pub fn register_voter(election_id: u64) -> Self {
        Self::new(TxFunction::RegisterVoter, vec![serialize_u64(election_id)])
    }

    pub fn vote(election_id: u64, candidate_id: u64) -> Self {
        Self::new(TxFunction::Vote, vec![
            serialize_u64(election_id),
            serialize_u64(candidate_id),
        ])
    }

    pub fn start_election(election_id: u64, duration_secs: u64) -> Self {
        Self::new(TxFunction::StartElection, vec![
            serialize_u64(election_id),
            serialize_u64(duration_secs),
        ])
    }

    pub fn end_election(election_id: u64) -> Self {
        Self::new(TxFunction::EndElection, vec![serialize_u64(election_id)])
    }
}

/// Typed access to the voting contract.
///
/// Transactions go through the injected [`WalletSigner`] and their errors are
/// returned as is. View calls go through the [`NodeClient`] and never fail:
/// any node or decoding error is logged and replaced with an empty value.
pub struct ContractGateway {
    config: GatewayConfig,
    node: Arc<dyn NodeClient>,
    signer: Option<Arc<dyn WalletSigner>>,
}

impl ContractGateway {
    pub fn new(config: GatewayConfig, node: Arc<dyn NodeClient>) -> Self {
        Self {
            config,
            node,
            signer: None,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn WalletSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn set_signer(&mut self, signer: Option<Arc<dyn WalletSigner>>) {
        self.signer = signer;
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    // === Transactions ===

    pub async fn create_election(
        &self,
        name: &str,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> Result<String> {
        self.submit(TxCall::create_election(name, start_time, end_time))
            .await
    }

    pub async fn register_candidate(
        &self,
        name: &str,
        dao: &str,
        image_uri: &str,
        election_id: u64,
    ) -> Result<String> {
        self.submit(TxCall::register_candidate(name, dao, image_uri, election_id))
            .await
    }

    pub async fn register_voter(&self, election_id: u64) -> Result<String> {
        self.submit(TxCall::register_voter(election_id)).await
    }

    pub async fn vote(&self, election_id: u64, candidate_id: u64) -> Result<String> {
        self.submit(TxCall::vote(election_id, candidate_id)).await
    }

    pub async fn start_election(&self, election_id: u64, duration_secs: u64) -> Result<String> {
        self.submit(TxCall::start_election(election_id, duration_secs))
            .await
    }

    pub async fn end_election(&self, election_id: u64) -> Result<String> {
        self.submit(TxCall::end_election(election_id)).await
    }

    /// Builds the descriptor handed to the wallet for the specified call.
    pub fn prepare_transaction(
        &self,
        sender: AccountAddress,
        call: TxCall,
    ) -> RawTransactionDescriptor {
        RawTransactionDescriptor {
            sender,
            sequence_number: 0,
            contract_address: self.config.contract_address,
            module_name: self.config.module_name.clone(),
            function_name: call.function.name().to_owned(),
            type_arguments: call.type_arguments,
            arguments: call.arguments,
            tx_expiry_time: expire_at(self.config.tx_expiry),
        }
    }

    /// Signs and submits the call, returning the transaction hash.
    pub async fn submit(&self, call: TxCall) -> Result<String> {
        let function = call.function;
        match self.submit_impl(call).await {
            Ok(tx_hash) => {
                tracing::info!(%function, tx_hash, "transaction submitted");
                Ok(tx_hash)
            }
            Err(e) => {
                tracing::error!(%function, "failed to submit transaction: {e:?}");
                Err(e)
            }
        }
    }

    async fn submit_impl(&self, call: TxCall) -> Result<String> {
        let signer = self.signer.as_ref().ok_or(GatewayError::WalletUnavailable)?;

        let accounts = signer.accounts().await.map_err(GatewayError::Signer)?;
        let Some(sender) = accounts.first().copied() else {
            return Err(GatewayError::NoAccount);
        };

        let descriptor = self.prepare_transaction(sender, call);
        tracing::debug!(?descriptor, "creating raw transaction");

        let data = match signer.create_raw_transaction_data(&descriptor).await {
            Ok(Some(data)) if !data.is_empty() => data,
            Ok(_) => return Err(GatewayError::TransactionBuildFailed("empty transaction data")),
            Err(e) => return Err(GatewayError::Signer(e)),
        };

        match signer.send_transaction(data).await {
            Ok(Some(tx_hash)) if !tx_hash.is_empty() => Ok(tx_hash),
            Ok(_) => Err(GatewayError::TransactionBuildFailed("empty transaction hash")),
            Err(e) => Err(GatewayError::Signer(e)),
        }
    }

    // === Wallet ===

    pub async fn is_wallet_connected(&self) -> bool {
        self.connected_address().await.is_some()
    }

    pub async fn connected_address(&self) -> Option<AccountAddress> {
        let signer = self.signer.as_ref()?;
        match signer.accounts().await {
            Ok(accounts) => accounts.first().copied(),
            Err(e) => {
                tracing::debug!("failed to get wallet accounts: {e:?}");
                None
            }
        }
    }

    // === Views ===

    pub async fn get_election_info(&self, election_id: u64) -> ElectionInfo {
        self.view_or_default::<ElectionInfoView>(vec![election_id.to_string()])
            .await
            .map(ElectionInfo::from)
            .unwrap_or_default()
    }

    pub async fn get_winner(&self, election_id: u64) -> ElectionWinner {
        self.view_or_default::<WinnerView>(vec![election_id.to_string()])
            .await
            .map(ElectionWinner::from)
            .unwrap_or_default()
    }

    pub async fn get_all_candidates(&self, election_id: u64) -> Vec<CandidateDetails> {
        self.view_or_default::<CandidateList>(vec![election_id.to_string()])
            .await
            .map(|CandidateList(candidates)| candidates)
            .unwrap_or_default()
    }

    pub async fn get_candidate_votes(
        &self,
        owner: &AccountAddress,
        election_id: u64,
        candidate: &AccountAddress,
    ) -> u64 {
        let arguments = vec![
            owner.to_string(),
            election_id.to_string(),
            candidate.to_string(),
        ];
        self.view_or_default::<CandidateVotes>(arguments)
            .await
            .map(|CandidateVotes(votes)| votes)
            .unwrap_or_default()
    }

    pub async fn has_voter_voted(
        &self,
        owner: &AccountAddress,
        election_id: u64,
        voter: &AccountAddress,
    ) -> bool {
        let arguments = vec![
            owner.to_string(),
            election_id.to_string(),
            voter.to_string(),
        ];
        self.view_or_default::<VoterVoted>(arguments)
            .await
            .map(|VoterVoted(voted)| voted)
            .unwrap_or_default()
    }

    /// Calls a view function and decodes its result.
    pub async fn view<T: ViewOutput>(&self, arguments: Vec<String>) -> Result<T> {
        let function = self.config.function_id(T::FUNCTION.name());
        let result = self
            .node
            .invoke_view(&function, &[], &arguments)
            .await
            .map_err(GatewayError::Node)?;

        tracing::debug!(function = T::FUNCTION.name(), %result, "view result");
        decode_view(&result).map_err(Into::into)
    }

    async fn view_or_default<T: ViewOutput>(&self, arguments: Vec<String>) -> Option<T> {
        match self.view::<T>(arguments).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(function = T::FUNCTION.name(), "view call failed: {e:?}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use voting_codec::{deserialize_option_u64, deserialize_str, deserialize_u64};

    use super::*;

    #[test]
    fn call_arguments() {
        let call = TxCall::create_election("Board Vote", Some(1700000000), Some(1700003600));
        assert_eq!(call.function.name(), "create_election");
        assert!(call.type_arguments.is_empty());
        assert_eq!(call.arguments.len(), 3);
        assert_eq!(deserialize_str(&call.arguments[0]).unwrap(), "Board Vote");
        assert_eq!(
            deserialize_option_u64(&call.arguments[1]).unwrap(),
            Some(1700000000)
        );
        assert_eq!(
            deserialize_option_u64(&call.arguments[2]).unwrap(),
            Some(1700003600)
        );

        let call = TxCall::create_election("Open", None, None);
        assert_eq!(call.arguments[1], [0]);
        assert_eq!(call.arguments[2], [0]);

        let call = TxCall::register_candidate("Alice", "Builders", "ipfs://cid", 3);
        assert_eq!(call.arguments.len(), 4);
        assert_eq!(deserialize_str(&call.arguments[2]).unwrap(), "ipfs://cid");
        assert_eq!(deserialize_u64(&call.arguments[3]).unwrap(), 3);

        let call = TxCall::vote(3, 8);
        assert_eq!(call.function, TxFunction::Vote);
        assert_eq!(deserialize_u64(&call.arguments[0]).unwrap(), 3);
        assert_eq!(deserialize_u64(&call.arguments[1]).unwrap(), 8);

        let call = TxCall::start_election(3, 3600);
        assert_eq!(call.function.to_string(), "start_election");
        assert_eq!(deserialize_u64(&call.arguments[1]).unwrap(), 3600);

        assert_eq!(TxCall::register_voter(1).function.name(), "register_voter");
        assert_eq!(TxCall::end_election(1).function.name(), "end_election");
    }
}
