use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use voting_codec::{deserialize_option_u64, deserialize_str, deserialize_u64};
use voting_core::{
    AccountAddress, ContractGateway, ElectionInfo, ElectionWinner, GatewayConfig, GatewayError,
    NodeClient, RawTransactionDescriptor, WalletSigner,
};

// === Mocks ===

#[derive(Default)]
struct MockSigner {
    accounts: Vec<AccountAddress>,
    tx_data: Option<Bytes>,
    tx_hash: Option<String>,
    descriptors: Mutex<Vec<RawTransactionDescriptor>>,
    build_calls: AtomicUsize,
    send_calls: AtomicUsize,
}

impl MockSigner {
    fn ready(sender: AccountAddress) -> Self {
        Self {
            accounts: vec![sender],
            tx_data: Some(Bytes::from_static(&[0xde, 0xad])),
            tx_hash: Some("0xfeed".to_owned()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl WalletSigner for MockSigner {
    async fn accounts(&self) -> Result<Vec<AccountAddress>> {
        Ok(self.accounts.clone())
    }

    async fn create_raw_transaction_data(
        &self,
        descriptor: &RawTransactionDescriptor,
    ) -> Result<Option<Bytes>> {
        self.build_calls.fetch_add(1, Ordering::Relaxed);
        self.descriptors.lock().push(descriptor.clone());
        Ok(self.tx_data.clone())
    }

    async fn send_transaction(&self, data: Bytes) -> Result<Option<String>> {
        self.send_calls.fetch_add(1, Ordering::Relaxed);
        assert_eq!(Some(&data), self.tx_data.as_ref());
        Ok(self.tx_hash.clone())
    }
}

struct FailingSigner;

#[async_trait]
impl WalletSigner for FailingSigner {
    async fn accounts(&self) -> Result<Vec<AccountAddress>> {
        anyhow::bail!("wallet is locked")
    }

    async fn create_raw_transaction_data(
        &self,
        _: &RawTransactionDescriptor,
    ) -> Result<Option<Bytes>> {
        unreachable!()
    }

    async fn send_transaction(&self, _: Bytes) -> Result<Option<String>> {
        unreachable!()
    }
}

#[derive(Default)]
struct MockNode {
    result: Option<Value>,
    requests: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockNode {
    fn returning(result: Value) -> Self {
        Self {
            result: Some(result),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NodeClient for MockNode {
    async fn invoke_view(
        &self,
        function: &str,
        type_arguments: &[String],
        arguments: &[String],
    ) -> Result<Value> {
        assert!(type_arguments.is_empty());
        self.requests
            .lock()
            .push((function.to_owned(), arguments.to_vec()));
        match &self.result {
            Some(result) => Ok(result.clone()),
            None => anyhow::bail!("connection refused"),
        }
    }
}

fn config() -> GatewayConfig {
    GatewayConfig::new("0x2a".parse().unwrap(), "voting")
}

fn addr(s: &str) -> AccountAddress {
    s.parse().unwrap()
}

// === Transactions ===

#[tokio::test]
async fn create_election_roundtrip() {
    voting_util::test::init_logger("create_election_roundtrip", "debug");

    let signer = Arc::new(MockSigner::ready(addr("0xa11ce")));
    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()))
        .with_signer(signer.clone());

    let started_at = voting_util::time::now_sec();
    let tx_hash = gateway
        .create_election("Board Vote", Some(1700000000), Some(1700003600))
        .await
        .unwrap();
    assert_eq!(tx_hash, "0xfeed");

    assert_eq!(signer.build_calls.load(Ordering::Relaxed), 1);
    assert_eq!(signer.send_calls.load(Ordering::Relaxed), 1);

    let descriptors = signer.descriptors.lock();
    let descriptor = &descriptors[0];
    assert_eq!(descriptor.sender, addr("0xa11ce"));
    assert_eq!(descriptor.sequence_number, 0);
    assert_eq!(descriptor.contract_address, addr("0x2a"));
    assert_eq!(descriptor.module_name, "voting");
    assert_eq!(descriptor.function_name, "create_election");
    assert!(descriptor.type_arguments.is_empty());

    let expiry = descriptor.tx_expiry_time;
    assert!(expiry >= started_at + 30 && expiry <= started_at + 32, "{expiry}");

    let args = &descriptor.arguments;
    assert_eq!(args.len(), 3);
    assert_eq!(deserialize_str(&args[0]).unwrap(), "Board Vote");
    assert_eq!(deserialize_option_u64(&args[1]).unwrap(), Some(1700000000));
    assert_eq!(deserialize_option_u64(&args[2]).unwrap(), Some(1700003600));
}

#[tokio::test]
async fn all_entry_functions() {
    voting_util::test::init_logger("all_entry_functions", "debug");

    let signer = Arc::new(MockSigner::ready(addr("0xb0b")));
    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()))
        .with_signer(signer.clone());

    gateway
        .register_candidate("Alice", "Builders", "ipfs://alice", 4)
        .await
        .unwrap();
    gateway.register_voter(4).await.unwrap();
    gateway.vote(4, 1).await.unwrap();
    gateway.start_election(4, 86400).await.unwrap();
    gateway.end_election(4).await.unwrap();

    let descriptors = signer.descriptors.lock();
    let names = descriptors
        .iter()
        .map(|d| d.function_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, [
        "register_candidate",
        "register_voter",
        "vote",
        "start_election",
        "end_election"
    ]);

    let candidate = &descriptors[0].arguments;
    assert_eq!(deserialize_str(&candidate[1]).unwrap(), "Builders");
    assert_eq!(deserialize_u64(&candidate[3]).unwrap(), 4);

    let vote = &descriptors[2].arguments;
    assert_eq!(deserialize_u64(&vote[0]).unwrap(), 4);
    assert_eq!(deserialize_u64(&vote[1]).unwrap(), 1);

    let start = &descriptors[3].arguments;
    assert_eq!(deserialize_u64(&start[1]).unwrap(), 86400);
}

#[tokio::test]
async fn no_accounts() {
    voting_util::test::init_logger("no_accounts", "debug");

    let signer = Arc::new(MockSigner::default());
    let node = Arc::new(MockNode::failing());
    let gateway = ContractGateway::new(config(), node.clone()).with_signer(signer.clone());

    let err = gateway.register_voter(1).await.unwrap_err();
    assert!(matches!(err, GatewayError::NoAccount), "{err:?}");

    assert_eq!(signer.build_calls.load(Ordering::Relaxed), 0);
    assert_eq!(signer.send_calls.load(Ordering::Relaxed), 0);
    assert!(node.requests.lock().is_empty());
    assert!(!gateway.is_wallet_connected().await);
}

#[tokio::test]
async fn no_wallet() {
    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()));

    let err = gateway.vote(1, 2).await.unwrap_err();
    assert!(matches!(err, GatewayError::WalletUnavailable), "{err:?}");
    assert!(!gateway.is_wallet_connected().await);
    assert_eq!(gateway.connected_address().await, None);
}

#[tokio::test]
async fn wallet_errors() {
    let mut gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()))
        .with_signer(Arc::new(FailingSigner));

    let err = gateway.end_election(1).await.unwrap_err();
    assert!(matches!(err, GatewayError::Signer(_)), "{err:?}");
    assert!(!gateway.is_wallet_connected().await);

    let signer = MockSigner::ready(addr("0x5"));
    assert_eq!(signer.connect().await.unwrap(), [addr("0x5")]);

    gateway.set_signer(Some(Arc::new(signer)));
    assert!(gateway.is_wallet_connected().await);
    assert_eq!(gateway.connected_address().await, Some(addr("0x5")));

    gateway.set_signer(None);
    assert!(!gateway.is_wallet_connected().await);
}

#[tokio::test]
async fn empty_transaction_data() {
    voting_util::test::init_logger("empty_transaction_data", "debug");

    for tx_data in [None, Some(Bytes::new())] {
        let signer = Arc::new(MockSigner {
            tx_data,
            ..MockSigner::ready(addr("0x1"))
        });
        let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()))
            .with_signer(signer.clone());

        let err = gateway.register_voter(1).await.unwrap_err();
        assert!(
            matches!(err, GatewayError::TransactionBuildFailed(_)),
            "{err:?}"
        );
        assert_eq!(signer.build_calls.load(Ordering::Relaxed), 1);
        assert_eq!(signer.send_calls.load(Ordering::Relaxed), 0);
    }
}

#[tokio::test]
async fn empty_transaction_hash() {
    for tx_hash in [None, Some(String::new())] {
        let signer = Arc::new(MockSigner {
            tx_hash,
            ..MockSigner::ready(addr("0x1"))
        });
        let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()))
            .with_signer(signer.clone());

        let err = gateway.start_election(1, 60).await.unwrap_err();
        assert!(
            matches!(err, GatewayError::TransactionBuildFailed(_)),
            "{err:?}"
        );
        assert_eq!(signer.send_calls.load(Ordering::Relaxed), 1);
    }
}

// === Views ===

#[tokio::test]
async fn election_info() {
    voting_util::test::init_logger("election_info", "debug");

    let node = Arc::new(MockNode::returning(json!([
        "Board Vote",
        true,
        { "vec": ["1700000000"] },
        { "vec": [] },
        "12"
    ])));
    let gateway = ContractGateway::new(config(), node.clone());

    let info = gateway.get_election_info(7).await;
    assert_eq!(info, ElectionInfo {
        election_name: "Board Vote".to_owned(),
        is_active: true,
        start_time: 1700000000,
        end_time: 0,
        total_votes: 12,
    });

    let requests = node.requests.lock();
    assert_eq!(requests[0].0, config().function_id("get_election_info"));
    assert_eq!(requests[0].1, ["7"]);
}

#[tokio::test]
async fn election_info_fallback() {
    voting_util::test::init_logger("election_info_fallback", "debug");

    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()));
    assert_eq!(gateway.get_election_info(1).await, ElectionInfo {
        election_name: String::new(),
        is_active: false,
        start_time: 0,
        end_time: 0,
        total_votes: 0,
    });

    // Wrong arity
    let gateway = ContractGateway::new(
        config(),
        Arc::new(MockNode::returning(json!(["Board Vote", true]))),
    );
    assert_eq!(gateway.get_election_info(1).await, ElectionInfo::default());
}

#[tokio::test]
async fn candidates() {
    let node = Arc::new(MockNode::returning(json!([[
        {
            "candidate_id": "1",
            "name": "Alice",
            "candidate_address": "0xa11ce",
            "dao": "Builders",
            "image": "ipfs://alice",
            "votes": "3"
        },
        {
            "candidate_id": "2",
            "name": "Bob",
            "candidate_address": "0xb0b",
            "dao": "Keepers",
            "image": "",
            "votes": 0
        }
    ]])));
    let gateway = ContractGateway::new(config(), node);

    let candidates = gateway.get_all_candidates(3).await;
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].name, "Alice");
    assert_eq!(candidates[0].candidate_address, addr("0xa11ce"));
    assert_eq!(candidates[0].votes, 3);
    assert_eq!(candidates[1].candidate_id, 2);
    assert_eq!(candidates[1].dao, "Keepers");
}

#[tokio::test]
async fn candidates_fallback() {
    voting_util::test::init_logger("candidates_fallback", "debug");

    for result in [
        json!("not an array"),
        json!([{ "name": "Alice" }]),
        json!([[{ "candidate_id": "x" }]]),
    ] {
        let gateway = ContractGateway::new(config(), Arc::new(MockNode::returning(result)));
        assert!(gateway.get_all_candidates(3).await.is_empty());
    }

    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()));
    assert!(gateway.get_all_candidates(3).await.is_empty());
}

#[tokio::test]
async fn winner() {
    let gateway = ContractGateway::new(
        config(),
        Arc::new(MockNode::returning(json!([{ "vec": ["5"] }]))),
    );
    assert_eq!(gateway.get_winner(1).await, ElectionWinner { winner_id: 5 });

    let gateway = ContractGateway::new(
        config(),
        Arc::new(MockNode::returning(json!([{ "vec": [] }]))),
    );
    assert_eq!(gateway.get_winner(1).await, ElectionWinner { winner_id: 0 });

    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()));
    assert_eq!(gateway.get_winner(1).await, ElectionWinner { winner_id: 0 });
}

#[tokio::test]
async fn votes_and_voted() {
    voting_util::test::init_logger("votes_and_voted", "debug");

    let owner = addr("0x2a");
    let candidate = addr("0xa11ce");

    let node = Arc::new(MockNode::returning(json!(["42"])));
    let gateway = ContractGateway::new(config(), node.clone());
    assert_eq!(gateway.get_candidate_votes(&owner, 9, &candidate).await, 42);

    let requests = node.requests.lock();
    assert_eq!(requests[0].0, config().function_id("get_candidate_votes"));
    assert_eq!(requests[0].1, [
        owner.to_string(),
        "9".to_owned(),
        candidate.to_string()
    ]);
    drop(requests);

    let node = Arc::new(MockNode::returning(json!([true])));
    let gateway = ContractGateway::new(config(), node.clone());
    assert!(gateway.has_voter_voted(&owner, 9, &candidate).await);
    assert_eq!(
        node.requests.lock()[0].0,
        config().function_id("has_voter_voted")
    );

    let gateway = ContractGateway::new(config(), Arc::new(MockNode::failing()));
    assert_eq!(gateway.get_candidate_votes(&owner, 9, &candidate).await, 0);
    assert!(!gateway.has_voter_voted(&owner, 9, &candidate).await);

    // Type mismatch
    let gateway = ContractGateway::new(config(), Arc::new(MockNode::returning(json!(["yes"]))));
    assert!(!gateway.has_voter_voted(&owner, 9, &candidate).await);
}
