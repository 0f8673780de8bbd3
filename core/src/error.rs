pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("wallet signer not found, install and connect a wallet")]
    WalletUnavailable,
    #[error("no wallet accounts connected")]
    NoAccount,
    #[error("failed to build transaction: {0}")]
    TransactionBuildFailed(&'static str),
    #[error("wallet signer error")]
    Signer(#[source] anyhow::Error),
    #[error("node request failed")]
    Node(#[source] anyhow::Error),
    #[error("failed to decode contract data")]
    Decode(#[from] voting_codec::Error),
}
