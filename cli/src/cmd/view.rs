use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use voting_codec::view::{ViewFunction, ViewResult};
use voting_core::{AccountAddress, ContractGateway, HttpNodeClient, NodeClient};

use crate::BaseArgs;
use crate::util::{print_json, rt};

/// Call contract view functions.
///
/// Failed calls print empty values, use `raw` to see the actual error.
#[derive(Parser)]
pub struct Cmd {
    #[clap(subcommand)]
    cmd: SubCmd,
}

impl Cmd {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        match self.cmd {
            SubCmd::ElectionInfo(cmd) => cmd.run(args),
            SubCmd::Winner(cmd) => cmd.run(args),
            SubCmd::Candidates(cmd) => cmd.run(args),
            SubCmd::CandidateVotes(cmd) => cmd.run(args),
            SubCmd::HasVoted(cmd) => cmd.run(args),
            SubCmd::Raw(cmd) => cmd.run(args),
        }
    }
}

#[derive(Subcommand)]
enum SubCmd {
    ElectionInfo(CmdElectionInfo),
    Winner(CmdWinner),
    Candidates(CmdCandidates),
    CandidateVotes(CmdCandidateVotes),
    HasVoted(CmdHasVoted),
    Raw(CmdRaw),
}

/// Get election summary.
#[derive(Parser)]
struct CmdElectionInfo {
    election_id: u64,
}

impl CmdElectionInfo {
    fn run(self, args: BaseArgs) -> Result<()> {
        let gateway = args.gateway()?;
        rt(async move { print_json(gateway.get_election_info(self.election_id).await) })
    }
}

/// Get election winner id (`0` if there is none yet).
#[derive(Parser)]
struct CmdWinner {
    election_id: u64,
}

impl CmdWinner {
    fn run(self, args: BaseArgs) -> Result<()> {
        let gateway = args.gateway()?;
        rt(async move { print_json(gateway.get_winner(self.election_id).await) })
    }
}

/// List all election candidates.
#[derive(Parser)]
struct CmdCandidates {
    election_id: u64,
}

impl CmdCandidates {
    fn run(self, args: BaseArgs) -> Result<()> {
        let gateway = args.gateway()?;
        rt(async move { print_json(gateway.get_all_candidates(self.election_id).await) })
    }
}

#[derive(Clone, Args)]
struct AccountArgs {
    election_id: u64,

    /// Account the election is stored under. Default: the contract address.
    #[clap(long)]
    owner: Option<AccountAddress>,
}

impl AccountArgs {
    fn owner(&self, gateway: &ContractGateway) -> AccountAddress {
        self.owner.unwrap_or(gateway.config().contract_address)
    }
}

/// Get candidate vote count.
#[derive(Parser)]
struct CmdCandidateVotes {
    #[clap(flatten)]
    account: AccountArgs,

    candidate: AccountAddress,
}

impl CmdCandidateVotes {
    fn run(self, args: BaseArgs) -> Result<()> {
        let gateway = args.gateway()?;
        let owner = self.account.owner(&gateway);
        rt(async move {
            let votes = gateway
                .get_candidate_votes(&owner, self.account.election_id, &self.candidate)
                .await;
            print_json(serde_json::json!({ "votes": votes }))
        })
    }
}

/// Check whether the voter has already voted.
#[derive(Parser)]
struct CmdHasVoted {
    #[clap(flatten)]
    account: AccountArgs,

    voter: AccountAddress,
}

impl CmdHasVoted {
    fn run(self, args: BaseArgs) -> Result<()> {
        let gateway = args.gateway()?;
        let owner = self.account.owner(&gateway);
        rt(async move {
            let voted = gateway
                .has_voter_voted(&owner, self.account.election_id, &self.voter)
                .await;
            print_json(serde_json::json!({ "voted": voted }))
        })
    }
}

/// Call a view function directly and fail on any error.
#[derive(Parser)]
struct CmdRaw {
    /// View function name (e.g. `get_election_info`).
    function: ViewFunction,

    /// Function arguments as they are passed to the node.
    arguments: Vec<String>,
}

impl CmdRaw {
    fn run(self, args: BaseArgs) -> Result<()> {
        let config = args.load_config()?;
        let node = HttpNodeClient::new(&config.node_url)?;
        let function_id = config.function_id(self.function.name());

        rt(async move {
            let result = node
                .invoke_view(&function_id, &[], &self.arguments)
                .await
                .with_context(|| format!("failed to call `{function_id}`"))?;

            let result = ViewResult::decode(self.function, &result)?;
            print_json(result)
        })
    }
}
