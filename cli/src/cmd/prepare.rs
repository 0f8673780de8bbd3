use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use voting_core::{AccountAddress, TxCall};

use crate::BaseArgs;
use crate::util::print_json;

/// Build an unsigned transaction descriptor for an external wallet.
#[derive(Parser)]
pub struct Cmd {
    #[clap(subcommand)]
    cmd: SubCmd,
}

impl Cmd {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        let (sender, call) = match self.cmd {
            SubCmd::CreateElection(cmd) => (cmd.tx.sender, cmd.into_call()),
            SubCmd::RegisterCandidate(cmd) => (cmd.tx.sender, cmd.into_call()),
            SubCmd::RegisterVoter(cmd) => (cmd.tx.sender, cmd.into_call()),
            SubCmd::Vote(cmd) => (cmd.tx.sender, cmd.into_call()),
            SubCmd::StartElection(cmd) => (cmd.tx.sender, cmd.into_call()),
            SubCmd::EndElection(cmd) => (cmd.tx.sender, cmd.into_call()),
        };

        let gateway = args.gateway()?;
        print_json(gateway.prepare_transaction(sender, call))
    }
}

#[derive(Subcommand)]
enum SubCmd {
    CreateElection(CmdCreateElection),
    RegisterCandidate(CmdRegisterCandidate),
    RegisterVoter(CmdRegisterVoter),
    Vote(CmdVote),
    StartElection(CmdStartElection),
    EndElection(CmdEndElection),
}

#[derive(Clone, Args)]
struct TxArgs {
    /// Transaction sender address.
    #[clap(long)]
    sender: AccountAddress,
}

/// Create a new election.
#[derive(Parser)]
struct CmdCreateElection {
    #[clap(flatten)]
    tx: TxArgs,

    name: String,

    /// Unix timestamp in seconds.
    #[clap(long)]
    start_time: Option<u64>,

    /// Unix timestamp in seconds.
    #[clap(long)]
    end_time: Option<u64>,
}

impl CmdCreateElection {
    fn into_call(self) -> TxCall {
        TxCall::create_election(&self.name, self.start_time, self.end_time)
    }
}

/// Register a candidate in the election.
#[derive(Parser)]
struct CmdRegisterCandidate {
    #[clap(flatten)]
    tx: TxArgs,

    election_id: u64,

    name: String,

    #[clap(long, default_value_t)]
    dao: String,

    /// Candidate image URI.
    #[clap(long, default_value_t)]
    image: String,
}

impl CmdRegisterCandidate {
    fn into_call(self) -> TxCall {
        TxCall::register_candidate(&self.name, &self.dao, &self.image, self.election_id)
    }
}

/// Register the sender as a voter.
#[derive(Parser)]
struct CmdRegisterVoter {
    #[clap(flatten)]
    tx: TxArgs,

    election_id: u64,
}

impl CmdRegisterVoter {
    fn into_call(self) -> TxCall {
        TxCall::register_voter(self.election_id)
    }
}

/// Vote for a candidate.
#[derive(Parser)]
struct CmdVote {
    #[clap(flatten)]
    tx: TxArgs,

    election_id: u64,

    candidate_id: u64,
}

impl CmdVote {
    fn into_call(self) -> TxCall {
        TxCall::vote(self.election_id, self.candidate_id)
    }
}

/// Start the election.
#[derive(Parser)]
struct CmdStartElection {
    #[clap(flatten)]
    tx: TxArgs,

    election_id: u64,

    /// Voting period (e.g. `3d`, `12h`).
    #[clap(long, value_parser = humantime::parse_duration)]
    duration: Duration,
}

impl CmdStartElection {
    fn into_call(self) -> TxCall {
        TxCall::start_election(self.election_id, self.duration.as_secs())
    }
}

/// End the election.
#[derive(Parser)]
struct CmdEndElection {
    #[clap(flatten)]
    tx: TxArgs,

    election_id: u64,
}

impl CmdEndElection {
    fn into_call(self) -> TxCall {
        TxCall::end_election(self.election_id)
    }
}
