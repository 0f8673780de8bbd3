use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use voting_core::{AccountAddress, ContractGateway, GatewayConfig, HttpNodeClient};

mod cmd {
    pub mod codec;
    pub mod prepare;
    pub mod view;
}

mod util;

fn main() -> ExitCode {
    match App::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

/// On-chain voting client
#[derive(Parser)]
#[clap(name = "voting")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(subcommand_required = true, arg_required_else_help = true)]
struct App {
    #[clap(flatten)]
    args: BaseArgs,

    #[clap(subcommand)]
    cmd: Cmd,
}

impl App {
    fn run(self) -> Result<()> {
        self.args.init_logger()?;
        self.cmd.run(self.args)
    }
}

#[derive(Subcommand)]
enum Cmd {
    View(cmd::view::Cmd),

    Prepare(cmd::prepare::Cmd),

    Codec(cmd::codec::Cmd),
}

impl Cmd {
    fn run(self, args: BaseArgs) -> Result<()> {
        match self {
            Cmd::View(cmd) => cmd.run(args),
            Cmd::Prepare(cmd) => cmd.run(args),
            Cmd::Codec(cmd) => cmd.run(),
        }
    }
}

#[derive(Clone, Args)]
struct BaseArgs {
    /// Path to the gateway config.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node RPC url. Overrides the config value.
    #[clap(long, global = true)]
    node_url: Option<String>,

    /// Voting module address. Overrides the config value.
    #[clap(long, global = true)]
    contract: Option<AccountAddress>,

    /// Voting module name. Overrides the config value.
    #[clap(long, global = true)]
    module: Option<String>,

    /// Transaction lifetime. Overrides the config value.
    #[clap(long, global = true, value_parser = humantime::parse_duration)]
    tx_expiry: Option<Duration>,

    /// Path to the logger targets config.
    #[clap(long, global = true)]
    logger_config: Option<PathBuf>,
}

impl BaseArgs {
    fn init_logger(&self) -> Result<()> {
        voting_util::cli::logger::init_logger("info", self.logger_config.as_deref())
    }

    fn load_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => {
                let contract = self
                    .contract
                    .context("either `--config` or `--contract` must be specified")?;
                let module = self
                    .module
                    .clone()
                    .context("either `--config` or `--module` must be specified")?;
                GatewayConfig::new(contract, module)
            }
        };

        if let Some(node_url) = &self.node_url {
            config.node_url.clone_from(node_url);
        }
        if let Some(contract) = self.contract {
            config.contract_address = contract;
        }
        if let Some(module) = &self.module {
            config.module_name.clone_from(module);
        }
        if let Some(tx_expiry) = self.tx_expiry {
            config.tx_expiry = tx_expiry;
        }

        tracing::debug!(?config, "loaded gateway config");
        Ok(config)
    }

    fn gateway(&self) -> Result<ContractGateway> {
        let config = self.load_config()?;
        let node = HttpNodeClient::new(&config.node_url)?;
        Ok(ContractGateway::new(config, Arc::new(node)))
    }
}
