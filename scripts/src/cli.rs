//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, show_params},
    config::Network,
    constants::{
        DEFAULT_CONTRACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_OCTEZ_CLIENT,
        DEPLOYER_KEY_ENV_VAR,
    },
    errors::ScriptError,
};

/// Deploys the Murmuration governance contracts to a Tezos network
#[derive(Parser)]
#[command(name = "murmuration-deploy")]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands the scripts support
#[derive(Subcommand)]
pub enum Command {
    /// Originate, wire and fund every contract of a deployment
    Deploy(DeployArgs),
    /// Log the resolved deploy parameters without contacting a node
    ShowParams(ParamsArgs),
}

impl Command {
    /// Runs the command
    pub async fn run(self) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args).await,
            Command::ShowParams(args) => show_params(args),
        }
    }
}

/// Selects the deploy parameters
#[derive(Args, Clone, Debug)]
pub struct ParamsArgs {
    /// The network whose compiled-in parameters to use
    #[arg(short, long, value_enum, default_value_t = Network::Testnet)]
    pub network: Network,

    /// A JSON file of parameters, used instead of a compiled-in network
    #[arg(short, long, conflicts_with = "network")]
    pub params_file: Option<PathBuf>,

    /// Node RPC URL, overriding the one in the parameters
    #[arg(short, long)]
    pub rpc_url: Option<String>,
}

/// Deploy every contract of the governance system.
///
/// The deployer's secret key is imported into the Octez client unencrypted,
/// under a fixed alias.
#[derive(Args, Clone, Debug)]
pub struct DeployArgs {
    /// The deploy parameters
    #[command(flatten)]
    pub params: ParamsArgs,

    /// Secret key of the deployer
    #[arg(long, env = DEPLOYER_KEY_ENV_VAR, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Directory holding the compiled Michelson contracts
    #[arg(short, long, default_value = DEFAULT_CONTRACTS_DIR)]
    pub contracts_dir: PathBuf,

    /// File recording the completed steps of the deployment
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Continue the deployment recorded in the deployments file
    #[arg(long)]
    pub resume: bool,

    /// The Octez client binary
    #[arg(long, default_value = DEFAULT_OCTEZ_CLIENT)]
    pub octez_client: PathBuf,

    /// The Octez client's data directory
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
}
