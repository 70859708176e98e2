//! Per-network deploy parameters

use std::{
    fmt::{self, Display},
    fs,
    path::Path,
};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::info;

use crate::{
    constants::TOKENS_TO_MINT,
    errors::ScriptError,
    types::{Address, TokenAmount},
};

/// The networks with compiled-in deploy parameters
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// The public Tezos test network
    Testnet,
    /// A local flextesa sandbox
    Sandbox,
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// A vesting vault to originate for a single beneficiary
#[derive(Clone, Debug, Deserialize)]
pub struct VestingContract {
    /// The owner of the vault, who may withdraw vested tokens
    pub owner: Address,
    /// The amount that becomes available each block
    pub amount_per_block: TokenAmount,
    /// The block vesting starts on
    pub vesting_start_block: u64,
    /// The amount of tokens moved into the vault
    pub amount: TokenAmount,
}

/// Everything the deployment needs to know about its target network.
///
/// Token amounts are held in base units. When parsed from a file, they are
/// given as whole-token decimal strings.
#[derive(Clone, Debug, Deserialize)]
pub struct DeployParams {
    /// A label for the target network, recorded in the deployments file
    pub network: String,
    /// The node to deploy to
    pub node_address: String,
    /// The amount minted to the deployer before distribution
    pub tokens_to_mint: TokenAmount,
    /// The amount moved to the faucet
    pub faucet_amount: TokenAmount,
    /// The maximum drip size of the faucet
    pub max_faucet_drip_size: TokenAmount,
    /// The amount moved to the airdrop address
    pub airdrop_amount: TokenAmount,
    /// The address receiving the airdropped tokens
    pub airdrop_address: Address,
    /// Vesting vaults to originate and fund
    pub vesting_contracts: Vec<VestingContract>,
    /// The amount to escrow for proposals
    pub escrow_amount: TokenAmount,
    /// The delay of blocks from when a proposal is submitted to when voting starts
    pub vote_delay_blocks: u64,
    /// How long a vote lasts
    pub vote_length_blocks: u64,
    /// The minimum percentage of yay votes for escrow to be returned
    pub min_yay_votes_percent_for_escrow_return: u64,
    /// The length of the timelock
    pub blocks_in_timelock_for_execution: u64,
    /// The minimum number of blocks before anyone can cancel a timelock
    pub blocks_in_timelock_for_cancellation: u64,
    /// The percentage of yay votes for a super majority
    pub percentage_for_super_majority: u64,
    /// The initial quorum
    pub quorum: TokenAmount,
    /// The upper bound the quorum can move to
    pub upper_quorum_cap: TokenAmount,
    /// The lower bound the quorum can move to
    pub lower_quorum_cap: TokenAmount,
    /// The governor of the community fund and administrator of the token
    pub governor_address: Address,
}

/// Parses an address literal from the compiled-in parameters
fn addr(s: &str) -> Result<Address, ScriptError> {
    s.parse()
}

impl DeployParams {
    /// The compiled-in parameters of the given network
    pub fn for_network(network: Network) -> Result<Self, ScriptError> {
        match network {
            Network::Testnet => Self::testnet(),
            Network::Sandbox => Self::sandbox(),
        }
    }

    /// Parameters for the public test network
    pub fn testnet() -> Result<Self, ScriptError> {
        Ok(DeployParams {
            network: Network::Testnet.to_string(),
            node_address: "https://rpctest.tzbeta.net".to_string(),
            tokens_to_mint: TokenAmount::from_tokens(TOKENS_TO_MINT),
            vesting_contracts: vec![
                VestingContract {
                    owner: addr("tz1YfB2H1NoZVUq4heHqrVX4oVp99yz8gwNq")?,
                    amount_per_block: TokenAmount::from_tokens(2),
                    vesting_start_block: 170_800,
                    amount: TokenAmount::from_tokens(10_000),
                },
                VestingContract {
                    owner: addr("tz1QM9J63wfTrGW7HLotr7Kshy8q8LhdorJe")?,
                    amount_per_block: TokenAmount::from_tokens(3),
                    vesting_start_block: 170_900,
                    amount: TokenAmount::from_tokens(10_000),
                },
                VestingContract {
                    owner: addr("tz1YvwHP7TDbAMWf2sFZ5AzjRPe4GyA7Fc46")?,
                    amount_per_block: TokenAmount::from_tokens(4),
                    vesting_start_block: 171_000,
                    amount: TokenAmount::from_tokens(10_000),
                },
            ],
            faucet_amount: TokenAmount::from_tokens(100_000),
            max_faucet_drip_size: TokenAmount::from_tokens(100),
            airdrop_amount: TokenAmount::from_tokens(200_000),
            airdrop_address: addr("tz1KoLibimdjUSfhrSpXwx4FhhhCq1JM5Etk")?,
            escrow_amount: TokenAmount::from_tokens(100),
            vote_delay_blocks: 1,
            vote_length_blocks: 480,
            min_yay_votes_percent_for_escrow_return: 20,
            blocks_in_timelock_for_execution: 120,
            blocks_in_timelock_for_cancellation: 240,
            percentage_for_super_majority: 80,
            quorum: TokenAmount::from_tokens(2_000),
            upper_quorum_cap: TokenAmount::from_tokens(900_000),
            lower_quorum_cap: TokenAmount::from_tokens(10_000),
            governor_address: addr("tz1hoverof3f2F8NAavUyTjbFBstZXTqnUMS")?,
        })
    }

    /// Parameters for a local flextesa sandbox, using its bootstrap accounts
    /// and governance timings short enough to exercise by hand
    pub fn sandbox() -> Result<Self, ScriptError> {
        let alice = addr("tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb")?;
        let bob = addr("tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6")?;

        Ok(DeployParams {
            network: Network::Sandbox.to_string(),
            node_address: "http://localhost:20000".to_string(),
            tokens_to_mint: TokenAmount::from_tokens(TOKENS_TO_MINT),
            vesting_contracts: vec![VestingContract {
                owner: bob.clone(),
                amount_per_block: TokenAmount::from_tokens(1),
                vesting_start_block: 10,
                amount: TokenAmount::from_tokens(10_000),
            }],
            faucet_amount: TokenAmount::from_tokens(100_000),
            max_faucet_drip_size: TokenAmount::from_tokens(100),
            airdrop_amount: TokenAmount::from_tokens(200_000),
            airdrop_address: bob,
            escrow_amount: TokenAmount::from_tokens(100),
            vote_delay_blocks: 1,
            vote_length_blocks: 10,
            min_yay_votes_percent_for_escrow_return: 20,
            blocks_in_timelock_for_execution: 5,
            blocks_in_timelock_for_cancellation: 10,
            percentage_for_super_majority: 80,
            quorum: TokenAmount::from_tokens(2_000),
            upper_quorum_cap: TokenAmount::from_tokens(900_000),
            lower_quorum_cap: TokenAmount::from_tokens(1_000),
            governor_address: alice,
        })
    }

    /// Reads parameters from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadParams(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ReadParams(format!("{}: {}", path.display(), e)))
    }

    /// The total amount moved into vesting vaults
    pub fn total_vested(&self) -> TokenAmount {
        self.vesting_contracts.iter().map(|vesting| &vesting.amount).sum()
    }

    /// The amount left for the community fund once the vesting vaults, the
    /// faucet and the airdrop have been funded
    pub fn community_fund_allocation(&self) -> Result<TokenAmount, ScriptError> {
        let allocated: TokenAmount = [
            self.total_vested(),
            self.faucet_amount.clone(),
            self.airdrop_amount.clone(),
        ]
        .iter()
        .sum();

        self.tokens_to_mint.checked_sub(&allocated).ok_or_else(|| {
            ScriptError::InvalidParams(format!(
                "allocations of {} exceed the {} tokens minted",
                allocated, self.tokens_to_mint
            ))
        })
    }

    /// Checks the parameters for inconsistencies the contracts would not catch
    pub fn validate(&self) -> Result<(), ScriptError> {
        self.community_fund_allocation()?;

        if self.lower_quorum_cap > self.upper_quorum_cap {
            return Err(ScriptError::InvalidParams(format!(
                "lower quorum cap {} is above upper quorum cap {}",
                self.lower_quorum_cap, self.upper_quorum_cap
            )));
        }

        for (name, percentage) in [
            (
                "min yay votes percent for escrow return",
                self.min_yay_votes_percent_for_escrow_return,
            ),
            (
                "percentage for super majority",
                self.percentage_for_super_majority,
            ),
        ] {
            if percentage > 100 {
                return Err(ScriptError::InvalidParams(format!(
                    "{name} is {percentage}, above 100"
                )));
            }
        }

        Ok(())
    }

    /// Logs the parameters for the operator to review
    pub fn log_summary(&self) {
        info!("Network: {}", self.network);
        info!("Tezos Node: {}", self.node_address);
        info!("Tokens to Mint: {}", self.tokens_to_mint);
        info!("Faucet Amount: {}", self.faucet_amount);
        info!("Airdrop Amount: {}", self.airdrop_amount);
        info!("Airdrop Address: {}", self.airdrop_address);
        info!("Escrow Amount: {}", self.escrow_amount);
        info!("Vote Delay Blocks: {}", self.vote_delay_blocks);
        info!("Vote Length Blocks: {}", self.vote_length_blocks);
        info!(
            "Minimum Yay Percentage to Return Escrow: {}",
            self.min_yay_votes_percent_for_escrow_return
        );
        info!("Initial Quorum: {}", self.quorum);
        info!("Timelock Blocks: {}", self.blocks_in_timelock_for_execution);
        info!(
            "Blocks Before Timelock Can Be Cancelled: {}",
            self.blocks_in_timelock_for_cancellation
        );
        info!(
            "Percent for Super Majority: {}",
            self.percentage_for_super_majority
        );
        info!(
            "Quorum Caps: [{}, {}]",
            self.lower_quorum_cap, self.upper_quorum_cap
        );
        info!("Faucet Max Drip Size: {}", self.max_faucet_drip_size);
        info!("Governor Address: {}", self.governor_address);
        info!("Vesting Contracts:");
        for vesting in &self.vesting_contracts {
            info!(
                "> {}: {} ({} per block from block {})",
                vesting.owner, vesting.amount, vesting.amount_per_block, vesting.vesting_start_block
            );
        }
    }
}
