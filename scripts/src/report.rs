//! The summary printed once a deployment completes

use std::fmt::{self, Display};

use crate::types::{Address, ContractOriginationResult};

/// A vesting vault created for a single beneficiary
#[derive(Clone, Debug)]
pub struct VestingVaultDeployment {
    /// The beneficiary of the vault
    pub owner: Address,
    /// The origination of the vault
    pub vault: ContractOriginationResult,
    /// The hash of the transfer funding the vault
    pub transfer_hash: String,
}

/// Everything a deployment produced
#[derive(Clone, Debug)]
pub struct DeploymentReport {
    /// The network deployed to
    pub network: String,
    /// The address that signed every operation
    pub deployer: Address,
    /// The governance token
    pub token: ContractOriginationResult,
    /// The community fund
    pub community_fund: ContractOriginationResult,
    /// The DAO
    pub dao: ContractOriginationResult,
    /// The faucet
    pub faucet: ContractOriginationResult,
    /// The vesting vaults, in the order they were configured
    pub vesting_vaults: Vec<VestingVaultDeployment>,
    /// The number of operations issued by this run
    pub operations_issued: usize,
    /// The number of steps recorded by an earlier run
    pub steps_skipped: usize,
}

/// Writes one line naming a deployed contract
fn write_contract(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    result: &ContractOriginationResult,
) -> fmt::Result {
    writeln!(
        f,
        "{}: {} ({})",
        name, result.contract_address, result.operation_hash
    )
}

impl Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------------------------")?;
        writeln!(f, "Deployment to {} complete", self.network)?;
        writeln!(f, "Deployer: {}", self.deployer)?;
        writeln!(f, "----------------------------------")?;
        write_contract(f, "Token Contract", &self.token)?;
        write_contract(f, "Community Fund", &self.community_fund)?;
        write_contract(f, "DAO", &self.dao)?;
        write_contract(f, "Faucet", &self.faucet)?;

        writeln!(f, "Vesting Contracts:")?;
        if self.vesting_vaults.is_empty() {
            writeln!(f, "> none")?;
        }
        for vesting in &self.vesting_vaults {
            writeln!(
                f,
                "> {}: {} ({}, funded in {})",
                vesting.owner,
                vesting.vault.contract_address,
                vesting.vault.operation_hash,
                vesting.transfer_hash
            )?;
        }

        writeln!(f, "----------------------------------")?;
        write!(f, "Operations issued: {}", self.operations_issued)?;
        if self.steps_skipped > 0 {
            write!(f, " ({} steps already completed)", self.steps_skipped)?;
        }
        Ok(())
    }
}
