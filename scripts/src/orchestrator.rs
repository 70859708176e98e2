//! Sequences the full deployment: originating every contract, minting and
//! locking the supply, handing governance to the governor, and distributing
//! the minted tokens.
//!
//! Every operation is signed by the same deployer, so each one is issued with
//! the next counter in sequence and the pipeline never overlaps operations.
//!
//! A step is marked pending in the ledger with its counter before it is
//! submitted. A step whose counter the node has used without the client
//! reporting success is never reissued: the run stops so the operator can
//! check the chain.

use tracing::info;

use crate::{
    client::{InvocationRequest, OperationClient, OriginationRequest},
    config::DeployParams,
    errors::{ClientError, ScriptError},
    ledger::DeploymentLedger,
    michelson::MichelsonValue,
    report::{DeploymentReport, VestingVaultDeployment},
    retry::{retry_with_backoff, submit_with_retry, RetryPolicy},
    storage::{
        community_fund_storage, dao_storage, faucet_storage, mint_param, set_administrator_param,
        set_governor_param, token_storage, transfer_param, vesting_vault_storage,
    },
    types::{
        Address, ContractKind, ContractOriginationResult, ContractSources, Deployer, TokenAmount,
    },
};

/// The number of operations a deployment issues regardless of how many
/// vesting vaults it creates
pub const FIXED_OPERATION_COUNT: usize = 11;

// -------------
// | STEP KEYS |
// -------------

/// The token origination
const TOKEN_STEP: &str = "token_contract";
/// The community fund origination
const COMMUNITY_FUND_STEP: &str = "community_fund_contract";
/// The DAO origination
const DAO_STEP: &str = "dao_contract";
/// The faucet origination
const FAUCET_STEP: &str = "faucet_contract";
/// Minting the supply to the deployer
const MINT_STEP: &str = "mint";
/// Locking the supply
const DISABLE_MINTING_STEP: &str = "disable_minting";
/// Handing the community fund to the governor
const SET_GOVERNOR_STEP: &str = "set_community_fund_governor";
/// Handing the token to the governor
const SET_ADMINISTRATOR_STEP: &str = "set_token_administrator";
/// Funding the faucet
const FAUCET_TRANSFER_STEP: &str = "faucet_transfer";
/// Funding the airdrop
const AIRDROP_TRANSFER_STEP: &str = "airdrop_transfer";
/// Moving the remainder to the community fund
const COMMUNITY_FUND_TRANSFER_STEP: &str = "community_fund_transfer";

/// The origination of the vesting vault at `index`
fn vesting_vault_step(index: usize) -> String {
    format!("vesting_vault_{index}")
}

/// The funding of the vesting vault at `index`
fn vesting_transfer_step(index: usize) -> String {
    format!("vesting_transfer_{index}")
}

/// The error stopping a run at a step submitted with `counter` whose outcome
/// is unknown
fn unconfirmed(step: &str, counter: u64) -> ScriptError {
    ScriptError::UnconfirmedOperation(format!(
        "{step} was submitted with counter {counter}, which the node has used. Find the \
         deployer's operation with that counter and, if it applied {step}, record it under \
         steps.{step} of the deployments file before resuming"
    ))
}

/// Maps a failed submission of `step`, stopping for the operator when the
/// node reports the step's own counter as used
fn submission_error(
    step: &str,
    error: ClientError,
    wrap: impl FnOnce(ClientError) -> ScriptError,
) -> ScriptError {
    match error {
        ClientError::CounterMismatch { expected, found } if found == expected + 1 => {
            unconfirmed(step, expected)
        }
        e => wrap(e),
    }
}

/// The number of operations a fresh deployment with `num_vesting_contracts`
/// vesting vaults issues
pub fn expected_operation_count(num_vesting_contracts: usize) -> usize {
    FIXED_OPERATION_COUNT + 2 * num_vesting_contracts
}

/// Returns the deployer's secret key, rejecting a missing or blank one
pub fn require_deployer_key(secret_key: Option<&str>) -> Result<&str, ScriptError> {
    match secret_key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ScriptError::MissingDeployerKey),
    }
}

/// Drives a deployment through an [`OperationClient`]
pub struct DeploymentOrchestrator<'a, C: OperationClient> {
    /// The client signing and broadcasting operations
    client: &'a C,
    /// The parameters of the deployment
    params: &'a DeployParams,
    /// The Michelson sources of the contracts
    contracts: &'a ContractSources,
    /// The record of completed steps
    ledger: DeploymentLedger,
    /// How failed operations are resubmitted
    retry_policy: RetryPolicy,
}

impl<'a, C: OperationClient> DeploymentOrchestrator<'a, C> {
    /// Creates an orchestrator with the default retry policy
    pub fn new(
        client: &'a C,
        params: &'a DeployParams,
        contracts: &'a ContractSources,
        ledger: DeploymentLedger,
    ) -> Self {
        DeploymentOrchestrator {
            client,
            params,
            contracts,
            ledger,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy
    #[cfg(test)]
    pub(crate) fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Runs the deployment, skipping any step the ledger already records.
    ///
    /// Nothing is sent to the node until the secret key is present and the
    /// parameters are consistent. The first failing step aborts the run.
    pub async fn run(self, secret_key: Option<&str>) -> Result<DeploymentReport, ScriptError> {
        let secret_key = require_deployer_key(secret_key)?;
        self.params.validate()?;
        let remainder = self.params.community_fund_allocation()?;

        let endpoint = self.params.node_address.as_str();
        let deployer = retry_with_backoff(&self.retry_policy, "importing deployer", || {
            self.client.import_deployer(secret_key, endpoint)
        })
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        info!("Deploying from {}", deployer.address);

        // A reveal consumes a counter, so it must land before the counter is read
        let revealed = submit_with_retry(&self.retry_policy, "revealing deployer", || {
            self.client.reveal_deployer(&deployer, endpoint)
        })
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
        if revealed {
            info!("Revealed the public key of {}", deployer.address);
        }

        let counter = retry_with_backoff(&self.retry_policy, "fetching counter", || {
            self.client.fetch_counter(&deployer.address, endpoint)
        })
        .await
        .map_err(|e| ScriptError::CounterFetching(e.to_string()))?;
        info!("Deployer counter is {}", counter);

        let mut ledger = self.ledger;
        ledger.bind(&self.params.network, &deployer.address)?;

        let mut run = DeploymentRun {
            client: self.client,
            params: self.params,
            contracts: self.contracts,
            retry_policy: &self.retry_policy,
            ledger,
            deployer,
            counter,
            operations_issued: 0,
            steps_skipped: 0,
        };

        run.execute(remainder).await
    }
}

/// The state of a deployment once the deployer is known
struct DeploymentRun<'a, C: OperationClient> {
    /// The client signing and broadcasting operations
    client: &'a C,
    /// The parameters of the deployment
    params: &'a DeployParams,
    /// The locations of the contract sources
    contracts: &'a ContractSources,
    /// How failed operations are resubmitted
    retry_policy: &'a RetryPolicy,
    /// The record of pending and completed steps
    ledger: DeploymentLedger,
    /// The identity signing every operation
    deployer: Deployer,
    /// The counter of the last operation issued
    counter: u64,
    /// The number of operations issued by this run
    operations_issued: usize,
    /// The number of steps skipped because the ledger records them
    steps_skipped: usize,
}

impl<'a, C: OperationClient> DeploymentRun<'a, C> {
    /// Runs every step in order and reports the deployed contracts
    async fn execute(
        &mut self,
        community_fund_allocation: TokenAmount,
    ) -> Result<DeploymentReport, ScriptError> {
        let params = self.params;
        let deployer_address = self.deployer.address.clone();

        info!(">>> [1/4] Deploying Token Contract");
        let token = self
            .originate(TOKEN_STEP, ContractKind::Token, token_storage(&deployer_address))
            .await?;
        let token_address = &token.contract_address;

        info!(">>> [2/4] Deploying Community Fund");
        let community_fund = self
            .originate(
                COMMUNITY_FUND_STEP,
                ContractKind::CommunityFund,
                community_fund_storage(&deployer_address, token_address),
            )
            .await?;

        info!(">>> [3/4] Deploying DAO");
        let dao = self
            .originate(
                DAO_STEP,
                ContractKind::Dao,
                dao_storage(params, &community_fund.contract_address, token_address),
            )
            .await?;

        info!(">>> [4/4] Deploying Faucet");
        let faucet = self
            .originate(
                FAUCET_STEP,
                ContractKind::Faucet,
                faucet_storage(&params.max_faucet_drip_size, token_address),
            )
            .await?;

        info!(">>> Minting Tokens");
        self.invoke(
            MINT_STEP,
            token_address,
            "mint",
            mint_param(&deployer_address, &params.tokens_to_mint),
        )
        .await?;
        self.invoke(
            DISABLE_MINTING_STEP,
            token_address,
            "disableMinting",
            MichelsonValue::Unit,
        )
        .await?;

        info!(">>> Handing Governance to {}", params.governor_address);
        // The handoff names the configured governor rather than the deployer
        self.invoke(
            SET_GOVERNOR_STEP,
            &community_fund.contract_address,
            "setGovernorContract",
            set_governor_param(&params.governor_address),
        )
        .await?;
        self.invoke(
            SET_ADMINISTRATOR_STEP,
            token_address,
            "setAdministrator",
            set_administrator_param(&params.governor_address),
        )
        .await?;

        info!(
            ">>> Deploying {} Vesting Contracts",
            params.vesting_contracts.len()
        );
        let mut vesting_vaults = Vec::with_capacity(params.vesting_contracts.len());
        for (i, vesting) in params.vesting_contracts.iter().enumerate() {
            info!(
                "> [{}/{}] Vesting {} tokens for {}",
                i + 1,
                params.vesting_contracts.len(),
                vesting.amount,
                vesting.owner
            );
            let vault = self
                .originate(
                    &vesting_vault_step(i),
                    ContractKind::VestingVault,
                    vesting_vault_storage(
                        vesting,
                        &dao.contract_address,
                        &deployer_address,
                        token_address,
                    ),
                )
                .await?;
            let transfer_hash = self
                .invoke(
                    &vesting_transfer_step(i),
                    token_address,
                    "transfer",
                    transfer_param(&deployer_address, &vault.contract_address, &vesting.amount),
                )
                .await?;

            vesting_vaults.push(VestingVaultDeployment {
                owner: vesting.owner.clone(),
                vault,
                transfer_hash,
            });
        }

        info!(">>> Distributing Tokens");
        self.invoke(
            FAUCET_TRANSFER_STEP,
            token_address,
            "transfer",
            transfer_param(
                &deployer_address,
                &faucet.contract_address,
                &params.faucet_amount,
            ),
        )
        .await?;
        self.invoke(
            AIRDROP_TRANSFER_STEP,
            token_address,
            "transfer",
            transfer_param(
                &deployer_address,
                &params.airdrop_address,
                &params.airdrop_amount,
            ),
        )
        .await?;
        info!(
            "Moving remaining {} to the community fund",
            community_fund_allocation
        );
        self.invoke(
            COMMUNITY_FUND_TRANSFER_STEP,
            token_address,
            "transfer",
            transfer_param(
                &deployer_address,
                &community_fund.contract_address,
                &community_fund_allocation,
            ),
        )
        .await?;

        Ok(DeploymentReport {
            network: params.network.clone(),
            deployer: deployer_address,
            token,
            community_fund,
            dao,
            faucet,
            vesting_vaults,
            operations_issued: self.operations_issued,
            steps_skipped: self.steps_skipped,
        })
    }

    /// Reserves the counter of the next operation
    fn next_counter(&mut self) -> u64 {
        self.counter += 1;
        self.operations_issued += 1;
        self.counter
    }

    /// Reserves the counter of `step` and marks the step pending with it.
    ///
    /// Fails if a previous run left the step pending with a counter the node
    /// has used since, as the step may already be applied.
    fn reserve(&mut self, step: &str) -> Result<u64, ScriptError> {
        if let Some(pending) = self.ledger.pending(step)? {
            if pending <= self.counter {
                return Err(unconfirmed(step, pending));
            }
            info!("Reissuing {step}: counter {pending} was never used");
        }

        let counter = self.next_counter();
        self.ledger.record_pending(step, counter)?;
        Ok(counter)
    }

    /// Originates a contract, unless the ledger records it already
    async fn originate(
        &mut self,
        step: &str,
        kind: ContractKind,
        storage: MichelsonValue,
    ) -> Result<ContractOriginationResult, ScriptError> {
        if let Some(result) = self.ledger.origination(step)? {
            info!("Skipping {step}: {} already at {}", kind, result.contract_address);
            self.steps_skipped += 1;
            return Ok(result);
        }

        let alias = kind.alias(&self.params.network);
        let counter = self.reserve(step)?;
        let request = OriginationRequest {
            alias: &alias,
            source: self.contracts.path(kind),
            storage: &storage,
            deployer: &self.deployer,
            counter,
            endpoint: &self.params.node_address,
        };

        let client = self.client;
        let result = submit_with_retry(self.retry_policy, &format!("originating {kind}"), || {
            client.originate(&request)
        })
        .await
        .map_err(|e| {
            submission_error(step, e, |e| {
                ScriptError::ContractDeployment(format!("{kind}: {e}"))
            })
        })?;

        info!(
            "Deployed {} at {} ({})",
            kind, result.contract_address, result.operation_hash
        );
        self.ledger.record_origination(step, &result)?;
        Ok(result)
    }

    /// Calls an entrypoint, unless the ledger records the call already
    async fn invoke(
        &mut self,
        step: &str,
        contract: &Address,
        entrypoint: &str,
        parameter: MichelsonValue,
    ) -> Result<String, ScriptError> {
        if let Some(operation_hash) = self.ledger.invocation(step)? {
            info!("Skipping {step}: already applied in {operation_hash}");
            self.steps_skipped += 1;
            return Ok(operation_hash);
        }

        let counter = self.reserve(step)?;
        let request = InvocationRequest {
            contract,
            entrypoint,
            parameter: &parameter,
            deployer: &self.deployer,
            counter,
            endpoint: &self.params.node_address,
        };

        let client = self.client;
        let description = format!("calling {entrypoint} on {contract}");
        let operation_hash = submit_with_retry(self.retry_policy, &description, || {
            client.invoke(&request)
        })
        .await
        .map_err(|e| {
            submission_error(step, e, |e| {
                ScriptError::ContractInteraction(format!("{entrypoint}: {e}"))
            })
        })?;

        info!("Called {} on {} ({})", entrypoint, contract, operation_hash);
        self.ledger.record_invocation(step, &operation_hash)?;
        Ok(operation_hash)
    }
}
