//! Helpers for testing the deployment without a node

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
};

use crate::{
    client::{InvocationRequest, OperationClient, OriginationRequest},
    errors::ClientError,
    types::{Address, ContractOriginationResult, ContractSources, Deployer},
};

/// A secret key accepted by [`RecordingClient`]
pub const TEST_SECRET_KEY: &str = "edsk3QoqBuvdamxouPhin7swCvkQNgq4jP5KZPbwWNnwdZpSpJiEbq";
/// The address the deployer of a [`RecordingClient`] signs with
pub const TEST_DEPLOYER: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";
/// The counter of the deployer before any operation is applied
const INITIAL_COUNTER: u64 = 41_200;

/// Placeholder sources for every contract
pub fn test_contracts() -> ContractSources {
    ContractSources {
        token: PathBuf::from("token.tz"),
        community_fund: PathBuf::from("community-fund.tz"),
        dao: PathBuf::from("dao.tz"),
        faucet: PathBuf::from("faucet.tz"),
        vesting_vault: PathBuf::from("vesting-vault.tz"),
    }
}

/// Renders `n` as exactly `width` base58 characters
fn base58_digits(n: u64, width: usize) -> String {
    format!("{n:0width$}").replace('0', "z")
}

/// An operation applied by a [`RecordingClient`]
#[derive(Clone, Debug)]
pub enum RecordedOperation {
    /// A contract origination
    Origination {
        /// The alias the contract was registered under
        alias: String,
        /// The initial storage, in Michelson notation
        storage: String,
        /// The counter the operation was issued with
        counter: u64,
        /// The originated contract
        result: ContractOriginationResult,
    },
    /// An entrypoint call
    Invocation {
        /// The called contract
        contract: Address,
        /// The called entrypoint
        entrypoint: String,
        /// The parameter, in Michelson notation
        parameter: String,
        /// The counter the operation was issued with
        counter: u64,
    },
}

impl RecordedOperation {
    /// The counter the operation was issued with
    pub fn counter(&self) -> u64 {
        match self {
            RecordedOperation::Origination { counter, .. }
            | RecordedOperation::Invocation { counter, .. } => *counter,
        }
    }

    /// The address of the originated contract, if any
    pub fn contract_address(&self) -> Option<Address> {
        match self {
            RecordedOperation::Origination { result, .. } => Some(result.contract_address.clone()),
            RecordedOperation::Invocation { .. } => None,
        }
    }

    /// Whether the alias or entrypoint of the operation mentions `name`
    pub fn describes(&self, name: &str) -> bool {
        match self {
            RecordedOperation::Origination { alias, .. } => alias.contains(name),
            RecordedOperation::Invocation { entrypoint, .. } => entrypoint.contains(name),
        }
    }
}

/// A failure to inject into the operation at a given position
struct InjectedFailure {
    /// The number of operations applied before the failing one
    index: usize,
    /// The error the failing attempts return
    error: ClientError,
    /// How many attempts fail before the operation goes through
    remaining: u32,
    /// Whether the operation is applied before the error is returned, as when
    /// the connection drops while waiting for inclusion
    after_applying: bool,
}

/// An operation client that applies every operation to an in-memory
/// account, checking counters the way a node does
pub struct RecordingClient {
    /// The deployer's counter on the node
    counter: Cell<u64>,
    /// The operations applied so far, in order
    operations: RefCell<Vec<RecordedOperation>>,
    /// The number of origination and invocation attempts
    attempts: Cell<usize>,
    /// Whether a secret key was imported
    deployer_imported: Cell<bool>,
    /// Whether the deployer's public key is revealed
    revealed: Cell<bool>,
    /// The number of reveal operations applied
    reveals: Cell<usize>,
    /// The failure to inject, if any
    failure: RefCell<Option<InjectedFailure>>,
}

impl RecordingClient {
    /// A client whose deployer has not issued any operation yet
    pub fn new() -> Self {
        RecordingClient {
            counter: Cell::new(INITIAL_COUNTER),
            operations: RefCell::new(Vec::new()),
            attempts: Cell::new(0),
            deployer_imported: Cell::new(false),
            revealed: Cell::new(true),
            reveals: Cell::new(0),
            failure: RefCell::new(None),
        }
    }

    /// A client whose deployer has never revealed its public key. Like the
    /// Octez client, the first manager operation then reveals it implicitly,
    /// consuming a counter
    pub fn unrevealed(self) -> Self {
        self.revealed.set(false);
        self
    }

    /// Makes the first `times` attempts at the operation following `index`
    /// applied ones fail with `error`
    pub fn fail_operation(self, index: usize, error: ClientError, times: u32) -> Self {
        self.inject(index, error, times, false)
    }

    /// Makes the first `times` attempts at the operation following `index`
    /// applied ones apply the operation and then fail with `error`
    pub fn fail_after_applying(self, index: usize, error: ClientError, times: u32) -> Self {
        self.inject(index, error, times, true)
    }

    /// Sets the failure to inject
    fn inject(self, index: usize, error: ClientError, times: u32, after_applying: bool) -> Self {
        *self.failure.borrow_mut() = Some(InjectedFailure {
            index,
            error,
            remaining: times,
            after_applying,
        });
        self
    }

    /// The operations applied so far
    pub fn operations(&self) -> Vec<RecordedOperation> {
        self.operations.borrow().clone()
    }

    /// The number of origination and invocation attempts, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    /// The deployer's counter as seen by the node
    pub fn node_counter(&self) -> u64 {
        self.counter.get()
    }

    /// Whether a secret key was imported
    pub fn deployer_imported(&self) -> bool {
        self.deployer_imported.get()
    }

    /// The number of reveal operations applied, implicit ones included
    pub fn reveals(&self) -> usize {
        self.reveals.get()
    }

    /// Applies a reveal operation
    fn reveal(&self) {
        self.revealed.set(true);
        self.reveals.set(self.reveals.get() + 1);
        self.counter.set(self.counter.get() + 1);
    }

    /// Checks an attempt at an operation issued with `counter` and applies
    /// it to the account.
    ///
    /// Fails if an injected failure is due before applying. Returns the
    /// injected failure that is due after applying, if any.
    fn attempt(&self, counter: u64) -> Result<Option<ClientError>, ClientError> {
        self.attempts.set(self.attempts.get() + 1);

        let applied = self.operations.borrow().len();
        let mut late_failure = None;
        if let Some(failure) = self.failure.borrow_mut().as_mut() {
            if failure.index == applied && failure.remaining > 0 {
                failure.remaining -= 1;
                if !failure.after_applying {
                    return Err(failure.error.clone());
                }
                late_failure = Some(failure.error.clone());
            }
        }

        let expected = self.counter.get() + 1;
        if counter != expected {
            return Err(ClientError::CounterMismatch {
                expected: counter,
                found: expected,
            });
        }

        // Batched with the operation, ahead of it
        if !self.revealed.get() {
            self.reveal();
        }
        self.counter.set(self.counter.get() + 1);
        Ok(late_failure)
    }

    /// The hash of the operation applied last
    fn operation_hash(&self) -> String {
        format!("oo{}", base58_digits(self.counter.get(), 49))
    }
}

impl OperationClient for RecordingClient {
    async fn import_deployer(
        &self,
        secret_key: &str,
        _endpoint: &str,
    ) -> Result<Deployer, ClientError> {
        if !secret_key.starts_with("edsk") {
            return Err(ClientError::Rejected(format!("bad secret key {secret_key}")));
        }

        self.deployer_imported.set(true);
        Ok(Deployer {
            alias: "test-deployer".to_string(),
            address: TEST_DEPLOYER
                .parse()
                .map_err(|e| ClientError::MalformedOutput(format!("{e}")))?,
        })
    }

    async fn reveal_deployer(
        &self,
        _deployer: &Deployer,
        _endpoint: &str,
    ) -> Result<bool, ClientError> {
        if self.revealed.get() {
            return Ok(false);
        }

        self.reveal();
        Ok(true)
    }

    async fn fetch_counter(&self, _account: &Address, _endpoint: &str) -> Result<u64, ClientError> {
        Ok(self.counter.get())
    }

    async fn originate(
        &self,
        request: &OriginationRequest<'_>,
    ) -> Result<ContractOriginationResult, ClientError> {
        let late_failure = self.attempt(request.counter)?;

        let contract_address = format!("KT1{}", base58_digits(request.counter, 33))
            .parse()
            .map_err(|e| ClientError::MalformedOutput(format!("{e}")))?;
        let result = ContractOriginationResult {
            operation_hash: self.operation_hash(),
            contract_address,
        };

        self.operations
            .borrow_mut()
            .push(RecordedOperation::Origination {
                alias: request.alias.to_string(),
                storage: request.storage.to_string(),
                counter: request.counter,
                result: result.clone(),
            });
        late_failure.map_or(Ok(result), Err)
    }

    async fn invoke(&self, request: &InvocationRequest<'_>) -> Result<String, ClientError> {
        let late_failure = self.attempt(request.counter)?;

        self.operations
            .borrow_mut()
            .push(RecordedOperation::Invocation {
                contract: request.contract.clone(),
                entrypoint: request.entrypoint.to_string(),
                parameter: request.parameter.to_string(),
                counter: request.counter,
            });
        late_failure.map_or_else(|| Ok(self.operation_hash()), Err)
    }
}
