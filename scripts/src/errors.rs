//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The deployer's secret key was not provided
    MissingDeployerKey,
    /// The deploy parameters are inconsistent
    InvalidParams(String),
    /// Error reading a deploy parameters file
    ReadParams(String),
    /// Error reading a Michelson contract source
    ReadContract(String),
    /// Error reading the `deployments.json` file
    ReadDeployments(String),
    /// Error writing the `deployments.json` file
    WriteDeployments(String),
    /// Error importing the deployer into the operation client
    ClientInitialization(String),
    /// Error fetching the counter of the deployer
    CounterFetching(String),
    /// Error originating a contract
    ContractDeployment(String),
    /// Error calling a contract entrypoint
    ContractInteraction(String),
    /// An operation may have been applied without its outcome being known
    UnconfirmedOperation(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::MissingDeployerKey => write!(f, "no deployer private key defined"),
            ScriptError::InvalidParams(s) => write!(f, "invalid deploy parameters: {}", s),
            ScriptError::ReadParams(s) => write!(f, "error reading deploy parameters: {}", s),
            ScriptError::ReadContract(s) => write!(f, "error reading contract: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::CounterFetching(s) => write!(f, "error fetching counter: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::UnconfirmedOperation(s) => {
                write!(f, "operation may have been applied: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}

/// Errors returned by an operation client, classified by whether
/// resubmitting the same operation may succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The node or the client failed in a way that may clear up on its own,
    /// e.g. a dropped connection or a congested mempool
    Transient(String),
    /// The node rejected the operation, e.g. the balance is too low or the
    /// contract script failed
    Rejected(String),
    /// The node's counter for the deployer is ahead of the counter the
    /// operation was built with
    CounterMismatch {
        /// The counter the operation was issued with
        expected: u64,
        /// The next counter the node will accept
        found: u64,
    },
    /// The client succeeded but its output could not be understood
    MalformedOutput(String),
    /// The client binary could not be executed
    Spawn(String),
}

impl ClientError {
    /// Whether resubmitting the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transient(_))
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transient(s) => write!(f, "transient failure: {}", s),
            ClientError::Rejected(s) => write!(f, "operation rejected: {}", s),
            ClientError::CounterMismatch { expected, found } => write!(
                f,
                "counter mismatch: operation uses {} but the node expects {}",
                expected, found
            ),
            ClientError::MalformedOutput(s) => write!(f, "malformed client output: {}", s),
            ClientError::Spawn(s) => write!(f, "error running client: {}", s),
        }
    }
}

impl Error for ClientError {}
