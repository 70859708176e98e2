//! Constants used in the deploy scripts

use std::time::Duration;

/// The name of the environment variable holding the deployer's private key
pub const DEPLOYER_KEY_ENV_VAR: &str = "MURMURATION_DEPLOY_PRIVATE_KEY";

/// The number of decimals of the governance token.
///
/// Every token amount is scaled by `10^TOKEN_DECIMALS` before it is embedded
/// in an operation.
pub const TOKEN_DECIMALS: u32 = 18;

/// The number of whole tokens minted to the deployer
pub const TOKENS_TO_MINT: u64 = 1_000_000;

/// How long to wait after a successful operation before moving on.
///
/// Blocks on mainnet are 60s, blocks on testnet are 30s.
pub const CONFIRMATION_DELAY: Duration = Duration::from_secs(10);

/// The maximum number of times an operation is submitted before giving up
pub const MAX_SUBMISSION_ATTEMPTS: u32 = 5;

/// The delay before the first resubmission of a failed operation
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(10);

/// The upper bound on the delay between resubmissions
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(120);

/// The factor by which the retry delay grows after each failed attempt
pub const RETRY_BACKOFF_FACTOR: u32 = 2;

/// The default directory containing the compiled Michelson contracts
pub const DEFAULT_CONTRACTS_DIR: &str = "smart_contracts";

/// The default path of the deployments ledger
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default name of the Octez client binary
pub const DEFAULT_OCTEZ_CLIENT: &str = "octez-client";

/// The alias the deployer's key is imported under in the Octez client
pub const DEPLOYER_ALIAS: &str = "murmuration-deployer";

/// The prefix of every contract alias registered in the Octez client
pub const CONTRACT_ALIAS_PREFIX: &str = "murmuration";

/// The length of the random password protecting the imported deployer key
pub const KEY_PASSWORD_LENGTH: usize = 32;

/// The maximum amount of tez the client may burn for storage per operation
pub const BURN_CAP: &str = "10";

/// The length of a base58check encoded Tezos address
pub const ADDRESS_LENGTH: usize = 36;

/// The prefixes of the address kinds accepted in deploy parameters
pub const ADDRESS_PREFIXES: [&str; 5] = ["tz1", "tz2", "tz3", "tz4", "KT1"];

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The network key in the `deployments.json` file
pub const NETWORK_KEY: &str = "network";

/// The deployer key in the `deployments.json` file
pub const DEPLOYER_KEY: &str = "deployer";

/// The completed steps key in the `deployments.json` file
pub const STEPS_KEY: &str = "steps";

/// The operation hash key of a step in the `deployments.json` file
pub const OPERATION_HASH_KEY: &str = "operation_hash";

/// The counter key of a submitted but unconfirmed step in the
/// `deployments.json` file
pub const PENDING_COUNTER_KEY: &str = "pending_counter";

/// The contract address key of a step in the `deployments.json` file
pub const CONTRACT_ADDRESS_KEY: &str = "contract_address";

/// The key under which TZIP-16 metadata points at its own storage
pub const METADATA_URI_KEY: &str = "";

/// The TZIP-16 URI stating that metadata lives under the `data` key
pub const METADATA_STORAGE_URI: &str = "tezos-storage:data";

/// The key holding the TZIP-16 metadata document
pub const METADATA_DATA_KEY: &str = "data";
