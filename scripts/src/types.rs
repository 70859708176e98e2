//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    iter::Sum,
    path::{Path, PathBuf},
    str::FromStr,
};

use num_bigint::BigUint;
use serde::Deserialize;

use crate::{
    constants::{ADDRESS_LENGTH, ADDRESS_PREFIXES, CONTRACT_ALIAS_PREFIX, TOKEN_DECIMALS},
    errors::ScriptError,
};

/// The base58 alphabet used by Tezos addresses
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A Tezos implicit account or originated contract address
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Address(String);

impl Address {
    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !ADDRESS_PREFIXES.iter().any(|prefix| s.starts_with(prefix)) {
            return Err(ScriptError::InvalidParams(format!(
                "address {s} has an unknown prefix"
            )));
        }
        if s.len() != ADDRESS_LENGTH {
            return Err(ScriptError::InvalidParams(format!(
                "address {s} is not {ADDRESS_LENGTH} characters long"
            )));
        }
        if !s.chars().all(|c| BASE58_ALPHABET.contains(c)) {
            return Err(ScriptError::InvalidParams(format!(
                "address {s} is not base58 encoded"
            )));
        }

        Ok(Address(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = ScriptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount of governance tokens, held in base units.
///
/// Amounts can only be built from whole-token counts, which are scaled by
/// `10^TOKEN_DECIMALS`, so unscaled values never reach an operation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct TokenAmount(BigUint);

impl TokenAmount {
    /// Scales a whole number of tokens into base units
    pub fn from_tokens(tokens: u64) -> Self {
        Self::from_whole(BigUint::from(tokens))
    }

    /// The amount in base units
    pub fn base_units(&self) -> &BigUint {
        &self.0
    }

    /// Subtracts `other` from this amount, returning `None` on underflow
    pub fn checked_sub(&self, other: &TokenAmount) -> Option<TokenAmount> {
        if self.0 < other.0 {
            None
        } else {
            Some(TokenAmount(&self.0 - &other.0))
        }
    }

    /// Scales a whole number of tokens held as a big integer
    fn from_whole(tokens: BigUint) -> Self {
        TokenAmount(tokens * BigUint::from(10u32).pow(TOKEN_DECIMALS))
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = ScriptError;

    /// Parses a decimal count of whole tokens
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let tokens = value
            .trim()
            .parse::<BigUint>()
            .map_err(|e| ScriptError::InvalidParams(format!("token amount {value}: {e}")))?;
        Ok(Self::from_whole(tokens))
    }
}

impl<'a> Sum<&'a TokenAmount> for TokenAmount {
    fn sum<I: Iterator<Item = &'a TokenAmount>>(iter: I) -> Self {
        TokenAmount(iter.map(|amount| &amount.0).sum())
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The contracts originated during a deployment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContractKind {
    /// The FA1.2 governance token
    Token,
    /// The community fund holding undistributed tokens
    CommunityFund,
    /// The governance DAO
    Dao,
    /// The token faucet
    Faucet,
    /// A vesting vault for a single beneficiary
    VestingVault,
}

impl ContractKind {
    /// The file name of the compiled contract
    pub fn file_name(&self) -> &'static str {
        match self {
            ContractKind::Token => "token.tz",
            ContractKind::CommunityFund => "community-fund.tz",
            ContractKind::Dao => "dao.tz",
            ContractKind::Faucet => "faucet.tz",
            ContractKind::VestingVault => "vesting-vault.tz",
        }
    }

    /// The alias under which an instance of the contract is registered
    pub fn alias(&self, network: &str) -> String {
        format!("{CONTRACT_ALIAS_PREFIX}-{network}-{self}")
    }
}

impl Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Token => write!(f, "token"),
            ContractKind::CommunityFund => write!(f, "community-fund"),
            ContractKind::Dao => write!(f, "dao"),
            ContractKind::Faucet => write!(f, "faucet"),
            ContractKind::VestingVault => write!(f, "vesting-vault"),
        }
    }
}

/// The outcome of a successful origination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractOriginationResult {
    /// The hash of the operation that originated the contract
    pub operation_hash: String,
    /// The address of the new contract
    pub contract_address: Address,
}

/// The identity that signs every operation of a deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployer {
    /// The alias of the deployer's key in the operation client
    pub alias: String,
    /// The deployer's public key hash
    pub address: Address,
}

/// The Michelson source files of every contract in a deployment.
///
/// Sources are handed to the operation client by path, since a compiled
/// contract can exceed the size limit of a single command line argument.
#[derive(Clone, Debug)]
pub struct ContractSources {
    /// The token contract
    pub token: PathBuf,
    /// The community fund contract
    pub community_fund: PathBuf,
    /// The DAO contract
    pub dao: PathBuf,
    /// The faucet contract
    pub faucet: PathBuf,
    /// The vesting vault contract
    pub vesting_vault: PathBuf,
}

impl ContractSources {
    /// The source file of the given contract
    pub fn path(&self, kind: ContractKind) -> &Path {
        match kind {
            ContractKind::Token => &self.token,
            ContractKind::CommunityFund => &self.community_fund,
            ContractKind::Dao => &self.dao,
            ContractKind::Faucet => &self.faucet,
            ContractKind::VestingVault => &self.vesting_vault,
        }
    }
}
