//! Utilities for the deploy scripts.

use std::{fs, path::Path};

use json::JsonValue;

use crate::{
    errors::ScriptError,
    types::{ContractKind, ContractSources},
};

/// Reads the Michelson source of a contract
pub fn load_contract(file_path: &Path) -> Result<String, ScriptError> {
    let source = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadContract(format!("{}: {}", file_path.display(), e)))?;

    if source.trim().is_empty() {
        return Err(ScriptError::ReadContract(format!(
            "{} is empty",
            file_path.display()
        )));
    }

    Ok(source)
}

/// Locates the sources of every contract in a deployment in `contracts_dir`,
/// checking that each one can be read
pub fn load_contracts(contracts_dir: &Path) -> Result<ContractSources, ScriptError> {
    let load = |kind: ContractKind| {
        let path = contracts_dir.join(kind.file_name());
        load_contract(&path).map(|_| path)
    };

    Ok(ContractSources {
        token: load(ContractKind::Token)?,
        community_fund: load(ContractKind::CommunityFund)?,
        dao: load(ContractKind::Dao)?,
        faucet: load(ContractKind::Faucet)?,
        vesting_vault: load(ContractKind::VestingVault)?,
    })
}

/// Reads and parses a JSON file
pub fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))?;

    json::parse(&file_contents)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))
}
