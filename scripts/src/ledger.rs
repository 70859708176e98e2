//! The deployments ledger, recording every step of a deployment in a
//! `deployments.json` file so an interrupted run can be resumed.
//!
//! A step is recorded as pending, along with its counter, before it is
//! submitted, and as completed once its outcome is known. A pending step
//! whose counter the node has already used may have been applied, so it is
//! never submitted again blindly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use json::JsonValue;

use crate::{
    constants::{
        CONTRACT_ADDRESS_KEY, DEPLOYER_KEY, DEPLOYMENTS_KEY, NETWORK_KEY, OPERATION_HASH_KEY,
        PENDING_COUNTER_KEY, STEPS_KEY,
    },
    errors::ScriptError,
    types::{Address, ContractOriginationResult},
    utils::get_json_from_file,
};

/// The steps of a deployment completed so far
#[derive(Debug)]
pub struct DeploymentLedger {
    /// The file the ledger is persisted to, if any
    path: Option<PathBuf>,
    /// The parsed contents of the ledger
    document: JsonValue,
}

impl DeploymentLedger {
    /// Opens the ledger at `file_path`.
    ///
    /// An existing ledger with recorded steps is only accepted when `resume`
    /// is set, so a finished deployment is never silently reused.
    pub fn open(file_path: &Path, resume: bool) -> Result<Self, ScriptError> {
        let document = if file_path.exists() {
            get_json_from_file(file_path)?
        } else {
            JsonValue::new_object()
        };

        let ledger = DeploymentLedger {
            path: Some(file_path.to_path_buf()),
            document,
        };

        if !resume && ledger.recorded_steps() > 0 {
            return Err(ScriptError::ReadDeployments(format!(
                "{} already records {} steps, pass --resume to continue that deployment",
                file_path.display(),
                ledger.recorded_steps()
            )));
        }

        Ok(ledger)
    }

    /// A ledger that is never persisted
    pub fn in_memory() -> Self {
        DeploymentLedger {
            path: None,
            document: JsonValue::new_object(),
        }
    }

    /// The number of recorded steps, pending ones included
    pub fn recorded_steps(&self) -> usize {
        self.document[DEPLOYMENTS_KEY][STEPS_KEY].len()
    }

    /// The record of a step, if it completed
    fn completed(&self, step: &str) -> Option<&JsonValue> {
        let record = &self.document[DEPLOYMENTS_KEY][STEPS_KEY][step];
        record.has_key(OPERATION_HASH_KEY).then_some(record)
    }

    /// Ties the ledger to a network and deployer, failing if it already
    /// records a deployment for a different one
    pub fn bind(&mut self, network: &str, deployer: &Address) -> Result<(), ScriptError> {
        let deployments = &mut self.document[DEPLOYMENTS_KEY];
        for (key, value) in [(NETWORK_KEY, network), (DEPLOYER_KEY, deployer.as_str())] {
            match deployments[key].as_str() {
                Some(recorded) if recorded != value => {
                    return Err(ScriptError::ReadDeployments(format!(
                        "deployments file records {key} {recorded}, not {value}"
                    )));
                }
                Some(_) => {}
                None => deployments[key] = JsonValue::String(value.to_string()),
            }
        }

        self.persist()
    }

    /// The recorded outcome of an origination step
    pub fn origination(&self, step: &str) -> Result<Option<ContractOriginationResult>, ScriptError> {
        let Some(record) = self.completed(step) else {
            return Ok(None);
        };

        let operation_hash = Self::field(record, step, OPERATION_HASH_KEY)?;
        let contract_address = Self::field(record, step, CONTRACT_ADDRESS_KEY)?
            .parse()
            .map_err(|e| ScriptError::ReadDeployments(format!("step {step}: {e}")))?;

        Ok(Some(ContractOriginationResult {
            operation_hash,
            contract_address,
        }))
    }

    /// The recorded operation hash of an invocation step
    pub fn invocation(&self, step: &str) -> Result<Option<String>, ScriptError> {
        match self.completed(step) {
            Some(record) => Self::field(record, step, OPERATION_HASH_KEY).map(Some),
            None => Ok(None),
        }
    }

    /// The counter a step was submitted with, if it was submitted but never
    /// completed
    pub fn pending(&self, step: &str) -> Result<Option<u64>, ScriptError> {
        let record = &self.document[DEPLOYMENTS_KEY][STEPS_KEY][step];
        if record.is_null() || record.has_key(OPERATION_HASH_KEY) {
            return Ok(None);
        }

        record[PENDING_COUNTER_KEY]
            .as_u64()
            .map(Some)
            .ok_or_else(|| {
                ScriptError::ReadDeployments(format!("step {step} has no {PENDING_COUNTER_KEY}"))
            })
    }

    /// Records that a step is about to be submitted with `counter`
    pub fn record_pending(&mut self, step: &str, counter: u64) -> Result<(), ScriptError> {
        let mut record = JsonValue::new_object();
        record[PENDING_COUNTER_KEY] = JsonValue::from(counter);
        self.document[DEPLOYMENTS_KEY][STEPS_KEY][step] = record;

        self.persist()
    }

    /// Records a completed origination step
    pub fn record_origination(
        &mut self,
        step: &str,
        result: &ContractOriginationResult,
    ) -> Result<(), ScriptError> {
        let mut record = JsonValue::new_object();
        record[OPERATION_HASH_KEY] = JsonValue::String(result.operation_hash.clone());
        record[CONTRACT_ADDRESS_KEY] = JsonValue::String(result.contract_address.to_string());
        self.document[DEPLOYMENTS_KEY][STEPS_KEY][step] = record;

        self.persist()
    }

    /// Records a completed invocation step
    pub fn record_invocation(&mut self, step: &str, operation_hash: &str) -> Result<(), ScriptError> {
        let mut record = JsonValue::new_object();
        record[OPERATION_HASH_KEY] = JsonValue::String(operation_hash.to_string());
        self.document[DEPLOYMENTS_KEY][STEPS_KEY][step] = record;

        self.persist()
    }

    /// Reads a string field of a step record
    fn field(record: &JsonValue, step: &str, key: &str) -> Result<String, ScriptError> {
        record[key]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScriptError::ReadDeployments(format!("step {step} has no {key}")))
    }

    /// Writes the ledger to its file, if it has one
    fn persist(&self) -> Result<(), ScriptError> {
        match &self.path {
            Some(path) => fs::write(path, json::stringify_pretty(self.document.clone(), 4))
                .map_err(|e| ScriptError::WriteDeployments(format!("{}: {}", path.display(), e))),
            None => Ok(()),
        }
    }
}
