//! Implementations of the various deploy scripts

use tracing::info;

use crate::{
    cli::{DeployArgs, ParamsArgs},
    client::{OctezClient, OperationClient},
    config::DeployParams,
    errors::ScriptError,
    ledger::DeploymentLedger,
    orchestrator::{expected_operation_count, require_deployer_key, DeploymentOrchestrator},
    utils::load_contracts,
};

/// Resolves the deploy parameters selected on the command line
fn resolve_params(args: &ParamsArgs) -> Result<DeployParams, ScriptError> {
    let mut params = match &args.params_file {
        Some(path) => DeployParams::from_file(path)?,
        None => DeployParams::for_network(args.network)?,
    };

    if let Some(rpc_url) = &args.rpc_url {
        params.node_address = rpc_url.clone();
    }

    Ok(params)
}

/// Deploys the contracts through the Octez client
pub async fn deploy(args: DeployArgs) -> Result<(), ScriptError> {
    let client = OctezClient::new(args.octez_client.clone(), args.base_dir.clone());
    deploy_with_client(args, &client).await
}

/// Deploys the contracts through `client`
pub(crate) async fn deploy_with_client(
    args: DeployArgs,
    client: &impl OperationClient,
) -> Result<(), ScriptError> {
    // Fail fast, before reading anything from disk
    require_deployer_key(args.secret_key.as_deref())?;

    let params = resolve_params(&args.params)?;
    params.validate()?;
    params.log_summary();
    info!(
        "Deployment will issue {} operations",
        expected_operation_count(params.vesting_contracts.len())
    );

    let contracts = load_contracts(&args.contracts_dir)?;
    let ledger = DeploymentLedger::open(&args.deployments_path, args.resume)?;

    let report = DeploymentOrchestrator::new(client, &params, &contracts, ledger)
        .run(args.secret_key.as_deref())
        .await?;

    println!("{}", report);
    Ok(())
}

/// Logs the resolved deploy parameters and checks them
pub fn show_params(args: ParamsArgs) -> Result<(), ScriptError> {
    let params = resolve_params(&args)?;
    params.log_summary();
    info!(
        "Community Fund Allocation: {}",
        params.community_fund_allocation()?
    );

    params.validate()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{deploy_with_client, resolve_params};
    use crate::{
        cli::{DeployArgs, ParamsArgs},
        config::Network,
        errors::ScriptError,
        test_helpers::RecordingClient,
    };

    fn params_args() -> ParamsArgs {
        ParamsArgs {
            network: Network::Sandbox,
            params_file: None,
            rpc_url: Some("http://localhost:8732".to_string()),
        }
    }

    #[test]
    fn test_rpc_url_overrides_params() {
        let params = resolve_params(&params_args()).unwrap();
        assert_eq!(params.node_address, "http://localhost:8732");
        assert_eq!(params.network, "sandbox");
    }

    #[tokio::test]
    async fn test_missing_key_issues_nothing() {
        let args = DeployArgs {
            params: params_args(),
            secret_key: None,
            contracts_dir: PathBuf::from("does-not-exist"),
            deployments_path: PathBuf::from("does-not-exist.json"),
            resume: false,
            octez_client: PathBuf::from("octez-client"),
            base_dir: None,
        };
        let client = RecordingClient::new();

        let res = deploy_with_client(args, &client).await;

        assert!(matches!(res, Err(ScriptError::MissingDeployerKey)));
        assert!(!client.deployer_imported());
        assert_eq!(client.attempts(), 0);
    }
}
