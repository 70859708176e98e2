//! Builders for the initial storage of every contract and for the entrypoint
//! parameters used while wiring the deployment.
//!
//! Storage layouts follow the compiled contracts, whose record fields are
//! right-combed pairs in alphabetical field order.

use serde_json::{json, Value};

use crate::{
    config::{DeployParams, VestingContract},
    constants::{METADATA_DATA_KEY, METADATA_STORAGE_URI, METADATA_URI_KEY, TOKEN_DECIMALS},
    michelson::MichelsonValue,
    types::{Address, TokenAmount},
};

/// The authors listed in every contract's metadata
const METADATA_AUTHORS: [&str; 1] = ["Hover Labs <hello@hover.engineering>"];
/// The homepage listed in every contract's metadata
const METADATA_HOMEPAGE: &str = "https://kolibri.finance";
/// The TZIP-7 interface revision the token implements
const TOKEN_INTERFACE: &str = "TZIP-007-2021-01-29";
/// The token's display name
const TOKEN_NAME: &str = "Kolibri Governance Token";
/// The token's ticker
const TOKEN_SYMBOL: &str = "kDAO";
/// The token's icon
const TOKEN_ICON: &str = "https://kolibri-data.s3.amazonaws.com/logo.png";

// ------------
// | METADATA |
// ------------

/// Builds a TZIP-16 metadata big map holding the given document in storage
pub fn contract_metadata(document: &Value) -> MichelsonValue {
    MichelsonValue::Map(vec![
        (
            MichelsonValue::string(METADATA_URI_KEY),
            MichelsonValue::bytes(METADATA_STORAGE_URI.as_bytes()),
        ),
        (
            MichelsonValue::string(METADATA_DATA_KEY),
            MichelsonValue::bytes(document.to_string().into_bytes()),
        ),
    ])
}

/// The TZIP-16 metadata document of a contract
fn metadata_document(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "authors": METADATA_AUTHORS,
        "homepage": METADATA_HOMEPAGE,
    })
}

/// The TZIP-12 token metadata of token 0
fn token_info() -> MichelsonValue {
    let entry = |key: &str, value: &str| {
        (
            MichelsonValue::string(key),
            MichelsonValue::bytes(value.as_bytes()),
        )
    };

    MichelsonValue::Map(vec![
        entry("decimals", &TOKEN_DECIMALS.to_string()),
        entry("icon", TOKEN_ICON),
        entry("name", TOKEN_NAME),
        entry("symbol", TOKEN_SYMBOL),
    ])
}

// -----------
// | STORAGE |
// -----------

/// The initial storage of the token contract, administered by `administrator`
pub fn token_storage(administrator: &Address) -> MichelsonValue {
    let mut document = metadata_document("KOL Token", "The FA1.2 Governance Token For Kolibri");
    document["interfaces"] = json!([TOKEN_INTERFACE]);

    let token_metadata = MichelsonValue::Map(vec![(
        MichelsonValue::nat(0u64),
        MichelsonValue::pair(MichelsonValue::nat(0u64), token_info()),
    )]);

    MichelsonValue::pair(
        MichelsonValue::pair(
            // administrator, balances
            MichelsonValue::pair(
                MichelsonValue::some(MichelsonValue::address(administrator)),
                MichelsonValue::empty_map(),
            ),
            // checkpoints, metadata
            MichelsonValue::pair(MichelsonValue::empty_map(), contract_metadata(&document)),
        ),
        MichelsonValue::pair(
            // mintingDisabled, numCheckpoints
            MichelsonValue::pair(MichelsonValue::Bool(false), MichelsonValue::empty_map()),
            // paused, token_metadata, totalSupply
            MichelsonValue::right_comb([
                MichelsonValue::Bool(false),
                token_metadata,
                MichelsonValue::nat(0u64),
            ]),
        ),
    )
}

/// The initial storage of the community fund, governed by `governor` and
/// holding tokens of `token`
pub fn community_fund_storage(governor: &Address, token: &Address) -> MichelsonValue {
    let document = metadata_document(
        "KOL Token Community Fund",
        "Governance Token Fund for Kolibri DAO",
    );

    MichelsonValue::right_comb([
        MichelsonValue::address(governor),
        contract_metadata(&document),
        MichelsonValue::address(token),
    ])
}

/// The initial storage of the DAO, spending from `community_fund` and
/// counting votes of `token` holders
pub fn dao_storage(
    params: &DeployParams,
    community_fund: &Address,
    token: &Address,
) -> MichelsonValue {
    let document = metadata_document("Kolibri Governance DAO", "Governance DAO v0.0.1");

    let governance_parameters = MichelsonValue::right_comb([
        MichelsonValue::amount(&params.escrow_amount),
        MichelsonValue::nat(params.vote_delay_blocks),
        MichelsonValue::nat(params.vote_length_blocks),
        MichelsonValue::nat(params.min_yay_votes_percent_for_escrow_return),
        MichelsonValue::nat(params.blocks_in_timelock_for_execution),
        MichelsonValue::nat(params.blocks_in_timelock_for_cancellation),
        MichelsonValue::nat(params.percentage_for_super_majority),
        // quorumCap
        MichelsonValue::pair(
            MichelsonValue::amount(&params.lower_quorum_cap),
            MichelsonValue::amount(&params.upper_quorum_cap),
        ),
    ]);

    MichelsonValue::pair(
        MichelsonValue::pair(
            // communityFundAddress, governanceParameters
            MichelsonValue::pair(MichelsonValue::address(community_fund), governance_parameters),
            // metadata, nextProposalId, outcomes
            MichelsonValue::right_comb([
                contract_metadata(&document),
                MichelsonValue::nat(0u64),
                MichelsonValue::empty_map(),
            ]),
        ),
        MichelsonValue::pair(
            // poll, quorum, state
            MichelsonValue::right_comb([
                MichelsonValue::None,
                MichelsonValue::amount(&params.quorum),
                MichelsonValue::nat(0u64),
            ]),
            // timelockItem, tokenContractAddress, votingState
            MichelsonValue::right_comb([
                MichelsonValue::None,
                MichelsonValue::address(token),
                MichelsonValue::None,
            ]),
        ),
    )
}

/// The initial storage of the faucet, dripping at most `max_drip_size` of
/// `token` per request
pub fn faucet_storage(max_drip_size: &TokenAmount, token: &Address) -> MichelsonValue {
    let document = metadata_document("KOL Token Faucet", "Governance Token Faucet for Kolibri DAO");

    MichelsonValue::right_comb([
        MichelsonValue::amount(max_drip_size),
        contract_metadata(&document),
        MichelsonValue::address(token),
    ])
}

/// The initial storage of a vesting vault for `vesting.owner`, governed by
/// `governor` and voting through `dao`
pub fn vesting_vault_storage(
    vesting: &VestingContract,
    dao: &Address,
    governor: &Address,
    token: &Address,
) -> MichelsonValue {
    MichelsonValue::pair(
        // amountPerBlock, amountWithdrawn, daoContractAddress
        MichelsonValue::right_comb([
            MichelsonValue::amount(&vesting.amount_per_block),
            MichelsonValue::nat(0u64),
            MichelsonValue::address(dao),
        ]),
        MichelsonValue::pair(
            // governorAddress, owner
            MichelsonValue::pair(
                MichelsonValue::address(governor),
                MichelsonValue::address(&vesting.owner),
            ),
            // startBlock, tokenContractAddress
            MichelsonValue::pair(
                MichelsonValue::nat(vesting.vesting_start_block),
                MichelsonValue::address(token),
            ),
        ),
    )
}

// --------------
// | PARAMETERS |
// --------------

/// The parameter of the token's `mint` entrypoint
pub fn mint_param(recipient: &Address, amount: &TokenAmount) -> MichelsonValue {
    MichelsonValue::pair(
        MichelsonValue::address(recipient),
        MichelsonValue::amount(amount),
    )
}

/// The parameter of the token's `transfer` entrypoint
pub fn transfer_param(from: &Address, to: &Address, amount: &TokenAmount) -> MichelsonValue {
    MichelsonValue::right_comb([
        MichelsonValue::address(from),
        MichelsonValue::address(to),
        MichelsonValue::amount(amount),
    ])
}

/// The parameter of the community fund's `setGovernorContract` entrypoint
pub fn set_governor_param(governor: &Address) -> MichelsonValue {
    MichelsonValue::address(governor)
}

/// The parameter of the token's `setAdministrator` entrypoint
pub fn set_administrator_param(administrator: &Address) -> MichelsonValue {
    MichelsonValue::some(MichelsonValue::address(administrator))
}
