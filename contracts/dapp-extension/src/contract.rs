use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, BID_CALLBACK_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, PayOevBidParams, QueryMsg};
use crate::query;
use crate::state::{ExtensionConfig, CALLBACK_IN_PROGRESS, CONFIG};

const CONTRACT_NAME: &str = "crates.io:oev-dapp-extension";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = ExtensionConfig {
        manager: info.sender.clone(),
        access_control_registry: deps.api.addr_validate(&msg.access_control_registry)?,
        feed_server: deps.api.addr_validate(&msg.feed_server)?,
        bid_denom: msg.bid_denom,
        manager_signer_id: msg
            .manager_signer_id
            .map(execute::validate_signer_id)
            .transpose()?,
    };
    CONFIG.save(deps.storage, &config)?;
    CALLBACK_IN_PROGRESS.save(deps.storage, &false)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "dapp-extension")
        .add_attribute("manager", info.sender.to_string())
        .add_attribute("feed_server", config.feed_server.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::PayOevBid {
            dapp_id,
            bid_amount,
            signed_data_timestamp_cutoff,
            signature,
            data,
        } => execute::pay_oev_bid(
            deps,
            env,
            info,
            PayOevBidParams {
                dapp_id,
                bid_amount,
                signed_data_timestamp_cutoff,
                signature,
                data,
            },
        ),
        ExecuteMsg::UpdateDappOevDataFeed {
            dapp_id,
            signed_data,
        } => execute::update_dapp_oev_data_feed(deps, env, info, dapp_id, signed_data),
        ExecuteMsg::Withdraw { recipient, amount } => {
            execute::withdraw(deps, env, info, recipient, amount)
        }
        ExecuteMsg::UpdateConfig {
            manager,
            access_control_registry,
            feed_server,
            manager_signer_id,
        } => execute::update_config(
            deps,
            env,
            info,
            manager,
            access_control_registry,
            feed_server,
            manager_signer_id,
        ),
    }
}

/// Unlocks `PayOevBid` and `Withdraw` once the bid callback has returned.
#[entry_point]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        BID_CALLBACK_REPLY_ID => {
            CALLBACK_IN_PROGRESS.save(deps.storage, &false)?;
            Ok(Response::new().add_attribute("action", "oev_bid_callback_done"))
        }
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::LastPaidBid { dapp_id } => query::query_last_paid_bid(deps, dapp_id),
        QueryMsg::DappOevDataFeed {
            dapp_id,
            data_feed_id,
        } => query::query_dapp_oev_data_feed(deps, dapp_id, data_feed_id),
        QueryMsg::ReadDataFeedWithIdAsDapp {
            dapp_id,
            data_feed_id,
        } => query::query_read_data_feed_with_id_as_dapp(deps, dapp_id, data_feed_id),
        QueryMsg::ReadDataFeedWithDapiNameAsDapp { dapp_id, dapi_name } => {
            query::query_read_data_feed_with_dapi_name_as_dapp(deps, dapp_id, dapi_name)
        }
        QueryMsg::SimulateDappOevDataFeedUpdate {
            dapp_id,
            signed_data,
        } => query::query_simulate_dapp_oev_data_feed_update(deps, env, dapp_id, signed_data),
        QueryMsg::SimulateExternalCall { contract, msg } => {
            query::query_simulate_external_call(deps, contract, msg)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
