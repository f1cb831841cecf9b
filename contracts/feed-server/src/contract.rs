use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{BeaconUpdateParams, ExecuteMsg, InstantiateMsg, MigrateMsg, OevUpdateParams, QueryMsg};
use crate::oev;
use crate::query;
use crate::state::{FeedServerConfig, CONFIG};

const CONTRACT_NAME: &str = "crates.io:oev-feed-server";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = FeedServerConfig {
        manager: info.sender.clone(),
        access_control_registry: deps.api.addr_validate(&msg.access_control_registry)?,
        payment_denom: msg.payment_denom,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "feed-server")
        .add_attribute("manager", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateBeaconWithSignedData {
            airnode,
            template_id,
            timestamp,
            data,
            signature,
        } => execute::update_beacon_with_signed_data(
            deps,
            env,
            info,
            BeaconUpdateParams {
                airnode,
                template_id,
                timestamp,
                data,
                signature,
            },
        ),
        ExecuteMsg::UpdateBeaconSetWithBeacons { beacon_ids } => {
            execute::update_beacon_set_with_beacons(deps, env, info, beacon_ids)
        }
        ExecuteMsg::SetDapiName {
            dapi_name,
            data_feed_id,
        } => execute::set_dapi_name(deps, env, info, dapi_name, data_feed_id),
        ExecuteMsg::UpdateOevProxyDataFeedWithSignedData {
            oev_proxy,
            data_feed_id,
            update_id,
            timestamp,
            data,
            packed_oev_update_signatures,
        } => oev::update_oev_proxy_data_feed_with_signed_data(
            deps,
            env,
            info,
            OevUpdateParams {
                oev_proxy,
                data_feed_id,
                update_id,
                timestamp,
                data,
                packed_oev_update_signatures,
            },
        ),
        ExecuteMsg::Withdraw { oev_proxy } => oev::withdraw(deps, env, info, oev_proxy),
        ExecuteMsg::UpdateConfig {
            manager,
            access_control_registry,
        } => execute::update_config(deps, env, info, manager, access_control_registry),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::DataFeed { data_feed_id } => query::query_data_feed(deps, data_feed_id),
        QueryMsg::ReadDataFeedWithId { data_feed_id } => {
            query::query_read_data_feed_with_id(deps, data_feed_id)
        }
        QueryMsg::ReadDataFeedWithDapiName { dapi_name } => {
            query::query_read_data_feed_with_dapi_name(deps, dapi_name)
        }
        QueryMsg::DapiNameToDataFeedId { dapi_name } => {
            query::query_dapi_name_to_data_feed_id(deps, dapi_name)
        }
        QueryMsg::OevProxyDataFeed {
            oev_proxy,
            data_feed_id,
        } => query::query_oev_proxy_data_feed(deps, oev_proxy, data_feed_id),
        QueryMsg::ReadDataFeedWithIdAsOevProxy {
            oev_proxy,
            data_feed_id,
        } => query::query_read_data_feed_with_id_as_oev_proxy(deps, oev_proxy, data_feed_id),
        QueryMsg::ReadDataFeedWithDapiNameAsOevProxy {
            oev_proxy,
            dapi_name,
        } => query::query_read_data_feed_with_dapi_name_as_oev_proxy(deps, oev_proxy, dapi_name),
        QueryMsg::OevProxyBalance { oev_proxy } => {
            query::query_oev_proxy_balance(deps, oev_proxy)
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
