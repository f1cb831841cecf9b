use cosmwasm_std::{
    to_json_binary, Binary, ContractResult, Deps, Env, HexBinary, QueryRequest, StdError,
    StdResult, SystemResult, WasmQuery,
};
use oev_feeds_common::value::max_cutoff;
use oev_feeds_common::{DataFeed, SignedData};

use crate::msg::{BeaconEntry, DappUpdateSimulation, FeedServerQueryMsg};
use crate::state::{CONFIG, LAST_PAID_BIDS};
use crate::update::{base_data_feed, load_dapp_data_feed, process_dapp_update};

/// The dApp overlay if strictly newer than the base feed, else the base feed.
fn read_as_dapp(deps: Deps, dapp_id: u64, data_feed_id: &HexBinary) -> StdResult<DataFeed> {
    let config = CONFIG.load(deps.storage)?;
    let id = data_feed_id.to_array::<32>()?;
    let overlay = load_dapp_data_feed(deps.storage, dapp_id, &id)?;
    let base = base_data_feed(deps, &config.feed_server, &id)?;
    if overlay.timestamp > base.timestamp {
        Ok(overlay)
    } else if base.is_initialized() {
        Ok(base)
    } else {
        Err(StdError::generic_err("Data feed not initialized"))
    }
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_last_paid_bid(deps: Deps, dapp_id: u64) -> StdResult<Binary> {
    let last = LAST_PAID_BIDS.may_load(deps.storage, dapp_id)?;
    to_json_binary(&last)
}

pub fn query_dapp_oev_data_feed(
    deps: Deps,
    dapp_id: u64,
    data_feed_id: HexBinary,
) -> StdResult<Binary> {
    let id = data_feed_id.to_array::<32>()?;
    to_json_binary(&load_dapp_data_feed(deps.storage, dapp_id, &id)?)
}

pub fn query_read_data_feed_with_id_as_dapp(
    deps: Deps,
    dapp_id: u64,
    data_feed_id: HexBinary,
) -> StdResult<Binary> {
    to_json_binary(&read_as_dapp(deps, dapp_id, &data_feed_id)?)
}

pub fn query_read_data_feed_with_dapi_name_as_dapp(
    deps: Deps,
    dapp_id: u64,
    dapi_name: String,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let data_feed_id: Option<HexBinary> = deps.querier.query_wasm_smart(
        &config.feed_server,
        &FeedServerQueryMsg::DapiNameToDataFeedId { dapi_name },
    )?;
    let data_feed_id = data_feed_id.ok_or_else(|| StdError::generic_err("dAPI name not set"))?;
    to_json_binary(&read_as_dapp(deps, dapp_id, &data_feed_id)?)
}

pub fn query_simulate_dapp_oev_data_feed_update(
    deps: Deps,
    env: Env,
    dapp_id: u64,
    signed_data: Vec<SignedData>,
) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let cutoff = max_cutoff(env.block.time.seconds());
    let update = process_dapp_update(deps, &config.feed_server, dapp_id, &signed_data, cutoff)
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    to_json_binary(&DappUpdateSimulation {
        data_feed_id: HexBinary::from(update.data_feed_id.to_vec()),
        value: update.data_feed.value,
        timestamp: update.data_feed.timestamp,
        updated_beacons: update
            .beacon_writes
            .into_iter()
            .map(|(beacon_id, data_feed)| BeaconEntry {
                beacon_id: HexBinary::from(beacon_id.to_vec()),
                data_feed,
            })
            .collect(),
    })
}

pub fn query_simulate_external_call(deps: Deps, contract: String, msg: Binary) -> StdResult<Binary> {
    let contract = deps.api.addr_validate(&contract)?;
    let request: QueryRequest = WasmQuery::Smart {
        contract_addr: contract.to_string(),
        msg,
    }
    .into();
    let raw = cosmwasm_std::to_json_vec(&request)?;
    match deps.querier.raw_query(&raw) {
        SystemResult::Ok(ContractResult::Ok(value)) => Ok(value),
        SystemResult::Ok(ContractResult::Err(err)) => {
            Err(StdError::generic_err(format!("External call failed: {err}")))
        }
        SystemResult::Err(err) => Err(StdError::generic_err(format!(
            "External call failed: {err}"
        ))),
    }
}
