use cosmwasm_std::{to_json_binary, Binary, Deps, HexBinary, StdError, StdResult};
use oev_feeds_common::DataFeed;

use crate::state::{CONFIG, DAPI_NAMES, DATA_FEEDS, OEV_PROXY_BALANCES, OEV_PROXY_DATA_FEEDS};

fn stored_data_feed(deps: Deps, data_feed_id: &HexBinary) -> StdResult<DataFeed> {
    let id = data_feed_id.to_array::<32>()?;
    Ok(DATA_FEEDS
        .may_load(deps.storage, id.as_slice())?
        .unwrap_or_else(DataFeed::uninitialized))
}

fn stored_oev_proxy_data_feed(
    deps: Deps,
    oev_proxy: &str,
    data_feed_id: &HexBinary,
) -> StdResult<DataFeed> {
    let oev_proxy = deps.api.addr_validate(oev_proxy)?;
    let id = data_feed_id.to_array::<32>()?;
    Ok(OEV_PROXY_DATA_FEEDS
        .may_load(deps.storage, (&oev_proxy, id.as_slice()))?
        .unwrap_or_else(DataFeed::uninitialized))
}

fn dapi_name_to_data_feed_id(deps: Deps, dapi_name: &str) -> StdResult<HexBinary> {
    DAPI_NAMES
        .may_load(deps.storage, dapi_name)?
        .ok_or_else(|| StdError::generic_err("dAPI name not set"))
}

fn initialized(data_feed: DataFeed) -> StdResult<DataFeed> {
    if !data_feed.is_initialized() {
        return Err(StdError::generic_err("Data feed not initialized"));
    }
    Ok(data_feed)
}

/// The proxy's overlay if strictly newer than the base feed, else the base feed.
fn read_as_oev_proxy(deps: Deps, oev_proxy: &str, data_feed_id: &HexBinary) -> StdResult<DataFeed> {
    let overlay = stored_oev_proxy_data_feed(deps, oev_proxy, data_feed_id)?;
    let base = stored_data_feed(deps, data_feed_id)?;
    if overlay.timestamp > base.timestamp {
        Ok(overlay)
    } else {
        initialized(base)
    }
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_data_feed(deps: Deps, data_feed_id: HexBinary) -> StdResult<Binary> {
    to_json_binary(&stored_data_feed(deps, &data_feed_id)?)
}

pub fn query_read_data_feed_with_id(deps: Deps, data_feed_id: HexBinary) -> StdResult<Binary> {
    let data_feed = initialized(stored_data_feed(deps, &data_feed_id)?)?;
    to_json_binary(&data_feed)
}

pub fn query_read_data_feed_with_dapi_name(deps: Deps, dapi_name: String) -> StdResult<Binary> {
    let data_feed_id = dapi_name_to_data_feed_id(deps, &dapi_name)?;
    let data_feed = initialized(stored_data_feed(deps, &data_feed_id)?)?;
    to_json_binary(&data_feed)
}

pub fn query_dapi_name_to_data_feed_id(deps: Deps, dapi_name: String) -> StdResult<Binary> {
    let data_feed_id = DAPI_NAMES.may_load(deps.storage, &dapi_name)?;
    to_json_binary(&data_feed_id)
}

pub fn query_oev_proxy_data_feed(
    deps: Deps,
    oev_proxy: String,
    data_feed_id: HexBinary,
) -> StdResult<Binary> {
    to_json_binary(&stored_oev_proxy_data_feed(deps, &oev_proxy, &data_feed_id)?)
}

pub fn query_read_data_feed_with_id_as_oev_proxy(
    deps: Deps,
    oev_proxy: String,
    data_feed_id: HexBinary,
) -> StdResult<Binary> {
    to_json_binary(&read_as_oev_proxy(deps, &oev_proxy, &data_feed_id)?)
}

pub fn query_read_data_feed_with_dapi_name_as_oev_proxy(
    deps: Deps,
    oev_proxy: String,
    dapi_name: String,
) -> StdResult<Binary> {
    let data_feed_id = dapi_name_to_data_feed_id(deps, &dapi_name)?;
    to_json_binary(&read_as_oev_proxy(deps, &oev_proxy, &data_feed_id)?)
}

pub fn query_oev_proxy_balance(deps: Deps, oev_proxy: String) -> StdResult<Binary> {
    let oev_proxy = deps.api.addr_validate(&oev_proxy)?;
    let balance = OEV_PROXY_BALANCES
        .may_load(deps.storage, &oev_proxy)?
        .unwrap_or_default();
    to_json_binary(&balance)
}
