use cosmwasm_std::{DepsMut, Env, Event, HexBinary, MessageInfo, Response, Storage};
use oev_feeds_common::collaborators::{has_role, DAPI_NAME_SETTER_ROLE};
use oev_feeds_common::feed_id::is_zero_id;
use oev_feeds_common::signature::base_update_digest;
use oev_feeds_common::{
    aggregate, decode_value, derive_beacon_id, derive_beacon_set_id, recover_signer,
    timestamp_is_valid, DataFeed,
};

use crate::error::ContractError;
use crate::msg::BeaconUpdateParams;
use crate::state::{CONFIG, DAPI_NAMES, DATA_FEEDS};

/// Longest dAPI name, in bytes.
pub const MAX_DAPI_NAME_LEN: usize = 32;

/// Validates a signed `(timestamp, data)` pair against the entry it would replace.
///
/// The window check runs before the monotonic check, so a zero timestamp
/// fails with `TimestampNotValid`.
pub fn validate_update(
    now_seconds: u64,
    stored: &DataFeed,
    timestamp: u32,
    data: &[u8],
) -> Result<DataFeed, ContractError> {
    let value = decode_value(data)?;
    if !timestamp_is_valid(timestamp, now_seconds) {
        return Err(ContractError::TimestampNotValid);
    }
    if timestamp <= stored.timestamp {
        return Err(ContractError::DoesNotUpdateTimestamp);
    }
    Ok(DataFeed { value, timestamp })
}

pub fn load_data_feed(storage: &dyn Storage, id: &[u8]) -> Result<DataFeed, ContractError> {
    Ok(DATA_FEEDS
        .may_load(storage, id)?
        .unwrap_or_else(DataFeed::uninitialized))
}

/// Update a Beacon with data signed by its airnode. Anyone can call.
pub fn update_beacon_with_signed_data(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: BeaconUpdateParams,
) -> Result<Response, ContractError> {
    let BeaconUpdateParams {
        airnode,
        template_id,
        timestamp,
        data,
        signature,
    } = params;
    let airnode = airnode.to_array::<20>()?;
    let template_id = template_id.to_array::<32>()?;

    let digest = base_update_digest(&template_id, timestamp, &data);
    let signer = recover_signer(deps.api, &digest, &signature)
        .map_err(|_| ContractError::SignatureMismatch)?;
    if signer != airnode {
        return Err(ContractError::SignatureMismatch);
    }

    let beacon_id = derive_beacon_id(&airnode, &template_id);
    let stored = load_data_feed(deps.storage, &beacon_id)?;
    let updated = validate_update(env.block.time.seconds(), &stored, timestamp, &data)?;
    DATA_FEEDS.save(deps.storage, beacon_id.as_slice(), &updated)?;

    let beacon_id_hex = hex::encode(beacon_id);
    Ok(Response::new()
        .add_attribute("action", "update_beacon_with_signed_data")
        .add_attribute("beacon_id", beacon_id_hex.clone())
        .add_event(
            Event::new("oev_beacon_updated")
                .add_attribute("beacon_id", beacon_id_hex)
                .add_attribute("value", updated.value.to_string())
                .add_attribute("timestamp", updated.timestamp.to_string())
                .add_attribute("sender", info.sender.to_string()),
        ))
}

/// Recompute a Beacon set as the median of its stored members. Anyone can call.
pub fn update_beacon_set_with_beacons(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    beacon_ids: Vec<HexBinary>,
) -> Result<Response, ContractError> {
    if beacon_ids.len() < 2 {
        return Err(ContractError::LessThanTwoBeacons);
    }

    let mut ids = Vec::with_capacity(beacon_ids.len());
    let mut members = Vec::with_capacity(beacon_ids.len());
    for id in &beacon_ids {
        let id = id.to_array::<32>()?;
        members.push(load_data_feed(deps.storage, &id)?);
        ids.push(id);
    }

    let updated = aggregate(&members)?;
    let beacon_set_id = derive_beacon_set_id(&ids);
    let stored = load_data_feed(deps.storage, &beacon_set_id)?;
    // Beacon set timestamps may go backwards; only a no-op is rejected
    if stored == updated {
        return Err(ContractError::DoesNotUpdateBeaconSet);
    }
    DATA_FEEDS.save(deps.storage, beacon_set_id.as_slice(), &updated)?;

    let beacon_set_id_hex = hex::encode(beacon_set_id);
    Ok(Response::new()
        .add_attribute("action", "update_beacon_set_with_beacons")
        .add_attribute("beacon_set_id", beacon_set_id_hex.clone())
        .add_event(
            Event::new("oev_beacon_set_updated")
                .add_attribute("beacon_set_id", beacon_set_id_hex)
                .add_attribute("beacon_count", ids.len().to_string())
                .add_attribute("value", updated.value.to_string())
                .add_attribute("timestamp", updated.timestamp.to_string())
                .add_attribute("sender", info.sender.to_string()),
        ))
}

/// Bind or clear a dAPI name. Name setter role (or manager) only.
pub fn set_dapi_name(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    dapi_name: String,
    data_feed_id: HexBinary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !has_role(
        &deps.querier,
        &config.access_control_registry,
        &config.manager,
        DAPI_NAME_SETTER_ROLE,
        info.sender.as_str(),
    )? {
        return Err(ContractError::Unauthorized {
            reason: "sender cannot set dAPI names".to_string(),
        });
    }

    if dapi_name.is_empty() {
        return Err(ContractError::DapiNameZero);
    }
    if dapi_name.len() > MAX_DAPI_NAME_LEN {
        return Err(ContractError::DapiNameTooLong {
            len: dapi_name.len(),
        });
    }

    let id = data_feed_id.to_array::<32>()?;
    if is_zero_id(&id) {
        DAPI_NAMES.remove(deps.storage, &dapi_name);
    } else {
        DAPI_NAMES.save(deps.storage, &dapi_name, &data_feed_id)?;
    }

    Ok(Response::new()
        .add_attribute("action", "set_dapi_name")
        .add_attribute("dapi_name", dapi_name.clone())
        .add_event(
            Event::new("oev_dapi_name_set")
                .add_attribute("dapi_name", dapi_name)
                .add_attribute("data_feed_id", data_feed_id.to_hex())
                .add_attribute("sender", info.sender.to_string()),
        ))
}

/// Update configuration. Manager only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    manager: Option<String>,
    access_control_registry: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.manager {
        return Err(ContractError::Unauthorized {
            reason: "only manager can update config".to_string(),
        });
    }

    if let Some(manager) = manager {
        config.manager = deps.api.addr_validate(&manager)?;
    }
    if let Some(registry) = access_control_registry {
        config.access_control_registry = deps.api.addr_validate(&registry)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("manager", config.manager.to_string()))
}
