//! Validation and aggregation shared by overlay updates and their simulation.

use cosmwasm_std::{Addr, Deps, HexBinary, StdResult, Storage};
use oev_feeds_common::signature::dapp_update_digest;
use oev_feeds_common::{
    aggregate, decode_value, derive_beacon_id, derive_beacon_set_id, recover_signer, DataFeed,
    SignedData,
};

use crate::error::ContractError;
use crate::msg::FeedServerQueryMsg;
use crate::state::DAPP_DATA_FEEDS;

/// A validated overlay update, not yet written.
#[derive(Debug, Clone, PartialEq)]
pub struct DappUpdate {
    pub data_feed_id: [u8; 32],
    pub data_feed: DataFeed,
    /// Beacon entries that strictly advance their stored overlay entry
    pub beacon_writes: Vec<([u8; 32], DataFeed)>,
}

pub fn load_dapp_data_feed(
    storage: &dyn Storage,
    dapp_id: u64,
    data_feed_id: &[u8],
) -> StdResult<DataFeed> {
    Ok(DAPP_DATA_FEEDS
        .may_load(storage, (dapp_id, data_feed_id))?
        .unwrap_or_else(DataFeed::uninitialized))
}

/// Raw base feed entry held by the feed server.
pub fn base_data_feed(deps: Deps, feed_server: &Addr, data_feed_id: &[u8]) -> StdResult<DataFeed> {
    deps.querier.query_wasm_smart(
        feed_server,
        &FeedServerQueryMsg::DataFeed {
            data_feed_id: HexBinary::from(data_feed_id),
        },
    )
}

fn verify_signed_data(
    deps: Deps,
    airnode: &[u8; 20],
    template_id: &[u8; 32],
    signed: &SignedData,
    cutoff: u32,
) -> Result<DataFeed, ContractError> {
    let digest = dapp_update_digest(template_id, signed.timestamp, &signed.data);
    let signer = recover_signer(deps.api, &digest, &signed.signature)
        .map_err(|_| ContractError::SignatureMismatch)?;
    if &signer != airnode {
        return Err(ContractError::SignatureMismatch);
    }
    if signed.timestamp > cutoff {
        return Err(ContractError::TimestampExceedsCutoff);
    }
    let value = decode_value(&signed.data)?;
    Ok(DataFeed {
        value,
        timestamp: signed.timestamp,
    })
}

/// Validates `signed_data` for `dapp_id` under `cutoff` and computes what to write.
///
/// A single entry is a Beacon update and must be signed. Several entries form a
/// Beacon set: abstaining members, and members whose base Beacon is newer than
/// their signed data, contribute the base Beacon instead.
pub fn process_dapp_update(
    deps: Deps,
    feed_server: &Addr,
    dapp_id: u64,
    signed_data: &[SignedData],
    cutoff: u32,
) -> Result<DappUpdate, ContractError> {
    if signed_data.is_empty() {
        return Err(ContractError::SignedDataEmpty);
    }

    if let [signed] = signed_data {
        let airnode = signed.airnode.to_array::<20>()?;
        let template_id = signed.template_id.to_array::<32>()?;
        let beacon_id = derive_beacon_id(&airnode, &template_id);
        let data_feed = verify_signed_data(deps, &airnode, &template_id, signed, cutoff)?;
        let stored = load_dapp_data_feed(deps.storage, dapp_id, &beacon_id)?;
        if data_feed.timestamp <= stored.timestamp {
            return Err(ContractError::DoesNotUpdateTimestamp);
        }
        return Ok(DappUpdate {
            data_feed_id: beacon_id,
            data_feed,
            beacon_writes: vec![(beacon_id, data_feed)],
        });
    }

    let mut beacon_ids = Vec::with_capacity(signed_data.len());
    let mut members = Vec::with_capacity(signed_data.len());
    let mut beacon_writes = vec![];
    for signed in signed_data {
        let airnode = signed.airnode.to_array::<20>()?;
        let template_id = signed.template_id.to_array::<32>()?;
        let beacon_id = derive_beacon_id(&airnode, &template_id);
        let base = base_data_feed(deps, feed_server, &beacon_id)?;

        let member = if signed.is_abstention() {
            base
        } else {
            let data_feed = verify_signed_data(deps, &airnode, &template_id, signed, cutoff)?;
            if base.timestamp > data_feed.timestamp {
                base
            } else {
                let stored = load_dapp_data_feed(deps.storage, dapp_id, &beacon_id)?;
                if data_feed.timestamp > stored.timestamp {
                    beacon_writes.push((beacon_id, data_feed));
                }
                data_feed
            }
        };
        beacon_ids.push(beacon_id);
        members.push(member);
    }

    if beacon_writes.is_empty() {
        return Err(ContractError::DoesNotUpdateTimestamp);
    }

    let beacon_set_id = derive_beacon_set_id(&beacon_ids);
    let data_feed = aggregate(&members)?;
    let stored = load_dapp_data_feed(deps.storage, dapp_id, &beacon_set_id)?;
    if stored == data_feed {
        return Err(ContractError::DoesNotUpdateBeaconSet);
    }

    Ok(DappUpdate {
        data_feed_id: beacon_set_id,
        data_feed,
        beacon_writes,
    })
}

pub fn apply_dapp_update(
    storage: &mut dyn Storage,
    dapp_id: u64,
    update: &DappUpdate,
) -> StdResult<()> {
    for (beacon_id, data_feed) in &update.beacon_writes {
        DAPP_DATA_FEEDS.save(storage, (dapp_id, beacon_id.as_slice()), data_feed)?;
    }
    DAPP_DATA_FEEDS.save(
        storage,
        (dapp_id, update.data_feed_id.as_slice()),
        &update.data_feed,
    )
}
