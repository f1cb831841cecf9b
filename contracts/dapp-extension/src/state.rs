use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary};
use cw_storage_plus::{Item, Map};
use oev_feeds_common::DataFeed;

#[cw_serde]
pub struct ExtensionConfig {
    pub manager: Addr,
    pub access_control_registry: Addr,
    /// Feed server whose base feeds back the dApp overlays
    pub feed_server: Addr,
    /// Denom bids are paid in
    pub bid_denom: String,
    /// Auctioneer key of the manager
    pub manager_signer_id: Option<HexBinary>,
}

/// The most recent bid authorization of a dApp.
#[cw_serde]
pub struct LastPaidBid {
    pub updater: Addr,
    pub signed_data_timestamp_cutoff: u32,
}

pub const CONFIG: Item<ExtensionConfig> = Item::new("config");
pub const LAST_PAID_BIDS: Map<u64, LastPaidBid> = Map::new("last_paid_bids");
/// (dApp id, feed id) -> overlay entry, for Beacons and Beacon sets alike
pub const DAPP_DATA_FEEDS: Map<(u64, &[u8]), DataFeed> = Map::new("dapp_data_feeds");
/// Set while the bid payment callback runs
pub const CALLBACK_IN_PROGRESS: Item<bool> = Item::new("callback_in_progress");
