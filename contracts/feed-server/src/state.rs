use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Uint128};
use cw_storage_plus::{Item, Map};
use oev_feeds_common::DataFeed;

pub const CONFIG: Item<FeedServerConfig> = Item::new("config");

/// Beacons and Beacon sets, keyed by 32-byte feed id.
pub const DATA_FEEDS: Map<&[u8], DataFeed> = Map::new("data_feeds");
pub const DAPI_NAMES: Map<&str, HexBinary> = Map::new("dapi_names");

/// Legacy OEV overlay, keyed by (proxy, feed id).
pub const OEV_PROXY_DATA_FEEDS: Map<(&Addr, &[u8]), DataFeed> = Map::new("oev_proxy_data_feeds");
/// Escrowed OEV payments per proxy, withdrawable to its beneficiary.
pub const OEV_PROXY_BALANCES: Map<&Addr, Uint128> = Map::new("oev_proxy_balances");

#[cw_serde]
pub struct FeedServerConfig {
    pub manager: Addr,
    pub access_control_registry: Addr,
    /// Denom accepted as OEV update payment
    pub payment_denom: String,
}
