use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, HexBinary, Uint128};
use oev_feeds_common::{DataFeed, PackedOevUpdateSignature};

use crate::state::FeedServerConfig;

#[cw_serde]
pub struct InstantiateMsg {
    pub access_control_registry: String,
    /// Denom accepted as OEV update payment
    pub payment_denom: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Update a Beacon with data signed by its airnode. Anyone can call.
    UpdateBeaconWithSignedData {
        /// 20-byte signer id
        airnode: HexBinary,
        template_id: HexBinary,
        timestamp: u32,
        data: Binary,
        signature: Binary,
    },
    /// Recompute a Beacon set from the stored Beacons. Anyone can call.
    UpdateBeaconSetWithBeacons { beacon_ids: Vec<HexBinary> },
    /// Bind a dAPI name to a feed id. Name setter role only.
    /// The all-zero feed id clears the binding.
    SetDapiName {
        dapi_name: String,
        data_feed_id: HexBinary,
    },
    /// Write the OEV overlay of a proxy with quorum-signed data.
    /// Attached payment is escrowed for the proxy's beneficiary.
    UpdateOevProxyDataFeedWithSignedData {
        oev_proxy: String,
        data_feed_id: HexBinary,
        update_id: HexBinary,
        timestamp: u32,
        data: Binary,
        packed_oev_update_signatures: Vec<PackedOevUpdateSignature>,
    },
    /// Send a proxy's escrowed payments to its announced beneficiary. Anyone can call.
    Withdraw { oev_proxy: String },
    /// Update configuration. Manager only.
    UpdateConfig {
        manager: Option<String>,
        access_control_registry: Option<String>,
    },
}

/// Arguments of `UpdateBeaconWithSignedData`.
pub struct BeaconUpdateParams {
    pub airnode: HexBinary,
    pub template_id: HexBinary,
    pub timestamp: u32,
    pub data: Binary,
    pub signature: Binary,
}

/// Arguments of `UpdateOevProxyDataFeedWithSignedData`.
pub struct OevUpdateParams {
    pub oev_proxy: String,
    pub data_feed_id: HexBinary,
    pub update_id: HexBinary,
    pub timestamp: u32,
    pub data: Binary,
    pub packed_oev_update_signatures: Vec<PackedOevUpdateSignature>,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(FeedServerConfig)]
    Config {},

    /// Raw stored entry; the zero entry when never written.
    #[returns(DataFeed)]
    DataFeed { data_feed_id: HexBinary },

    #[returns(DataFeed)]
    ReadDataFeedWithId { data_feed_id: HexBinary },

    #[returns(DataFeed)]
    ReadDataFeedWithDapiName { dapi_name: String },

    #[returns(Option<HexBinary>)]
    DapiNameToDataFeedId { dapi_name: String },

    /// Raw overlay entry of a proxy.
    #[returns(DataFeed)]
    OevProxyDataFeed {
        oev_proxy: String,
        data_feed_id: HexBinary,
    },

    /// The overlay when it is newer than the base feed, otherwise the base feed.
    #[returns(DataFeed)]
    ReadDataFeedWithIdAsOevProxy {
        oev_proxy: String,
        data_feed_id: HexBinary,
    },

    #[returns(DataFeed)]
    ReadDataFeedWithDapiNameAsOevProxy {
        oev_proxy: String,
        dapi_name: String,
    },

    #[returns(Uint128)]
    OevProxyBalance { oev_proxy: String },
}
