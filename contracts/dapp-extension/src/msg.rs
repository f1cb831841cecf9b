use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, HexBinary, Int256, Uint128};
use oev_feeds_common::{DataFeed, SignedData};

use crate::state::{ExtensionConfig, LastPaidBid};

#[cw_serde]
pub struct InstantiateMsg {
    pub access_control_registry: String,
    pub feed_server: String,
    pub bid_denom: String,
    /// Signer id (20 bytes) of the manager's auctioneer key. Bids signed by
    /// it need no registry grant.
    pub manager_signer_id: Option<HexBinary>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Pay an auctioneer-awarded bid, then get called back with `data`.
    PayOevBid {
        dapp_id: u64,
        bid_amount: Uint128,
        signed_data_timestamp_cutoff: u32,
        /// Auctioneer signature over the bid
        signature: Binary,
        /// Passed through to the callback
        data: Binary,
    },
    /// Write a dApp overlay. Last bid updater only.
    UpdateDappOevDataFeed {
        dapp_id: u64,
        signed_data: Vec<SignedData>,
    },
    /// Send bid proceeds. Manager or withdrawer role only.
    Withdraw { recipient: String, amount: Uint128 },
    /// Update configuration. Manager only.
    UpdateConfig {
        manager: Option<String>,
        access_control_registry: Option<String>,
        feed_server: Option<String>,
        manager_signer_id: Option<HexBinary>,
    },
}

/// Arguments of `PayOevBid`.
pub struct PayOevBidParams {
    pub dapp_id: u64,
    pub bid_amount: Uint128,
    pub signed_data_timestamp_cutoff: u32,
    pub signature: Binary,
    pub data: Binary,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ExtensionConfig)]
    Config {},

    #[returns(Option<LastPaidBid>)]
    LastPaidBid { dapp_id: u64 },

    /// Raw overlay entry; the zero entry when never written.
    #[returns(DataFeed)]
    DappOevDataFeed { dapp_id: u64, data_feed_id: HexBinary },

    /// The overlay when it is newer than the base feed, otherwise the base feed.
    #[returns(DataFeed)]
    ReadDataFeedWithIdAsDapp { dapp_id: u64, data_feed_id: HexBinary },

    #[returns(DataFeed)]
    ReadDataFeedWithDapiNameAsDapp { dapp_id: u64, dapi_name: String },

    /// Dry run of `UpdateDappOevDataFeed` for any caller, with the
    /// furthest cut-off a bid could authorize right now.
    #[returns(DappUpdateSimulation)]
    SimulateDappOevDataFeedUpdate {
        dapp_id: u64,
        signed_data: Vec<SignedData>,
    },

    /// Forward a smart query and return its raw response.
    #[returns(Binary)]
    SimulateExternalCall { contract: String, msg: Binary },
}

#[cw_serde]
pub struct DappUpdateSimulation {
    pub data_feed_id: HexBinary,
    pub value: Int256,
    pub timestamp: u32,
    /// Member entries the update would write
    pub updated_beacons: Vec<BeaconEntry>,
}

#[cw_serde]
pub struct BeaconEntry {
    pub beacon_id: HexBinary,
    pub data_feed: DataFeed,
}

/// Subset of the feed server's query interface read by this contract.
#[cw_serde]
pub enum FeedServerQueryMsg {
    DataFeed { data_feed_id: HexBinary },
    DapiNameToDataFeedId { dapi_name: String },
}
