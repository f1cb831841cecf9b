use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, QuerierWrapper, StdResult, Uint128};

/// May bind dAPI names to feed ids on the feed server.
pub const DAPI_NAME_SETTER_ROLE: &str = "dapi_name_setter";
/// Signs bid awards for the dApp extension.
pub const AUCTIONEER_ROLE: &str = "auctioneer";
/// May withdraw bid proceeds from the dApp extension.
pub const WITHDRAWER_ROLE: &str = "withdrawer";

/// Query interface of the external access-control registry.
#[cw_serde]
pub enum AccessControlQueryMsg {
    /// Returns `bool`.
    HasRole { role: String, account: String },
}

/// Query interface of a consumer OEV proxy.
#[cw_serde]
pub enum OevProxyQueryMsg {
    /// Returns the beneficiary address as a `String`; empty when unset.
    AnnouncedBeneficiary {},
}

/// Execute message delivered to a searcher right after its bid is recorded.
#[cw_serde]
pub enum SearcherCallbackMsg {
    OevBidPaymentCallback {
        dapp_id: u64,
        bid_amount: Uint128,
        signed_data_timestamp_cutoff: u32,
        data: Binary,
    },
}

/// Role check against the registry. The manager holds every role.
pub fn has_role(
    querier: &QuerierWrapper,
    registry: &Addr,
    manager: &Addr,
    role: &str,
    account: &str,
) -> StdResult<bool> {
    if manager.as_str() == account {
        return Ok(true);
    }
    querier.query_wasm_smart(
        registry,
        &AccessControlQueryMsg::HasRole {
            role: role.to_string(),
            account: account.to_string(),
        },
    )
}
