use cosmwasm_std::{
    coins, to_json_binary, BankMsg, DepsMut, Env, Event, HexBinary, MessageInfo, QuerierWrapper,
    Response, StdResult, Storage, SubMsg, Uint128, WasmMsg,
};
use oev_feeds_common::collaborators::{
    has_role, SearcherCallbackMsg, AUCTIONEER_ROLE, WITHDRAWER_ROLE,
};
use oev_feeds_common::signature::bid_digest;
use oev_feeds_common::value::max_cutoff;
use oev_feeds_common::{attached_payment, recover_signer, SignedData};

use crate::error::ContractError;
use crate::msg::PayOevBidParams;
use crate::state::{ExtensionConfig, LastPaidBid, CALLBACK_IN_PROGRESS, CONFIG, LAST_PAID_BIDS};
use crate::update::{apply_dapp_update, process_dapp_update};

pub const BID_CALLBACK_REPLY_ID: u64 = 1;

fn ensure_not_reentrant(storage: &dyn Storage) -> Result<(), ContractError> {
    if CALLBACK_IN_PROGRESS.may_load(storage)?.unwrap_or_default() {
        return Err(ContractError::ReentrantCall);
    }
    Ok(())
}

pub fn validate_signer_id(id: HexBinary) -> Result<HexBinary, ContractError> {
    id.to_array::<20>()?;
    Ok(id)
}

/// The manager's own key, or any key holding the auctioneer role.
fn is_auctioneer(
    querier: &QuerierWrapper,
    config: &ExtensionConfig,
    signer_id: &[u8; 20],
) -> StdResult<bool> {
    if let Some(manager_signer_id) = &config.manager_signer_id {
        if manager_signer_id.as_slice() == signer_id.as_slice() {
            return Ok(true);
        }
    }
    has_role(
        querier,
        &config.access_control_registry,
        &config.manager,
        AUCTIONEER_ROLE,
        &hex::encode(signer_id),
    )
}

/// Pay a bid awarded by an auctioneer and hand control back to the sender.
///
/// The sender receives `OevBidPaymentCallback` as a submessage. While it
/// runs, `PayOevBid` and `Withdraw` are locked; `UpdateDappOevDataFeed` is not.
pub fn pay_oev_bid(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: PayOevBidParams,
) -> Result<Response, ContractError> {
    ensure_not_reentrant(deps.storage)?;
    let PayOevBidParams {
        dapp_id,
        bid_amount,
        signed_data_timestamp_cutoff: cutoff,
        signature,
        data,
    } = params;

    if dapp_id == 0 {
        return Err(ContractError::DappIdZero);
    }
    if cutoff == 0 {
        return Err(ContractError::CutoffZero);
    }
    if cutoff > max_cutoff(env.block.time.seconds()) {
        return Err(ContractError::CutoffTooFarInFuture);
    }

    let config = CONFIG.load(deps.storage)?;
    let digest = bid_digest(
        &env.block.chain_id,
        dapp_id,
        info.sender.as_str(),
        bid_amount.u128(),
        cutoff,
    );
    let auctioneer = recover_signer(deps.api, &digest, &signature)
        .map_err(|_| ContractError::SignatureMismatch)?;
    if !is_auctioneer(&deps.querier, &config, &auctioneer)? {
        return Err(ContractError::SignatureMismatch);
    }

    if let Some(last) = LAST_PAID_BIDS.may_load(deps.storage, dapp_id)? {
        if cutoff <= last.signed_data_timestamp_cutoff {
            return Err(ContractError::CutoffNotMoreRecent);
        }
    }

    let payment = attached_payment(&info, &config.bid_denom)?;
    if payment < bid_amount {
        return Err(ContractError::BidPaymentShort);
    }

    LAST_PAID_BIDS.save(
        deps.storage,
        dapp_id,
        &LastPaidBid {
            updater: info.sender.clone(),
            signed_data_timestamp_cutoff: cutoff,
        },
    )?;
    CALLBACK_IN_PROGRESS.save(deps.storage, &true)?;

    let callback = WasmMsg::Execute {
        contract_addr: info.sender.to_string(),
        msg: to_json_binary(&SearcherCallbackMsg::OevBidPaymentCallback {
            dapp_id,
            bid_amount,
            signed_data_timestamp_cutoff: cutoff,
            data,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(callback, BID_CALLBACK_REPLY_ID))
        .add_attribute("action", "pay_oev_bid")
        .add_attribute("dapp_id", dapp_id.to_string())
        .add_attribute("bid_amount", bid_amount.to_string())
        .add_event(
            Event::new("oev_bid_paid")
                .add_attribute("dapp_id", dapp_id.to_string())
                .add_attribute("updater", info.sender.to_string())
                .add_attribute("bid_amount", bid_amount.to_string())
                .add_attribute("payment", payment.to_string())
                .add_attribute("signed_data_timestamp_cutoff", cutoff.to_string())
                .add_attribute("auctioneer", hex::encode(auctioneer)),
        ))
}

/// Write a dApp overlay. Only the updater of the dApp's last paid bid can call.
pub fn update_dapp_oev_data_feed(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    dapp_id: u64,
    signed_data: Vec<SignedData>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let last = LAST_PAID_BIDS
        .may_load(deps.storage, dapp_id)?
        .filter(|last| last.updater == info.sender)
        .ok_or(ContractError::SenderNotLastBidUpdater)?;

    let update = process_dapp_update(
        deps.as_ref(),
        &config.feed_server,
        dapp_id,
        &signed_data,
        last.signed_data_timestamp_cutoff,
    )?;
    apply_dapp_update(deps.storage, dapp_id, &update)?;

    let data_feed_id_hex = hex::encode(update.data_feed_id);
    Ok(Response::new()
        .add_attribute("action", "update_dapp_oev_data_feed")
        .add_attribute("dapp_id", dapp_id.to_string())
        .add_attribute("data_feed_id", data_feed_id_hex.clone())
        .add_event(
            Event::new("oev_dapp_data_feed_updated")
                .add_attribute("dapp_id", dapp_id.to_string())
                .add_attribute("data_feed_id", data_feed_id_hex)
                .add_attribute("value", update.data_feed.value.to_string())
                .add_attribute("timestamp", update.data_feed.timestamp.to_string())
                .add_attribute("updated_beacons", update.beacon_writes.len().to_string())
                .add_attribute("sender", info.sender.to_string()),
        ))
}

/// Send bid proceeds to `recipient`. Manager or withdrawer role only.
pub fn withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    ensure_not_reentrant(deps.storage)?;
    let config = CONFIG.load(deps.storage)?;
    if !has_role(
        &deps.querier,
        &config.access_control_registry,
        &config.manager,
        WITHDRAWER_ROLE,
        info.sender.as_str(),
    )? {
        return Err(ContractError::Unauthorized {
            reason: "sender cannot withdraw".to_string(),
        });
    }

    if recipient.is_empty() {
        return Err(ContractError::RecipientAddressZero);
    }
    let recipient = deps.api.addr_validate(&recipient)?;
    if amount.is_zero() {
        return Err(ContractError::AmountZero);
    }

    let available = deps
        .querier
        .query_balance(&env.contract.address, &config.bid_denom)?
        .amount;
    if available < amount {
        return Err(ContractError::WithdrawalReverted);
    }

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: coins(amount.u128(), &config.bid_denom),
        })
        .add_attribute("action", "withdraw")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("oev_withdrawn")
                .add_attribute("recipient", recipient.to_string())
                .add_attribute("amount", amount.to_string())
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
    feed_server: Option<String>,
    manager_signer_id: Option<HexBinary>,
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
    if let Some(feed_server) = feed_server {
        config.feed_server = deps.api.addr_validate(&feed_server)?;
    }
    if let Some(manager_signer_id) = manager_signer_id {
        config.manager_signer_id = Some(validate_signer_id(manager_signer_id)?);
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_attribute("manager", config.manager.to_string())
        .add_attribute("feed_server", config.feed_server.to_string()))
}
