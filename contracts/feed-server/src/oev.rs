use cosmwasm_std::{coins, BankMsg, DepsMut, Env, Event, MessageInfo, Response, Uint128};
use oev_feeds_common::collaborators::OevProxyQueryMsg;
use oev_feeds_common::signature::OevUpdateContext;
use oev_feeds_common::{
    attached_payment, derive_beacon_id, derive_beacon_set_id, recover_signer, DataFeed,
};

use crate::error::ContractError;
use crate::execute::validate_update;
use crate::msg::OevUpdateParams;
use crate::state::{CONFIG, OEV_PROXY_BALANCES, OEV_PROXY_DATA_FEEDS};

/// Write a proxy's OEV overlay with data signed by a quorum of the feed's airnodes.
///
/// Each signature commits to the full call context (chain, this contract,
/// proxy, feed, update id, timestamp, data, sender and payment). Empty
/// signatures count as abstentions.
pub fn update_oev_proxy_data_feed_with_signed_data(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: OevUpdateParams,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let oev_proxy = deps.api.addr_validate(&params.oev_proxy)?;
    let data_feed_id = params.data_feed_id.to_array::<32>()?;
    let update_id = params.update_id.to_array::<32>()?;
    let payment = attached_payment(&info, &config.payment_denom)?;

    let signatures = &params.packed_oev_update_signatures;
    if signatures.is_empty() {
        return Err(ContractError::NoSignatures);
    }

    // Decode every member before checking anything else
    let mut members = Vec::with_capacity(signatures.len());
    for packed in signatures {
        let airnode = packed.airnode.to_array::<20>()?;
        let template_id = packed.template_id.to_array::<32>()?;
        members.push((airnode, template_id, &packed.signature));
    }

    if members.len() == 1 {
        let (airnode, template_id, signature) = &members[0];
        if derive_beacon_id(airnode, template_id) != data_feed_id {
            return Err(ContractError::BeaconIdMismatch);
        }
        if signature.is_empty() {
            return Err(ContractError::MissingSignature);
        }
    } else {
        let beacon_ids: Vec<[u8; 32]> = members
            .iter()
            .map(|(airnode, template_id, _)| derive_beacon_id(airnode, template_id))
            .collect();
        if derive_beacon_set_id(&beacon_ids) != data_feed_id {
            return Err(ContractError::BeaconSetIdMismatch);
        }
        let present = members.iter().filter(|(_, _, sig)| !sig.is_empty()).count();
        if present * 2 <= members.len() {
            return Err(ContractError::NotEnoughSignatures);
        }
    }

    let store = env.contract.address.to_string();
    let context = OevUpdateContext {
        chain_id: &env.block.chain_id,
        store: &store,
        oev_proxy: oev_proxy.as_str(),
        data_feed_id: &data_feed_id,
        update_id: &update_id,
        timestamp: params.timestamp,
        data: &params.data,
        updater: info.sender.as_str(),
        payment: payment.u128(),
    };
    for (airnode, template_id, signature) in &members {
        if signature.is_empty() {
            continue;
        }
        let digest = context.member_digest(template_id);
        let signer = recover_signer(deps.api, &digest, signature)
            .map_err(|_| ContractError::SignatureMismatch)?;
        if &signer != airnode {
            return Err(ContractError::SignatureMismatch);
        }
    }

    let stored = OEV_PROXY_DATA_FEEDS
        .may_load(deps.storage, (&oev_proxy, data_feed_id.as_slice()))?
        .unwrap_or_else(DataFeed::uninitialized);
    let updated = validate_update(
        env.block.time.seconds(),
        &stored,
        params.timestamp,
        &params.data,
    )?;
    OEV_PROXY_DATA_FEEDS.save(
        deps.storage,
        (&oev_proxy, data_feed_id.as_slice()),
        &updated,
    )?;

    let balance = OEV_PROXY_BALANCES
        .may_load(deps.storage, &oev_proxy)?
        .unwrap_or_default();
    OEV_PROXY_BALANCES.save(deps.storage, &oev_proxy, &(balance + payment))?;

    let data_feed_id_hex = hex::encode(data_feed_id);
    Ok(Response::new()
        .add_attribute("action", "update_oev_proxy_data_feed_with_signed_data")
        .add_attribute("oev_proxy", oev_proxy.to_string())
        .add_attribute("data_feed_id", data_feed_id_hex.clone())
        .add_event(
            Event::new("oev_proxy_data_feed_updated")
                .add_attribute("oev_proxy", oev_proxy.to_string())
                .add_attribute("data_feed_id", data_feed_id_hex)
                .add_attribute("update_id", hex::encode(update_id))
                .add_attribute("value", updated.value.to_string())
                .add_attribute("timestamp", updated.timestamp.to_string())
                .add_attribute("payment", payment.to_string())
                .add_attribute("sender", info.sender.to_string()),
        ))
}

/// Send a proxy's whole escrow to the beneficiary it announces. Anyone can call.
pub fn withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    oev_proxy: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let oev_proxy = deps.api.addr_validate(&oev_proxy)?;

    let beneficiary: String = deps
        .querier
        .query_wasm_smart(&oev_proxy, &OevProxyQueryMsg::AnnouncedBeneficiary {})?;
    if beneficiary.is_empty() {
        return Err(ContractError::BeneficiaryAddressZero);
    }
    let beneficiary = deps.api.addr_validate(&beneficiary)?;

    let balance = OEV_PROXY_BALANCES
        .may_load(deps.storage, &oev_proxy)?
        .unwrap_or_default();
    if balance.is_zero() {
        return Err(ContractError::OevProxyBalanceZero);
    }

    let available = deps
        .querier
        .query_balance(&env.contract.address, &config.payment_denom)?
        .amount;
    if available < balance {
        return Err(ContractError::WithdrawalReverted);
    }

    OEV_PROXY_BALANCES.save(deps.storage, &oev_proxy, &Uint128::zero())?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: beneficiary.to_string(),
            amount: coins(balance.u128(), &config.payment_denom),
        })
        .add_attribute("action", "withdraw")
        .add_attribute("oev_proxy", oev_proxy.to_string())
        .add_attribute("amount", balance.to_string())
        .add_event(
            Event::new("oev_proxy_withdrawn")
                .add_attribute("oev_proxy", oev_proxy.to_string())
                .add_attribute("beneficiary", beneficiary.to_string())
                .add_attribute("amount", balance.to_string())
                .add_attribute("sender", info.sender.to_string()),
        ))
}
