//! Integration tests for the OEV feeds contracts.
//!
//! These tests exercise the contract entry points directly using
//! `cosmwasm_std::testing` mocks. The dApp extension reads the feed server
//! through `MockQuerier::update_wasm`, which dispatches into the real
//! feed server `query` entry point over its own mocked storage.
//!
//! Run:
//! ```bash
//! cargo test -p oev-feeds-integration-tests
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use cosmwasm_std::testing::{
    message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, Binary, ContractResult, Env, HexBinary, Int256,
    OwnedDeps, Reply, SubMsgResponse, SubMsgResult, SystemError, SystemResult, Uint128, WasmQuery,
};
use oev_feeds_common::collaborators::{
    AccessControlQueryMsg, OevProxyQueryMsg, AUCTIONEER_ROLE, DAPI_NAME_SETTER_ROLE,
};
use oev_feeds_common::signature::OevUpdateContext;
use oev_feeds_common::testing::{value_data, TestSigner};
use oev_feeds_common::{aggregate, derive_beacon_id, derive_beacon_set_id, DataFeed};

type MockDeps = OwnedDeps<MockStorage, MockApi, MockQuerier>;

// ─── Constants ───

const DENOM: &str = "uatom";
const DAPP_ID: u64 = 1;
const TEMPLATE_ID: [u8; 32] = [0x11; 32];

// ─── Harness ───

/// Both contracts plus the off-chain parties around them.
struct Harness {
    feed_server: Rc<RefCell<MockDeps>>,
    extension: MockDeps,
    env: Env,
    manager: Addr,
    searcher: Addr,
    relayer: Addr,
    auctioneer: TestSigner,
    airnodes: Vec<TestSigner>,
}

impl Harness {
    fn new() -> Self {
        let mut feed_server = mock_dependencies();
        let mut extension = mock_dependencies();
        let api = MockApi::default();
        let manager = api.addr_make("manager");
        let registry = api.addr_make("registry");
        let feed_server_addr = api.addr_make("feed_server");
        let auctioneer = TestSigner::new(200);

        oev_feed_server::contract::instantiate(
            feed_server.as_mut(),
            mock_env(),
            message_info(&manager, &[]),
            oev_feed_server::msg::InstantiateMsg {
                access_control_registry: registry.to_string(),
                payment_denom: DENOM.to_string(),
            },
        )
        .unwrap();

        oev_dapp_extension::contract::instantiate(
            extension.as_mut(),
            mock_env(),
            message_info(&manager, &[]),
            oev_dapp_extension::msg::InstantiateMsg {
                access_control_registry: registry.to_string(),
                feed_server: feed_server_addr.to_string(),
                bid_denom: DENOM.to_string(),
                manager_signer_id: None,
            },
        )
        .unwrap();

        let feed_server = Rc::new(RefCell::new(feed_server));
        let server = feed_server.clone();
        let auctioneer_account = hex::encode(auctioneer.id());
        extension.querier.update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == feed_server_addr.as_str() => {
                let msg: oev_feed_server::msg::QueryMsg = match from_json(msg) {
                    Ok(msg) => msg,
                    Err(err) => return SystemResult::Ok(ContractResult::Err(err.to_string())),
                };
                let res = oev_feed_server::contract::query(server.borrow().as_ref(), mock_env(), msg);
                SystemResult::Ok(res.map_err(|err| err.to_string()).into())
            }
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == registry.as_str() => {
                let AccessControlQueryMsg::HasRole { role, account } = from_json(msg).unwrap();
                let granted = role == AUCTIONEER_ROLE && account == auctioneer_account;
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&granted).unwrap()))
            }
            _ => SystemResult::Err(SystemError::NoSuchContract {
                addr: "unknown".to_string(),
            }),
        });

        Harness {
            feed_server,
            extension,
            env: mock_env(),
            manager,
            searcher: api.addr_make("searcher"),
            relayer: api.addr_make("relayer"),
            auctioneer,
            airnodes: vec![TestSigner::new(1), TestSigner::new(2), TestSigner::new(3)],
        }
    }

    fn now(&self) -> u32 {
        self.env.block.time.seconds() as u32
    }

    fn beacon_id(&self, index: usize) -> [u8; 32] {
        derive_beacon_id(&self.airnodes[index].id(), &TEMPLATE_ID)
    }

    fn beacon_set_id(&self) -> [u8; 32] {
        let ids: Vec<[u8; 32]> = (0..self.airnodes.len()).map(|i| self.beacon_id(i)).collect();
        derive_beacon_set_id(&ids)
    }

    fn execute_feed_server(
        &self,
        sender: &Addr,
        funds: &[cosmwasm_std::Coin],
        msg: oev_feed_server::msg::ExecuteMsg,
    ) -> Result<cosmwasm_std::Response, oev_feed_server::ContractError> {
        let mut deps = self.feed_server.borrow_mut();
        oev_feed_server::contract::execute(
            deps.as_mut(),
            self.env.clone(),
            message_info(sender, funds),
            msg,
        )
    }

    fn execute_extension(
        &mut self,
        sender: &Addr,
        funds: &[cosmwasm_std::Coin],
        msg: oev_dapp_extension::msg::ExecuteMsg,
    ) -> Result<cosmwasm_std::Response, oev_dapp_extension::ContractError> {
        oev_dapp_extension::contract::execute(
            self.extension.as_mut(),
            self.env.clone(),
            message_info(sender, funds),
            msg,
        )
    }

    fn update_beacon(
        &self,
        index: usize,
        timestamp: u32,
        value: i128,
    ) -> Result<cosmwasm_std::Response, oev_feed_server::ContractError> {
        let signer = &self.airnodes[index];
        let data = value_data(value);
        let msg = oev_feed_server::msg::ExecuteMsg::UpdateBeaconWithSignedData {
            airnode: signer.id_hex(),
            template_id: HexBinary::from(TEMPLATE_ID.to_vec()),
            timestamp,
            signature: signer.sign_base_update(&TEMPLATE_ID, timestamp, &data),
            data,
        };
        self.execute_feed_server(&self.relayer, &[], msg)
    }

    fn update_beacon_set(&self) -> Result<cosmwasm_std::Response, oev_feed_server::ContractError> {
        let beacon_ids = (0..self.airnodes.len())
            .map(|i| HexBinary::from(self.beacon_id(i).to_vec()))
            .collect();
        let msg = oev_feed_server::msg::ExecuteMsg::UpdateBeaconSetWithBeacons { beacon_ids };
        self.execute_feed_server(&self.relayer, &[], msg)
    }

    /// Pays a bid for the searcher and leaves its callback open.
    fn pay_bid(&mut self, cutoff: u32) -> cosmwasm_std::Response {
        let searcher = self.searcher.clone();
        let msg = oev_dapp_extension::msg::ExecuteMsg::PayOevBid {
            dapp_id: DAPP_ID,
            bid_amount: Uint128::new(1_000),
            signed_data_timestamp_cutoff: cutoff,
            signature: self.auctioneer.sign_bid(
                &self.env.block.chain_id,
                DAPP_ID,
                searcher.as_str(),
                1_000,
                cutoff,
            ),
            data: Binary::from(b"liquidate".to_vec()),
        };
        self.execute_extension(&searcher, &coins(1_000, DENOM), msg)
            .unwrap()
    }

    #[allow(deprecated)]
    fn finish_callback(&mut self) {
        let reply = Reply {
            id: oev_dapp_extension::execute::BID_CALLBACK_REPLY_ID,
            payload: Binary::default(),
            gas_used: 0,
            result: SubMsgResult::Ok(SubMsgResponse {
                events: vec![],
                data: None,
                msg_responses: vec![],
            }),
        };
        oev_dapp_extension::contract::reply(self.extension.as_mut(), self.env.clone(), reply)
            .unwrap();
    }

    fn update_dapp_feed(
        &mut self,
        signed_data: Vec<oev_feeds_common::SignedData>,
    ) -> Result<cosmwasm_std::Response, oev_dapp_extension::ContractError> {
        let searcher = self.searcher.clone();
        self.execute_extension(
            &searcher,
            &[],
            oev_dapp_extension::msg::ExecuteMsg::UpdateDappOevDataFeed {
                dapp_id: DAPP_ID,
                signed_data,
            },
        )
    }

    fn query_extension<T: serde::de::DeserializeOwned>(
        &self,
        msg: oev_dapp_extension::msg::QueryMsg,
    ) -> cosmwasm_std::StdResult<T> {
        let res = oev_dapp_extension::contract::query(self.extension.as_ref(), self.env.clone(), msg)?;
        from_json(res)
    }

    fn query_feed_server<T: serde::de::DeserializeOwned>(
        &self,
        msg: oev_feed_server::msg::QueryMsg,
    ) -> cosmwasm_std::StdResult<T> {
        let deps = self.feed_server.borrow();
        let res = oev_feed_server::contract::query(deps.as_ref(), self.env.clone(), msg)?;
        from_json(res)
    }

    fn read_as_dapp(&self, data_feed_id: [u8; 32]) -> cosmwasm_std::StdResult<DataFeed> {
        self.query_extension(oev_dapp_extension::msg::QueryMsg::ReadDataFeedWithIdAsDapp {
            dapp_id: DAPP_ID,
            data_feed_id: HexBinary::from(data_feed_id.to_vec()),
        })
    }
}

fn feed(value: i128, timestamp: u32) -> DataFeed {
    DataFeed {
        value: Int256::from(value),
        timestamp,
    }
}

// ─── Base feeds ───

#[test]
fn test_beacon_update_then_duplicate_rejected() {
    let h = Harness::new();
    let t = h.now();

    h.update_beacon(0, t, 1_824_970_000).unwrap();
    let stored: DataFeed = h
        .query_feed_server(oev_feed_server::msg::QueryMsg::ReadDataFeedWithId {
            data_feed_id: HexBinary::from(h.beacon_id(0).to_vec()),
        })
        .unwrap();
    assert_eq!(stored, feed(1_824_970_000, t));

    let err = h.update_beacon(0, t, 1_824_970_000).unwrap_err();
    assert_eq!(err.to_string(), "Does not update timestamp");

    // Readers of the extension see the base feed while no overlay exists
    assert_eq!(h.read_as_dapp(h.beacon_id(0)).unwrap(), feed(1_824_970_000, t));
}

#[test]
fn test_beacon_set_median_through_dapi_name() {
    let h = Harness::new();
    let t = h.now();
    for (i, value) in [100, 80, 120].into_iter().enumerate() {
        h.update_beacon(i, t, value).unwrap();
    }
    h.update_beacon_set().unwrap();

    h.execute_feed_server(
        &h.manager,
        &[],
        oev_feed_server::msg::ExecuteMsg::SetDapiName {
            dapi_name: "ETH/USD".to_string(),
            data_feed_id: HexBinary::from(h.beacon_set_id().to_vec()),
        },
    )
    .unwrap();

    let by_name: DataFeed = h
        .query_feed_server(oev_feed_server::msg::QueryMsg::ReadDataFeedWithDapiName {
            dapi_name: "ETH/USD".to_string(),
        })
        .unwrap();
    assert_eq!(by_name, feed(100, t));

    let as_dapp: DataFeed = h
        .query_extension(oev_dapp_extension::msg::QueryMsg::ReadDataFeedWithDapiNameAsDapp {
            dapp_id: DAPP_ID,
            dapi_name: "ETH/USD".to_string(),
        })
        .unwrap();
    assert_eq!(as_dapp, feed(100, t));

    let err = h.update_beacon_set().unwrap_err();
    assert_eq!(err.to_string(), "Does not update Beacon set");
}

#[test]
fn test_set_dapi_name_goes_through_registry() {
    let h = Harness::new();
    let setter = MockApi::default().addr_make("setter");
    let registry = MockApi::default().addr_make("registry");
    h.feed_server
        .borrow_mut()
        .querier
        .update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == registry.as_str() => {
                let AccessControlQueryMsg::HasRole { role, account } = from_json(msg).unwrap();
                let granted = role == DAPI_NAME_SETTER_ROLE && account == setter.as_str();
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&granted).unwrap()))
            }
            _ => SystemResult::Err(SystemError::NoSuchContract {
                addr: "unknown".to_string(),
            }),
        });

    let msg = oev_feed_server::msg::ExecuteMsg::SetDapiName {
        dapi_name: "BTC/USD".to_string(),
        data_feed_id: HexBinary::from(h.beacon_id(0).to_vec()),
    };
    let err = h.execute_feed_server(&h.relayer, &[], msg.clone()).unwrap_err();
    assert!(err.to_string().starts_with("unauthorized"));

    let setter = MockApi::default().addr_make("setter");
    h.execute_feed_server(&setter, &[], msg).unwrap();
}

// ─── dApp OEV auction ───

#[test]
fn test_bid_then_update_inside_callback() {
    let mut h = Harness::new();
    let t = h.now();
    let id = h.beacon_id(0);
    h.update_beacon(0, t - 30, 1_000).unwrap();

    let res = h.pay_bid(t + 10);
    assert_eq!(res.messages.len(), 1);

    // The searcher's callback writes the overlay before the reply unlocks bids
    let signed = h.airnodes[0].signed_data(&TEMPLATE_ID, t + 5, 1_050);
    h.update_dapp_feed(vec![signed.clone()]).unwrap();
    h.finish_callback();

    assert_eq!(h.read_as_dapp(id).unwrap(), feed(1_050, t + 5));
    let base: DataFeed = h
        .query_feed_server(oev_feed_server::msg::QueryMsg::ReadDataFeedWithId {
            data_feed_id: HexBinary::from(id.to_vec()),
        })
        .unwrap();
    assert_eq!(base, feed(1_000, t - 30));

    let err = h.update_dapp_feed(vec![signed]).unwrap_err();
    assert_eq!(err.to_string(), "Does not update timestamp");

    let late = h.airnodes[0].signed_data(&TEMPLATE_ID, t + 15, 1_100);
    let err = h.update_dapp_feed(vec![late]).unwrap_err();
    assert_eq!(err.to_string(), "Timestamp exceeds cut-off");
}

#[test]
fn test_nested_bid_is_rejected_until_reply() {
    let mut h = Harness::new();
    let t = h.now();

    h.pay_bid(t + 10);
    let searcher = h.searcher.clone();
    let msg = oev_dapp_extension::msg::ExecuteMsg::PayOevBid {
        dapp_id: DAPP_ID,
        bid_amount: Uint128::new(1_000),
        signed_data_timestamp_cutoff: t + 20,
        signature: h
            .auctioneer
            .sign_bid(&h.env.block.chain_id, DAPP_ID, searcher.as_str(), 1_000, t + 20),
        data: Binary::default(),
    };
    let err = h
        .execute_extension(&searcher, &coins(1_000, DENOM), msg.clone())
        .unwrap_err();
    assert_eq!(err.to_string(), "reentrant call");

    h.finish_callback();
    h.execute_extension(&searcher, &coins(1_000, DENOM), msg)
        .unwrap();
}

#[test]
fn test_stale_signed_members_fall_back_to_base() {
    let mut h = Harness::new();
    let t = h.now();

    // Public base data: member 0 is fresh, members 1 and 2 are old
    h.update_beacon(0, t, 200).unwrap();
    h.update_beacon(1, t - 100, 90).unwrap();
    h.update_beacon(2, t - 100, 110).unwrap();

    h.pay_bid(t + 10);
    let signed = vec![
        h.airnodes[0].signed_data(&TEMPLATE_ID, t - 50, 10),
        h.airnodes[1].signed_data(&TEMPLATE_ID, t + 5, 95),
        h.airnodes[2].abstention(&TEMPLATE_ID),
    ];

    let simulated: oev_dapp_extension::msg::DappUpdateSimulation = h
        .query_extension(
            oev_dapp_extension::msg::QueryMsg::SimulateDappOevDataFeedUpdate {
                dapp_id: DAPP_ID,
                signed_data: signed.clone(),
            },
        )
        .unwrap();

    h.update_dapp_feed(signed).unwrap();
    h.finish_callback();

    let expected = aggregate(&[feed(200, t), feed(95, t + 5), feed(110, t - 100)]).unwrap();
    let overlay = h.read_as_dapp(h.beacon_set_id()).unwrap();
    assert_eq!(overlay, expected);
    assert_eq!(overlay, feed(110, t));

    assert_eq!(simulated.value, expected.value);
    assert_eq!(simulated.timestamp, expected.timestamp);
    assert_eq!(
        simulated.data_feed_id,
        HexBinary::from(h.beacon_set_id().to_vec())
    );
    assert_eq!(simulated.updated_beacons.len(), 1);

    // Member 0 never got an overlay entry of its own
    let member: DataFeed = h
        .query_extension(oev_dapp_extension::msg::QueryMsg::DappOevDataFeed {
            dapp_id: DAPP_ID,
            data_feed_id: HexBinary::from(h.beacon_id(0).to_vec()),
        })
        .unwrap();
    assert!(!member.is_initialized());
}

#[test]
fn test_later_bid_needs_later_cutoff() {
    let mut h = Harness::new();
    let t = h.now();

    h.pay_bid(t + 10);
    h.finish_callback();

    let searcher = h.searcher.clone();
    let msg = oev_dapp_extension::msg::ExecuteMsg::PayOevBid {
        dapp_id: DAPP_ID,
        bid_amount: Uint128::new(1_000),
        signed_data_timestamp_cutoff: t + 10,
        signature: h
            .auctioneer
            .sign_bid(&h.env.block.chain_id, DAPP_ID, searcher.as_str(), 1_000, t + 10),
        data: Binary::default(),
    };
    let err = h
        .execute_extension(&searcher, &coins(1_000, DENOM), msg)
        .unwrap_err();
    assert_eq!(err.to_string(), "Cut-off not more recent");
}

// ─── Legacy OEV proxies ───

#[test]
fn test_oev_proxy_update_and_withdraw() {
    let h = Harness::new();
    let t = h.now();
    let api = MockApi::default();
    let proxy = api.addr_make("proxy");
    let beneficiary = api.addr_make("beneficiary");
    let proxy_addr = proxy.to_string();
    let beneficiary_addr = beneficiary.to_string();
    h.feed_server
        .borrow_mut()
        .querier
        .update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == proxy_addr => {
                let OevProxyQueryMsg::AnnouncedBeneficiary {} = from_json(msg).unwrap();
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&beneficiary_addr).unwrap()))
            }
            _ => SystemResult::Err(SystemError::NoSuchContract {
                addr: "unknown".to_string(),
            }),
        });

    for (i, value) in [100, 80, 120].into_iter().enumerate() {
        h.update_beacon(i, t - 60, value).unwrap();
    }
    h.update_beacon_set().unwrap();

    let data_feed_id = h.beacon_set_id();
    let update_id = [0x42; 32];
    let data = value_data(150);
    let store = h.env.contract.address.to_string();
    let ctx = OevUpdateContext {
        chain_id: &h.env.block.chain_id,
        store: &store,
        oev_proxy: proxy.as_str(),
        data_feed_id: &data_feed_id,
        update_id: &update_id,
        timestamp: t,
        data: &data,
        updater: h.searcher.as_str(),
        payment: 5_000,
    };
    let mut packed: Vec<_> = h
        .airnodes
        .iter()
        .map(|signer| signer.sign_oev_update(&ctx, &TEMPLATE_ID))
        .collect();
    packed[1].signature = Binary::default();

    h.execute_feed_server(
        &h.searcher,
        &coins(5_000, DENOM),
        oev_feed_server::msg::ExecuteMsg::UpdateOevProxyDataFeedWithSignedData {
            oev_proxy: proxy.to_string(),
            data_feed_id: HexBinary::from(data_feed_id.to_vec()),
            update_id: HexBinary::from(update_id.to_vec()),
            timestamp: t,
            data: data.clone(),
            packed_oev_update_signatures: packed,
        },
    )
    .unwrap();

    let as_proxy: DataFeed = h
        .query_feed_server(oev_feed_server::msg::QueryMsg::ReadDataFeedWithIdAsOevProxy {
            oev_proxy: proxy.to_string(),
            data_feed_id: HexBinary::from(data_feed_id.to_vec()),
        })
        .unwrap();
    assert_eq!(as_proxy, feed(150, t));

    // The overlay is private to the proxy
    let public: DataFeed = h
        .query_feed_server(oev_feed_server::msg::QueryMsg::ReadDataFeedWithId {
            data_feed_id: HexBinary::from(data_feed_id.to_vec()),
        })
        .unwrap();
    assert_eq!(public, feed(100, t - 60));

    h.feed_server
        .borrow_mut()
        .querier
        .bank
        .update_balance(h.env.contract.address.as_str(), coins(5_000, DENOM));
    let anyone = api.addr_make("anyone");
    let res = h
        .execute_feed_server(
            &anyone,
            &[],
            oev_feed_server::msg::ExecuteMsg::Withdraw {
                oev_proxy: proxy.to_string(),
            },
        )
        .unwrap();
    assert_eq!(res.messages.len(), 1);

    let balance: Uint128 = h
        .query_feed_server(oev_feed_server::msg::QueryMsg::OevProxyBalance {
            oev_proxy: proxy.to_string(),
        })
        .unwrap();
    assert!(balance.is_zero());
}
