use cosmwasm_std::{
    coins, Addr, Binary, Coin, HexBinary, Int256, Timestamp, Uint128, Uint256, Uint64,
};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};

use lotto_automation::upkeep::{UPKEEP_DATA_PICK, UPKEEP_DATA_REQUEST};
use lotto_multitest::{first_attr, mint_native, mock_aggregator, query_balance_native};

const DENOM: &str = "ulotto";
const ENTRANCE_FEE: u128 = 100_000_000; // 100 USD
const INTERVAL: u64 = 30;
const INITIAL_ANSWER: i128 = 200_000_000_000; // 2000 USD at 8 decimals
const TICKET: u128 = 50_000; // ENTRANCE_FEE * 10^8 / INITIAL_ANSWER
const KEY_HASH: &str = "474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c";

fn request() -> Binary {
    Binary::from(UPKEEP_DATA_REQUEST)
}

fn pick() -> Binary {
    Binary::from(UPKEEP_DATA_PICK)
}

struct Protocol {
    app: App,
    owner: Addr,
    oracle: Addr,
    aggregator: Addr,
    price_converter: Addr,
    rng: Addr,
    lottery: Addr,
    automation: Addr,
}

/// Stores and instantiates the whole protocol and runs the two one-time
/// wiring operations.
fn setup() -> Protocol {
    let mut app = App::default();
    let owner = app.api().addr_make("owner");
    let oracle = app.api().addr_make("oracle");

    let code_id = app.store_code(Box::new(ContractWrapper::new(
        mock_aggregator::execute,
        mock_aggregator::instantiate,
        mock_aggregator::query,
    )));
    let aggregator = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &mock_aggregator::InstantiateMsg {
                decimals: 8,
                initial_answer: Int256::from(INITIAL_ANSWER),
            },
            &[],
            "Aggregator",
            None,
        )
        .unwrap();

    let code_id = app.store_code(Box::new(ContractWrapper::new(
        lotto_price_converter::contract::execute,
        lotto_price_converter::contract::instantiate,
        lotto_price_converter::contract::query,
    )));
    let price_converter = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &lotto_price_converter::msg::InstantiateMsg {
                price_feed: aggregator.to_string(),
            },
            &[],
            "PriceConverter",
            None,
        )
        .unwrap();

    let code_id = app.store_code(Box::new(ContractWrapper::new(
        lotto_rng::contract::execute,
        lotto_rng::contract::instantiate,
        lotto_rng::contract::query,
    )));
    let rng = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &lotto_rng::msg::InstantiateMsg {
                oracle: oracle.to_string(),
                key_hash: HexBinary::from_hex(KEY_HASH).unwrap(),
            },
            &[],
            "Rng",
            None,
        )
        .unwrap();

    let code_id = app.store_code(Box::new(
        ContractWrapper::new(
            lotto::contract::execute,
            lotto::contract::instantiate,
            lotto::contract::query,
        )
        .with_reply(lotto::contract::reply),
    ));
    let lottery = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &lotto::msg::InstantiateMsg {
                entrance_fee: Uint128::new(ENTRANCE_FEE),
                payment_denom: DENOM.to_string(),
                interval: INTERVAL,
                rng: rng.to_string(),
                price_converter: price_converter.to_string(),
            },
            &[],
            "Lottery",
            None,
        )
        .unwrap();

    let code_id = app.store_code(Box::new(ContractWrapper::new(
        lotto_automation::contract::execute,
        lotto_automation::contract::instantiate,
        lotto_automation::contract::query,
    )));
    let automation = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &lotto_automation::msg::InstantiateMsg {
                lottery: lottery.to_string(),
            },
            &[],
            "Automation",
            None,
        )
        .unwrap();

    // Make the mutually-aware contracts know each other
    app.execute_contract(
        owner.clone(),
        lottery.clone(),
        &lotto::msg::ExecuteMsg::SetAutomationAddr {
            addr: automation.to_string(),
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        owner.clone(),
        rng.clone(),
        &lotto_rng::msg::ExecuteMsg::SetApprovedContract {
            addr: lottery.to_string(),
        },
        &[],
    )
    .unwrap();

    Protocol {
        app,
        owner,
        oracle,
        aggregator,
        price_converter,
        rng,
        lottery,
        automation,
    }
}

impl Protocol {
    fn enter(&mut self, name: &str) -> Addr {
        let player = self.app.api().addr_make(name);
        mint_native(&mut self.app, &player, DENOM, TICKET);
        self.app
            .execute_contract(
                player.clone(),
                self.lottery.clone(),
                &lotto::msg::ExecuteMsg::Enter {},
                &coins(TICKET, DENOM),
            )
            .unwrap();
        player
    }

    fn advance_time(&mut self, seconds: u64) {
        self.app.update_block(|block| {
            block.height += 1;
            block.time = block.time.plus_seconds(seconds);
        });
    }

    fn check_upkeep(&self, data: Binary) -> bool {
        let response: lotto_automation::msg::UpkeepResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.automation,
                &lotto_automation::msg::QueryMsg::CheckUpkeep { data },
            )
            .unwrap();
        response.upkeep_needed
    }

    fn perform_upkeep(&mut self, data: Binary) -> AppResponse {
        let poller = self.app.api().addr_make("poller");
        self.app
            .execute_contract(
                poller,
                self.automation.clone(),
                &lotto_automation::msg::ExecuteMsg::PerformUpkeep { data },
                &[],
            )
            .unwrap()
    }

    /// Like perform_upkeep, but expects the call to fail and returns the
    /// automation contract's error
    fn perform_upkeep_err(&mut self, data: Binary) -> lotto_automation::error::ContractError {
        let poller = self.app.api().addr_make("poller");
        self.app
            .execute_contract(
                poller,
                self.automation.clone(),
                &lotto_automation::msg::ExecuteMsg::PerformUpkeep { data },
                &[],
            )
            .unwrap_err()
            .downcast::<lotto_automation::error::ContractError>()
            .unwrap()
    }

    fn fulfill(&mut self, request_id: u64, word: u128) -> AppResponse {
        self.app
            .execute_contract(
                self.oracle.clone(),
                self.rng.clone(),
                &lotto_rng::msg::ExecuteMsg::FulfillRandomWords {
                    request_id: Uint64::new(request_id),
                    words: vec![Uint256::from(word)],
                },
                &[],
            )
            .unwrap()
    }

    fn state(&self) -> lotto::state::LotteryState {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::State {})
            .unwrap()
    }

    fn player_count(&self) -> u32 {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::PlayerCount {})
            .unwrap()
    }

    fn player(&self, index: u32) -> Option<Addr> {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::Player { index })
            .unwrap()
    }

    fn checkpoint(&self) -> Timestamp {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::Checkpoint {})
            .unwrap()
    }

    fn request_id(&self) -> Option<Uint64> {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::RequestId {})
            .unwrap()
    }

    fn random_number(&self) -> Option<Uint256> {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::RandomNumber {})
            .unwrap()
    }

    fn recent_winner(&self) -> Option<Addr> {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::RecentWinner {})
            .unwrap()
    }

    fn current_entrance_fee(&self) -> Coin {
        self.app
            .wrap()
            .query_wasm_smart(&self.lottery, &lotto::msg::QueryMsg::CurrentEntranceFee {})
            .unwrap()
    }
}

#[test]
fn instantiation_and_wiring_works() {
    let p = setup();

    let lotto::msg::ConfigResponse { config } = p
        .app
        .wrap()
        .query_wasm_smart(&p.lottery, &lotto::msg::QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.entrance_fee, Uint128::new(ENTRANCE_FEE));
    assert_eq!(config.interval, INTERVAL);
    assert_eq!(config.rng, p.rng);
    assert_eq!(config.price_converter, p.price_converter);
    assert_eq!(config.automation, Some(p.automation.clone()));
    assert_eq!(p.state(), lotto::state::LotteryState::Open);
    assert_eq!(p.player_count(), 0);
    assert_eq!(p.recent_winner(), None);
    assert_eq!(p.request_id(), None);

    let lotto_rng::msg::ConfigResponse { config } = p
        .app
        .wrap()
        .query_wasm_smart(&p.rng, &lotto_rng::msg::QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.oracle, p.oracle);
    assert_eq!(config.approved, Some(p.lottery.clone()));

    let lotto_automation::msg::ConfigResponse { config } = p
        .app
        .wrap()
        .query_wasm_smart(&p.automation, &lotto_automation::msg::QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.lottery, p.lottery);
}

#[test]
fn wiring_is_one_time() {
    let mut p = setup();
    let somewhere = p.app.api().addr_make("somewhere");

    let err = p
        .app
        .execute_contract(
            p.owner.clone(),
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::SetAutomationAddr {
                addr: somewhere.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto::error::ContractError>().unwrap(),
        lotto::error::ContractError::ContractAlreadySet
    ));

    let err = p
        .app
        .execute_contract(
            p.owner.clone(),
            p.rng.clone(),
            &lotto_rng::msg::ExecuteMsg::SetApprovedContract {
                addr: somewhere.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto_rng::error::ContractError>().unwrap(),
        lotto_rng::error::ContractError::ContractAlreadySet
    ));
}

#[test]
fn enter_records_players_and_emits_event() {
    let mut p = setup();

    let alice = p.app.api().addr_make("alice");
    mint_native(&mut p.app, &alice, DENOM, TICKET);
    let res = p
        .app
        .execute_contract(
            alice.clone(),
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::Enter {},
            &coins(TICKET, DENOM),
        )
        .unwrap();
    let event = res
        .events
        .iter()
        .find(|event| event.ty == "wasm-lottery_entered")
        .unwrap();
    assert_eq!(first_attr(&event.attributes, "player").unwrap(), alice.to_string());
    assert_eq!(first_attr(&event.attributes, "slot").unwrap(), "0");

    let bob = p.enter("bob");
    assert_eq!(p.player_count(), 2);
    assert_eq!(p.player(0), Some(alice));
    assert_eq!(p.player(1), Some(bob));
    assert_eq!(p.player(2), None);
    assert_eq!(query_balance_native(&p.app, &p.lottery, DENOM).amount.u128(), 2 * TICKET);
}

#[test]
fn enter_requires_the_price_indexed_fee() {
    let mut p = setup();
    let alice = p.app.api().addr_make("alice");
    mint_native(&mut p.app, &alice, DENOM, TICKET);

    let err = p
        .app
        .execute_contract(
            alice.clone(),
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::Enter {},
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto::error::ContractError>().unwrap(),
        lotto::error::ContractError::InsufficientPayment
    ));

    let err = p
        .app
        .execute_contract(
            alice.clone(),
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::Enter {},
            &coins(TICKET - 1, DENOM),
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto::error::ContractError>().unwrap(),
        lotto::error::ContractError::InsufficientPayment
    ));
    assert_eq!(p.player_count(), 0);

    // when the asset price doubles, half the previous amount buys a slot
    p.app
        .execute_contract(
            p.owner.clone(),
            p.aggregator.clone(),
            &mock_aggregator::ExecuteMsg::UpdateAnswer {
                answer: Int256::from(2 * INITIAL_ANSWER),
            },
            &[],
        )
        .unwrap();
    assert_eq!(p.current_entrance_fee().amount.u128(), TICKET / 2);
    p.app
        .execute_contract(
            alice,
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::Enter {},
            &coins(TICKET / 2, DENOM),
        )
        .unwrap();
    assert_eq!(p.player_count(), 1);
}

#[test]
fn enter_fails_when_closed() {
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL * 10 + 1);
    p.perform_upkeep(request());

    let charlie = p.app.api().addr_make("charlie");
    mint_native(&mut p.app, &charlie, DENOM, TICKET);
    let err = p
        .app
        .execute_contract(
            charlie,
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::Enter {},
            &coins(TICKET, DENOM),
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto::error::ContractError>().unwrap(),
        lotto::error::ContractError::LotteryClosed
    ));
}

#[test]
fn check_upkeep_request_needs_players_and_elapsed_interval() {
    let mut p = setup();

    // lots of time but no players
    p.advance_time(INTERVAL * 10 + 1);
    assert!(!p.check_upkeep(request()));

    p.enter("alice");
    p.enter("bob");
    assert!(p.check_upkeep(request()));

    // unrecognized payloads never trigger anything
    assert!(!p.check_upkeep(Binary::from(b"restart".as_slice())));
    assert!(!p.check_upkeep(pick()));
}

#[test]
fn check_upkeep_pick_needs_fulfillment_and_cool_down() {
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL * 10 + 1);
    p.perform_upkeep(request());

    // no word delivered yet, the cool-down alone is not enough
    p.advance_time(INTERVAL + 1);
    assert!(!p.check_upkeep(pick()));

    // a fresh round: delivery inside the cool-down is not enough either
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL * 10 + 1);
    p.perform_upkeep(request());
    p.advance_time(1);
    p.fulfill(1, 7);
    p.advance_time(1);
    assert!(!p.check_upkeep(pick()));

    p.advance_time(INTERVAL);
    assert!(p.check_upkeep(pick()));
}

#[test]
fn perform_upkeep_request_closes_the_round() {
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL * 10 + 1);
    let res = p.perform_upkeep(request());

    assert_eq!(p.state(), lotto::state::LotteryState::Closed);
    assert_eq!(p.request_id(), Some(Uint64::new(1)));
    assert_eq!(p.checkpoint(), p.app.block_info().time);
    assert_eq!(p.recent_winner(), None);
    assert_eq!(p.player_count(), 2);

    let event = res
        .events
        .iter()
        .find(|event| event.ty == "wasm-winner_requested")
        .unwrap();
    assert_eq!(first_attr(&event.attributes, "request_id").unwrap(), "1");
    let event = res
        .events
        .iter()
        .find(|event| event.ty == "wasm-randomness_requested")
        .unwrap();
    assert_eq!(first_attr(&event.attributes, "key_hash").unwrap(), KEY_HASH);
}

#[test]
fn perform_upkeep_request_cannot_be_replayed() {
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL * 10 + 1);
    p.perform_upkeep(request());

    // the round is closed now, a redundant call fails without side effects
    let err = p.perform_upkeep_err(request());
    assert!(matches!(
        err,
        lotto_automation::error::ContractError::PerformUpkeepFailed { open: false, .. }
    ));
    assert_eq!(p.request_id(), Some(Uint64::new(1)));
}

#[test]
fn perform_upkeep_request_rejected_when_not_due() {
    let mut p = setup();
    p.enter("alice");

    // interval not elapsed
    let err = p.perform_upkeep_err(request());
    assert!(matches!(
        err,
        lotto_automation::error::ContractError::PerformUpkeepFailed {
            interval_elapsed: false,
            ..
        }
    ));

    // no participants
    let mut p = setup();
    p.advance_time(INTERVAL * 10 + 1);
    let err = p.perform_upkeep_err(request());
    assert!(matches!(
        err,
        lotto_automation::error::ContractError::PerformUpkeepFailed { players: 0, .. }
    ));
}

#[test]
fn perform_upkeep_pick_rejected_when_not_ready() {
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");

    // while the round is still open
    p.advance_time(INTERVAL + 1);
    let err = p.perform_upkeep_err(pick());
    assert!(matches!(
        err,
        lotto_automation::error::ContractError::PerformUpkeepFailed { open: true, .. }
    ));

    p.perform_upkeep(request());

    // fulfilled, but inside the cool-down
    p.fulfill(1, 7);
    let err = p.perform_upkeep_err(pick());
    assert!(matches!(
        err,
        lotto_automation::error::ContractError::PerformUpkeepFailed {
            interval_elapsed: false,
            ..
        }
    ));

    // past the cool-down but nothing fulfilled
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL + 1);
    p.perform_upkeep(request());
    p.advance_time(INTERVAL + 1);
    let err = p.perform_upkeep_err(pick());
    assert!(matches!(
        err,
        lotto_automation::error::ContractError::PerformUpkeepFailed {
            randomness_ready: false,
            ..
        }
    ));
}

#[test]
fn fulfillment_is_validated() {
    let mut p = setup();
    p.enter("alice");
    p.enter("bob");
    p.advance_time(INTERVAL + 1);
    p.perform_upkeep(request());
    assert_eq!(p.random_number(), None);

    // only the oracle may deliver
    let err = p
        .app
        .execute_contract(
            p.owner.clone(),
            p.rng.clone(),
            &lotto_rng::msg::ExecuteMsg::FulfillRandomWords {
                request_id: Uint64::new(1),
                words: vec![Uint256::from(7u32)],
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto_rng::error::ContractError>().unwrap(),
        lotto_rng::error::ContractError::Unauthorized
    ));

    // an unknown id leaves the stored word unchanged
    let err = p
        .app
        .execute_contract(
            p.oracle.clone(),
            p.rng.clone(),
            &lotto_rng::msg::ExecuteMsg::FulfillRandomWords {
                request_id: Uint64::new(9),
                words: vec![Uint256::from(7u32)],
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto_rng::error::ContractError>().unwrap(),
        lotto_rng::error::ContractError::UnknownRequest { .. }
    ));
    assert_eq!(p.random_number(), None);

    p.fulfill(1, 7);
    assert_eq!(p.random_number(), Some(Uint256::from(7u32)));
}

#[test]
fn full_round_settles_pays_and_reopens() {
    let mut p = setup();
    let players = [p.enter("alice"), p.enter("bob"), p.enter("charlie")];
    assert_eq!(query_balance_native(&p.app, &p.lottery, DENOM).amount.u128(), 3 * TICKET);

    p.advance_time(INTERVAL * 10 + 1);
    p.perform_upkeep(request());
    p.advance_time(1);
    p.fulfill(1, 7);
    p.advance_time(INTERVAL);
    let res = p.perform_upkeep(pick());

    // 7 mod 3 = 1 -> bob
    let winner = players[1].clone();
    let event = res
        .events
        .iter()
        .find(|event| event.ty == "wasm-winner_picked")
        .unwrap();
    assert_eq!(first_attr(&event.attributes, "winner").unwrap(), winner.to_string());
    assert_eq!(
        first_attr(&event.attributes, "payout").unwrap(),
        format!("{}{}", 3 * TICKET, DENOM)
    );

    // the whole pot went to the winner
    assert_eq!(
        query_balance_native(&p.app, &winner, DENOM).amount.u128(),
        3 * TICKET
    );
    assert_eq!(query_balance_native(&p.app, &p.lottery, DENOM).amount.u128(), 0);

    // and the lottery is back to a fresh open round
    assert_eq!(p.state(), lotto::state::LotteryState::Open);
    assert_eq!(p.player_count(), 0);
    assert_eq!(p.player(0), None);
    assert_eq!(p.recent_winner(), Some(winner));
    assert_eq!(p.checkpoint(), p.app.block_info().time);
    assert_eq!(p.request_id(), None);
    assert_eq!(p.random_number(), None);

    // the next round runs on a fresh registry and the next request id
    p.enter("dave");
    p.advance_time(INTERVAL + 1);
    p.perform_upkeep(request());
    assert_eq!(p.request_id(), Some(Uint64::new(2)));
}

#[test]
fn transitions_cannot_be_called_directly() {
    let mut p = setup();
    p.enter("alice");
    p.advance_time(INTERVAL + 1);
    let somebody = p.app.api().addr_make("somebody");

    let err = p
        .app
        .execute_contract(
            somebody.clone(),
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::BeginWinnerSelection {},
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto::error::ContractError>().unwrap(),
        lotto::error::ContractError::Unauthorized
    ));

    let err = p
        .app
        .execute_contract(
            somebody.clone(),
            p.lottery.clone(),
            &lotto::msg::ExecuteMsg::SettleWinner {},
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto::error::ContractError>().unwrap(),
        lotto::error::ContractError::Unauthorized
    ));

    let err = p
        .app
        .execute_contract(
            somebody,
            p.rng.clone(),
            &lotto_rng::msg::ExecuteMsg::RequestRandomWords {},
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast::<lotto_rng::error::ContractError>().unwrap(),
        lotto_rng::error::ContractError::Unauthorized
    ));
}
