use cosmwasm_std::{
    ensure_eq, to_json_binary, Addr, BankMsg, Coin, Deps, DepsMut, Env, Event, MessageInfo, Order,
    QueryResponse, Reply, Response, StdError, StdResult, SubMsg, Timestamp, Uint256, Uint64,
    WasmMsg,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::attributes::{
    ATTR_CHECKPOINT, ATTR_PAYOUT, ATTR_PLAYER, ATTR_REQUEST_ID, ATTR_SLOT, ATTR_WINNER,
    EVENT_TYPE_ENTERED, EVENT_TYPE_WINNER_PICKED, EVENT_TYPE_WINNER_REQUESTED,
};
use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, PlayersResponse, QueryMsg, RoundResponse,
};
use crate::state::{
    Config, LotteryState, CHECKPOINT, CONFIG, PLAYERS, PLAYER_COUNT, RECENT_WINNER, STATE,
};

const CONTRACT_NAME: &str = "crates.io:lotto";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const REQUEST_RANDOM_WORDS_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let rng = deps.api.addr_validate(&msg.rng)?;
    let price_converter = deps.api.addr_validate(&msg.price_converter)?;
    CONFIG.save(
        deps.storage,
        &Config {
            entrance_fee: msg.entrance_fee,
            payment_denom: msg.payment_denom,
            interval: msg.interval,
            rng,
            price_converter,
            manager: info.sender,
            automation: None,
        },
    )?;
    STATE.save(deps.storage, &LotteryState::Open)?;
    CHECKPOINT.save(deps.storage, &env.block.time)?;
    PLAYER_COUNT.save(deps.storage, &0)?;
    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("entrance_fee", msg.entrance_fee.to_string())
        .add_attribute("interval", msg.interval.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Enter {} => execute_enter(deps, info),
        ExecuteMsg::BeginWinnerSelection {} => execute_begin_winner_selection(deps, env, info),
        ExecuteMsg::SettleWinner {} => execute_settle_winner(deps, env, info),
        ExecuteMsg::SetAutomationAddr { addr } => execute_set_automation_addr(deps, info, addr),
    }
}

/// Strictly more than `interval` seconds must have passed since `checkpoint`.
pub fn interval_elapsed(checkpoint: Timestamp, interval: u64, now: Timestamp) -> bool {
    now > checkpoint.plus_seconds(interval)
}

/// Maps a random word onto a registry slot: `word mod count`.
/// `count` must be non-zero.
pub fn winner_index(word: Uint256, count: u32) -> u32 {
    let rem = word % Uint256::from(count);
    // rem < count, so only the last four bytes can be set
    let bytes = rem.to_be_bytes();
    u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]])
}

/// Checks if the provided funds cover the required deposit in its denom.
/// Extra funds and unrelated denoms are ignored.
pub fn validate_payment(required: &Coin, funds: &[Coin]) -> Result<(), ContractError> {
    for fund in funds {
        if fund.denom == required.denom && fund.amount >= required.amount {
            return Ok(());
        }
    }
    Err(ContractError::InsufficientPayment)
}

fn execute_enter(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    if state != LotteryState::Open {
        return Err(ContractError::LotteryClosed);
    }
    let config = CONFIG.load(deps.storage)?;

    let required = required_deposit(deps.as_ref(), &config)?;
    validate_payment(&required, &info.funds)?;

    let slot = PLAYER_COUNT.load(deps.storage)?;
    PLAYERS.save(deps.storage, slot, &info.sender)?;
    PLAYER_COUNT.save(deps.storage, &(slot + 1))?;

    Ok(Response::new()
        .add_attribute("action", "enter")
        .add_event(
            Event::new(EVENT_TYPE_ENTERED)
                .add_attribute(ATTR_PLAYER, info.sender)
                .add_attribute(ATTR_SLOT, slot.to_string()),
        ))
}

fn execute_begin_winner_selection(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let automation = config.automation.as_ref().ok_or(ContractError::Unauthorized)?;
    ensure_eq!(&info.sender, automation, ContractError::Unauthorized);

    // The automation gate evaluates the same conditions before dispatching
    // here; they are re-checked because this call must hold on its own.
    let state = STATE.load(deps.storage)?;
    if state != LotteryState::Open {
        return Err(ContractError::LotteryClosed);
    }
    if PLAYER_COUNT.load(deps.storage)? == 0 {
        return Err(ContractError::NoParticipants);
    }
    let checkpoint = CHECKPOINT.load(deps.storage)?;
    if !interval_elapsed(checkpoint, config.interval, env.block.time) {
        return Err(ContractError::IntervalNotElapsed);
    }

    STATE.save(deps.storage, &LotteryState::Closed)?;
    CHECKPOINT.save(deps.storage, &env.block.time)?;

    // The request id is only known once the requester ran; the reply
    // handler picks it up and emits the winner_requested event.
    let request = SubMsg::reply_on_success(
        WasmMsg::Execute {
            contract_addr: config.rng.into(),
            msg: to_json_binary(&lotto_rng::msg::ExecuteMsg::RequestRandomWords {})?,
            funds: vec![],
        },
        REQUEST_RANDOM_WORDS_REPLY_ID,
    );

    Ok(Response::new()
        .add_submessage(request)
        .add_attribute("action", "begin_winner_selection"))
}

fn execute_settle_winner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let automation = config.automation.as_ref().ok_or(ContractError::Unauthorized)?;
    ensure_eq!(&info.sender, automation, ContractError::Unauthorized);

    let state = STATE.load(deps.storage)?;
    if state != LotteryState::Closed {
        return Err(ContractError::LotteryNotClosed);
    }
    let checkpoint = CHECKPOINT.load(deps.storage)?;
    if !interval_elapsed(checkpoint, config.interval, env.block.time) {
        return Err(ContractError::IntervalNotElapsed);
    }
    let word = query_current_request(deps.as_ref(), &config.rng)?
        .and_then(|request| request.word)
        .ok_or(ContractError::RandomnessNotReady)?;

    let player_count = PLAYER_COUNT.load(deps.storage)?;
    if player_count == 0 {
        return Err(ContractError::NoParticipants);
    }
    let index = winner_index(word, player_count);
    let winner = PLAYERS.load(deps.storage, index)?;

    let payout = deps
        .querier
        .query_balance(env.contract.address.clone(), config.payment_denom.clone())?;

    // All bookkeeping happens before any message runs. The messages below
    // execute after this call commits; if one of them fails the whole
    // transaction is rolled back, bookkeeping included.
    PLAYERS.clear(deps.storage);
    PLAYER_COUNT.save(deps.storage, &0)?;
    STATE.save(deps.storage, &LotteryState::Open)?;
    CHECKPOINT.save(deps.storage, &env.block.time)?;
    RECENT_WINNER.save(deps.storage, &winner)?;

    let consume = WasmMsg::Execute {
        contract_addr: config.rng.into(),
        msg: to_json_binary(&lotto_rng::msg::ExecuteMsg::ConsumeRandomWords {})?,
        funds: vec![],
    };
    let pay = BankMsg::Send {
        to_address: winner.to_string(),
        amount: vec![payout.clone()],
    };

    Ok(Response::new()
        .add_message(consume)
        .add_message(pay)
        .add_attribute("action", "settle_winner")
        .add_event(
            Event::new(EVENT_TYPE_WINNER_PICKED)
                .add_attribute(ATTR_WINNER, winner)
                .add_attribute(ATTR_PAYOUT, payout.to_string()),
        ))
}

/// In order not to fall in the chicken egg problem where two contracts need
/// to be aware of each other in a context where the contract addresses are
/// not known in advance, the automation address is set at a later stage
/// after the instantiation and is immutable once set.
fn execute_set_automation_addr(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_eq!(info.sender, config.manager, ContractError::Unauthorized);

    // ensure immutability
    if config.automation.is_some() {
        return Err(ContractError::ContractAlreadySet);
    }

    let automation = deps.api.addr_validate(&addr)?;
    config.automation = Some(automation.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("automation-address", automation))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REQUEST_RANDOM_WORDS_REPLY_ID => {
            let config = CONFIG.load(deps.storage)?;
            let request = query_current_request(deps.as_ref(), &config.rng)?
                .ok_or(ContractError::NoPendingRequest)?;
            let checkpoint = CHECKPOINT.load(deps.storage)?;
            Ok(Response::new().add_event(
                Event::new(EVENT_TYPE_WINNER_REQUESTED)
                    .add_attribute(ATTR_REQUEST_ID, request.id.to_string())
                    .add_attribute(ATTR_CHECKPOINT, checkpoint.to_string()),
            ))
        }
        _ => Err(ContractError::InvalidReplyId),
    }
}

fn required_deposit(deps: Deps, config: &Config) -> Result<Coin, ContractError> {
    let price: lotto_price_converter::msg::PriceResponse = deps.querier.query_wasm_smart(
        &config.price_converter,
        &lotto_price_converter::msg::QueryMsg::Price {},
    )?;
    if price.rate.is_zero() {
        return Err(ContractError::InvalidPrice);
    }
    let scale = 10u128.pow(price.decimals as u32);
    let amount = config.entrance_fee.checked_multiply_ratio(scale, price.rate)?;
    Ok(Coin {
        denom: config.payment_denom.clone(),
        amount,
    })
}

fn query_current_request(
    deps: Deps,
    rng: &Addr,
) -> Result<Option<lotto_rng::state::RandomRequest>, ContractError> {
    let response: lotto_rng::msg::CurrentRequestResponse = deps
        .querier
        .query_wasm_smart(rng, &lotto_rng::msg::QueryMsg::CurrentRequest {})?;
    Ok(response.request)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::State {} => to_json_binary(&STATE.load(deps.storage)?),
        QueryMsg::Round {} => to_json_binary(&query_round(deps)?),
        QueryMsg::Checkpoint {} => to_json_binary(&CHECKPOINT.load(deps.storage)?),
        QueryMsg::Player { index } => to_json_binary(&PLAYERS.may_load(deps.storage, index)?),
        QueryMsg::Players { start_after, limit } => {
            to_json_binary(&query_players(deps, start_after, limit)?)
        }
        QueryMsg::PlayerCount {} => to_json_binary(&PLAYER_COUNT.load(deps.storage)?),
        QueryMsg::RecentWinner {} => to_json_binary(&RECENT_WINNER.may_load(deps.storage)?),
        QueryMsg::CurrentEntranceFee {} => to_json_binary(&query_current_entrance_fee(deps)?),
        QueryMsg::RequestId {} => to_json_binary(&query_request_id(deps)?),
        QueryMsg::RandomNumber {} => to_json_binary(&query_random_number(deps)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse { config })
}

fn query_round(deps: Deps) -> StdResult<RoundResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(RoundResponse {
        state: STATE.load(deps.storage)?,
        player_count: PLAYER_COUNT.load(deps.storage)?,
        checkpoint: CHECKPOINT.load(deps.storage)?,
        interval: config.interval,
    })
}

fn query_players(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<PlayersResponse> {
    let limit = limit.unwrap_or(100) as usize;
    let start = start_after.map(Bound::exclusive);
    let players: Vec<Addr> = PLAYERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|result| result.map(|(_slot, addr)| addr))
        .collect::<StdResult<_>>()?;
    Ok(PlayersResponse { players })
}

fn query_current_entrance_fee(deps: Deps) -> StdResult<Coin> {
    let config = CONFIG.load(deps.storage)?;
    required_deposit(deps, &config).map_err(|err| StdError::generic_err(err.to_string()))
}

fn query_request_id(deps: Deps) -> StdResult<Option<Uint64>> {
    let config = CONFIG.load(deps.storage)?;
    let request = query_current_request(deps, &config.rng)
        .map_err(|err| StdError::generic_err(err.to_string()))?;
    Ok(request.map(|request| Uint64::new(request.id)))
}

fn query_random_number(deps: Deps) -> StdResult<Option<Uint256>> {
    let config = CONFIG.load(deps.storage)?;
    let request = query_current_request(deps, &config.rng)
        .map_err(|err| StdError::generic_err(err.to_string()))?;
    Ok(request.and_then(|request| request.word))
}
