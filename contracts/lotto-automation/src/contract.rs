use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, QueryResponse, Response,
    StdResult, WasmMsg,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{ConfigResponse, ExecuteMsg, InstantiateMsg, QueryMsg, UpkeepResponse};
use crate::state::{Config, CONFIG};
use crate::upkeep::{
    interval_elapsed, parse_upkeep_data, pick_upkeep_needed, request_upkeep_needed, UpkeepKind,
    UpkeepObservation,
};

const CONTRACT_NAME: &str = "crates.io:lotto-automation";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let lottery = deps.api.addr_validate(&msg.lottery)?;
    CONFIG.save(
        deps.storage,
        &Config {
            lottery: lottery.clone(),
        },
    )?;
    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("lottery", lottery))
}

/// Collects the lottery round and the requester's slot into one snapshot
/// for the predicates to gate on.
fn observe(deps: Deps, lottery: &Addr) -> StdResult<UpkeepObservation> {
    let round: lotto::msg::RoundResponse = deps
        .querier
        .query_wasm_smart(lottery, &lotto::msg::QueryMsg::Round {})?;
    let lotto::msg::ConfigResponse { config } = deps
        .querier
        .query_wasm_smart(lottery, &lotto::msg::QueryMsg::Config {})?;
    let request: lotto_rng::msg::CurrentRequestResponse = deps
        .querier
        .query_wasm_smart(&config.rng, &lotto_rng::msg::QueryMsg::CurrentRequest {})?;
    Ok(UpkeepObservation {
        open: round.state == lotto::state::LotteryState::Open,
        players: round.player_count,
        checkpoint: round.checkpoint,
        interval: round.interval,
        randomness_ready: request
            .request
            .map(|request| request.word.is_some())
            .unwrap_or(false),
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::PerformUpkeep { data } => execute_perform_upkeep(deps, env, data),
    }
}

fn execute_perform_upkeep(
    deps: DepsMut,
    env: Env,
    data: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let kind = parse_upkeep_data(&data).ok_or(ContractError::UnrecognizedUpkeepData)?;

    // Never trust the poller's earlier check result, conditions may have
    // changed since. Evaluate against fresh state.
    let obs = observe(deps.as_ref(), &config.lottery)?;
    let now = env.block.time;
    let (needed, dispatch, label) = match kind {
        UpkeepKind::RequestWinner => (
            request_upkeep_needed(&obs, now),
            lotto::msg::ExecuteMsg::BeginWinnerSelection {},
            "request",
        ),
        UpkeepKind::PickWinner => (
            pick_upkeep_needed(&obs, now),
            lotto::msg::ExecuteMsg::SettleWinner {},
            "pick",
        ),
    };
    if !needed {
        return Err(ContractError::PerformUpkeepFailed {
            open: obs.open,
            players: obs.players,
            interval_elapsed: interval_elapsed(obs.checkpoint, obs.interval, now),
            randomness_ready: obs.randomness_ready,
        });
    }

    Ok(Response::new()
        .add_message(WasmMsg::Execute {
            contract_addr: config.lottery.into(),
            msg: to_json_binary(&dispatch)?,
            funds: vec![],
        })
        .add_attribute("action", "perform_upkeep")
        .add_attribute("upkeep", label))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::CheckUpkeep { data } => to_json_binary(&query_check_upkeep(deps, env, data)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse { config })
}

fn query_check_upkeep(deps: Deps, env: Env, data: Binary) -> StdResult<UpkeepResponse> {
    let config = CONFIG.load(deps.storage)?;
    let upkeep_needed = match parse_upkeep_data(&data) {
        Some(kind) => {
            let obs = observe(deps, &config.lottery)?;
            match kind {
                UpkeepKind::RequestWinner => request_upkeep_needed(&obs, env.block.time),
                UpkeepKind::PickWinner => pick_upkeep_needed(&obs, env.block.time),
            }
        }
        None => false,
    };
    Ok(UpkeepResponse {
        upkeep_needed,
        perform_data: data,
    })
}
