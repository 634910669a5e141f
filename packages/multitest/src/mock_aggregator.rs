//! A settable aggregator standing in for the external price feed,
//! answering the interface the price converter consumes.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Deps, DepsMut, Env, Int256, MessageInfo, QueryResponse, Response, StdResult,
    Timestamp, Uint64,
};
use cw_storage_plus::Item;

use lotto_price_converter::msg::{AggregatorQueryMsg, RoundDataResponse};

#[cw_serde]
pub struct InstantiateMsg {
    pub decimals: u8,
    pub initial_answer: Int256,
}

#[cw_serde]
pub enum ExecuteMsg {
    UpdateAnswer { answer: Int256 },
}

#[cw_serde]
struct Round {
    round_id: u64,
    answer: Int256,
    updated_at: Timestamp,
}

const DECIMALS: Item<u8> = Item::new("decimals");
const ROUND: Item<Round> = Item::new("round");

pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    DECIMALS.save(deps.storage, &msg.decimals)?;
    ROUND.save(
        deps.storage,
        &Round {
            round_id: 1,
            answer: msg.initial_answer,
            updated_at: env.block.time,
        },
    )?;
    Ok(Response::default())
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: ExecuteMsg,
) -> StdResult<Response> {
    match msg {
        ExecuteMsg::UpdateAnswer { answer } => {
            let mut round = ROUND.load(deps.storage)?;
            round.round_id += 1;
            round.answer = answer;
            round.updated_at = env.block.time;
            ROUND.save(deps.storage, &round)?;
            Ok(Response::default())
        }
    }
}

pub fn query(deps: Deps, _env: Env, msg: AggregatorQueryMsg) -> StdResult<QueryResponse> {
    match msg {
        AggregatorQueryMsg::LatestRoundData {} => {
            let round = ROUND.load(deps.storage)?;
            to_json_binary(&RoundDataResponse {
                round_id: Uint64::new(round.round_id),
                answer: round.answer,
                updated_at: round.updated_at,
            })
        }
        AggregatorQueryMsg::Decimals {} => to_json_binary(&DECIMALS.load(deps.storage)?),
    }
}
