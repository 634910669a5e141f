use cosmwasm_std::{
    ensure_eq, to_json_binary, Deps, DepsMut, Env, Int256, MessageInfo, QueryResponse, Response,
    StdError, StdResult, Uint128,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{
    AggregatorQueryMsg, ConfigResponse, ExecuteMsg, InstantiateMsg, PriceResponse, QueryMsg,
    RoundDataResponse,
};
use crate::state::{Config, CONFIG};

const CONTRACT_NAME: &str = "crates.io:lotto-price-converter";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let price_feed = deps
        .api
        .addr_validate(&msg.price_feed)
        .map_err(|_| ContractError::InvalidFeedAddress)?;
    CONFIG.save(
        deps.storage,
        &Config {
            manager: info.sender,
            price_feed: price_feed.clone(),
        },
    )?;
    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("price_feed", price_feed))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetPriceFeed { addr } => execute_set_price_feed(deps, info, addr),
    }
}

fn execute_set_price_feed(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_eq!(info.sender, config.manager, ContractError::Unauthorized);
    let price_feed = deps
        .api
        .addr_validate(&addr)
        .map_err(|_| ContractError::InvalidFeedAddress)?;
    config.price_feed = price_feed.clone();
    CONFIG.save(deps.storage, &config)?;
    Ok(Response::new()
        .add_attribute("action", "set_price_feed")
        .add_attribute("price_feed", price_feed))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Price {} => to_json_binary(&query_price(deps)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse { config })
}

fn query_price(deps: Deps) -> StdResult<PriceResponse> {
    let config = CONFIG.load(deps.storage)?;
    let round: RoundDataResponse = deps
        .querier
        .query_wasm_smart(&config.price_feed, &AggregatorQueryMsg::LatestRoundData {})?;
    let decimals: u8 = deps
        .querier
        .query_wasm_smart(&config.price_feed, &AggregatorQueryMsg::Decimals {})?;
    // Never hand out a rate a caller could divide by without checking
    if round.answer <= Int256::zero() {
        return Err(StdError::generic_err("price feed answer must be positive"));
    }
    let rate = Uint128::try_from(round.answer.unsigned_abs())
        .map_err(|_| StdError::generic_err("price feed answer exceeds supported range"))?;
    Ok(PriceResponse { rate, decimals })
}
