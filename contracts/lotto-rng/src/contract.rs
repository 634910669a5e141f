use cosmwasm_std::{
    ensure_eq, to_json_binary, Deps, DepsMut, Env, Event, MessageInfo, QueryResponse, Response,
    StdResult, Uint256, Uint64,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cw2::set_contract_version;

use crate::attributes::{ATTR_KEY_HASH, ATTR_REQUEST_ID, EVENT_TYPE_FULFILLED, EVENT_TYPE_REQUESTED};
use crate::error::ContractError;
use crate::msg::{ConfigResponse, CurrentRequestResponse, ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::state::{Config, RandomRequest, CONFIG, CURRENT_REQUEST, REQUEST_COUNT};

const CONTRACT_NAME: &str = "crates.io:lotto-rng";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    let oracle = deps.api.addr_validate(&msg.oracle)?;
    CONFIG.save(
        deps.storage,
        &Config {
            manager: info.sender,
            oracle: oracle.clone(),
            key_hash: msg.key_hash,
            approved: None,
        },
    )?;
    REQUEST_COUNT.save(deps.storage, &0)?;
    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("oracle", oracle))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RequestRandomWords {} => execute_request_random_words(deps, info),
        ExecuteMsg::FulfillRandomWords { request_id, words } => {
            execute_fulfill_random_words(deps, info, request_id, words)
        }
        ExecuteMsg::ConsumeRandomWords {} => execute_consume_random_words(deps, info),
        ExecuteMsg::SetApprovedContract { addr } => execute_set_approved_contract(deps, info, addr),
    }
}

fn ensure_approved(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    let approved = config.approved.as_ref().ok_or(ContractError::Unauthorized)?;
    ensure_eq!(&info.sender, approved, ContractError::Unauthorized);
    Ok(())
}

fn execute_request_random_words(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_approved(&config, &info)?;

    // One slot only. An unconsumed word must not be clobbered either.
    if CURRENT_REQUEST.may_load(deps.storage)?.is_some() {
        return Err(ContractError::RequestPending);
    }

    let id = REQUEST_COUNT.load(deps.storage)? + 1;
    REQUEST_COUNT.save(deps.storage, &id)?;
    CURRENT_REQUEST.save(deps.storage, &RandomRequest { id, word: None })?;

    Ok(Response::new()
        .set_data(to_json_binary(&Uint64::new(id))?)
        .add_attribute("action", "request_random_words")
        .add_event(
            Event::new(EVENT_TYPE_REQUESTED)
                .add_attribute(ATTR_REQUEST_ID, id.to_string())
                .add_attribute(ATTR_KEY_HASH, config.key_hash.to_hex()),
        ))
}

fn execute_fulfill_random_words(
    deps: DepsMut,
    info: MessageInfo,
    request_id: Uint64,
    words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_eq!(info.sender, config.oracle, ContractError::Unauthorized);

    let mut request = match CURRENT_REQUEST.may_load(deps.storage)? {
        Some(request) if request.id == request_id.u64() && request.word.is_none() => request,
        _ => return Err(ContractError::UnknownRequest { request_id }),
    };
    let word = *words.first().ok_or(ContractError::EmptyRandomWords)?;
    request.word = Some(word);
    CURRENT_REQUEST.save(deps.storage, &request)?;

    Ok(Response::new()
        .add_attribute("action", "fulfill_random_words")
        .add_event(
            Event::new(EVENT_TYPE_FULFILLED).add_attribute(ATTR_REQUEST_ID, request_id.to_string()),
        ))
}

fn execute_consume_random_words(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_approved(&config, &info)?;

    let request = match CURRENT_REQUEST.may_load(deps.storage)? {
        Some(request) if request.word.is_some() => request,
        _ => return Err(ContractError::RandomnessNotReady),
    };
    CURRENT_REQUEST.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "consume_random_words")
        .add_attribute(ATTR_REQUEST_ID, request.id.to_string()))
}

/// In order not to fall in the chicken egg problem where two contracts need
/// to be aware of each other in a context where the contract addresses are
/// not known in advance, the approved contract is set at a later stage after
/// the instantiation and is immutable once set.
fn execute_set_approved_contract(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_eq!(info.sender, config.manager, ContractError::Unauthorized);

    // ensure immutability
    if config.approved.is_some() {
        return Err(ContractError::ContractAlreadySet);
    }

    let approved = deps.api.addr_validate(&addr)?;
    config.approved = Some(approved.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("approved-contract", approved))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::CurrentRequest {} => to_json_binary(&query_current_request(deps)?),
        QueryMsg::RequestCount {} => {
            to_json_binary(&Uint64::new(REQUEST_COUNT.load(deps.storage)?))
        }
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse { config })
}

fn query_current_request(deps: Deps) -> StdResult<CurrentRequestResponse> {
    Ok(CurrentRequestResponse {
        request: CURRENT_REQUEST.may_load(deps.storage)?,
    })
}
