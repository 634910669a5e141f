use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{HexBinary, Uint256, Uint64};

use crate::state::{Config, RandomRequest};

#[cw_serde]
pub struct InstantiateMsg {
    /// Account allowed to deliver random words
    pub oracle: String,
    /// Key identifier echoed in request events
    pub key_hash: HexBinary,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a request for random words. Approved contract only. The new
    /// request id is returned in the response data as a `Uint64`.
    RequestRandomWords {},
    /// Deliver random words for the outstanding request. Oracle only.
    /// Only the first word is kept.
    FulfillRandomWords {
        request_id: Uint64,
        words: Vec<Uint256>,
    },
    /// Invalidate the fulfilled word once it has been used. Approved
    /// contract only.
    ConsumeRandomWords {},
    /// Wire in the approved contract. Manager only, one-time.
    SetApprovedContract { addr: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(CurrentRequestResponse)]
    CurrentRequest {},
    /// Number of requests ever opened. The id of the latest request.
    #[returns(Uint64)]
    RequestCount {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: Config,
}

#[cw_serde]
pub struct CurrentRequestResponse {
    /// `None` before the first request and after each consume
    pub request: Option<RandomRequest>,
}
