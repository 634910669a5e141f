use thiserror::Error;

use cosmwasm_std::{StdError, Uint64};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("A request is already outstanding")]
    RequestPending,

    #[error("Request {request_id} is not the pending request")]
    UnknownRequest { request_id: Uint64 },

    #[error("Fulfillment carried no words")]
    EmptyRandomWords,

    #[error("No fulfilled random word is available")]
    RandomnessNotReady,

    #[error("Approved contract was already set. It is immutable and cannot be overriden")]
    ContractAlreadySet,
}
