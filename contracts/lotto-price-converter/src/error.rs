use thiserror::Error;

use cosmwasm_std::StdError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Price feed address is not valid")]
    InvalidFeedAddress,

    #[error("Unauthorized")]
    Unauthorized,
}
