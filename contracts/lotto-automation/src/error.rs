use thiserror::Error;

use cosmwasm_std::StdError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Upkeep conditions not met (open: {open}, players: {players}, interval_elapsed: {interval_elapsed}, randomness_ready: {randomness_ready})")]
    PerformUpkeepFailed {
        open: bool,
        players: u32,
        interval_elapsed: bool,
        randomness_ready: bool,
    },

    #[error("Upkeep payload is not a recognized tag")]
    UnrecognizedUpkeepData,
}
