use thiserror::Error;

use cosmwasm_std::{CheckedMultiplyRatioError, StdError};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    CheckedMultiplyRatio(#[from] CheckedMultiplyRatioError),

    #[error("Insufficient payment for the entrance fee")]
    InsufficientPayment,

    #[error("Lottery is closed")]
    LotteryClosed,

    #[error("Lottery is not closed")]
    LotteryNotClosed,

    #[error("Price feed returned a non-positive rate")]
    InvalidPrice,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("No participants in the current round")]
    NoParticipants,

    #[error("Interval has not elapsed since the last checkpoint")]
    IntervalNotElapsed,

    #[error("No fulfilled random word is available")]
    RandomnessNotReady,

    #[error("Automation address was already set. It is immutable and cannot be overriden")]
    ContractAlreadySet,

    #[error("No randomness request is outstanding")]
    NoPendingRequest,

    #[error("Invalid reply id")]
    InvalidReplyId,
}
