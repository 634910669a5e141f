//! The gating predicates, kept free of storage and clock access so they can
//! be evaluated against any observation and point in time.

use cosmwasm_std::{Binary, Timestamp};

/// Payload tag selecting the round-closing upkeep
pub const UPKEEP_DATA_REQUEST: &[u8] = b"request";

/// Payload tag selecting the settlement upkeep
pub const UPKEEP_DATA_PICK: &[u8] = b"pick";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpkeepKind {
    /// Close the round and request randomness
    RequestWinner,
    /// Settle the round with the fulfilled randomness
    PickWinner,
}

/// The payload is an opaque tag. Anything unrecognized means "nothing to do".
pub fn parse_upkeep_data(data: &Binary) -> Option<UpkeepKind> {
    match data.as_slice() {
        UPKEEP_DATA_REQUEST => Some(UpkeepKind::RequestWinner),
        UPKEEP_DATA_PICK => Some(UpkeepKind::PickWinner),
        _ => None,
    }
}

/// A snapshot of the collaborator state the upkeep decision is made from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpkeepObservation {
    pub open: bool,
    pub players: u32,
    pub checkpoint: Timestamp,
    pub interval: u64,
    pub randomness_ready: bool,
}

/// Strictly more than `interval` seconds must have passed since `checkpoint`.
pub fn interval_elapsed(checkpoint: Timestamp, interval: u64, now: Timestamp) -> bool {
    now > checkpoint.plus_seconds(interval)
}

/// True iff closing the round is both possible and due
pub fn request_upkeep_needed(obs: &UpkeepObservation, now: Timestamp) -> bool {
    obs.open && obs.players > 0 && interval_elapsed(obs.checkpoint, obs.interval, now)
}

/// True iff the round is closed, randomness arrived and the cool-down passed
pub fn pick_upkeep_needed(obs: &UpkeepObservation, now: Timestamp) -> bool {
    !obs.open && obs.randomness_ready && interval_elapsed(obs.checkpoint, obs.interval, now)
}
