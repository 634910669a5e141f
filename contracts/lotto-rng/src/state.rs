use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Uint256};
use cw_storage_plus::Item;

#[cw_serde]
pub struct Config {
    /// Account allowed to administer this contract
    pub manager: Addr,
    /// Account allowed to deliver random words
    pub oracle: Addr,
    /// Key identifier echoed in every request event so the oracle knows
    /// which key to sign with
    pub key_hash: HexBinary,
    /// The one contract allowed to request and consume random words.
    /// Set once after the consumer is deployed.
    pub approved: Option<Addr>,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Ids are assigned from this counter, starting at 1. Never reset.
pub const REQUEST_COUNT: Item<u64> = Item::new("request_count");

/// The single-slot request register. `word` is `None` while the request is
/// outstanding and set exactly once on fulfillment.
#[cw_serde]
pub struct RandomRequest {
    pub id: u64,
    pub word: Option<Uint256>,
}

pub const CURRENT_REQUEST: Item<RandomRequest> = Item::new("current_request");
