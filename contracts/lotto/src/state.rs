use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// Reference entrance fee in micro USD. What a player actually pays is
    /// this amount converted at the current exchange rate.
    pub entrance_fee: Uint128,
    /// Denom entries are paid in and the pot is paid out in
    pub payment_denom: String,
    /// Minimum number of seconds between state transitions
    pub interval: u64,
    /// The randomness requester contract
    pub rng: Addr,
    /// The price converter contract
    pub price_converter: Addr,
    /// Account allowed to run the one-time wiring
    pub manager: Addr,
    /// The only address allowed to drive state transitions.
    /// Set once after the automation contract is deployed.
    pub automation: Option<Addr>,
}

pub const CONFIG: Item<Config> = Item::new("config");

#[cw_serde]
pub enum LotteryState {
    /// Collecting entries
    Open,
    /// A randomness request is in flight or awaiting settlement
    Closed,
}

pub const STATE: Item<LotteryState> = Item::new("state");

/// Time of the last accepted state transition. Origin for interval gating.
pub const CHECKPOINT: Item<Timestamp> = Item::new("checkpoint");

/// Insertion-ordered entries. One slot per successful entry; an address may
/// hold any number of slots. Cleared exactly once per round, at payout.
pub const PLAYERS: Map<u32, Addr> = Map::new("players");

pub const PLAYER_COUNT: Item<u32> = Item::new("player_count");

/// Winner of the last settled round, overwritten each round
pub const RECENT_WINNER: Item<Addr> = Item::new("recent_winner");
