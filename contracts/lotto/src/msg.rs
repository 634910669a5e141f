use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Timestamp, Uint128, Uint256, Uint64};

use crate::state::{Config, LotteryState};

#[cw_serde]
pub struct InstantiateMsg {
    /// Reference entrance fee in micro USD
    pub entrance_fee: Uint128,
    /// Denom entries are paid in
    pub payment_denom: String,
    /// Minimum number of seconds between state transitions
    pub interval: u64,
    /// Address of the randomness requester contract
    pub rng: String,
    /// Address of the price converter contract
    pub price_converter: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Join the current round. The attached funds must cover the entrance
    /// fee at the current exchange rate.
    Enter {},
    /// Close the round and request randomness. Automation only.
    BeginWinnerSelection {},
    /// Pay out the pot to the winner and reopen. Automation only.
    SettleWinner {},
    /// Wire in the automation contract. Manager only, one-time.
    SetAutomationAddr { addr: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(LotteryState)]
    State {},
    /// Everything the upkeep gate needs in one query
    #[returns(RoundResponse)]
    Round {},
    #[returns(Timestamp)]
    Checkpoint {},
    #[returns(Option<Addr>)]
    Player { index: u32 },
    #[returns(PlayersResponse)]
    Players {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(u32)]
    PlayerCount {},
    #[returns(Option<Addr>)]
    RecentWinner {},
    /// The deposit required right now, at the current exchange rate
    #[returns(Coin)]
    CurrentEntranceFee {},
    /// Id of the randomness request of the current round, if any
    #[returns(Option<Uint64>)]
    RequestId {},
    /// Fulfilled random word of the current round, if any
    #[returns(Option<Uint256>)]
    RandomNumber {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: Config,
}

#[cw_serde]
pub struct RoundResponse {
    pub state: LotteryState,
    pub player_count: u32,
    pub checkpoint: Timestamp,
    pub interval: u64,
}

#[cw_serde]
pub struct PlayersResponse {
    pub players: Vec<Addr>,
}
