use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Int256, Timestamp, Uint128, Uint64};

use crate::state::Config;

#[cw_serde]
pub struct InstantiateMsg {
    /// Address of the aggregator contract to read rates from
    pub price_feed: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Point the converter at a different aggregator. Manager only.
    SetPriceFeed { addr: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// The current exchange rate in reference currency per unit of the
    /// payment asset. Fails when the feed reports a non-positive answer.
    #[returns(PriceResponse)]
    Price {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: Config,
}

#[cw_serde]
pub struct PriceResponse {
    /// Rate scaled by 10^decimals, guaranteed positive
    pub rate: Uint128,
    pub decimals: u8,
}

/// The slice of the aggregator interface this contract consumes.
#[cw_serde]
pub enum AggregatorQueryMsg {
    LatestRoundData {},
    Decimals {},
}

#[cw_serde]
pub struct RoundDataResponse {
    pub round_id: Uint64,
    /// Signed answer as reported by the feed, scaled by 10^decimals
    pub answer: Int256,
    pub updated_at: Timestamp,
}
