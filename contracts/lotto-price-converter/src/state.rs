use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::Item;

#[cw_serde]
pub struct Config {
    /// Account allowed to rotate the feed
    pub manager: Addr,
    /// The aggregator contract this converter reads from
    pub price_feed: Addr,
}

pub const CONFIG: Item<Config> = Item::new("config");
