use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

use crate::state::Config;

#[cw_serde]
pub struct InstantiateMsg {
    /// Address of the lottery contract to drive
    pub lottery: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Re-validates the predicate selected by `data` and advances the
    /// lottery. Safe to call redundantly; fails without side effects when
    /// the conditions no longer hold.
    PerformUpkeep { data: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// Side-effect-free poll. Callable on every block.
    #[returns(UpkeepResponse)]
    CheckUpkeep { data: Binary },
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: Config,
}

#[cw_serde]
pub struct UpkeepResponse {
    pub upkeep_needed: bool,
    /// Echoed payload to pass to PerformUpkeep when upkeep is needed
    pub perform_data: Binary,
}
