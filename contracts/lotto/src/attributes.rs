//! Stable event attributes
//!
//! The attributes here should only be changed very carefully as it is likely that clients rely on them.

/// Emitted once per successful entry
pub const EVENT_TYPE_ENTERED: &str = "lottery_entered";

/// Emitted when the round was closed and randomness was requested
pub const EVENT_TYPE_WINNER_REQUESTED: &str = "winner_requested";

/// Emitted when the round was settled and paid out
pub const EVENT_TYPE_WINNER_PICKED: &str = "winner_picked";

/// The address that entered
pub const ATTR_PLAYER: &str = "player";

/// Zero-based registry slot assigned to the entry
pub const ATTR_SLOT: &str = "slot";

/// The id of the randomness request backing the round
pub const ATTR_REQUEST_ID: &str = "request_id";

/// The checkpoint written by the transition
pub const ATTR_CHECKPOINT: &str = "checkpoint";

/// The settled winner
pub const ATTR_WINNER: &str = "winner";

/// The full pot paid to the winner
pub const ATTR_PAYOUT: &str = "payout";
