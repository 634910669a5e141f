//! Stable event attributes
//!
//! The attributes here should only be changed very carefully as it is likely that clients rely on them.

/// Emitted when a new request is opened. The oracle watches this event stream.
pub const EVENT_TYPE_REQUESTED: &str = "randomness_requested";

/// Emitted when the oracle delivered a word for the pending request
pub const EVENT_TYPE_FULFILLED: &str = "randomness_fulfilled";

/// The id of the request, decimal encoded
pub const ATTR_REQUEST_ID: &str = "request_id";

/// The key the oracle should sign with, hex encoded
pub const ATTR_KEY_HASH: &str = "key_hash";
