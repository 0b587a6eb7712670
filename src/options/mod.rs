//! Option selection module
//!
//! Strike targeting, nearest-strike lookup, call-leg resolution and the
//! safe short-call screen

mod leg;
mod safe_calls;
mod selection;

pub use leg::{CallLeg, DeltaSource, EntryMode};
pub use safe_calls::{safe_short_calls, SafeCall, SafeCallTable};
pub use selection::{
    clamp_offset, default_expiration, nearest_strike, scaled_offset, target_price,
};
