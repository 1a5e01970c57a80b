//! Discrete curve lookup tables, generated by `build.rs` from [`crate::curve::ExponentialCurve`].
//!
//! `DISCRETE_PRICING_TABLE[i]` is the spot price for any supply in
//! `[i * STEP_SIZE, (i + 1) * STEP_SIZE)` and `DISCRETE_CUMULATIVE_VALUE_TABLE[i]`
//! is the total cost of minting the first `i * STEP_SIZE` tokens. Both hold
//! `TABLE_SIZE` entries scaled by 10^18.

include!(concat!(env!("OUT_DIR"), "/table.rs"));
