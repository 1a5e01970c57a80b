pub const TOKEN_DECIMALS: u8       = 10; // Decimals for the curve currency
pub const QUARKS_PER_TOKEN: u64    = 10_000_000_000;

pub const RESERVE_DECIMALS: u8     = 6; // Decimals for the reserve (USDC)
pub const QUARKS_PER_RESERVE: u64  = 1_000_000;

pub const MAX_TOKEN_SUPPLY: u64    = 21_000_000;
pub const STEP_SIZE: u64           = 100;

/// Number of entries in each table, one per step boundary from 0 to MAX_TOKEN_SUPPLY inclusive.
pub const TABLE_SIZE: usize        = (MAX_TOKEN_SUPPLY / STEP_SIZE) as usize + 1;

/// Fractional decimal digits carried by every table entry.
pub const TABLE_PRECISION: u8      = 18;
pub const TABLE_SCALE: u128        = 1_000_000_000_000_000_000;

pub const MAX_FEE_BPS: u32         = 10_000;

// Constants for the default curve from $0.01 to $1_000_000 over 21_000_000 tokens
pub const CURVE_A: u128            = 11400_230149967394933471;
pub const CURVE_B: u128            = 0_000000877175273521;
pub const CURVE_C: u128            = CURVE_B;
