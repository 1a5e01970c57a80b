use brine_fp::UnsignedNumeric;
use crate::consts::*;

/// Wraps a raw table value (already scaled by 10^18).
pub fn from_raw(value: u128) -> UnsignedNumeric {
    UnsignedNumeric::from_scaled_u128(value)
}

/// Returns the raw 10^18-scaled representation, or `None` if it needs more than 128 bits.
pub fn to_raw(value: &UnsignedNumeric) -> Option<u128> {
    let bytes = value.to_bytes();
    if bytes[16..].iter().any(|&b| b != 0) {
        return None;
    }

    let mut low = [0u8; 16];
    low.copy_from_slice(&bytes[..16]);
    Some(u128::from_le_bytes(low))
}

fn scale_for(decimals: u8) -> Option<u128> {
    let shift = TABLE_PRECISION.checked_sub(decimals)?;
    10u128.checked_pow(shift as u32)
}

/// Convert a smallest-unit amount to a whole value (e.g., 10_000_000 with 6 decimals -> 10.0)
pub fn to_numeric(amount: u64, decimals: u8) -> Option<UnsignedNumeric> {
    let raw = (amount as u128).checked_mul(scale_for(decimals)?)?;
    Some(from_raw(raw))
}

/// Convert a whole value back to smallest units, truncating any remainder
/// (e.g., 10.0000001 with 6 decimals -> 10_000_000)
pub fn from_numeric(value: &UnsignedNumeric, decimals: u8) -> Option<u64> {
    let raw = to_raw(value)?;
    u64::try_from(raw / scale_for(decimals)?).ok()
}

/// 100 bps -> 0.01
pub fn from_basis_points(bps: u32) -> Option<UnsignedNumeric> {
    to_numeric(bps as u64, 4)
}


/// Integer division rounding half to even.
pub fn div_half_even(numerator: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let upper = denominator - remainder;

    if remainder > upper || (remainder == upper && quotient % 2 == 1) {
        quotient.checked_add(1)
    } else {
        Some(quotient)
    }
}

/// Multiplies two raw 10^18-scaled values, returning the raw product rounded half to even
/// at the 18th fractional digit.
///
/// Both operands are split at the scale so no intermediate product needs more than 128 bits.
pub fn checked_mul_raw(lhs: u128, rhs: u128) -> Option<u128> {
    let (lhs_whole, lhs_fraction) = (lhs / TABLE_SCALE, lhs % TABLE_SCALE);
    let (rhs_whole, rhs_fraction) = (rhs / TABLE_SCALE, rhs % TABLE_SCALE);

    let whole = lhs_whole
        .checked_mul(rhs_whole)?
        .checked_mul(TABLE_SCALE)?
        .checked_add(lhs_whole.checked_mul(rhs_fraction)?)?
        .checked_add(lhs_fraction.checked_mul(rhs_whole)?)?;

    // Both fractions are below 10^18, so this fits
    let low = lhs_fraction * rhs_fraction;
    let result = whole.checked_add(low / TABLE_SCALE)?;
    let remainder = low % TABLE_SCALE;
    let upper = TABLE_SCALE - remainder;

    if remainder > upper || (remainder == upper && result % 2 == 1) {
        result.checked_add(1)
    } else {
        Some(result)
    }
}

/// Divides two raw 10^18-scaled values, returning the raw quotient rounded half to even
/// at the 18th fractional digit.
///
/// The fraction is produced nine digits at a time so the intermediate products stay
/// within `u128` for any denominator below ~3.4e29 (a price of 3.4e11 per token).
pub fn checked_div_raw(numerator: u128, denominator: u128) -> Option<u128> {
    const CHUNK: u128 = 1_000_000_000;

    if denominator == 0 {
        return None;
    }

    let whole = numerator / denominator;
    let mut remainder = numerator % denominator;
    let mut fraction: u128 = 0;

    for _ in 0..2 {
        let scaled = remainder.checked_mul(CHUNK)?;
        fraction = fraction * CHUNK + scaled / denominator;
        remainder = scaled % denominator;
    }

    let result = whole.checked_mul(TABLE_SCALE)?.checked_add(fraction)?;
    let upper = denominator - remainder;

    if remainder > upper || (remainder == upper && result % 2 == 1) {
        result.checked_add(1)
    } else {
        Some(result)
    }
}

pub fn is_zero(value: &UnsignedNumeric) -> bool {
    *value == UnsignedNumeric::zero()
}

/// Parses a plain decimal string such as `"0.010000877213746469"` without going through `f64`.
/// At most 18 fractional digits are accepted.
pub fn parse_numeric(input: &str) -> Option<UnsignedNumeric> {
    let input = input.trim();
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > TABLE_PRECISION as usize {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction_raw: u128 = if fraction.is_empty() {
        0
    } else {
        let padding = TABLE_PRECISION as u32 - fraction.len() as u32;
        fraction.parse::<u128>().ok()?.checked_mul(10u128.pow(padding))?
    };

    let raw = whole.checked_mul(TABLE_SCALE)?.checked_add(fraction_raw)?;
    Some(from_raw(raw))
}
