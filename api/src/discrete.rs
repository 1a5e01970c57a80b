use brine_fp::UnsignedNumeric;

use crate::consts::*;
use crate::error::{CurveError, CurveResult};
use crate::table::{DISCRETE_CUMULATIVE_VALUE_TABLE, DISCRETE_PRICING_TABLE};
use crate::utils::*;

/// A step-based bonding curve priced entirely from precomputed tables.
///
/// Supply is divided into steps of `step_size` whole tokens. Every supply in
/// `[i * step_size, (i + 1) * step_size)` trades at `pricing[i]`, and
/// `cumulative[i]` is the exact cost of minting the first `i * step_size`
/// tokens. Both tables are 10^18-scaled, the raw representation of
/// [`UnsignedNumeric`], so all range costs are computed exactly in integer
/// space and only the final within-step division rounds.
#[derive(Debug, Clone, Copy)]
pub struct DiscreteCurve<'a> {
    pricing: &'a [u128],
    cumulative: &'a [u128],
    step_size: u64,
    max_supply: u64,
}

impl Default for DiscreteCurve<'static> {
    fn default() -> Self {
        Self {
            pricing: DISCRETE_PRICING_TABLE,
            cumulative: DISCRETE_CUMULATIVE_VALUE_TABLE,
            step_size: STEP_SIZE,
            max_supply: MAX_TOKEN_SUPPLY,
        }
    }
}

impl<'a> DiscreteCurve<'a> {
    /// Builds a curve over caller-provided tables after checking that they
    /// describe a valid non-decreasing step function and its prefix sum.
    pub fn from_tables(
        pricing: &'a [u128],
        cumulative: &'a [u128],
        step_size: u64,
    ) -> CurveResult<Self> {
        if step_size == 0 {
            return Err(CurveError::InvalidInput("step size must be non-zero"));
        }
        if pricing.len() != cumulative.len() {
            return Err(CurveError::InvalidInput("table lengths differ"));
        }
        if pricing.len() < 2 {
            return Err(CurveError::InvalidInput("tables need at least two entries"));
        }
        if cumulative[0] != 0 {
            return Err(CurveError::InvalidInput("cumulative table must start at zero"));
        }
        if pricing.iter().any(|&price| price == 0) {
            return Err(CurveError::InvalidInput("prices must be non-zero"));
        }
        if pricing.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(CurveError::InvalidInput("prices must be non-decreasing"));
        }

        for (step, pair) in cumulative.windows(2).enumerate() {
            let expected = pricing[step]
                .checked_mul(step_size as u128)
                .and_then(|cost| pair[0].checked_add(cost))
                .ok_or(CurveError::Overflow)?;

            if pair[1] != expected {
                return Err(CurveError::InvalidInput("cumulative table is not the prefix sum of prices"));
            }
        }

        let steps = u64::try_from(pricing.len() - 1).map_err(|_| CurveError::Overflow)?;
        let max_supply = steps.checked_mul(step_size).ok_or(CurveError::Overflow)?;

        Ok(Self {
            pricing,
            cumulative,
            step_size,
            max_supply,
        })
    }

    pub fn step_size(&self) -> u64 {
        self.step_size
    }

    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    /// Number of entries in each table.
    pub fn table_len(&self) -> usize {
        self.pricing.len()
    }

    pub fn price_at(&self, step: usize) -> CurveResult<UnsignedNumeric> {
        self.pricing
            .get(step)
            .map(|&raw| from_raw(raw))
            .ok_or(CurveError::OutOfRange("step index beyond pricing table"))
    }

    pub fn cumulative_at(&self, step: usize) -> CurveResult<UnsignedNumeric> {
        self.cumulative
            .get(step)
            .map(|&raw| from_raw(raw))
            .ok_or(CurveError::OutOfRange("step index beyond cumulative table"))
    }

    /// Total value locked at the last step boundary, the most the curve can ever hold.
    pub fn max_cumulative_value(&self) -> UnsignedNumeric {
        from_raw(self.max_cumulative_raw())
    }

    fn max_cumulative_raw(&self) -> u128 {
        self.cumulative[self.cumulative.len() - 1]
    }

    fn step_of(&self, supply: u64) -> CurveResult<usize> {
        if supply > self.max_supply {
            return Err(CurveError::OutOfRange("supply exceeds max supply"));
        }
        Ok((supply / self.step_size) as usize)
    }

    /// Exact cost of minting `supply` tokens from zero, in raw units.
    fn cumulative_raw_at_supply(&self, supply: u64) -> CurveResult<u128> {
        let step = self.step_of(supply)?;
        let offset = (supply % self.step_size) as u128;

        self.pricing[step]
            .checked_mul(offset)
            .and_then(|partial| self.cumulative[step].checked_add(partial))
            .ok_or(CurveError::Overflow)
    }

    /// Binary search for the last step boundary whose cumulative value does not exceed `target`.
    fn step_at_or_below(&self, target: u128) -> usize {
        // cumulative[0] is zero, so the partition point is at least one
        self.cumulative
            .partition_point(|&value| value <= target)
            .saturating_sub(1)
    }

    /// Returns the spot price at a given supply level.
    ///
    /// The price is constant within each step: supply 0-99 uses `pricing[0]`,
    /// supply 100-199 uses `pricing[1]`, and so on.
    pub fn spot_price(&self, supply: u64) -> CurveResult<UnsignedNumeric> {
        let step = self.step_of(supply)?;
        Ok(from_raw(self.pricing[step]))
    }

    /// Calculate total cost to buy `tokens` starting at `current_supply`
    /// “How much does it cost to get X tokens?”
    pub fn tokens_to_value(&self, current_supply: u64, tokens: u64) -> CurveResult<UnsignedNumeric> {
        let end_supply = current_supply
            .checked_add(tokens)
            .ok_or(CurveError::OutOfRange("supply overflow"))?;

        let start = self.cumulative_raw_at_supply(current_supply)?;
        if tokens == 0 {
            return Ok(UnsignedNumeric::zero());
        }

        if end_supply > self.max_supply {
            return Err(CurveError::OutOfRange("purchase exceeds max supply"));
        }
        let end = self.cumulative_raw_at_supply(end_supply)?;

        end.checked_sub(start)
            .map(from_raw)
            .ok_or(CurveError::Overflow)
    }

    /// Calculate number of tokens received for `value` starting at `current_supply`
    /// “How many tokens can I get for Y value?”
    ///
    /// The result may be fractional. A zero value buys zero tokens.
    pub fn value_to_tokens(
        &self,
        current_supply: u64,
        value: &UnsignedNumeric,
    ) -> CurveResult<UnsignedNumeric> {
        let start = self.cumulative_raw_at_supply(current_supply)?;
        if is_zero(value) {
            return Ok(UnsignedNumeric::zero());
        }

        let value = to_raw(value).ok_or(CurveError::OutOfRange("value exceeds table range"))?;
        let target = start
            .checked_add(value)
            .ok_or(CurveError::OutOfRange("value exceeds table range"))?;

        if target > self.max_cumulative_raw() {
            return Err(CurveError::OutOfRange("purchase exceeds max supply"));
        }

        let step = self.step_at_or_below(target);
        let remaining = target - self.cumulative[step];

        // Whole steps crossed plus the fraction of the final step the remaining value buys
        let boundary = (step as u128)
            .checked_mul(self.step_size as u128)
            .and_then(|supply| supply.checked_mul(TABLE_SCALE))
            .ok_or(CurveError::Overflow)?;
        let partial = checked_div_raw(remaining, self.pricing[step]).ok_or(CurveError::Overflow)?;

        let end_supply = boundary.checked_add(partial).ok_or(CurveError::Overflow)?;
        let start_supply = (current_supply as u128)
            .checked_mul(TABLE_SCALE)
            .ok_or(CurveError::Overflow)?;

        end_supply
            .checked_sub(start_supply)
            .map(from_raw)
            .ok_or(CurveError::Overflow)
    }

    /// Calculate market cap (spot price × whole-token supply) for a supply given in quarks.
    pub fn market_cap(&self, supply_quarks: u64) -> CurveResult<UnsignedNumeric> {
        let supply = supply_quarks / QUARKS_PER_TOKEN;
        if supply == 0 {
            return Ok(UnsignedNumeric::zero());
        }

        let step = self.step_of(supply)?;
        self.pricing[step]
            .checked_mul(supply as u128)
            .map(from_raw)
            .ok_or(CurveError::Overflow)
    }

    /// Calculate the circulating supply backed by a reserve balance (in reserve quarks).
    ///
    /// Returns the largest whole-token supply whose total mint cost does not exceed
    /// `tvl_quarks`: the step boundary found by binary search, plus the whole tokens
    /// the residual reserve buys at that step's price.
    ///
    /// The mobile client and the settlement program stop at the step boundary, so a
    /// reserve just short of a boundary maps to the previous boundary there. Here
    /// `supply_from_tvl(999_999)` on a $0.01 first step is 99, where they report 0.
    pub fn supply_from_tvl(&self, tvl_quarks: u64) -> CurveResult<u64> {
        let tvl = to_numeric(tvl_quarks, RESERVE_DECIMALS)
            .and_then(|value| to_raw(&value))
            .ok_or(CurveError::Overflow)?;

        if tvl == 0 {
            return Ok(0);
        }
        if tvl > self.max_cumulative_raw() {
            return Err(CurveError::OutOfRange("tvl exceeds table range"));
        }

        let step = self.step_at_or_below(tvl);
        let residual = tvl - self.cumulative[step];
        let extra = u64::try_from(residual / self.pricing[step]).map_err(|_| CurveError::Overflow)?;

        (step as u64)
            .checked_mul(self.step_size)
            .and_then(|boundary| boundary.checked_add(extra))
            .ok_or(CurveError::Overflow)
    }
}
