use brine_fp::UnsignedNumeric;
use crate::consts::*;

/// Continuous exponential curve that the discrete tables are sampled from.
///
/// This file is also compiled by the build script, so it must only depend on
/// `brine_fp` and the crate constants.
#[derive(Debug, Clone)]
pub struct ExponentialCurve {
    pub a: UnsignedNumeric,
    pub b: UnsignedNumeric,
    pub c: UnsignedNumeric,
}

impl Default for ExponentialCurve {
    fn default() -> Self {
        Self {
            a: UnsignedNumeric::from_scaled_u128(CURVE_A),
            b: UnsignedNumeric::from_scaled_u128(CURVE_B),
            c: UnsignedNumeric::from_scaled_u128(CURVE_C),
        }
    }
}

impl ExponentialCurve {
    /// Calculate token price at a given supply
    pub fn spot_price_at_supply(&self, current_supply: &UnsignedNumeric) -> Option<UnsignedNumeric> {
        // R'(S) = a * b * e^(c * s)
        // The evaluation order is load bearing: the pricing table must match it bit for bit.

        let c_times_s = self.c.checked_mul(current_supply)?;
        let exp = c_times_s.signed().exp()?;
        self.a.checked_mul(&self.b)?.checked_mul(&exp)
    }

    /// Calculate total cost to buy `num_tokens` starting at `current_supply`
    /// “How much does it cost to get X tokens?”
    pub fn tokens_to_value_from_current_supply(
        &self,
        current_supply: &UnsignedNumeric,
        tokens: &UnsignedNumeric,
    ) -> Option<UnsignedNumeric> {
        // Integral of price function:
        // R(S) = ∫(a * b * e^(c * s)) ds = (a * b / c) * e^(c * s)
        // R(S) = (a * b / c) * (e^(c * S) - e^(c * S0))

        let new_supply = current_supply.checked_add(tokens)?;
        let cs = self.c.checked_mul(current_supply)?;
        let ns = self.c.checked_mul(&new_supply)?;

        let exp_cs = cs.signed().exp()?;
        let exp_ns = ns.signed().exp()?;

        let numerator = self.a.checked_mul(&self.b)?;
        let ab_over_c = numerator.checked_div(&self.c)?;

        exp_ns
            .checked_sub(&exp_cs)
            .and_then(|diff| ab_over_c.checked_mul(&diff))
    }
}
