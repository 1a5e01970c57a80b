use brine_fp::UnsignedNumeric;
use tracing::debug;

use crate::consts::*;
use crate::discrete::DiscreteCurve;
use crate::error::{CurveError, CurveResult};
use crate::utils::*;

/// Quote for a buy (amounts in tokens) or a sell (amounts in reserve value).
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEstimate {
    pub gross_amount: UnsignedNumeric,
    pub net_amount: UnsignedNumeric,
    pub fees: UnsignedNumeric,
}

/// Token quantity paired with the fiat price per token it was valued at.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub tokens: UnsignedNumeric,
    pub fx: UnsignedNumeric,
}

impl Valuation {
    pub fn zero() -> Self {
        Self {
            tokens: UnsignedNumeric::zero(),
            fx: UnsignedNumeric::zero(),
        }
    }

    /// Fiat value of the whole quantity, `tokens * fx`.
    pub fn fiat_value(&self) -> Option<UnsignedNumeric> {
        checked_mul_raw(to_raw(&self.tokens)?, to_raw(&self.fx)?).map(from_raw)
    }
}

/// Splits `gross` into the amount after a `fee_bps` fee and the fee itself.
///
/// `net + fees == gross` always holds exactly.
pub fn apply_fee(gross: &UnsignedNumeric, fee_bps: u32) -> CurveResult<TradeEstimate> {
    if fee_bps > MAX_FEE_BPS {
        return Err(CurveError::InvalidInput("fee exceeds 10000 bps"));
    }

    let gross_raw = to_raw(gross).ok_or(CurveError::Overflow)?;
    let kept = from_basis_points(MAX_FEE_BPS - fee_bps)
        .and_then(|rate| to_raw(&rate))
        .ok_or(CurveError::Overflow)?;
    let net_raw = checked_mul_raw(gross_raw, kept).ok_or(CurveError::Overflow)?;

    Ok(TradeEstimate {
        gross_amount: gross.clone(),
        net_amount: from_raw(net_raw),
        fees: from_raw(gross_raw - net_raw),
    })
}

impl<'a> DiscreteCurve<'a> {
    /// Quote the tokens received for spending `reserve_quarks_in` against a
    /// currency whose reserve currently holds `tvl_quarks`.
    pub fn buy(&self, reserve_quarks_in: u64, fee_bps: u32, tvl_quarks: u64) -> CurveResult<TradeEstimate> {
        self.try_buy(reserve_quarks_in, fee_bps, tvl_quarks)
            .inspect(|estimate| {
                debug!(
                    reserve_quarks_in,
                    fee_bps,
                    tvl_quarks,
                    gross = %estimate.gross_amount.to_string(),
                    net = %estimate.net_amount.to_string(),
                    "buy quote"
                )
            })
            .inspect_err(|err| debug!(reserve_quarks_in, fee_bps, tvl_quarks, %err, "buy quote failed"))
    }

    fn try_buy(&self, reserve_quarks_in: u64, fee_bps: u32, tvl_quarks: u64) -> CurveResult<TradeEstimate> {
        if fee_bps > MAX_FEE_BPS {
            return Err(CurveError::InvalidInput("fee exceeds 10000 bps"));
        }

        let value = to_numeric(reserve_quarks_in, RESERVE_DECIMALS).ok_or(CurveError::Overflow)?;
        let supply = self.supply_from_tvl(tvl_quarks)?;
        debug!(supply, "derived supply from tvl");

        let gross = self.value_to_tokens(supply, &value)?;
        apply_fee(&gross, fee_bps)
    }

    /// Quote the reserve value received for selling `token_quarks_in` back
    /// into a reserve that currently holds `tvl_quarks`.
    pub fn sell(&self, token_quarks_in: u64, fee_bps: u32, tvl_quarks: u64) -> CurveResult<TradeEstimate> {
        self.try_sell(token_quarks_in, fee_bps, tvl_quarks)
            .inspect(|estimate| {
                debug!(
                    token_quarks_in,
                    fee_bps,
                    tvl_quarks,
                    gross = %estimate.gross_amount.to_string(),
                    net = %estimate.net_amount.to_string(),
                    "sell quote"
                )
            })
            .inspect_err(|err| debug!(token_quarks_in, fee_bps, tvl_quarks, %err, "sell quote failed"))
    }

    fn try_sell(&self, token_quarks_in: u64, fee_bps: u32, tvl_quarks: u64) -> CurveResult<TradeEstimate> {
        if fee_bps > MAX_FEE_BPS {
            return Err(CurveError::InvalidInput("fee exceeds 10000 bps"));
        }

        let tokens = token_quarks_in / QUARKS_PER_TOKEN;
        let supply = self.supply_from_tvl(tvl_quarks)?;
        debug!(supply, tokens, "derived supply from tvl");

        // Selling burns from the top of the curve
        let start = supply
            .checked_sub(tokens)
            .ok_or(CurveError::OutOfRange("sell exceeds circulating supply"))?;

        let gross = self.tokens_to_value(start, tokens)?;
        apply_fee(&gross, fee_bps)
    }

    /// Convert a fiat amount into tokens at the current supply.
    ///
    /// `fiat_rate` is fiat units per unit of reserve. The returned `fx` is the
    /// effective fiat price paid per token. A zero amount yields a zero valuation.
    pub fn tokens_for_value_exchange(
        &self,
        fiat: &UnsignedNumeric,
        fiat_rate: &UnsignedNumeric,
        tvl_quarks: u64,
    ) -> CurveResult<Valuation> {
        self.try_tokens_for_value_exchange(fiat, fiat_rate, tvl_quarks)
            .inspect(|valuation| {
                debug!(
                    tvl_quarks,
                    tokens = %valuation.tokens.to_string(),
                    fx = %valuation.fx.to_string(),
                    "exchange quote"
                )
            })
            .inspect_err(|err| debug!(tvl_quarks, %err, "exchange quote failed"))
    }

    fn try_tokens_for_value_exchange(
        &self,
        fiat: &UnsignedNumeric,
        fiat_rate: &UnsignedNumeric,
        tvl_quarks: u64,
    ) -> CurveResult<Valuation> {
        if is_zero(fiat) {
            return Ok(Valuation::zero());
        }
        if is_zero(fiat_rate) {
            return Err(CurveError::InvalidInput("fiat rate must be non-zero"));
        }

        let fiat_raw = to_raw(fiat).ok_or(CurveError::Overflow)?;
        let rate_raw = to_raw(fiat_rate).ok_or(CurveError::Overflow)?;

        let value = checked_div_raw(fiat_raw, rate_raw).ok_or(CurveError::Overflow)?;
        if value == 0 {
            return Ok(Valuation::zero());
        }

        let supply = self.supply_from_tvl(tvl_quarks)?;
        let tokens = self.value_to_tokens(supply, &from_raw(value))?;

        let tokens_raw = to_raw(&tokens).ok_or(CurveError::Overflow)?;
        if tokens_raw == 0 {
            return Ok(Valuation::zero());
        }

        let fx = checked_div_raw(fiat_raw, tokens_raw).ok_or(CurveError::Overflow)?;
        Ok(Valuation {
            tokens,
            fx: from_raw(fx),
        })
    }

    /// Value a holding of `token_quarks` at the spot price for `supply_quarks`,
    /// expressed in fiat at `fiat_rate` fiat units per unit of reserve.
    pub fn value_for_tokens(
        &self,
        token_quarks: u64,
        fiat_rate: &UnsignedNumeric,
        supply_quarks: u64,
    ) -> CurveResult<Valuation> {
        let tokens = to_numeric(token_quarks, TOKEN_DECIMALS).ok_or(CurveError::Overflow)?;
        let price = self.spot_price(supply_quarks / QUARKS_PER_TOKEN)?;
        let rate = to_raw(fiat_rate).ok_or(CurveError::Overflow)?;
        let fx = to_raw(&price)
            .and_then(|price| checked_mul_raw(rate, price))
            .ok_or(CurveError::Overflow)?;

        Ok(Valuation {
            tokens,
            fx: from_raw(fx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrete::tests::{small_curve, CUMULATIVE, PRICING};

    fn raw(value: &UnsignedNumeric) -> u128 {
        to_raw(value).unwrap()
    }

    #[test]
    fn test_apply_fee() {
        let gross = from_raw(1_000 * TABLE_SCALE);

        let estimate = apply_fee(&gross, 0).unwrap();
        assert_eq!(estimate.net_amount, gross);
        assert!(is_zero(&estimate.fees));

        let estimate = apply_fee(&gross, 1_000).unwrap();
        assert_eq!(raw(&estimate.net_amount), 900 * TABLE_SCALE);
        assert_eq!(raw(&estimate.fees), 100 * TABLE_SCALE);

        let estimate = apply_fee(&gross, MAX_FEE_BPS).unwrap();
        assert!(is_zero(&estimate.net_amount));
        assert_eq!(estimate.fees, gross);

        // 3 * 9999 / 10000 = 2.9997 rounds to 3
        let estimate = apply_fee(&from_raw(3), 1).unwrap();
        assert_eq!(raw(&estimate.net_amount), 3);
        assert_eq!(raw(&estimate.fees), 0);

        // A 50% fee on an odd raw amount splits on a tie, keeping the even half
        let estimate = apply_fee(&from_raw(3), 5_000).unwrap();
        assert_eq!(raw(&estimate.net_amount), 2);
        assert_eq!(raw(&estimate.fees), 1);
        let estimate = apply_fee(&from_raw(1), 5_000).unwrap();
        assert_eq!(raw(&estimate.net_amount), 0);
        assert_eq!(raw(&estimate.fees), 1);

        assert_eq!(
            apply_fee(&gross, MAX_FEE_BPS + 1).unwrap_err(),
            CurveError::InvalidInput("fee exceeds 10000 bps")
        );
    }

    #[test]
    fn test_buy_first_step() {
        let curve = small_curve();

        // $0.25 at $0.01 per token on an empty reserve
        let estimate = curve.buy(250_000, 0, 0).unwrap();
        assert_eq!(raw(&estimate.gross_amount), 25 * TABLE_SCALE);
        assert_eq!(estimate.net_amount, estimate.gross_amount);
        assert!(is_zero(&estimate.fees));

        let estimate = curve.buy(250_000, 1_000, 0).unwrap();
        assert_eq!(raw(&estimate.net_amount), 22 * TABLE_SCALE + TABLE_SCALE / 2);
        assert_eq!(raw(&estimate.fees), 2 * TABLE_SCALE + TABLE_SCALE / 2);
    }

    #[test]
    fn test_buy_failures() {
        let curve = small_curve();
        assert!(matches!(curve.buy(1_000_000, 10_001, 0), Err(CurveError::InvalidInput(_))));

        // More than the whole curve can absorb
        assert!(matches!(curve.buy(5_000_000, 0, 0), Err(CurveError::OutOfRange(_))));
        assert!(matches!(curve.buy(1, 0, u64::MAX), Err(CurveError::OutOfRange(_))));
    }

    #[test]
    fn test_sell() {
        let curve = small_curve();

        // Reserve of exactly $2.000087... backs 200 tokens
        let tvl = (CUMULATIVE[2] / 1_000_000_000_000) as u64;
        assert_eq!(curve.supply_from_tvl(tvl).unwrap(), 199);

        let tvl = 2_000_088;
        assert_eq!(curve.supply_from_tvl(tvl).unwrap(), 200);

        let estimate = curve.sell(100 * QUARKS_PER_TOKEN, 0, tvl).unwrap();
        assert_eq!(raw(&estimate.gross_amount), 100 * PRICING[1]);
        assert_eq!(estimate.net_amount, estimate.gross_amount);

        let estimate = curve.sell(150 * QUARKS_PER_TOKEN + 1, 250, tvl).unwrap();
        assert_eq!(raw(&estimate.gross_amount), 50 * PRICING[0] + 100 * PRICING[1]);
        assert_eq!(
            raw(&estimate.net_amount) + raw(&estimate.fees),
            raw(&estimate.gross_amount)
        );

        assert!(matches!(
            curve.sell(201 * QUARKS_PER_TOKEN, 0, tvl),
            Err(CurveError::OutOfRange(_))
        ));
        assert!(matches!(curve.sell(QUARKS_PER_TOKEN, 20_000, tvl), Err(CurveError::InvalidInput(_))));

        // Less than one whole token sells nothing
        let estimate = curve.sell(QUARKS_PER_TOKEN - 1, 0, tvl).unwrap();
        assert!(is_zero(&estimate.gross_amount));
    }

    #[test]
    fn test_tokens_for_value_exchange() {
        let curve = small_curve();
        let one = from_raw(TABLE_SCALE);

        let valuation = curve
            .tokens_for_value_exchange(&UnsignedNumeric::zero(), &one, 0)
            .unwrap();
        assert_eq!(valuation, Valuation::zero());

        // 2 units of fiat at 2 fiat per dollar is $1, the whole first step
        let two = from_raw(2 * TABLE_SCALE);
        let valuation = curve.tokens_for_value_exchange(&two, &two, 0).unwrap();
        assert_eq!(raw(&valuation.tokens), 100 * TABLE_SCALE);
        assert_eq!(raw(&valuation.fx), 2 * TABLE_SCALE / 100);
        assert_eq!(raw(&valuation.fiat_value().unwrap()), 2 * TABLE_SCALE);

        assert!(matches!(
            curve.tokens_for_value_exchange(&one, &UnsignedNumeric::zero(), 0),
            Err(CurveError::InvalidInput(_))
        ));

        let max_tvl = (CUMULATIVE[4] / 1_000_000_000_000) as u64;
        assert!(matches!(
            curve.tokens_for_value_exchange(&one, &one, max_tvl + 1),
            Err(CurveError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_value_for_tokens() {
        let curve = small_curve();
        let rate = from_raw(2 * TABLE_SCALE);

        let valuation = curve
            .value_for_tokens(25 * QUARKS_PER_TOKEN, &rate, 150 * QUARKS_PER_TOKEN)
            .unwrap();
        assert_eq!(raw(&valuation.tokens), 25 * TABLE_SCALE);
        assert_eq!(raw(&valuation.fx), 2 * PRICING[1]);

        // Half of an odd raw price is a tie and rounds to the even neighbour
        let half = from_raw(TABLE_SCALE / 2);
        let valuation = curve
            .value_for_tokens(QUARKS_PER_TOKEN, &half, 100 * QUARKS_PER_TOKEN)
            .unwrap();
        assert_eq!(raw(&valuation.fx), PRICING[1] / 2);
        assert_eq!(raw(&valuation.fiat_value().unwrap()), PRICING[1] / 2);

        let dust = Valuation {
            tokens: from_raw(3),
            fx: from_raw(TABLE_SCALE / 2),
        };
        assert_eq!(raw(&dust.fiat_value().unwrap()), 2);

        assert!(matches!(
            curve.value_for_tokens(1, &rate, 401 * QUARKS_PER_TOKEN),
            Err(CurveError::OutOfRange(_))
        ));
    }
}
