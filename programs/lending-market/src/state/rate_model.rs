use anchor_lang::prelude::*;

use crate::constants::RATE_SCALE;
use crate::error::LendingError;
use crate::math::{mul_div, Rounding};

/// Rate-curve parameters, all RATE_SCALE (1e18) fixed point. The model is a
/// pure function of the usage statistics it is handed; it performs no
/// external calls and mutates nothing outside administrative updates.
#[account]
#[derive(InitSpace)]
pub struct RateModel {
    pub authority: Pubkey,
    pub bump: u8,
    pub base_rate: u64,
    pub slope: u64,
    /// Weight of the price-volatility term; zero disables it.
    pub price_factor: u64,
    /// Weight of the supply-demand term; zero disables it.
    pub supply_factor: u64,
}

impl RateModel {
    /// Fraction of supplied value currently lent out, RATE_SCALE scaled.
    ///
    /// Borrowed above supplied means the ledger is corrupted upstream;
    /// that is surfaced as a fatal error, never clamped.
    pub fn utilization(total_borrowed: u64, total_supplied: u64) -> Result<u64> {
        if total_supplied == 0 && total_borrowed == 0 {
            return Ok(0);
        }
        require!(
            total_borrowed <= total_supplied,
            LendingError::UtilizationInvariant
        );
        mul_div(total_borrowed, RATE_SCALE, total_supplied, Rounding::Floor)
    }

    /// base + slope·u/SCALE + price_factor·vol/SCALE + supply_factor·sdr/SCALE
    pub fn borrow_rate(
        &self,
        utilization: u64,
        price_volatility: u64,
        supply_demand_ratio: u64,
    ) -> Result<u64> {
        require!(utilization <= RATE_SCALE, LendingError::UtilizationInvariant);

        let mut rate = self
            .base_rate
            .checked_add(mul_div(
                self.slope,
                utilization,
                RATE_SCALE,
                Rounding::Floor,
            )?)
            .ok_or(LendingError::MathOverflow)?;

        if self.price_factor > 0 {
            rate = rate
                .checked_add(mul_div(
                    self.price_factor,
                    price_volatility,
                    RATE_SCALE,
                    Rounding::Floor,
                )?)
                .ok_or(LendingError::MathOverflow)?;
        }
        if self.supply_factor > 0 {
            rate = rate
                .checked_add(mul_div(
                    self.supply_factor,
                    supply_demand_ratio,
                    RATE_SCALE,
                    Rounding::Floor,
                )?)
                .ok_or(LendingError::MathOverflow)?;
        }
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(base_rate: u64, slope: u64, price_factor: u64, supply_factor: u64) -> RateModel {
        RateModel {
            authority: Pubkey::new_unique(),
            bump: 254,
            base_rate,
            slope,
            price_factor,
            supply_factor,
        }
    }

    #[test]
    fn test_utilization_zero_supply_is_zero() {
        assert_eq!(RateModel::utilization(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_utilization_half() {
        assert_eq!(
            RateModel::utilization(500, 1000).unwrap(),
            RATE_SCALE / 2
        );
    }

    #[test]
    fn test_utilization_full() {
        assert_eq!(RateModel::utilization(1000, 1000).unwrap(), RATE_SCALE);
    }

    #[test]
    fn test_utilization_over_supply_is_fatal() {
        assert!(RateModel::utilization(1001, 1000).is_err());
        assert!(RateModel::utilization(1, 0).is_err());
    }

    #[test]
    fn test_borrow_rate_base_plus_slope() {
        // 2% base, 20% slope, 50% utilization -> 12%
        let m = model(RATE_SCALE / 50, RATE_SCALE / 5, 0, 0);
        let rate = m.borrow_rate(RATE_SCALE / 2, 0, 0).unwrap();
        assert_eq!(rate, RATE_SCALE / 50 + RATE_SCALE / 10);
    }

    #[test]
    fn test_borrow_rate_optional_terms() {
        let m = model(0, 0, RATE_SCALE / 2, RATE_SCALE / 4);
        // 10% volatility and 100% supply-demand skew
        let rate = m.borrow_rate(0, RATE_SCALE / 10, RATE_SCALE).unwrap();
        assert_eq!(rate, RATE_SCALE / 20 + RATE_SCALE / 4);
    }

    #[test]
    fn test_borrow_rate_rejects_excess_utilization() {
        let m = model(0, RATE_SCALE, 0, 0);
        assert!(m.borrow_rate(RATE_SCALE + 1, 0, 0).is_err());
    }
}
