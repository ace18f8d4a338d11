use anchor_lang::prelude::*;

use crate::constants::{RATE_SCALE, REFERENCE_DECIMALS, SECONDS_PER_YEAR};
use crate::error::LendingError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rounding {
    Floor,
    Ceiling,
}

/// Safe multiplication then division with configurable rounding.
///
/// Computes: (value × numerator) / denominator on a u128 intermediate.
pub fn mul_div(value: u64, numerator: u64, denominator: u64, rounding: Rounding) -> Result<u64> {
    require!(denominator > 0, LendingError::DivisionByZero);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(LendingError::MathOverflow)?;

    let denom = denominator as u128;
    let result = match rounding {
        Rounding::Floor => product / denom,
        Rounding::Ceiling => product.div_ceil(denom),
    };

    require!(result <= u64::MAX as u128, LendingError::MathOverflow);
    Ok(result as u64)
}

/// Shares owed for depositing `assets`.
///
/// 1:1 while the vault is empty, proportional afterwards. Floor for deposits
/// (depositor gets less), ceiling for withdrawals (owner burns more), so
/// rounding never leaks value out of the pool.
pub fn convert_to_shares(
    assets: u64,
    total_assets: u64,
    total_shares: u64,
    rounding: Rounding,
) -> Result<u64> {
    if total_shares == 0 {
        return Ok(assets);
    }
    mul_div(assets, total_shares, total_assets, rounding)
}

/// Assets represented by `shares` at the current share price.
pub fn convert_to_assets(
    shares: u64,
    total_assets: u64,
    total_shares: u64,
    rounding: Rounding,
) -> Result<u64> {
    if total_shares == 0 {
        return Ok(0);
    }
    mul_div(shares, total_assets, total_shares, rounding)
}

/// Simple (non-compounding) interest on `principal` at `rate` (RATE_SCALE
/// fixed point) over `elapsed` seconds since the last accrual checkpoint.
pub fn accrued_interest(principal: u64, rate: u64, elapsed: i64) -> Result<u64> {
    let elapsed = u64::try_from(elapsed).map_err(|_| LendingError::MathOverflow)?;

    let numerator = (principal as u128)
        .checked_mul(rate as u128)
        .ok_or(LendingError::MathOverflow)?
        .checked_mul(elapsed as u128)
        .ok_or(LendingError::MathOverflow)?;
    let denominator = (SECONDS_PER_YEAR as u128) * (RATE_SCALE as u128);

    let interest = numerator / denominator;
    require!(interest <= u64::MAX as u128, LendingError::MathOverflow);
    Ok(interest as u64)
}

fn pow10(decimals: u8) -> u128 {
    10u128.pow(decimals as u32)
}

/// Value of `amount` raw units of an asset, normalized to REFERENCE_DECIMALS.
///
/// `price` is the price of one whole token, scaled by 10^price_decimals.
pub fn asset_value(amount: u64, asset_decimals: u8, price: u64, price_decimals: u8) -> Result<u64> {
    let numerator = (amount as u128)
        .checked_mul(price as u128)
        .ok_or(LendingError::MathOverflow)?
        .checked_mul(pow10(REFERENCE_DECIMALS))
        .ok_or(LendingError::MathOverflow)?;
    let denominator = pow10(asset_decimals)
        .checked_mul(pow10(price_decimals))
        .ok_or(LendingError::MathOverflow)?;

    let value = numerator / denominator;
    require!(value <= u64::MAX as u128, LendingError::MathOverflow);
    Ok(value as u64)
}

/// Inverse of [`asset_value`]: raw units of an asset worth `value`
/// reference-scaled units at the given price. Floor rounded, so a value
/// converted to an amount never overstates purchasing power.
pub fn amount_for_value(
    value: u64,
    price: u64,
    price_decimals: u8,
    asset_decimals: u8,
) -> Result<u64> {
    require!(price > 0, LendingError::InvalidPrice);

    let numerator = (value as u128)
        .checked_mul(pow10(asset_decimals))
        .ok_or(LendingError::MathOverflow)?
        .checked_mul(pow10(price_decimals))
        .ok_or(LendingError::MathOverflow)?;
    let denominator = pow10(REFERENCE_DECIMALS)
        .checked_mul(price as u128)
        .ok_or(LendingError::MathOverflow)?;

    let amount = numerator / denominator;
    require!(amount <= u64::MAX as u128, LendingError::MathOverflow);
    Ok(amount as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_floor() {
        assert_eq!(mul_div(100, 3, 2, Rounding::Floor).unwrap(), 150);
        assert_eq!(mul_div(100, 1, 3, Rounding::Floor).unwrap(), 33);
    }

    #[test]
    fn test_mul_div_ceiling() {
        assert_eq!(mul_div(100, 3, 2, Rounding::Ceiling).unwrap(), 150);
        assert_eq!(mul_div(100, 1, 3, Rounding::Ceiling).unwrap(), 34);
    }

    #[test]
    fn test_mul_div_division_by_zero() {
        assert!(mul_div(100, 100, 0, Rounding::Floor).is_err());
    }

    #[test]
    fn test_bootstrap_deposit_is_one_to_one() {
        // First depositor: 1000 units into an empty vault -> 1000 shares
        let shares = convert_to_shares(1000, 0, 0, Rounding::Floor).unwrap();
        assert_eq!(shares, 1000);
    }

    #[test]
    fn test_second_deposit_is_proportional() {
        // 500 units when totalAssets == 1000 and totalShares == 1000
        let shares = convert_to_shares(500, 1000, 1000, Rounding::Floor).unwrap();
        assert_eq!(shares, 500);
    }

    #[test]
    fn test_empty_vault_shares_are_worthless() {
        assert_eq!(convert_to_assets(100, 0, 0, Rounding::Floor).unwrap(), 0);
    }

    #[test]
    fn test_round_trip_loses_at_most_one_unit_per_op() {
        // Deposit A into a vault with an awkward share price, withdraw the
        // resulting shares' worth immediately.
        let (total_assets, total_shares) = (1_000_003, 999_983);
        let deposited = 12_345;

        let shares = convert_to_shares(deposited, total_assets, total_shares, Rounding::Floor)
            .unwrap();
        let back = convert_to_assets(
            shares,
            total_assets + deposited,
            total_shares + shares,
            Rounding::Floor,
        )
        .unwrap();

        assert!(back <= deposited);
        assert!(deposited - back <= 2);
    }

    #[test]
    fn test_withdraw_burns_at_least_deposit_minted() {
        let deposit_shares = convert_to_shares(100, 1000, 997, Rounding::Floor).unwrap();
        let withdraw_shares = convert_to_shares(100, 1000, 997, Rounding::Ceiling).unwrap();
        assert!(withdraw_shares >= deposit_shares);
    }

    #[test]
    fn test_accrued_interest_zero_elapsed() {
        assert_eq!(accrued_interest(500, RATE_SCALE / 10, 0).unwrap(), 0);
    }

    #[test]
    fn test_accrued_interest_one_year_exact() {
        // borrow 500 at rate r for exactly one year: interest == 500 * r / SCALE
        let rate = RATE_SCALE / 20; // 5%
        let interest =
            accrued_interest(500_000_000, rate, SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(interest, 500_000_000 / 20);
    }

    #[test]
    fn test_accrued_interest_monotonic_in_time() {
        let rate = RATE_SCALE / 8;
        let mut last = 0;
        for elapsed in [0i64, 1, 60, 3600, 86_400, 31_536_000] {
            let interest = accrued_interest(1_000_000, rate, elapsed).unwrap();
            assert!(interest >= last);
            last = interest;
        }
    }

    #[test]
    fn test_accrued_interest_rejects_negative_elapsed() {
        assert!(accrued_interest(1_000_000, RATE_SCALE, -1).is_err());
    }

    #[test]
    fn test_asset_value_normalizes_decimals() {
        // 1000 whole tokens of a 0-decimal asset at price 1 (0-decimal feed)
        // -> 1000 units in the 9-decimal reference base.
        assert_eq!(asset_value(1000, 0, 1, 0).unwrap(), 1_000_000_000_000);

        // 2.5 tokens of a 6-decimal asset at price 4.00 (2-decimal feed)
        assert_eq!(asset_value(2_500_000, 6, 400, 2).unwrap(), 10_000_000_000);
    }

    #[test]
    fn test_amount_for_value_inverts_asset_value() {
        let value = asset_value(750_000, 6, 12_345, 4).unwrap();
        let amount = amount_for_value(value, 12_345, 4, 6).unwrap();
        assert!(amount <= 750_000);
        assert!(750_000 - amount <= 1);
    }

    #[test]
    fn test_amount_for_value_rejects_zero_price() {
        assert!(amount_for_value(1_000, 0, 2, 6).is_err());
    }
}
