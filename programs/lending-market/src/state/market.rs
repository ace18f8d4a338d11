use anchor_lang::prelude::*;

use crate::constants::{
    LTV_DENOMINATOR, MAX_ACTIVE_BORROWERS, MAX_COLLATERAL_TYPES, MAX_DECIMALS, MAX_LTV, MIN_LTV,
};
use crate::error::LendingError;
use crate::math::{self, Rounding};
use crate::state::{OracleRegistry, UserAccount};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace)]
pub struct CollateralConfig {
    pub asset_mint: Pubkey,
    /// Loan-to-value ratio in whole percent, [1, 100]. Fixed at registration.
    pub ltv: u64,
    pub decimals: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace)]
pub struct DebtPosition {
    pub borrower: Pubkey,
    /// Borrowed and not yet repaid, in borrow-asset raw units.
    pub principal: u64,
    /// Rate snapshot (RATE_SCALE fixed point) at the last checkpoint.
    pub rate: u64,
    /// Timestamp of the last accrual checkpoint.
    pub last_accrual: i64,
}

/// Risk and borrowing engine for one borrowable asset. Holds the supported
/// collateral registry and the arena-style list of open debt positions;
/// positions are swap-removed on full repayment so aggregate queries cost
/// O(open positions).
#[account]
#[derive(InitSpace)]
pub struct Market {
    pub authority: Pubkey,
    /// The borrowable asset.
    pub asset_mint: Pubkey,
    pub asset_decimals: u8,
    pub vault: Pubkey,
    pub oracle: Pubkey,
    pub rate_model: Pubkey,
    /// Oldest price (seconds) the market will still act on.
    pub max_price_age: i64,
    /// Sum of all open principals; kept in lockstep with `debts`.
    pub total_principal: u64,
    pub bump: u8,
    #[max_len(MAX_COLLATERAL_TYPES)]
    pub collaterals: Vec<CollateralConfig>,
    #[max_len(MAX_ACTIVE_BORROWERS)]
    pub debts: Vec<DebtPosition>,
}

impl Market {
    pub fn collateral_config(&self, asset_mint: &Pubkey) -> Result<&CollateralConfig> {
        self.collaterals
            .iter()
            .find(|c| c.asset_mint == *asset_mint)
            .ok_or_else(|| error!(LendingError::AssetNotSupported))
    }

    pub fn ltv_ratio(&self, asset_mint: &Pubkey) -> Result<u64> {
        Ok(self.collateral_config(asset_mint)?.ltv)
    }

    pub fn add_collateral_token(
        &mut self,
        asset_mint: Pubkey,
        ltv: u64,
        decimals: u8,
    ) -> Result<()> {
        require!(
            (MIN_LTV..=MAX_LTV).contains(&ltv),
            LendingError::InvalidLtvRatio
        );
        require!(decimals <= MAX_DECIMALS, LendingError::InvalidAssetDecimals);
        require!(
            !self.collaterals.iter().any(|c| c.asset_mint == asset_mint),
            LendingError::AssetAlreadySupported
        );
        require!(
            self.collaterals.len() < MAX_COLLATERAL_TYPES,
            LendingError::CollateralListFull
        );

        self.collaterals.push(CollateralConfig {
            asset_mint,
            ltv,
            decimals,
        });
        Ok(())
    }

    pub fn debt_position(&self, borrower: &Pubkey) -> Option<&DebtPosition> {
        self.debts.iter().find(|d| d.borrower == *borrower)
    }

    /// Interest accrued since the borrower's last checkpoint; zero with no
    /// open debt.
    pub fn accrued_interest(&self, borrower: &Pubkey, now: i64) -> Result<u64> {
        match self.debt_position(borrower) {
            Some(debt) => math::accrued_interest(
                debt.principal,
                debt.rate,
                now.checked_sub(debt.last_accrual)
                    .ok_or(LendingError::MathOverflow)?,
            ),
            None => Ok(0),
        }
    }

    /// Principal plus accrued interest for one borrower as of now.
    pub fn outstanding_debt(&self, borrower: &Pubkey, now: i64) -> Result<u64> {
        let principal = self
            .debt_position(borrower)
            .map(|d| d.principal)
            .unwrap_or(0);
        principal
            .checked_add(self.accrued_interest(borrower, now)?)
            .ok_or_else(|| error!(LendingError::MathOverflow))
    }

    /// Σ principal + accrued over every open position. This is the exact
    /// term the bound vault adds to its idle balance for `total_assets`.
    pub fn borrowed_plus_interest(&self, now: i64) -> Result<u64> {
        let mut total: u64 = 0;
        for debt in &self.debts {
            let accrued = math::accrued_interest(
                debt.principal,
                debt.rate,
                now.checked_sub(debt.last_accrual)
                    .ok_or(LendingError::MathOverflow)?,
            )?;
            total = total
                .checked_add(debt.principal)
                .ok_or(LendingError::MathOverflow)?
                .checked_add(accrued)
                .ok_or(LendingError::MathOverflow)?;
        }
        Ok(total)
    }

    /// LTV-weighted value of the user's collateral, normalized to the
    /// 9-decimal reference base. LTV is applied per asset before summation,
    /// so this *is* the user's borrowing power in reference units.
    pub fn total_collateral_value(
        &self,
        user: &UserAccount,
        oracle: &OracleRegistry,
        now: i64,
    ) -> Result<u64> {
        let mut total: u64 = 0;
        for entry in &user.collaterals {
            let config = self.collateral_config(&entry.asset_mint)?;
            let (price, price_decimals) =
                oracle.latest_price(&entry.asset_mint, now, self.max_price_age)?;
            let value = math::asset_value(entry.amount, config.decimals, price, price_decimals)?;
            let weighted = math::mul_div(value, config.ltv, LTV_DENOMINATOR, Rounding::Floor)?;
            total = total
                .checked_add(weighted)
                .ok_or(LendingError::MathOverflow)?;
        }
        Ok(total)
    }

    /// Borrowing power denominated in borrow-asset raw units.
    pub fn borrowing_power(
        &self,
        user: &UserAccount,
        oracle: &OracleRegistry,
        now: i64,
    ) -> Result<u64> {
        let value = self.total_collateral_value(user, oracle, now)?;
        let (price, price_decimals) =
            oracle.latest_price(&self.asset_mint, now, self.max_price_age)?;
        math::amount_for_value(value, price, price_decimals, self.asset_decimals)
    }

    /// Record a disbursement. With open debt, interest accrued so far is
    /// folded into principal at the new checkpoint; the position carries a
    /// single fresh rate snapshot afterwards.
    pub fn record_borrow(
        &mut self,
        borrower: Pubkey,
        amount: u64,
        rate: u64,
        now: i64,
    ) -> Result<()> {
        let accrued = self.accrued_interest(&borrower, now)?;

        if let Some(debt) = self.debts.iter_mut().find(|d| d.borrower == borrower) {
            debt.principal = debt
                .principal
                .checked_add(accrued)
                .ok_or(LendingError::MathOverflow)?
                .checked_add(amount)
                .ok_or(LendingError::MathOverflow)?;
            debt.rate = rate;
            debt.last_accrual = now;

            self.total_principal = self
                .total_principal
                .checked_add(accrued)
                .ok_or(LendingError::MathOverflow)?
                .checked_add(amount)
                .ok_or(LendingError::MathOverflow)?;
            return Ok(());
        }

        require!(
            self.debts.len() < MAX_ACTIVE_BORROWERS,
            LendingError::BorrowerListFull
        );
        self.debts.push(DebtPosition {
            borrower,
            principal: amount,
            rate,
            last_accrual: now,
        });
        self.total_principal = self
            .total_principal
            .checked_add(amount)
            .ok_or(LendingError::MathOverflow)?;
        Ok(())
    }

    /// Record a repayment of `amount`, applied to interest first, then
    /// principal. Returns (interest_paid, principal_paid, remaining
    /// principal); a fully repaid position is swap-removed.
    pub fn record_repay(
        &mut self,
        borrower: &Pubkey,
        amount: u64,
        now: i64,
    ) -> Result<(u64, u64, u64)> {
        let index = self
            .debts
            .iter()
            .position(|d| d.borrower == *borrower)
            .ok_or_else(|| error!(LendingError::NoOutstandingDebt))?;

        let accrued = math::accrued_interest(
            self.debts[index].principal,
            self.debts[index].rate,
            now.checked_sub(self.debts[index].last_accrual)
                .ok_or(LendingError::MathOverflow)?,
        )?;
        require!(amount >= accrued, LendingError::RepayBelowAccruedInterest);

        let principal_paid = amount - accrued;
        let debt = &mut self.debts[index];
        require!(principal_paid <= debt.principal, LendingError::OverRepay);

        debt.principal -= principal_paid;
        debt.last_accrual = now;
        let remaining = debt.principal;

        self.total_principal = self
            .total_principal
            .checked_sub(principal_paid)
            .ok_or(LendingError::MathOverflow)?;

        if remaining == 0 {
            self.debts.swap_remove(index);
        }
        Ok((accrued, principal_paid, remaining))
    }

    /// Re-snapshot the rate on a still-open position (borrow/repay are the
    /// only checkpoint events; existing debt is never repriced in between).
    pub fn reprice_debt(&mut self, borrower: &Pubkey, rate: u64) -> Result<()> {
        let debt = self
            .debts
            .iter_mut()
            .find(|d| d.borrower == *borrower)
            .ok_or_else(|| error!(LendingError::NoOutstandingDebt))?;
        debt.rate = rate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{RATE_SCALE, SECONDS_PER_YEAR};
    use crate::state::{PriceFeed, Vault};

    fn market(asset_mint: Pubkey) -> Market {
        Market {
            authority: Pubkey::new_unique(),
            asset_mint,
            asset_decimals: 0,
            vault: Pubkey::new_unique(),
            oracle: Pubkey::new_unique(),
            rate_model: Pubkey::new_unique(),
            max_price_age: 60,
            total_principal: 0,
            bump: 251,
            collaterals: Vec::new(),
            debts: Vec::new(),
        }
    }

    fn oracle_with(feeds: Vec<(Pubkey, i64)>) -> OracleRegistry {
        OracleRegistry {
            authority: Pubkey::new_unique(),
            bump: 255,
            feeds: feeds
                .into_iter()
                .map(|(asset_mint, price)| PriceFeed {
                    asset_mint,
                    price,
                    decimals: 0,
                    updated_at: 0,
                    volatility: 0,
                })
                .collect(),
        }
    }

    fn user_with(asset_mint: Pubkey, amount: u64) -> UserAccount {
        UserAccount {
            owner: Pubkey::new_unique(),
            market: Pubkey::new_unique(),
            bump: 250,
            collaterals: vec![crate::state::CollateralEntry { asset_mint, amount }],
        }
    }

    #[test]
    fn test_add_collateral_validation() {
        let mut m = market(Pubkey::new_unique());
        let mint = Pubkey::new_unique();

        assert!(m.add_collateral_token(mint, 0, 6).is_err());
        assert!(m.add_collateral_token(mint, 101, 6).is_err());
        assert!(m.add_collateral_token(mint, 75, 10).is_err());

        m.add_collateral_token(mint, 75, 6).unwrap();
        assert_eq!(m.ltv_ratio(&mint).unwrap(), 75);
        assert!(m.add_collateral_token(mint, 50, 6).is_err());
    }

    #[test]
    fn test_borrowing_power_applies_ltv_per_asset() {
        // 1000 units of collateral A at price 1 with LTV 75 buys 750 units
        // of the borrow asset at price 1.
        let borrow_mint = Pubkey::new_unique();
        let coll_mint = Pubkey::new_unique();
        let mut m = market(borrow_mint);
        m.add_collateral_token(coll_mint, 75, 0).unwrap();

        let oracle = oracle_with(vec![(borrow_mint, 1), (coll_mint, 1)]);
        let user = user_with(coll_mint, 1000);

        assert_eq!(m.borrowing_power(&user, &oracle, 0).unwrap(), 750);
    }

    #[test]
    fn test_borrowing_power_sums_multiple_collaterals() {
        let borrow_mint = Pubkey::new_unique();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let mut m = market(borrow_mint);
        m.add_collateral_token(a, 50, 0).unwrap();
        m.add_collateral_token(b, 80, 0).unwrap();

        let oracle = oracle_with(vec![(borrow_mint, 2), (a, 4), (b, 1)]);
        let mut user = user_with(a, 100);
        user.collaterals.push(crate::state::CollateralEntry {
            asset_mint: b,
            amount: 200,
        });

        // (100*4*50% + 200*1*80%) / 2 = (200 + 160) / 2 = 180
        assert_eq!(m.borrowing_power(&user, &oracle, 0).unwrap(), 180);
    }

    #[test]
    fn test_unregistered_collateral_blocks_valuation() {
        let borrow_mint = Pubkey::new_unique();
        let coll_mint = Pubkey::new_unique();
        let m = market(borrow_mint);
        let oracle = oracle_with(vec![(borrow_mint, 1), (coll_mint, 1)]);
        let user = user_with(coll_mint, 1000);

        assert!(m.total_collateral_value(&user, &oracle, 0).is_err());
    }

    #[test]
    fn test_stale_price_halts_valuation() {
        let borrow_mint = Pubkey::new_unique();
        let coll_mint = Pubkey::new_unique();
        let mut m = market(borrow_mint);
        m.add_collateral_token(coll_mint, 75, 0).unwrap();
        let oracle = oracle_with(vec![(borrow_mint, 1), (coll_mint, 1)]);
        let user = user_with(coll_mint, 1000);

        // feeds were updated at t=0; max_price_age is 60
        assert!(m.total_collateral_value(&user, &oracle, 61).is_err());
    }

    #[test]
    fn test_record_borrow_creates_then_folds_interest() {
        let mut m = market(Pubkey::new_unique());
        let borrower = Pubkey::new_unique();
        let rate = RATE_SCALE / 10; // 10%

        m.record_borrow(borrower, 1_000_000, rate, 0).unwrap();
        assert_eq!(m.total_principal, 1_000_000);

        // One year later: 100_000 interest is folded in with the new draw.
        let year = SECONDS_PER_YEAR as i64;
        m.record_borrow(borrower, 500_000, rate / 2, year).unwrap();

        let debt = m.debt_position(&borrower).unwrap();
        assert_eq!(debt.principal, 1_600_000);
        assert_eq!(debt.rate, rate / 2);
        assert_eq!(debt.last_accrual, year);
        assert_eq!(m.total_principal, 1_600_000);
        assert_eq!(m.debts.len(), 1);
    }

    #[test]
    fn test_repay_interest_first_then_principal() {
        let mut m = market(Pubkey::new_unique());
        let borrower = Pubkey::new_unique();
        let rate = RATE_SCALE / 10;
        m.record_borrow(borrower, 1_000_000, rate, 0).unwrap();

        let year = SECONDS_PER_YEAR as i64;
        // Accrued after a year: 100_000. Short repayments are rejected.
        assert!(m.record_repay(&borrower, 99_999, year).is_err());

        let (interest, principal, remaining) =
            m.record_repay(&borrower, 150_000, year).unwrap();
        assert_eq!(interest, 100_000);
        assert_eq!(principal, 50_000);
        assert_eq!(remaining, 950_000);
        assert_eq!(m.total_principal, 950_000);

        // Checkpoint was reset: no time elapsed, no interest due.
        assert_eq!(m.accrued_interest(&borrower, year).unwrap(), 0);
    }

    #[test]
    fn test_full_repay_clears_position() {
        let mut m = market(Pubkey::new_unique());
        let borrower = Pubkey::new_unique();
        m.record_borrow(borrower, 500, RATE_SCALE / 10, 0).unwrap();

        let year = SECONDS_PER_YEAR as i64;
        let due = m.outstanding_debt(&borrower, year).unwrap();
        assert_eq!(due, 550);

        assert!(m.record_repay(&borrower, 551, year).is_err()); // over-repay
        let (_, _, remaining) = m.record_repay(&borrower, 550, year).unwrap();
        assert_eq!(remaining, 0);
        assert!(m.debt_position(&borrower).is_none());
        assert_eq!(m.total_principal, 0);
        assert_eq!(m.borrowed_plus_interest(year).unwrap(), 0);

        assert!(m.record_repay(&borrower, 1, year).is_err());
    }

    #[test]
    fn test_borrowed_plus_interest_sums_open_positions() {
        let mut m = market(Pubkey::new_unique());
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        m.record_borrow(alice, 1_000_000, RATE_SCALE / 10, 0).unwrap();
        m.record_borrow(bob, 2_000_000, RATE_SCALE / 20, 0).unwrap();

        let year = SECONDS_PER_YEAR as i64;
        // 1.0M + 100k + 2.0M + 100k
        assert_eq!(m.borrowed_plus_interest(year).unwrap(), 3_200_000);
        assert_eq!(m.total_principal, 3_000_000);
    }

    #[test]
    fn test_total_assets_consistent_across_borrow_and_repay() {
        // vault.total_assets() == physical balance + borrowedPlusInterest
        // must hold at every call boundary.
        let borrow_mint = Pubkey::new_unique();
        let mut m = market(borrow_mint);
        let market_key = Pubkey::new_unique();
        let mut v = Vault {
            market: market_key,
            asset_mint: borrow_mint,
            shares_mint: Pubkey::new_unique(),
            asset_vault: Pubkey::new_unique(),
            total_idle: 1_000_000,
            bump: 249,
        };
        let borrower = Pubkey::new_unique();
        let rate = RATE_SCALE / 10;

        v.admin_borrow(&market_key, 600_000).unwrap();
        m.record_borrow(borrower, 600_000, rate, 0).unwrap();
        assert_eq!(
            v.total_assets(m.borrowed_plus_interest(0).unwrap()).unwrap(),
            1_000_000
        );

        // Value accrues to lenders over time.
        let year = SECONDS_PER_YEAR as i64;
        let outstanding = m.borrowed_plus_interest(year).unwrap();
        assert_eq!(outstanding, 660_000);
        assert_eq!(v.total_assets(outstanding).unwrap(), 1_060_000);

        // Full repayment realizes the interest as idle assets.
        let (interest, principal, _) = m.record_repay(&borrower, 660_000, year).unwrap();
        v.admin_repay(&market_key, interest + principal).unwrap();
        assert_eq!(
            v.total_assets(m.borrowed_plus_interest(year).unwrap())
                .unwrap(),
            1_060_000
        );
        assert_eq!(v.total_idle, 1_060_000);
    }
}
