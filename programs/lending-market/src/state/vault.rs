use anchor_lang::prelude::*;

use crate::error::LendingError;

/// Pooled vault for one underlying asset. Shares are an SPL mint with the
/// same decimals as the asset, so the bootstrap deposit is 1:1 in raw units.
///
/// The vault's only asset ledger is `total_idle` (tokens physically in
/// custody). Lent-out value lives in the bound market's debt list and is
/// added back at the call boundary via [`Vault::total_assets`]; nothing is
/// double-counted.
#[account]
#[derive(InitSpace)]
pub struct Vault {
    /// The one market authorized for the admin borrow/repay paths.
    pub market: Pubkey,
    pub asset_mint: Pubkey,
    pub shares_mint: Pubkey,
    /// Token account holding the idle assets.
    pub asset_vault: Pubkey,
    /// Assets physically custodied; excludes anything lent out.
    pub total_idle: u64,
    pub bump: u8,
}

impl Vault {
    /// Economic value backing the share supply: idle custody plus the bound
    /// market's principal-plus-accrued-interest as of now.
    pub fn total_assets(&self, outstanding: u64) -> Result<u64> {
        self.total_idle
            .checked_add(outstanding)
            .ok_or_else(|| error!(LendingError::MathOverflow))
    }

    pub fn record_deposit(&mut self, amount: u64) -> Result<()> {
        self.total_idle = self
            .total_idle
            .checked_add(amount)
            .ok_or(LendingError::MathOverflow)?;
        Ok(())
    }

    /// Lender withdrawal of physically present assets. Funds lent out do not
    /// count as withdrawable liquidity.
    pub fn record_withdraw(&mut self, amount: u64) -> Result<()> {
        require!(amount <= self.total_idle, LendingError::InsufficientLiquidity);
        self.total_idle -= amount;
        Ok(())
    }

    /// Privileged physical transfer out, share accounting untouched: the
    /// lent value keeps backing shares through the outstanding-debt term.
    pub fn admin_borrow(&mut self, market: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*market, self.market, LendingError::UnauthorizedMarket);
        require!(amount <= self.total_idle, LendingError::InsufficientLiquidity);
        self.total_idle -= amount;
        Ok(())
    }

    /// Privileged physical transfer back in. Repaid interest lands here as
    /// realized idle assets.
    pub fn admin_repay(&mut self, market: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*market, self.market, LendingError::UnauthorizedMarket);
        self.total_idle = self
            .total_idle
            .checked_add(amount)
            .ok_or(LendingError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(market: Pubkey, total_idle: u64) -> Vault {
        Vault {
            market,
            asset_mint: Pubkey::new_unique(),
            shares_mint: Pubkey::new_unique(),
            asset_vault: Pubkey::new_unique(),
            total_idle,
            bump: 253,
        }
    }

    #[test]
    fn test_total_assets_includes_outstanding_debt() {
        let v = vault(Pubkey::new_unique(), 400);
        assert_eq!(v.total_assets(600).unwrap(), 1000);
    }

    #[test]
    fn test_admin_borrow_requires_bound_market() {
        let market = Pubkey::new_unique();
        let mut v = vault(market, 1000);

        let other = Pubkey::new_unique();
        assert!(v.admin_borrow(&other, 100).is_err());
        assert!(v.admin_repay(&other, 100).is_err());
        assert_eq!(v.total_idle, 1000);

        v.admin_borrow(&market, 100).unwrap();
        assert_eq!(v.total_idle, 900);
    }

    #[test]
    fn test_admin_borrow_limited_to_idle_liquidity() {
        let market = Pubkey::new_unique();
        let mut v = vault(market, 50);
        assert!(v.admin_borrow(&market, 51).is_err());
        assert_eq!(v.total_idle, 50);
    }

    #[test]
    fn test_withdraw_cannot_touch_lent_funds() {
        let market = Pubkey::new_unique();
        let mut v = vault(market, 1000);
        v.admin_borrow(&market, 700).unwrap();

        // 700 is still economic value, but only 300 is withdrawable.
        assert_eq!(v.total_assets(700).unwrap(), 1000);
        assert!(v.record_withdraw(301).is_err());
        v.record_withdraw(300).unwrap();
        assert_eq!(v.total_idle, 0);
    }

    #[test]
    fn test_repay_restores_idle() {
        let market = Pubkey::new_unique();
        let mut v = vault(market, 1000);
        v.admin_borrow(&market, 700).unwrap();
        // 700 principal plus 35 interest comes back.
        v.admin_repay(&market, 735).unwrap();
        assert_eq!(v.total_idle, 1035);
    }
}
