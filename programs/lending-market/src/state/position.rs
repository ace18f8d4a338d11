use anchor_lang::prelude::*;

use crate::constants::MAX_USER_COLLATERALS;
use crate::error::LendingError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace)]
pub struct CollateralEntry {
    pub asset_mint: Pubkey,
    pub amount: u64,
}

/// Per-user market account: collateral balances by asset. An entry is
/// created on the first deposit of that asset and swap-removed when its
/// balance returns to zero.
#[account]
#[derive(InitSpace)]
pub struct UserAccount {
    pub owner: Pubkey,
    pub market: Pubkey,
    pub bump: u8,
    #[max_len(MAX_USER_COLLATERALS)]
    pub collaterals: Vec<CollateralEntry>,
}

impl UserAccount {
    pub fn collateral_balance(&self, asset_mint: &Pubkey) -> u64 {
        self.collaterals
            .iter()
            .find(|e| e.asset_mint == *asset_mint)
            .map(|e| e.amount)
            .unwrap_or(0)
    }

    pub fn record_collateral_deposit(&mut self, asset_mint: Pubkey, amount: u64) -> Result<()> {
        if let Some(entry) = self
            .collaterals
            .iter_mut()
            .find(|e| e.asset_mint == asset_mint)
        {
            entry.amount = entry
                .amount
                .checked_add(amount)
                .ok_or(LendingError::MathOverflow)?;
            return Ok(());
        }

        require!(
            self.collaterals.len() < MAX_USER_COLLATERALS,
            LendingError::CollateralListFull
        );
        self.collaterals.push(CollateralEntry { asset_mint, amount });
        Ok(())
    }

    pub fn record_collateral_withdraw(&mut self, asset_mint: &Pubkey, amount: u64) -> Result<()> {
        let index = self
            .collaterals
            .iter()
            .position(|e| e.asset_mint == *asset_mint)
            .ok_or_else(|| error!(LendingError::InsufficientCollateral))?;

        let entry = &mut self.collaterals[index];
        require!(amount <= entry.amount, LendingError::InsufficientCollateral);
        entry.amount -= amount;

        if entry.amount == 0 {
            self.collaterals.swap_remove(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            owner: Pubkey::new_unique(),
            market: Pubkey::new_unique(),
            bump: 252,
            collaterals: Vec::new(),
        }
    }

    #[test]
    fn test_deposit_creates_then_accumulates() {
        let mut user = account();
        let mint = Pubkey::new_unique();

        user.record_collateral_deposit(mint, 100).unwrap();
        user.record_collateral_deposit(mint, 50).unwrap();
        assert_eq!(user.collateral_balance(&mint), 150);
        assert_eq!(user.collaterals.len(), 1);
    }

    #[test]
    fn test_withdraw_bounded_by_balance() {
        let mut user = account();
        let mint = Pubkey::new_unique();
        user.record_collateral_deposit(mint, 100).unwrap();

        assert!(user.record_collateral_withdraw(&mint, 101).is_err());
        assert_eq!(user.collateral_balance(&mint), 100);
    }

    #[test]
    fn test_withdraw_unknown_asset_rejected() {
        let mut user = account();
        assert!(user
            .record_collateral_withdraw(&Pubkey::new_unique(), 1)
            .is_err());
    }

    #[test]
    fn test_zero_balance_entry_is_removed() {
        let mut user = account();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        user.record_collateral_deposit(a, 10).unwrap();
        user.record_collateral_deposit(b, 20).unwrap();

        user.record_collateral_withdraw(&a, 10).unwrap();
        assert_eq!(user.collaterals.len(), 1);
        assert_eq!(user.collateral_balance(&a), 0);
        assert_eq!(user.collateral_balance(&b), 20);
    }
}
