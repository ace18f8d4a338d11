use anchor_lang::prelude::*;

#[event]
pub struct MarketInitialized {
    pub market: Pubkey,
    pub vault: Pubkey,
    pub asset_mint: Pubkey,
    pub oracle: Pubkey,
    pub rate_model: Pubkey,
}

#[event]
pub struct Deposit {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
}

#[event]
pub struct Withdraw {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub receiver: Pubkey,
    pub assets: u64,
    pub shares: u64,
}

#[event]
pub struct CollateralTokenAdded {
    pub market: Pubkey,
    pub asset_mint: Pubkey,
    pub ltv: u64,
}

#[event]
pub struct CollateralDeposited {
    pub market: Pubkey,
    pub user: Pubkey,
    pub asset_mint: Pubkey,
    pub amount: u64,
    pub balance: u64,
}

#[event]
pub struct CollateralWithdrawn {
    pub market: Pubkey,
    pub user: Pubkey,
    pub asset_mint: Pubkey,
    pub amount: u64,
    pub balance: u64,
}

#[event]
pub struct Borrowed {
    pub market: Pubkey,
    pub borrower: Pubkey,
    pub amount: u64,
    pub rate: u64,
    pub principal: u64,
}

#[event]
pub struct Repaid {
    pub market: Pubkey,
    pub borrower: Pubkey,
    pub interest_paid: u64,
    pub principal_paid: u64,
    pub remaining_principal: u64,
}

#[event]
pub struct FeedAdded {
    pub oracle: Pubkey,
    pub asset_mint: Pubkey,
    pub decimals: u8,
}

#[event]
pub struct FeedUpdated {
    pub oracle: Pubkey,
    pub asset_mint: Pubkey,
    pub price: i64,
    pub volatility: u64,
}

#[event]
pub struct FeedRemoved {
    pub oracle: Pubkey,
    pub asset_mint: Pubkey,
}

#[event]
pub struct RateModelUpdated {
    pub rate_model: Pubkey,
    pub base_rate: u64,
    pub slope: u64,
    pub price_factor: u64,
    pub supply_factor: u64,
}
