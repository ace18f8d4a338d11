use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod lending_market {
    use super::*;

    // ============ Setup ============

    /// Create a market for one borrowable asset together with its pooled
    /// vault and share mint, wired to an oracle registry and a rate model
    pub fn initialize_market(ctx: Context<InitializeMarket>, max_price_age: i64) -> Result<()> {
        instructions::initialize_market::handler(ctx, max_price_age)
    }

    /// Create an owner-gated price feed registry
    pub fn initialize_oracle(ctx: Context<InitializeOracle>) -> Result<()> {
        instructions::oracle_admin::initialize_oracle(ctx)
    }

    /// Register a price feed (price stays unusable until the first update)
    pub fn add_feed(ctx: Context<OracleAdmin>, asset_mint: Pubkey, decimals: u8) -> Result<()> {
        instructions::oracle_admin::add_feed(ctx, asset_mint, decimals)
    }

    /// Push a new price for a registered feed
    pub fn update_feed(ctx: Context<OracleAdmin>, asset_mint: Pubkey, price: i64) -> Result<()> {
        instructions::oracle_admin::update_feed(ctx, asset_mint, price)
    }

    /// Unregister a price feed
    pub fn remove_feed(ctx: Context<OracleAdmin>, asset_mint: Pubkey) -> Result<()> {
        instructions::oracle_admin::remove_feed(ctx, asset_mint)
    }

    /// Create a rate model; parameters are RATE_SCALE (1e18) fixed point
    pub fn initialize_rate_model(
        ctx: Context<InitializeRateModel>,
        base_rate: u64,
        slope: u64,
        price_factor: u64,
        supply_factor: u64,
    ) -> Result<()> {
        instructions::rate_model_admin::initialize_rate_model(
            ctx,
            base_rate,
            slope,
            price_factor,
            supply_factor,
        )
    }

    /// Replace the rate-curve parameters
    pub fn update_rate_model(
        ctx: Context<UpdateRateModel>,
        base_rate: u64,
        slope: u64,
        price_factor: u64,
        supply_factor: u64,
    ) -> Result<()> {
        instructions::rate_model_admin::update_rate_model(
            ctx,
            base_rate,
            slope,
            price_factor,
            supply_factor,
        )
    }

    /// Register a collateral asset with its LTV (1-100) and create the
    /// market's custody account for it
    pub fn add_collateral_token(ctx: Context<AddCollateralToken>, ltv: u64) -> Result<()> {
        instructions::add_collateral::handler(ctx, ltv)
    }

    // ============ Lender side ============

    /// Deposit assets into the vault and receive shares (floor rounding)
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraw exact assets by burning the required shares (ceiling
    /// rounding); fails when the liquidity is currently lent out
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    // ============ Borrower side ============

    /// Post collateral to the market
    pub fn deposit_collateral(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
        instructions::deposit_collateral::handler(ctx, amount)
    }

    /// Reclaim collateral; fails if the remainder would no longer cover the
    /// caller's outstanding debt
    pub fn withdraw_collateral(ctx: Context<WithdrawCollateral>, amount: u64) -> Result<()> {
        instructions::withdraw_collateral::handler(ctx, amount)
    }

    /// Borrow against posted collateral at a fresh rate snapshot
    pub fn borrow(ctx: Context<Borrow>, amount: u64) -> Result<()> {
        instructions::borrow::handler(ctx, amount)
    }

    /// Repay accrued interest first, then principal; full repayment clears
    /// the debt position
    pub fn repay(ctx: Context<Repay>, amount: u64) -> Result<()> {
        instructions::repay::handler(ctx, amount)
    }

    // ============ View Functions (CPI composable) ============

    /// LTV-weighted collateral value of a user, 9-decimal reference units
    pub fn get_total_collateral_value(ctx: Context<CollateralValueView>) -> Result<()> {
        instructions::view::get_total_collateral_value(ctx)
    }

    /// Registered LTV for a collateral asset
    pub fn get_ltv_ratio(ctx: Context<MarketView>, asset_mint: Pubkey) -> Result<()> {
        instructions::view::get_ltv_ratio(ctx, asset_mint)
    }

    /// Interest accrued by a user since their last checkpoint
    pub fn calculate_accrued_interest(ctx: Context<MarketView>, user: Pubkey) -> Result<()> {
        instructions::view::calculate_accrued_interest(ctx, user)
    }

    /// Principal plus accrued interest over all open debt positions
    pub fn borrowed_plus_interest(ctx: Context<MarketView>) -> Result<()> {
        instructions::view::borrowed_plus_interest(ctx)
    }

    /// Total economic value backing the share supply
    pub fn total_assets(ctx: Context<VaultView>) -> Result<()> {
        instructions::view::get_total_assets(ctx)
    }

    /// Convert assets to shares (floor rounding)
    pub fn convert_to_shares(ctx: Context<VaultView>, assets: u64) -> Result<()> {
        instructions::view::convert_to_shares_view(ctx, assets)
    }

    /// Convert shares to assets (floor rounding)
    pub fn convert_to_assets(ctx: Context<VaultView>, shares: u64) -> Result<()> {
        instructions::view::convert_to_assets_view(ctx, shares)
    }
}
