use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;
use anchor_spl::token_interface::Mint;

use crate::constants::USER_SEED;
use crate::math::{convert_to_assets, convert_to_shares, Rounding};
use crate::state::{Market, OracleRegistry, UserAccount, Vault};

#[derive(Accounts)]
pub struct MarketView<'info> {
    pub market: Box<Account<'info, Market>>,
}

#[derive(Accounts)]
pub struct CollateralValueView<'info> {
    #[account(has_one = oracle)]
    pub market: Box<Account<'info, Market>>,

    pub oracle: Box<Account<'info, OracleRegistry>>,

    #[account(
        seeds = [USER_SEED, market.key().as_ref(), user_account.owner.as_ref()],
        bump = user_account.bump,
    )]
    pub user_account: Box<Account<'info, UserAccount>>,
}

#[derive(Accounts)]
pub struct VaultView<'info> {
    #[account(has_one = vault)]
    pub market: Box<Account<'info, Market>>,

    #[account(has_one = shares_mint)]
    pub vault: Box<Account<'info, Vault>>,

    pub shares_mint: InterfaceAccount<'info, Mint>,
}

/// LTV-weighted collateral value of the account's owner (reference units).
pub fn get_total_collateral_value(ctx: Context<CollateralValueView>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let value = ctx.accounts.market.total_collateral_value(
        &ctx.accounts.user_account,
        &ctx.accounts.oracle,
        now,
    )?;
    set_return_data(&value.to_le_bytes());
    Ok(())
}

/// Registered LTV of a collateral asset, whole percent.
pub fn get_ltv_ratio(ctx: Context<MarketView>, asset_mint: Pubkey) -> Result<()> {
    let ltv = ctx.accounts.market.ltv_ratio(&asset_mint)?;
    set_return_data(&ltv.to_le_bytes());
    Ok(())
}

/// Interest accrued since the user's last checkpoint (zero with no debt).
pub fn calculate_accrued_interest(ctx: Context<MarketView>, user: Pubkey) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let interest = ctx.accounts.market.accrued_interest(&user, now)?;
    set_return_data(&interest.to_le_bytes());
    Ok(())
}

/// Σ principal + accrued interest over every open debt position.
pub fn borrowed_plus_interest(ctx: Context<MarketView>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let total = ctx.accounts.market.borrowed_plus_interest(now)?;
    set_return_data(&total.to_le_bytes());
    Ok(())
}

/// Idle custody plus lent-out principal plus accrued interest.
pub fn get_total_assets(ctx: Context<VaultView>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let outstanding = ctx.accounts.market.borrowed_plus_interest(now)?;
    let total = ctx.accounts.vault.total_assets(outstanding)?;
    set_return_data(&total.to_le_bytes());
    Ok(())
}

/// Shares for `assets` at the current share price (floor rounding).
pub fn convert_to_shares_view(ctx: Context<VaultView>, assets: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let outstanding = ctx.accounts.market.borrowed_plus_interest(now)?;
    let total_assets = ctx.accounts.vault.total_assets(outstanding)?;

    let shares = convert_to_shares(
        assets,
        total_assets,
        ctx.accounts.shares_mint.supply,
        Rounding::Floor,
    )?;
    set_return_data(&shares.to_le_bytes());
    Ok(())
}

/// Assets for `shares` at the current share price (floor rounding).
pub fn convert_to_assets_view(ctx: Context<VaultView>, shares: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let outstanding = ctx.accounts.market.borrowed_plus_interest(now)?;
    let total_assets = ctx.accounts.vault.total_assets(outstanding)?;

    let assets = convert_to_assets(
        shares,
        total_assets,
        ctx.accounts.shares_mint.supply,
        Rounding::Floor,
    )?;
    set_return_data(&assets.to_le_bytes());
    Ok(())
}
