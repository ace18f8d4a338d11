use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{MARKET_SEED, VAULT_SEED};
use crate::error::LendingError;
use crate::events::Withdraw as WithdrawEvent;
use crate::math::{convert_to_shares, Rounding};
use crate::state::{Market, Vault};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [MARKET_SEED, market.asset_mint.as_ref()],
        bump = market.bump,
        has_one = vault,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        has_one = asset_mint,
        has_one = shares_mint,
        has_one = asset_vault,
    )]
    pub vault: Box<Account<'info, Vault>>,

    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub shares_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub asset_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_shares_account.mint == vault.shares_mint,
        constraint = owner_shares_account.owner == owner.key(),
    )]
    pub owner_shares_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Assets may be routed to any account of the right mint.
    #[account(
        mut,
        constraint = receiver_asset_account.mint == vault.asset_mint,
    )]
    pub receiver_asset_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    require!(amount > 0, LendingError::ZeroAmount);

    let now = Clock::get()?.unix_timestamp;
    let outstanding = ctx.accounts.market.borrowed_plus_interest(now)?;
    let total_assets = ctx.accounts.vault.total_assets(outstanding)?;
    let total_shares = ctx.accounts.shares_mint.supply;

    // Ceiling: the owner burns at least the shares the assets are worth.
    let shares = convert_to_shares(amount, total_assets, total_shares, Rounding::Ceiling)?;
    require!(
        shares > 0 && shares <= ctx.accounts.owner_shares_account.amount,
        LendingError::InsufficientShares
    );

    // Fails when the liquidity is lent out, even though the shares cover it.
    ctx.accounts.vault.record_withdraw(amount)?;

    burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.shares_mint.to_account_info(),
                from: ctx.accounts.owner_shares_account.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        shares,
    )?;

    let market_key = ctx.accounts.vault.market;
    let signer_seeds: &[&[&[u8]]] = &[&[
        VAULT_SEED,
        market_key.as_ref(),
        &[ctx.accounts.vault.bump],
    ]];
    transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.asset_vault.to_account_info(),
                mint: ctx.accounts.asset_mint.to_account_info(),
                to: ctx.accounts.receiver_asset_account.to_account_info(),
                authority: ctx.accounts.vault.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        ctx.accounts.asset_mint.decimals,
    )?;

    emit!(WithdrawEvent {
        vault: ctx.accounts.vault.key(),
        owner: ctx.accounts.owner.key(),
        receiver: ctx.accounts.receiver_asset_account.key(),
        assets: amount,
        shares,
    });

    Ok(())
}
