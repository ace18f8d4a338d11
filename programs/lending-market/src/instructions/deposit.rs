use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::constants::{MARKET_SEED, VAULT_SEED};
use crate::error::LendingError;
use crate::events::Deposit as DepositEvent;
use crate::math::{convert_to_shares, Rounding};
use crate::state::{Market, Vault};

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// Needed for the lent-out-plus-interest term of total assets.
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
        associated_token::mint = asset_mint,
        associated_token::authority = depositor,
        associated_token::token_program = token_program,
    )]
    pub depositor_asset_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = shares_mint,
        associated_token::authority = depositor,
        associated_token::token_program = token_program,
    )]
    pub depositor_shares_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, LendingError::ZeroAmount);

    let now = Clock::get()?.unix_timestamp;
    let outstanding = ctx.accounts.market.borrowed_plus_interest(now)?;
    let total_assets = ctx.accounts.vault.total_assets(outstanding)?;
    let total_shares = ctx.accounts.shares_mint.supply;

    let shares = convert_to_shares(amount, total_assets, total_shares, Rounding::Floor)?;
    require!(shares > 0, LendingError::DepositTooSmall);

    transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.depositor_asset_account.to_account_info(),
                mint: ctx.accounts.asset_mint.to_account_info(),
                to: ctx.accounts.asset_vault.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        ),
        amount,
        ctx.accounts.asset_mint.decimals,
    )?;

    let market_key = ctx.accounts.vault.market;
    let signer_seeds: &[&[&[u8]]] = &[&[
        VAULT_SEED,
        market_key.as_ref(),
        &[ctx.accounts.vault.bump],
    ]];
    mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.shares_mint.to_account_info(),
                to: ctx.accounts.depositor_shares_account.to_account_info(),
                authority: ctx.accounts.vault.to_account_info(),
            },
            signer_seeds,
        ),
        shares,
    )?;

    ctx.accounts.vault.record_deposit(amount)?;

    emit!(DepositEvent {
        vault: ctx.accounts.vault.key(),
        owner: ctx.accounts.depositor.key(),
        assets: amount,
        shares,
    });

    Ok(())
}
