use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::constants::{MARKET_SEED, RATE_SCALE, USER_SEED, VAULT_SEED};
use crate::error::LendingError;
use crate::events::Borrowed;
use crate::math::{mul_div, Rounding};
use crate::state::{Market, OracleRegistry, RateModel, UserAccount, Vault};

#[derive(Accounts)]
pub struct Borrow<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.asset_mint.as_ref()],
        bump = market.bump,
        has_one = vault,
        has_one = oracle,
        has_one = rate_model,
        has_one = asset_mint,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        has_one = asset_vault,
        constraint = vault.market == market.key() @ LendingError::UnauthorizedMarket,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        seeds = [USER_SEED, market.key().as_ref(), borrower.key().as_ref()],
        bump = user_account.bump,
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    pub oracle: Box<Account<'info, OracleRegistry>>,
    pub rate_model: Box<Account<'info, RateModel>>,

    pub asset_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub asset_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = borrower,
        associated_token::mint = asset_mint,
        associated_token::authority = borrower,
        associated_token::token_program = token_program,
    )]
    pub borrower_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Borrow>, amount: u64) -> Result<()> {
    require!(amount > 0, LendingError::ZeroAmount);

    let now = Clock::get()?.unix_timestamp;
    let borrower = ctx.accounts.borrower.key();
    let market = &ctx.accounts.market;
    let vault = &ctx.accounts.vault;

    let outstanding = market.outstanding_debt(&borrower, now)?;
    let power = market.borrowing_power(&ctx.accounts.user_account, &ctx.accounts.oracle, now)?;
    require!(
        amount <= power.saturating_sub(outstanding),
        LendingError::OverBorrowableAmount
    );

    let idle = vault.total_idle;
    require!(amount <= idle, LendingError::InsufficientLiquidity);

    // Rate snapshot from post-disbursement usage: borrowed value over the
    // pool's total economic value (which the disbursement itself preserves).
    let outstanding_all = market.borrowed_plus_interest(now)?;
    let total_supplied = vault.total_assets(outstanding_all)?;
    let borrowed_after = outstanding_all
        .checked_add(amount)
        .ok_or(LendingError::MathOverflow)?;
    let utilization = RateModel::utilization(borrowed_after, total_supplied)?;
    let volatility = ctx.accounts.oracle.volatility(&market.asset_mint);
    let supply_demand_ratio = mul_div(amount, RATE_SCALE, idle, Rounding::Floor)?;
    let rate = ctx
        .accounts
        .rate_model
        .borrow_rate(utilization, volatility, supply_demand_ratio)?;

    let market_key = ctx.accounts.market.key();
    ctx.accounts
        .market
        .record_borrow(borrower, amount, rate, now)?;
    ctx.accounts.vault.admin_borrow(&market_key, amount)?;

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
                to: ctx.accounts.borrower_token_account.to_account_info(),
                authority: ctx.accounts.vault.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        ctx.accounts.asset_mint.decimals,
    )?;

    let principal = ctx
        .accounts
        .market
        .debt_position(&borrower)
        .map(|d| d.principal)
        .unwrap_or(0);

    emit!(Borrowed {
        market: market_key,
        borrower,
        amount,
        rate,
        principal,
    });

    Ok(())
}
